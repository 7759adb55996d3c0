//! # Sensor Buffer Conversion
//!
//! Rules shared by every exporter:
//!
//! -   8-bit colour buffers are used as-is.
//! -   Float colour buffers whose maximum is at most `1.0` are scaled by 255
//!     and truncated; other float buffers are truncated after clamping to
//!     `[0, 255]`.
//! -   Depth is mapped to 8 bits either against a fixed range or against the
//!     image's own min/max, optionally through a colormap.
//! -   Semantic labels are reduced modulo [`PALETTE_SIZE`] and looked up in
//!     [`SEMANTIC_PALETTE`].

use episode::{SensorArray, SensorValue};
use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Rgb, RgbImage, RgbaImage};

use crate::VisualizeError;

/// Number of entries in [`SEMANTIC_PALETTE`].
pub const PALETTE_SIZE: usize = 40;

/// The d3 category20 + category20b colours.
pub const SEMANTIC_PALETTE: [[u8; 3]; PALETTE_SIZE] = [
    [31, 119, 180],
    [174, 199, 232],
    [255, 127, 14],
    [255, 187, 120],
    [44, 160, 44],
    [152, 223, 138],
    [214, 39, 40],
    [255, 152, 150],
    [148, 103, 189],
    [197, 176, 213],
    [140, 86, 75],
    [196, 156, 148],
    [227, 119, 194],
    [247, 182, 210],
    [127, 127, 127],
    [199, 199, 199],
    [188, 189, 34],
    [219, 219, 141],
    [23, 190, 207],
    [158, 218, 229],
    [57, 59, 121],
    [82, 84, 163],
    [107, 110, 207],
    [156, 158, 222],
    [99, 121, 57],
    [140, 162, 82],
    [181, 207, 107],
    [206, 219, 156],
    [140, 109, 49],
    [189, 158, 57],
    [231, 186, 82],
    [231, 203, 148],
    [132, 60, 57],
    [173, 73, 74],
    [214, 97, 107],
    [231, 150, 156],
    [123, 65, 115],
    [165, 81, 148],
    [206, 109, 189],
    [222, 158, 214],
];

/// Depth beyond which the fixed mapping saturates, in metres.
pub const DEFAULT_MAX_DEPTH: f32 = 10.0;

/// Channel layout of a 3-channel colour buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Bgr,
}

/// How depth values become 8-bit intensities.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DepthMapping {
    /// `depth / max_depth * 255`, clamped.
    Fixed { max_depth: f32 },
    /// Stretch the image's own finite min/max to `[0, 255]`.
    Normalize,
}

impl Default for DepthMapping {
    fn default() -> Self {
        DepthMapping::Fixed { max_depth: DEFAULT_MAX_DEPTH }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Colormap {
    #[default]
    Gray,
    Jet,
}

fn dimensions<T>(array: &SensorArray<T>) -> Result<(u32, u32), VisualizeError> {
    let width = u32::try_from(array.width()).map_err(|_| VisualizeError::TooLarge(array.width()))?;
    let height = u32::try_from(array.height()).map_err(|_| VisualizeError::TooLarge(array.height()))?;
    if width == 0 || height == 0 || array.channels() == 0 {
        return Err(VisualizeError::Empty);
    }
    Ok((width, height))
}

/// Rescale a float colour buffer to bytes.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn float_to_u8(values: &[f32]) -> Vec<u8> {
    let max = values.iter().copied().filter(|v| v.is_finite()).fold(f32::NEG_INFINITY, f32::max);
    let scale = if max <= 1.0 { 255.0 } else { 1.0 };
    values
        .iter()
        .map(|v| if v.is_finite() { (v * scale).clamp(0.0, 255.0) as u8 } else { 0 })
        .collect()
}

fn bytes_to_image(
    height: u32,
    width: u32,
    channels: usize,
    mut data: Vec<u8>,
    order: ChannelOrder,
) -> Result<DynamicImage, VisualizeError> {
    let malformed = || VisualizeError::Malformed { width, height, channels };
    match channels {
        1 => GrayImage::from_raw(width, height, data).map(DynamicImage::ImageLuma8).ok_or_else(malformed),
        3 => {
            if order == ChannelOrder::Bgr {
                for pixel in data.chunks_exact_mut(3) {
                    pixel.swap(0, 2);
                }
            }
            RgbImage::from_raw(width, height, data).map(DynamicImage::ImageRgb8).ok_or_else(malformed)
        }
        4 => RgbaImage::from_raw(width, height, data).map(DynamicImage::ImageRgba8).ok_or_else(malformed),
        other => Err(VisualizeError::UnsupportedChannels(other)),
    }
}

/// Convert a colour observation into an image.
///
/// # Errors
///
/// [`VisualizeError::NotColor`] for non-colour sensor values, and shape
/// errors for buffers an image cannot hold.
pub fn color_to_image(value: &SensorValue, order: ChannelOrder) -> Result<DynamicImage, VisualizeError> {
    match value {
        SensorValue::Color(array) => {
            let (width, height) = dimensions(array)?;
            bytes_to_image(height, width, array.channels(), array.data().to_vec(), order)
        }
        SensorValue::ColorF32(array) => {
            let (width, height) = dimensions(array)?;
            bytes_to_image(height, width, array.channels(), float_to_u8(array.data()), order)
        }
        _ => Err(VisualizeError::NotColor),
    }
}

/// Convert a depth buffer into a grey or colormapped image.
///
/// # Errors
///
/// Shape errors for empty or oversized buffers.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn depth_to_image(
    depth: &SensorArray<f32>,
    mapping: DepthMapping,
    colormap: Colormap,
) -> Result<DynamicImage, VisualizeError> {
    let (width, height) = dimensions(depth)?;
    let (offset, range) = match mapping {
        DepthMapping::Fixed { max_depth } => (0.0, max_depth),
        DepthMapping::Normalize => {
            let finite = depth.data().iter().copied().filter(|v| v.is_finite());
            let (min, max) = finite.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
            if min.is_finite() { (min, max - min) } else { (0.0, 0.0) }
        }
    };
    let intensities: Vec<u8> = depth
        .data()
        .iter()
        .step_by(depth.channels())
        .map(|d| {
            if !d.is_finite() || range <= 0.0 {
                0
            } else {
                ((d - offset) / range * 255.0).clamp(0.0, 255.0) as u8
            }
        })
        .collect();

    match colormap {
        Colormap::Gray => GrayImage::from_raw(width, height, intensities)
            .map(DynamicImage::ImageLuma8)
            .ok_or(VisualizeError::Malformed { width, height, channels: 1 }),
        Colormap::Jet => {
            let gray: ImageBuffer<Luma<u8>, Vec<u8>> = GrayImage::from_raw(width, height, intensities)
                .ok_or(VisualizeError::Malformed { width, height, channels: 1 })?;
            let colored = RgbImage::from_fn(width, height, |x, y| Rgb(jet(gray.get_pixel(x, y)[0])));
            Ok(DynamicImage::ImageRgb8(colored))
        }
    }
}

/// Piecewise-linear jet colormap.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn jet(value: u8) -> [u8; 3] {
    let t = f32::from(value) / 255.0;
    let channel = |center: f32| ((1.5 - (4.0 * t - center).abs()).clamp(0.0, 1.0) * 255.0) as u8;
    [channel(3.0), channel(2.0), channel(1.0)]
}

/// Palette colour for a semantic label.
#[must_use]
pub fn label_color(label: u32) -> [u8; 3] {
    SEMANTIC_PALETTE[label as usize % PALETTE_SIZE]
}

/// Colour a label buffer with the semantic palette.
///
/// # Errors
///
/// Shape errors for empty or oversized buffers.
pub fn semantic_to_image(labels: &SensorArray<u32>) -> Result<RgbaImage, VisualizeError> {
    let (width, height) = dimensions(labels)?;
    let mut data = Vec::with_capacity(labels.height() * labels.width() * 4);
    for label in labels.data().iter().step_by(labels.channels()) {
        let [r, g, b] = label_color(*label);
        data.extend_from_slice(&[r, g, b, 255]);
    }
    RgbaImage::from_raw(width, height, data).ok_or(VisualizeError::Malformed { width, height, channels: 4 })
}
