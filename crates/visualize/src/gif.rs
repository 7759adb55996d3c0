//! # Animated GIF Assembly

use episode::SensorValue;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::convert::{color_to_image, ChannelOrder};
use crate::VisualizeError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GifOptions {
    /// Display time of every frame.
    pub duration_ms: u32,
    /// Number of repetitions; `0` loops forever.
    pub loop_count: u16,
    /// Layout of 3-channel input frames.
    pub channel_order: ChannelOrder,
}

impl Default for GifOptions {
    fn default() -> Self {
        Self { duration_ms: 500, loop_count: 0, channel_order: ChannelOrder::Rgb }
    }
}

fn encode(frames: Vec<RgbaImage>, output: &Path, options: GifOptions) -> Result<(), VisualizeError> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(output)?;
    let mut encoder = GifEncoder::new(BufWriter::new(file));
    let repeat = match options.loop_count {
        0 => Repeat::Infinite,
        n => Repeat::Finite(n),
    };
    encoder.set_repeat(repeat)?;
    let delay = Delay::from_numer_denom_ms(options.duration_ms, 1);
    encoder.encode_frames(frames.into_iter().map(|f| Frame::from_parts(f, 0, 0, delay)))?;
    Ok(())
}

fn finish(frames: Vec<RgbaImage>, output: &Path, options: GifOptions) -> Option<PathBuf> {
    let count = frames.len();
    match encode(frames, output, options) {
        Ok(()) => {
            info!("GIF created successfully: {}", output.display());
            info!("Total frames: {count}");
            Some(output.to_path_buf())
        }
        Err(e) => {
            error!("Error creating GIF: {e}");
            None
        }
    }
}

fn png_files(directory: &Path) -> Result<Vec<PathBuf>, VisualizeError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "png") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Collate every `*.png` in `png_directory`, in file name order, into an
/// animated GIF at `output`.
///
/// Files that fail to decode are logged and skipped. Returns `None` when the
/// directory holds no loadable PNG or the GIF cannot be written.
pub fn create_gif_from_pngs(
    png_directory: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: GifOptions,
) -> Option<PathBuf> {
    let png_directory = png_directory.as_ref();
    let files = match png_files(png_directory) {
        Ok(files) => files,
        Err(e) => {
            error!("Error creating GIF: cannot list {}: {e}", png_directory.display());
            return None;
        }
    };
    if files.is_empty() {
        warn!("No PNG files found in directory: {}", png_directory.display());
        return None;
    }

    let mut frames = Vec::with_capacity(files.len());
    for file in &files {
        match image::open(file) {
            Ok(img) => {
                frames.push(img.to_rgba8());
                info!("Loaded: {}", file.display());
            }
            Err(e) => error!("Error loading {}: {e}", file.display()),
        }
    }
    if frames.is_empty() {
        warn!("No valid images loaded");
        return None;
    }
    finish(frames, output.as_ref(), options)
}

/// Animated GIF from in-memory colour observations, in the given order.
///
/// Frames that are not convertible colour images are logged and skipped.
/// Returns `None` for an empty input or when nothing converts.
pub fn create_gif_from_frames(
    frames: &[SensorValue],
    output: impl AsRef<Path>,
    options: GifOptions,
) -> Option<PathBuf> {
    if frames.is_empty() {
        warn!("No RGB observations provided");
        return None;
    }

    let mut images = Vec::with_capacity(frames.len());
    for (i, frame) in frames.iter().enumerate() {
        match color_to_image(frame, options.channel_order) {
            Ok(img) => {
                images.push(img.to_rgba8());
                info!("Processed observation {}/{}", i + 1, frames.len());
            }
            Err(e) => error!("Error processing observation {}: {e}", i + 1),
        }
    }
    if images.is_empty() {
        warn!("No valid images processed");
        return None;
    }
    finish(images, output.as_ref(), options)
}
