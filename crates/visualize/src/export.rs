use chrono::Local;
use episode::{SensorArray, SensorValue};
use image::DynamicImage;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::convert::{color_to_image, depth_to_image, semantic_to_image, ChannelOrder, Colormap, DepthMapping};
use crate::VisualizeError;

/// `rgb_observation_<YYYYmmdd_HHMMSS_mmm>.png`
fn timestamped_name() -> String {
    format!("rgb_observation_{}.png", Local::now().format("%Y%m%d_%H%M%S_%3f"))
}

fn png_name(filename: Option<&str>) -> String {
    match filename {
        Some(name) if name.ends_with(".png") => name.to_string(),
        Some(name) => format!("{name}.png"),
        None => timestamped_name(),
    }
}

fn write_png(image: &DynamicImage, path: &Path) -> Result<(), VisualizeError> {
    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Save a colour observation as `output_dir/filename`.
///
/// `filename` gains a `.png` suffix when it lacks one; without a filename a
/// timestamped name is generated. Returns the written path, or `None` after
/// logging the failure.
pub fn save_observation(
    frame: &SensorValue,
    order: ChannelOrder,
    output_dir: impl AsRef<Path>,
    filename: Option<&str>,
) -> Option<PathBuf> {
    let output_dir = output_dir.as_ref();
    let path = output_dir.join(png_name(filename));
    let result = fs::create_dir_all(output_dir)
        .map_err(VisualizeError::from)
        .and_then(|()| color_to_image(frame, order))
        .and_then(|image| write_png(&image, &path));
    match result {
        Ok(()) => {
            info!("RGB observation saved to: {}", path.display());
            Some(path)
        }
        Err(e) => {
            error!("Error saving RGB observation: {e}");
            None
        }
    }
}

/// [`save_observation`] for RGB/RGBA buffers.
pub fn save_rgb_observation(
    frame: &SensorValue,
    output_dir: impl AsRef<Path>,
    filename: Option<&str>,
) -> Option<PathBuf> {
    save_observation(frame, ChannelOrder::Rgb, output_dir, filename)
}

/// Files written by [`display_sample_save`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleFiles {
    pub rgb: PathBuf,
    pub semantic: Option<PathBuf>,
    pub depth: Option<PathBuf>,
}

/// Save an observation triple as `<name>-rgb.png`, `<name>-semantic.png` and
/// `<name>-depth.png` under `output_dir`.
///
/// The colour image is stored as RGBA, labels through the semantic palette
/// and depth with the fixed 10 m mapping. Absent buffers are skipped.
pub fn display_sample_save(
    rgb: &SensorArray<u8>,
    output_dir: impl AsRef<Path>,
    file_name: &str,
    semantic: Option<&SensorArray<u32>>,
    depth: Option<&SensorArray<f32>>,
) -> Option<SampleFiles> {
    let output_dir = output_dir.as_ref();
    match write_sample(rgb, output_dir, file_name, semantic, depth) {
        Ok(files) => {
            info!("Saved sample {file_name} to {}", output_dir.display());
            Some(files)
        }
        Err(e) => {
            error!("Error saving sample {file_name}: {e}");
            None
        }
    }
}

fn write_sample(
    rgb: &SensorArray<u8>,
    output_dir: &Path,
    file_name: &str,
    semantic: Option<&SensorArray<u32>>,
    depth: Option<&SensorArray<f32>>,
) -> Result<SampleFiles, VisualizeError> {
    fs::create_dir_all(output_dir)?;

    let rgb_image = color_to_image(&SensorValue::Color(rgb.clone()), ChannelOrder::Rgb)?;
    let rgb_path = output_dir.join(format!("{file_name}-rgb.png"));
    write_png(&DynamicImage::ImageRgba8(rgb_image.to_rgba8()), &rgb_path)?;

    let semantic_path = match semantic.filter(|s| !s.is_empty()) {
        Some(labels) => {
            let path = output_dir.join(format!("{file_name}-semantic.png"));
            write_png(&DynamicImage::ImageRgba8(semantic_to_image(labels)?), &path)?;
            Some(path)
        }
        None => None,
    };

    let depth_path = match depth.filter(|d| !d.is_empty()) {
        Some(depth) => {
            let path = output_dir.join(format!("{file_name}-depth.png"));
            write_png(&depth_to_image(depth, DepthMapping::default(), Colormap::Gray)?, &path)?;
            Some(path)
        }
        None => None,
    };

    Ok(SampleFiles { rgb: rgb_path, semantic: semantic_path, depth: depth_path })
}
