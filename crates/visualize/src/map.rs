use episode::SensorArray;
use image::{Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::VisualizeError;

/// Colours of the top-down map cells: unnavigable, navigable, border.
pub const TOPDOWN_COLORS: [[u8; 3]; 3] = [[255, 255, 255], [128, 128, 128], [0, 0, 0]];

/// Recolour a single-channel top-down map.
///
/// # Errors
///
/// [`VisualizeError::UnknownCell`] for cell values outside `0..=2` and
/// shape errors for empty or oversized grids.
pub fn topdown_to_image(grid: &SensorArray<u8>) -> Result<RgbImage, VisualizeError> {
    let width = u32::try_from(grid.width()).map_err(|_| VisualizeError::TooLarge(grid.width()))?;
    let height = u32::try_from(grid.height()).map_err(|_| VisualizeError::TooLarge(grid.height()))?;
    if grid.is_empty() || grid.channels() != 1 {
        return Err(VisualizeError::Empty);
    }
    let mut image = RgbImage::new(width, height);
    for (pixel, cell) in image.pixels_mut().zip(grid.data()) {
        let color = TOPDOWN_COLORS.get(usize::from(*cell)).ok_or(VisualizeError::UnknownCell(*cell))?;
        *pixel = Rgb(*color);
    }
    Ok(image)
}

/// Save a recoloured top-down map to `path`.
pub fn save_topdown_map(grid: &SensorArray<u8>, path: impl AsRef<Path>) -> Option<PathBuf> {
    let path = path.as_ref();
    let result = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or(Ok(()), fs::create_dir_all)
        .map_err(VisualizeError::from)
        .and_then(|()| topdown_to_image(grid))
        .and_then(|image| image.save_with_format(path, image::ImageFormat::Png).map_err(VisualizeError::from));
    match result {
        Ok(()) => {
            info!("Top-down map saved to: {}", path.display());
            Some(path.to_path_buf())
        }
        Err(e) => {
            error!("Error saving top-down map: {e}");
            None
        }
    }
}
