#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Observation Export
//!
//! Saves sensor observations as PNG files and assembles frames into animated
//! GIFs.
//!
//! Exporters never abort the caller: an encode or I/O failure is logged and
//! reported as `None`, and so is a request with nothing to export (an empty
//! frame list, a directory without PNGs). The conversion helpers in
//! [`convert`] return [`VisualizeError`] for callers that want the reason.

pub mod convert;
pub mod export;
pub mod gif;
pub mod map;

use thiserror::Error;

pub use convert::{
    color_to_image, depth_to_image, semantic_to_image, ChannelOrder, Colormap, DepthMapping,
    PALETTE_SIZE, SEMANTIC_PALETTE,
};
pub use export::{display_sample_save, save_observation, save_rgb_observation, SampleFiles};
pub use gif::{create_gif_from_frames, create_gif_from_pngs, GifOptions};
pub use map::{save_topdown_map, topdown_to_image};

#[derive(Error, Debug)]
pub enum VisualizeError {
    #[error("image encode/decode failed: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("sensor value is not a colour image")]
    NotColor,
    #[error("unsupported channel count {0}")]
    UnsupportedChannels(usize),
    #[error("buffer does not fit a {width}x{height}x{channels} image")]
    Malformed { width: u32, height: u32, channels: usize },
    #[error("image dimension {0} is too large")]
    TooLarge(usize),
    #[error("image is empty")]
    Empty,
    #[error("top-down map cell value {0} has no colour")]
    UnknownCell(u8),
}
