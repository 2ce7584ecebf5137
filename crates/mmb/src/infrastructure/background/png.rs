//! Writes the canvas to a PNG file instead of applying it.

use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};
use tracing::debug;

use crate::application::set_wallpaper::{CanvasSink, CanvasSinkError};

/// [`CanvasSink`] that encodes the canvas as PNG at a fixed path.
///
/// The format is always PNG, whatever the path's extension.
#[derive(Debug, Clone)]
pub struct PngFileSink {
    path: PathBuf,
}

impl PngFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CanvasSink for PngFileSink {
    fn apply(&self, canvas: &RgbaImage) -> Result<(), CanvasSinkError> {
        debug!(
            path = %self.path.display(),
            width = canvas.width(),
            height = canvas.height(),
            "encoding canvas as PNG"
        );
        canvas
            .save_with_format(&self.path, ImageFormat::Png)
            .map_err(|source| CanvasSinkError::Encode {
                path: self.path.clone(),
                source,
            })
    }

    fn describe(&self) -> String {
        format!("PNG file {}", self.path.display())
    }
}
