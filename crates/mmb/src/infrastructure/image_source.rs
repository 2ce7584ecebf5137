//! Source image decoding from the file system.

use std::path::Path;

use image::{DynamicImage, ImageReader};
use tracing::debug;

use crate::application::set_wallpaper::{ImageLoader, ImageSourceError};

/// Decodes images with the `image` crate.
///
/// The format is guessed from the file contents rather than the extension,
/// so a mislabelled JPEG still decodes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileImageLoader;

impl FileImageLoader {
    pub fn new() -> Self {
        Self
    }
}

impl ImageLoader for FileImageLoader {
    fn load(&self, path: &Path) -> Result<DynamicImage, ImageSourceError> {
        let io_error = |source| ImageSourceError::Io {
            path: path.to_path_buf(),
            source,
        };
        let reader = ImageReader::open(path)
            .map_err(io_error)?
            .with_guessed_format()
            .map_err(io_error)?;
        debug!(path = %path.display(), format = ?reader.format(), "decoding image");

        reader.decode().map_err(|source| ImageSourceError::Decode {
            path: path.to_path_buf(),
            source,
        })
    }
}
