//! Full-screen canvas allocation.

use image::{Rgba, RgbaImage};
use thiserror::Error;

use crate::domain::layout::ScreenLayout;

/// Colour of every canvas pixel no monitor placement covers.
pub const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Bytes per RGBA pixel.
const BYTES_PER_PIXEL: u64 = 4;

/// Errors that can occur when allocating a canvas.
#[derive(Debug, Error, PartialEq)]
pub enum CanvasError {
    /// The screen bounds round down to zero pixels.
    #[error("canvas would have no pixels ({width}x{height})")]
    ZeroSized { width: u32, height: u32 },

    /// The pixel buffer could not be allocated.
    #[error("cannot allocate a {width}x{height} canvas ({bytes} bytes)")]
    AllocationFailure { width: u32, height: u32, bytes: u64 },
}

/// Allocates a canvas covering the layout's screen bounds, filled with [`BACKGROUND`].
///
/// # Errors
///
/// See [`allocate`].
pub fn allocate_canvas(layout: &ScreenLayout) -> Result<RgbaImage, CanvasError> {
    let (width, height) = layout.bounds().pixel_size();
    allocate(width, height)
}

/// Allocates a `width × height` canvas filled with [`BACKGROUND`].
///
/// The buffer is reserved fallibly so an absurd screen size surfaces as an
/// error instead of aborting the process.
///
/// # Errors
///
/// - [`CanvasError::ZeroSized`] if either dimension is zero.
/// - [`CanvasError::AllocationFailure`] if the buffer size overflows the
///   address space or the allocator refuses it.
pub fn allocate(width: u32, height: u32) -> Result<RgbaImage, CanvasError> {
    if width == 0 || height == 0 {
        return Err(CanvasError::ZeroSized { width, height });
    }

    let bytes = (u64::from(width) * u64::from(height))
        .checked_mul(BYTES_PER_PIXEL)
        .unwrap_or(u64::MAX);
    let failure = CanvasError::AllocationFailure {
        width,
        height,
        bytes,
    };

    let len = match usize::try_from(bytes) {
        Ok(len) => len,
        Err(_) => return Err(failure),
    };
    let mut buffer: Vec<u8> = Vec::new();
    if buffer.try_reserve_exact(len).is_err() {
        return Err(failure);
    }
    buffer.extend(BACKGROUND.0.iter().copied().cycle().take(len));

    RgbaImage::from_raw(width, height, buffer).ok_or(failure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::Rectangle;

    #[test]
    fn test_allocate_canvas_matches_screen_bounds() {
        let layout = ScreenLayout::build(
            3200.0,
            1080.0,
            vec![
                Rectangle::new(0.0, 0.0, 1920.0, 1080.0),
                Rectangle::new(1920.0, 0.0, 1280.0, 1024.0),
            ],
        )
        .expect("layout");

        let canvas = allocate_canvas(&layout).expect("allocate");

        assert_eq!(canvas.dimensions(), (3200, 1080));
    }

    #[test]
    fn test_allocate_fills_with_opaque_black() {
        let canvas = allocate(4, 3).expect("allocate");
        assert!(canvas.pixels().all(|p| *p == BACKGROUND));
    }

    #[test]
    fn test_allocate_rejects_zero_dimension() {
        assert_eq!(
            allocate(0, 1080),
            Err(CanvasError::ZeroSized {
                width: 0,
                height: 1080
            })
        );
    }

    #[test]
    fn test_allocate_reports_failure_for_unaddressable_size() {
        let result = allocate(u32::MAX, u32::MAX);
        assert!(matches!(
            result,
            Err(CanvasError::AllocationFailure { width, height, .. })
                if width == u32::MAX && height == u32::MAX
        ));
    }
}
