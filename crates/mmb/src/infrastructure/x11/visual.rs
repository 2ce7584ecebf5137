//! Conversion from RGBA canvas rows to the root visual's ZPixmap layout.
//!
//! Only 24- and 32-bit TrueColor root visuals stored at 32 bits per pixel are
//! supported, which covers every X server in practical use.

use image::RgbaImage;
use x11rb::protocol::xproto::{ImageOrder, Screen, Setup, VisualClass};

use super::X11Error;

/// How one pixel is laid out in a ZPixmap `PutImage` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat {
    pub depth: u8,
    pub red_shift: u32,
    pub green_shift: u32,
    pub blue_shift: u32,
    pub lsb_first: bool,
}

impl PixelFormat {
    /// Bytes per encoded pixel.
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Derives the format of `screen`'s root visual.
    ///
    /// # Errors
    ///
    /// Returns [`X11Error::UnsupportedVisual`] if the root visual is not
    /// TrueColor, its depth is not 24 or 32, or the server stores that depth
    /// at anything other than 32 bits per pixel.
    pub fn for_root(setup: &Setup, screen: &Screen) -> Result<Self, X11Error> {
        let depth = screen.root_depth;
        let visual = screen
            .allowed_depths
            .iter()
            .filter(|d| d.depth == depth)
            .flat_map(|d| d.visuals.iter())
            .find(|v| v.visual_id == screen.root_visual)
            .ok_or_else(|| {
                X11Error::UnsupportedVisual(format!(
                    "root visual {:#x} not listed for depth {depth}",
                    screen.root_visual
                ))
            })?;

        if visual.class != VisualClass::TRUE_COLOR || (depth != 24 && depth != 32) {
            return Err(X11Error::UnsupportedVisual(format!(
                "{:?} at depth {depth}",
                visual.class
            )));
        }

        let bits_per_pixel = setup
            .pixmap_formats
            .iter()
            .find(|f| f.depth == depth)
            .map(|f| f.bits_per_pixel);
        if bits_per_pixel != Some(32) {
            return Err(X11Error::UnsupportedVisual(format!(
                "depth {depth} stored at {bits_per_pixel:?} bits per pixel"
            )));
        }

        Ok(Self {
            depth,
            red_shift: visual.red_mask.trailing_zeros(),
            green_shift: visual.green_mask.trailing_zeros(),
            blue_shift: visual.blue_mask.trailing_zeros(),
            lsb_first: setup.image_byte_order == ImageOrder::LSB_FIRST,
        })
    }

    /// Packs one RGB triple into a pixel value. Alpha is dropped; the canvas
    /// is opaque.
    pub fn pack(&self, r: u8, g: u8, b: u8) -> u32 {
        (u32::from(r) << self.red_shift)
            | (u32::from(g) << self.green_shift)
            | (u32::from(b) << self.blue_shift)
    }

    /// Encodes rows `first_row..first_row + rows` of `canvas`.
    pub fn encode_rows(&self, canvas: &RgbaImage, first_row: u32, rows: u32) -> Vec<u8> {
        let width = canvas.width() as usize;
        let mut out = Vec::with_capacity(width * rows as usize * Self::BYTES_PER_PIXEL);
        let pixels = canvas
            .rows()
            .skip(first_row as usize)
            .take(rows as usize)
            .flatten();
        for pixel in pixels {
            let [r, g, b, _] = pixel.0;
            let value = self.pack(r, g, b);
            if self.lsb_first {
                out.extend_from_slice(&value.to_le_bytes());
            } else {
                out.extend_from_slice(&value.to_be_bytes());
            }
        }
        out
    }
}

/// Number of canvas rows that fit in one `PutImage` request.
///
/// `max_request_bytes` is the server limit; the fixed request header is
/// subtracted. Always at least one.
pub fn rows_per_request(width: u32, max_request_bytes: usize) -> u32 {
    const PUT_IMAGE_HEADER: usize = 24;
    let row_bytes = (width as usize).max(1) * PixelFormat::BYTES_PER_PIXEL;
    let rows = max_request_bytes.saturating_sub(PUT_IMAGE_HEADER) / row_bytes;
    u32::try_from(rows).unwrap_or(u32::MAX).max(1)
}
