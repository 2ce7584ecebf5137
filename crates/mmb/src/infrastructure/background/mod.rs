//! Destinations for the finished canvas.
//!
//! - **`png`** – [`PngFileSink`] writes a PNG file (`--output`).
//! - **`x11_root`** – [`X11RootSink`] installs the canvas as the root window
//!   background, following the `_XROOTPMAP_ID` / `ESETROOT_PMAP_ID`
//!   conventions.

pub mod png;
pub mod x11_root;

pub use png::PngFileSink;
pub use x11_root::X11RootSink;
