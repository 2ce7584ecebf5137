//! Application layer use cases.
//!
//! - **`set_wallpaper`** – Decodes the source image, composes it across every
//!   monitor of the layout and delivers the canvas to a sink. The decoder and
//!   the sink are traits so the use case can be tested without files or a
//!   display server.

pub mod set_wallpaper;
