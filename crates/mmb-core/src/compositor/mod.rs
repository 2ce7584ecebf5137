//! Canvas allocation and composition.
//!
//! - **`canvas`** – allocates the full-virtual-screen RGBA buffer, opaque
//!   black.
//! - **`compose`** – renders one tile per monitor from the placement plan and
//!   copies it into the canvas.

pub mod canvas;
pub mod compose;
