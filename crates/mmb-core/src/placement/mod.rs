//! Monitor-aware placement of a source image.
//!
//! Given the source image size and one monitor rectangle, decide whether the
//! image is centred as-is, centred and clipped, scaled to fit or scaled to
//! fill, and compute the exact whole-pixel geometry of that decision. Nothing
//! in this module touches pixels, which is what lets the rounding be tested
//! to the pixel.

pub mod filter;
pub mod plan;

pub use filter::{ParseFilterError, ResampleFilter};
pub use plan::{plan_placement, PixelRect, Placement, PlacementError, PlacementMode, PlacementStrategy};
