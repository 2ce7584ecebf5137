//! # mmb-core
//!
//! Platform-independent core of the multi-monitor background tool: the
//! virtual screen model, the per-monitor placement rules and the compositor
//! that turns one source image into a full-screen canvas.
//!
//! This crate never talks to a display server. It receives the screen layout
//! as plain rectangles and hands back an RGBA canvas; the `mmb` crate does the
//! enumeration and the installation.
//!
//! # Architecture overview
//!
//! - **`domain`** – [`Rectangle`] and [`ScreenLayout`]: the virtual screen and
//!   the monitors inside it, in the display server's coordinate space.
//!
//! - **`placement`** – Pure geometry. For one monitor and one source size,
//!   [`plan_placement`] decides whether the image is centred, centred with
//!   cropping, scaled to fit or scaled to fill, and computes the exact pixel
//!   rectangles involved.
//!
//! - **`compositor`** – Allocates the black canvas and executes the plans,
//!   resampling with the `image` crate.

pub mod compositor;
pub mod domain;
pub mod placement;

pub use compositor::canvas::{allocate, allocate_canvas, CanvasError, BACKGROUND};
pub use compositor::compose::{
    blit_tile, composite, render_tile, ComposeError, CompositeReport, Compositor, MonitorTile,
    PlacedMonitor, SkippedMonitor,
};
pub use domain::geometry::Rectangle;
pub use domain::layout::{LayoutError, ScreenLayout};
pub use placement::{
    plan_placement, ParseFilterError, PixelRect, Placement, PlacementError, PlacementMode,
    PlacementStrategy, ResampleFilter,
};
