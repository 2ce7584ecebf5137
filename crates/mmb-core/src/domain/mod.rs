//! Domain entities for MMB.
//!
//! Pure data types describing the virtual screen. Nothing in here talks to a
//! display server or touches pixels; the compositor and the infrastructure
//! adapters depend on these types, never the other way around.

/// Real-valued rectangles.
pub mod geometry;

/// The virtual screen layout (see [`layout::ScreenLayout`]).
pub mod layout;
