//! mmb library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does mmb do?
//!
//! `mmb` sets one wallpaper image across a multi-monitor X11 desktop. Every
//! monitor gets its own placement of the image, sized to that monitor, so a
//! single picture looks right on a mix of resolutions and aspect ratios.
//!
//! A run:
//!
//! 1. Loads the configuration file and opens the X display (unless the
//!    config supplies a layout and no live display is needed).
//! 2. Enumerates the monitors (Xinerama) into a `ScreenLayout`.
//! 3. Decodes the source image and composes a full-screen canvas with
//!    `mmb_core`.
//! 4. Writes the canvas to a PNG file or installs it as the root window
//!    background.
//! 5. Optionally prints the monitor layout.

/// Application layer: the set-wallpaper use case and its collaborator traits.
pub mod application;

/// Infrastructure layer: file, X11 and configuration adapters.
pub mod infrastructure;
