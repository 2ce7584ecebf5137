//! Monitor enumeration.
//!
//! Produces the raw screen size and monitor rectangles that
//! [`ScreenLayout::build`] turns into the virtual screen.
//!
//! # Implementations
//!
//! | Type                          | Source                                        |
//! |-------------------------------|-----------------------------------------------|
//! | [`X11ScreenEnumerator`]       | default screen size + Xinerama screen list    |
//! | [`ConfiguredScreenEnumerator`]| the `[layout]` section of the config file     |
//! | [`MockScreenEnumerator`]      | fixed report, for tests                       |
//!
//! [`MockScreenEnumerator`] is always compiled (not guarded by `#[cfg(test)]`)
//! so integration tests can use it without a display.

pub mod configured;
pub mod x11;

pub use configured::ConfiguredScreenEnumerator;
pub use x11::X11ScreenEnumerator;

use mmb_core::{LayoutError, Rectangle, ScreenLayout};
use thiserror::Error;
use tracing::debug;

/// Error type for screen enumeration operations.
#[derive(Debug, Error)]
pub enum ScreenInfoError {
    /// The display server could not be queried.
    #[error("platform API error while enumerating monitors: {0}")]
    PlatformError(String),

    /// The reported geometry cannot form a layout.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// What an enumeration source reports, before layout assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenReport {
    pub screen_width: f64,
    pub screen_height: f64,
    /// May be empty; the layout then falls back to one full-screen monitor.
    pub monitors: Vec<Rectangle>,
}

/// Trait for enumerating the monitors of the display.
pub trait PlatformScreenEnumerator: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ScreenInfoError::PlatformError`] if the source cannot be read.
    fn enumerate_screens(&self) -> Result<ScreenReport, ScreenInfoError>;
}

/// Enumerates screens and assembles the [`ScreenLayout`].
///
/// # Errors
///
/// Propagates enumeration errors and [`LayoutError::InvalidLayout`].
pub fn build_screen_layout(
    enumerator: &dyn PlatformScreenEnumerator,
) -> Result<ScreenLayout, ScreenInfoError> {
    let report = enumerator.enumerate_screens()?;
    debug!(
        width = report.screen_width,
        height = report.screen_height,
        monitors = report.monitors.len(),
        "screen report"
    );
    Ok(ScreenLayout::build(
        report.screen_width,
        report.screen_height,
        report.monitors,
    )?)
}

// ── Mock implementation ───────────────────────────────────────────────────────

/// A screen enumerator that returns a fixed report.
pub struct MockScreenEnumerator {
    pub report: ScreenReport,
}

impl MockScreenEnumerator {
    /// A single 1920×1080 monitor.
    pub fn single_1080p() -> Self {
        Self {
            report: ScreenReport {
                screen_width: 1920.0,
                screen_height: 1080.0,
                monitors: vec![Rectangle::new(0.0, 0.0, 1920.0, 1080.0)],
            },
        }
    }

    /// A 1920×1080 monitor with a 1280×1024 monitor to its right.
    pub fn dual_mixed() -> Self {
        Self {
            report: ScreenReport {
                screen_width: 3200.0,
                screen_height: 1080.0,
                monitors: vec![
                    Rectangle::new(0.0, 0.0, 1920.0, 1080.0),
                    Rectangle::new(1920.0, 0.0, 1280.0, 1024.0),
                ],
            },
        }
    }

    /// A screen without Xinerama: size only, no monitor list.
    pub fn without_monitors(width: f64, height: f64) -> Self {
        Self {
            report: ScreenReport {
                screen_width: width,
                screen_height: height,
                monitors: Vec::new(),
            },
        }
    }
}

impl PlatformScreenEnumerator for MockScreenEnumerator {
    fn enumerate_screens(&self) -> Result<ScreenReport, ScreenInfoError> {
        Ok(self.report.clone())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
