//! Screen layout domain entity.
//!
//! A [`ScreenLayout`] describes the virtual screen: its overall bounds and the
//! ordered list of monitor rectangles inside it. It is assembled once per run
//! from whatever the monitor-enumeration collaborator reported and is
//! read-only afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::geometry::Rectangle;

/// Errors that can occur when assembling a layout.
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    /// No monitors were reported and the screen bounds are too small to serve
    /// as the single fallback monitor.
    #[error("invalid layout: no monitors reported and {width}x{height} screen bounds cannot be used as a fallback")]
    InvalidLayout { width: f64, height: f64 },
}

/// The virtual screen and the monitors positioned inside it.
///
/// Invariant: `monitors` is never empty. When the enumeration source reports
/// no monitors the layout holds one synthetic monitor equal to `bounds`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenLayout {
    bounds: Rectangle,
    monitors: Vec<Rectangle>,
}

impl ScreenLayout {
    /// Assembles a layout from the screen size and the reported monitors.
    ///
    /// Monitor rectangles are accepted as-is: they are neither clipped to the
    /// screen bounds nor checked for positive extent here. Degenerate
    /// monitors are skipped later, at composition time, so one bad entry from
    /// the enumeration source does not discard the others.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidLayout`] only when `monitor_rects` is
    /// empty *and* the screen bounds themselves are degenerate, i.e. when the
    /// fallback monitor could not hold a single pixel. With a positive screen
    /// size this never fails.
    pub fn build(
        screen_width: f64,
        screen_height: f64,
        monitor_rects: Vec<Rectangle>,
    ) -> Result<Self, LayoutError> {
        let bounds = Rectangle::from_size(screen_width, screen_height);

        let monitors = if monitor_rects.is_empty() {
            if bounds.is_degenerate() {
                return Err(LayoutError::InvalidLayout {
                    width: screen_width,
                    height: screen_height,
                });
            }
            debug!("no monitors reported; using the whole screen as a single monitor");
            vec![bounds]
        } else {
            monitor_rects
        };

        let layout = Self { bounds, monitors };
        for (a, b) in layout.overlapping_monitors() {
            // Cloned outputs show up like this; each still gets its own placement.
            warn!(first = a, second = b, "monitors overlap in virtual screen space");
        }
        Ok(layout)
    }

    /// Bounds of the whole virtual screen, anchored at (0, 0).
    pub fn bounds(&self) -> &Rectangle {
        &self.bounds
    }

    /// Monitor rectangles in enumeration order. Never empty.
    pub fn monitors(&self) -> &[Rectangle] {
        &self.monitors
    }

    /// Number of monitors, always at least one.
    pub fn monitor_count(&self) -> usize {
        self.monitors.len()
    }

    /// Index pairs `(i, j)` with `i < j` of monitors whose rectangles overlap.
    pub fn overlapping_monitors(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, a) in self.monitors.iter().enumerate() {
            for (j, b) in self.monitors.iter().enumerate().skip(i + 1) {
                if a.overlaps(b) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }
}

/// Human-readable report, one line per monitor.
///
/// ```text
/// Total size:    3200 1080
/// Num. monitors: 2
///      0: 0 0 -> 1920 1080
///      1: 1920 0 -> 1280 1024
/// ```
impl fmt::Display for ScreenLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Total size:    {} {}",
            self.bounds.width(),
            self.bounds.height()
        )?;
        writeln!(f, "Num. monitors: {}", self.monitors.len())?;
        for (i, monitor) in self.monitors.iter().enumerate() {
            writeln!(
                f,
                "\t{:2}: {} {} -> {} {}",
                i,
                monitor.x(),
                monitor.y(),
                monitor.width(),
                monitor.height()
            )?;
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
