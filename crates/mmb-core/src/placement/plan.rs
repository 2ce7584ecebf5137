//! Placement planning: the per-monitor decision and its pixel geometry.
//!
//! For a monitor rectangle `R` and a source of `sw × sh` pixels the scale
//! factors are `w_scale = sw / R.width` and `h_scale = sh / R.height`:
//!
//! | Condition                                   | Strategy          |
//! |---------------------------------------------|-------------------|
//! | `w_scale < 1 && h_scale < 1`                | [`Center`]        |
//! | fill mode and `w_scale < 1 \|\| h_scale < 1`| [`CenterClipped`] |
//! | fit mode otherwise                          | [`ScaleToFit`]    |
//! | fill mode otherwise                         | [`ScaleToFill`]   |
//!
//! # Rounding
//!
//! - Scaled extents are truncated. The axis that must match the monitor is
//!   set to `floor(R.extent)` directly rather than derived through the scale
//!   factor, so it lands exactly on the monitor edge.
//! - Destination offsets are `floor(R.origin + offset)`.
//! - Where the content overflows the monitor the crop start is
//!   `ceil(overflow / 2)`; an odd overflow therefore drops one more pixel on
//!   the leading edge than on the trailing one.
//!
//! Each monitor is rounded independently, so neighbouring monitors can each
//! carry up to one pixel of residue.
//!
//! [`Center`]: PlacementStrategy::Center
//! [`CenterClipped`]: PlacementStrategy::CenterClipped
//! [`ScaleToFit`]: PlacementStrategy::ScaleToFit
//! [`ScaleToFill`]: PlacementStrategy::ScaleToFill

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::geometry::Rectangle;

/// Errors produced while planning a single placement.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlacementError {
    /// The monitor rectangle cannot hold a single whole pixel.
    #[error("degenerate monitor geometry {width}x{height}")]
    DegenerateMonitor { width: f64, height: f64 },

    /// The source image has no pixels.
    #[error("source image is empty ({width}x{height})")]
    EmptySource { width: u32, height: u32 },
}

/// How an image larger than the monitor is brought to size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementMode {
    /// Scale so the whole image is visible; may letterbox one axis.
    #[default]
    Fit,
    /// Scale so the monitor is fully covered; crops the overflowing axis.
    Fill,
}

impl PlacementMode {
    /// Maps the command-line "clip" flag onto a mode.
    pub fn from_clip(clip: bool) -> Self {
        if clip {
            Self::Fill
        } else {
            Self::Fit
        }
    }

    pub fn is_clip(self) -> bool {
        self == Self::Fill
    }
}

/// Which of the placement cases applied to a monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementStrategy {
    /// Source smaller than the monitor on both axes: centred, unscaled.
    Center,
    /// Fill mode, source smaller on at least one axis: centred, unscaled, the
    /// overflowing axis (if any) clipped.
    CenterClipped,
    /// Uniformly scaled by the larger scale factor and centred.
    ScaleToFit,
    /// Uniformly scaled by the smaller scale factor and centre-cropped.
    ScaleToFill,
}

/// A whole-pixel rectangle inside an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// The outcome of planning one monitor.
///
/// Read it as: resample the source to `scaled_width × scaled_height`, cut
/// `crop` out of the result, and copy that to `(dest_x, dest_y)` on the
/// canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub strategy: PlacementStrategy,
    pub source_width: u32,
    pub source_height: u32,
    pub scaled_width: u32,
    pub scaled_height: u32,
    /// Region of the scaled image that is drawn.
    pub crop: PixelRect,
    /// Canvas X coordinate of the crop's top-left pixel.
    pub dest_x: i64,
    /// Canvas Y coordinate of the crop's top-left pixel.
    pub dest_y: i64,
}

impl Placement {
    /// Returns `true` when the source has to be resampled.
    pub fn is_scaled(&self) -> bool {
        self.scaled_width != self.source_width || self.scaled_height != self.source_height
    }

    /// Returns `true` when only part of the (scaled) image is drawn.
    pub fn is_cropped(&self) -> bool {
        self.crop.width != self.scaled_width || self.crop.height != self.scaled_height
    }
}

/// Plans how a `source_width × source_height` image is placed on `monitor`.
///
/// Pure function of its inputs: no pixels are read or written.
///
/// # Errors
///
/// - [`PlacementError::EmptySource`] if either source dimension is zero.
/// - [`PlacementError::DegenerateMonitor`] if the monitor is narrower or
///   shorter than one pixel, or has non-finite coordinates.
pub fn plan_placement(
    source_width: u32,
    source_height: u32,
    monitor: &Rectangle,
    mode: PlacementMode,
) -> Result<Placement, PlacementError> {
    if source_width == 0 || source_height == 0 {
        return Err(PlacementError::EmptySource {
            width: source_width,
            height: source_height,
        });
    }
    if monitor.is_degenerate() {
        return Err(PlacementError::DegenerateMonitor {
            width: monitor.width(),
            height: monitor.height(),
        });
    }

    let sw = f64::from(source_width);
    let sh = f64::from(source_height);
    let w_scale = sw / monitor.width();
    let h_scale = sh / monitor.height();

    let strategy = if w_scale < 1.0 && h_scale < 1.0 {
        PlacementStrategy::Center
    } else if mode.is_clip() && (w_scale < 1.0 || h_scale < 1.0) {
        PlacementStrategy::CenterClipped
    } else if mode.is_clip() {
        PlacementStrategy::ScaleToFill
    } else {
        PlacementStrategy::ScaleToFit
    };

    let (scaled_width, scaled_height) = match strategy {
        PlacementStrategy::Center | PlacementStrategy::CenterClipped => {
            (source_width, source_height)
        }
        // Fit: the more constraining axis (larger scale) lands on the monitor.
        PlacementStrategy::ScaleToFit if w_scale >= h_scale => {
            match_width(sw, sh, monitor.width())
        }
        PlacementStrategy::ScaleToFit => match_height(sw, sh, monitor.height()),
        // Fill: the less constraining axis (smaller scale) lands on the monitor.
        PlacementStrategy::ScaleToFill if w_scale <= h_scale => {
            match_width(sw, sh, monitor.width())
        }
        PlacementStrategy::ScaleToFill => match_height(sw, sh, monitor.height()),
    };

    let x = center_on_axis(scaled_width, monitor.x(), monitor.width());
    let y = center_on_axis(scaled_height, monitor.y(), monitor.height());

    Ok(Placement {
        strategy,
        source_width,
        source_height,
        scaled_width,
        scaled_height,
        crop: PixelRect {
            x: x.crop_start,
            y: y.crop_start,
            width: x.crop_len,
            height: y.crop_len,
        },
        dest_x: x.dest,
        dest_y: y.dest,
    })
}

// ── Private helpers ───────────────────────────────────────────────────────────

/// One axis of a placement.
struct AxisSpan {
    crop_start: u32,
    crop_len: u32,
    dest: i64,
}

/// Centres `content` pixels on the span `[origin, origin + extent)`.
///
/// A non-negative offset positions the content; a negative one clips it
/// symmetrically, rounding the crop start up.
fn center_on_axis(content: u32, origin: f64, extent: f64) -> AxisSpan {
    let offset = (extent - f64::from(content)) / 2.0;
    if offset >= 0.0 {
        AxisSpan {
            crop_start: 0,
            crop_len: content,
            dest: (origin + offset).floor() as i64,
        }
    } else {
        let crop_start = floor_pixels((-offset).ceil()).min(content);
        let crop_len = floor_pixels(extent).min(content - crop_start);
        AxisSpan {
            crop_start,
            crop_len,
            dest: origin.floor() as i64,
        }
    }
}

/// Scaled size when the width maps exactly onto `target_width`.
fn match_width(sw: f64, sh: f64, target_width: f64) -> (u32, u32) {
    let width = floor_pixels(target_width).max(1);
    let height = floor_pixels(sh * target_width / sw).max(1);
    (width, height)
}

/// Scaled size when the height maps exactly onto `target_height`.
fn match_height(sw: f64, sh: f64, target_height: f64) -> (u32, u32) {
    let height = floor_pixels(target_height).max(1);
    let width = floor_pixels(sw * target_height / sh).max(1);
    (width, height)
}

/// Saturating truncation to a pixel count.
fn floor_pixels(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        0
    } else if value >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        value.floor() as u32
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor_1080p() -> Rectangle {
        Rectangle::new(0.0, 0.0, 1920.0, 1080.0)
    }

    // ── Center ────────────────────────────────────────────────────────────────

    #[test]
    fn test_small_image_is_centered_unscaled_in_fit_mode() {
        // Arrange / Act
        let placement =
            plan_placement(800, 600, &monitor_1080p(), PlacementMode::Fit).expect("plan");

        // Assert
        assert_eq!(placement.strategy, PlacementStrategy::Center);
        assert!(!placement.is_scaled());
        assert!(!placement.is_cropped());
        assert_eq!((placement.dest_x, placement.dest_y), (560, 240));
    }

    #[test]
    fn test_small_image_is_centered_unscaled_in_fill_mode() {
        let placement =
            plan_placement(800, 600, &monitor_1080p(), PlacementMode::Fill).expect("plan");

        assert_eq!(placement.strategy, PlacementStrategy::Center);
        assert_eq!((placement.dest_x, placement.dest_y), (560, 240));
    }

    #[test]
    fn test_center_offset_is_relative_to_monitor_origin() {
        let monitor = Rectangle::new(1920.0, 100.0, 1280.0, 1024.0);
        let placement = plan_placement(80, 24, &monitor, PlacementMode::Fit).expect("plan");

        assert_eq!(placement.dest_x, 1920 + 600);
        assert_eq!(placement.dest_y, 100 + 500);
    }

    #[test]
    fn test_center_truncates_odd_leftover() {
        // (1920 - 801) / 2 = 559.5 → 559
        let placement =
            plan_placement(801, 601, &monitor_1080p(), PlacementMode::Fit).expect("plan");
        assert_eq!((placement.dest_x, placement.dest_y), (559, 239));
    }

    // ── CenterClipped ─────────────────────────────────────────────────────────

    #[test]
    fn test_clip_mode_with_one_short_axis_clips_the_wide_axis_without_scaling() {
        // 2000 wide (overflows by 80), 800 tall (short by 280)
        let placement =
            plan_placement(2000, 800, &monitor_1080p(), PlacementMode::Fill).expect("plan");

        assert_eq!(placement.strategy, PlacementStrategy::CenterClipped);
        assert!(!placement.is_scaled());
        assert_eq!(
            placement.crop,
            PixelRect {
                x: 40,
                y: 0,
                width: 1920,
                height: 800
            }
        );
        assert_eq!((placement.dest_x, placement.dest_y), (0, 140));
    }

    #[test]
    fn test_clip_mode_odd_overflow_rounds_crop_start_up() {
        // Overflow of 3 → offset −1.5 → crop starts at 2, keeps 1920 of 1923.
        let placement =
            plan_placement(1923, 800, &monitor_1080p(), PlacementMode::Fill).expect("plan");

        assert_eq!(placement.crop.x, 2);
        assert_eq!(placement.crop.width, 1920);
        assert_eq!(placement.dest_x, 0);
    }

    #[test]
    fn test_fit_mode_with_one_short_axis_scales_instead_of_clipping() {
        let placement =
            plan_placement(2000, 800, &monitor_1080p(), PlacementMode::Fit).expect("plan");

        assert_eq!(placement.strategy, PlacementStrategy::ScaleToFit);
        assert_eq!(placement.scaled_width, 1920);
        assert_eq!(placement.scaled_height, 768);
        assert_eq!((placement.dest_x, placement.dest_y), (0, 156));
    }

    // ── ScaleToFit ────────────────────────────────────────────────────────────

    #[test]
    fn test_fit_wide_image_matches_monitor_width_and_letterboxes_vertically() {
        let monitor = Rectangle::new(0.0, 0.0, 1000.0, 1000.0);
        let placement = plan_placement(2000, 1000, &monitor, PlacementMode::Fit).expect("plan");

        assert_eq!((placement.scaled_width, placement.scaled_height), (1000, 500));
        assert!(!placement.is_cropped());
        assert_eq!((placement.dest_x, placement.dest_y), (0, 250));
    }

    #[test]
    fn test_fit_tall_image_matches_monitor_height_and_pillarboxes() {
        let placement =
            plan_placement(1000, 3000, &monitor_1080p(), PlacementMode::Fit).expect("plan");

        assert_eq!((placement.scaled_width, placement.scaled_height), (360, 1080));
        assert_eq!((placement.dest_x, placement.dest_y), (780, 0));
    }

    #[test]
    fn test_image_equal_to_monitor_is_placed_without_scaling() {
        let placement =
            plan_placement(1920, 1080, &monitor_1080p(), PlacementMode::Fit).expect("plan");

        assert_eq!(placement.strategy, PlacementStrategy::ScaleToFit);
        assert!(!placement.is_scaled());
        assert_eq!((placement.dest_x, placement.dest_y), (0, 0));
    }

    #[test]
    fn test_exact_double_size_produces_identical_fit_and_fill() {
        let fit = plan_placement(3840, 2160, &monitor_1080p(), PlacementMode::Fit).expect("fit");
        let fill =
            plan_placement(3840, 2160, &monitor_1080p(), PlacementMode::Fill).expect("fill");

        assert_eq!((fit.scaled_width, fit.scaled_height), (1920, 1080));
        assert_eq!(fit.crop, fill.crop);
        assert_eq!((fit.dest_x, fit.dest_y), (fill.dest_x, fill.dest_y));
        assert!(!fill.is_cropped());
    }

    // ── ScaleToFill ───────────────────────────────────────────────────────────

    #[test]
    fn test_fill_matches_less_constraining_axis_and_crops_the_other() {
        // w_scale = 2.0, h_scale = 1.40625 → height maps onto 1024.
        let monitor = Rectangle::new(1920.0, 0.0, 1280.0, 1024.0);
        let placement = plan_placement(2560, 1440, &monitor, PlacementMode::Fill).expect("plan");

        assert_eq!(placement.strategy, PlacementStrategy::ScaleToFill);
        // 2560 * 1024 / 1440 = 1820.44 → 1820
        assert_eq!((placement.scaled_width, placement.scaled_height), (1820, 1024));
        assert_eq!(
            placement.crop,
            PixelRect {
                x: 270,
                y: 0,
                width: 1280,
                height: 1024
            }
        );
        assert_eq!((placement.dest_x, placement.dest_y), (1920, 0));
    }

    #[test]
    fn test_fill_with_unit_scale_on_one_axis_crops_without_scaling() {
        let placement =
            plan_placement(1920, 2000, &monitor_1080p(), PlacementMode::Fill).expect("plan");

        assert_eq!(placement.strategy, PlacementStrategy::ScaleToFill);
        assert!(!placement.is_scaled());
        assert_eq!(placement.crop.y, 460);
        assert_eq!(placement.crop.height, 1080);
    }

    #[test]
    fn test_fill_always_covers_the_monitor() {
        let monitor = Rectangle::new(0.0, 0.0, 1366.0, 768.0);
        for (w, h) in [(1367, 769), (4000, 1000), (1400, 4000), (2561, 1441), (7680, 4320)] {
            let placement = plan_placement(w, h, &monitor, PlacementMode::Fill).expect("plan");
            assert_eq!(placement.crop.width, 1366, "source {w}x{h}");
            assert_eq!(placement.crop.height, 768, "source {w}x{h}");
            assert_eq!((placement.dest_x, placement.dest_y), (0, 0), "source {w}x{h}");
        }
    }

    #[test]
    fn test_extreme_aspect_ratios_never_produce_an_empty_crop() {
        let monitors = [
            Rectangle::new(0.0, 0.0, 1.0, 1.0),
            Rectangle::new(0.0, 0.0, 1.5, 2000.0),
            Rectangle::new(0.0, 0.0, 1920.0, 1080.0),
        ];
        for monitor in &monitors {
            for (w, h) in [(1, 1), (10_000, 1), (1, 10_000), (3, 2), (65_535, 7)] {
                for mode in [PlacementMode::Fit, PlacementMode::Fill] {
                    let placement = plan_placement(w, h, monitor, mode).expect("plan");
                    assert!(
                        placement.crop.width >= 1 && placement.crop.height >= 1,
                        "{w}x{h} on {monitor:?} in {mode:?}: {:?}",
                        placement.crop
                    );
                    assert!(placement.crop.x + placement.crop.width <= placement.scaled_width);
                    assert!(placement.crop.y + placement.crop.height <= placement.scaled_height);
                }
            }
        }
    }

    // ── Errors ────────────────────────────────────────────────────────────────

    #[test]
    fn test_zero_width_monitor_is_degenerate() {
        let monitor = Rectangle::new(0.0, 0.0, 0.0, 1080.0);
        assert_eq!(
            plan_placement(800, 600, &monitor, PlacementMode::Fit),
            Err(PlacementError::DegenerateMonitor {
                width: 0.0,
                height: 1080.0
            })
        );
    }

    #[test]
    fn test_empty_source_is_rejected() {
        assert_eq!(
            plan_placement(0, 600, &monitor_1080p(), PlacementMode::Fit),
            Err(PlacementError::EmptySource {
                width: 0,
                height: 600
            })
        );
    }

    #[test]
    fn test_placement_mode_from_clip_flag() {
        assert_eq!(PlacementMode::from_clip(true), PlacementMode::Fill);
        assert_eq!(PlacementMode::from_clip(false), PlacementMode::Fit);
    }
}
