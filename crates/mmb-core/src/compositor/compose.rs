//! Per-monitor composition into the canvas.
//!
//! Composition is split in two explicit steps so the geometry can be tested
//! without looking at pixels:
//!
//! 1. [`render_tile`] is pure. It plans the placement for one monitor and
//!    produces the sub-image that will appear on it.
//! 2. [`blit_tile`] is the only step that writes into the canvas.
//!
//! [`Compositor::composite`] runs both for every monitor in the layout. A
//! monitor whose rectangle is degenerate is skipped and reported; the others
//! are still drawn.

use std::borrow::Cow;

use image::{imageops, DynamicImage, RgbaImage};
use thiserror::Error;
use tracing::{debug, warn};

use super::canvas::{allocate_canvas, CanvasError};
use crate::domain::{geometry::Rectangle, layout::ScreenLayout};
use crate::placement::{plan_placement, Placement, PlacementError, PlacementMode, ResampleFilter};

/// Errors that abort a whole composition.
#[derive(Debug, Error, PartialEq)]
pub enum ComposeError {
    /// The source image has no pixels and cannot be placed anywhere.
    #[error("source image cannot be interpreted: it is {width}x{height}")]
    EmptySource { width: u32, height: u32 },

    /// The full-screen canvas could not be allocated.
    #[error(transparent)]
    Canvas(#[from] CanvasError),
}

/// The sub-image destined for one monitor, plus where it goes.
#[derive(Debug, Clone)]
pub struct MonitorTile<'a> {
    /// Position of the monitor in the layout.
    pub monitor_index: usize,
    pub placement: Placement,
    /// Scaled and cropped pixels; borrows the source when no work was needed.
    pub image: Cow<'a, RgbaImage>,
}

impl MonitorTile<'_> {
    /// Canvas coordinates of the tile's top-left pixel.
    pub fn destination(&self) -> (i64, i64) {
        (self.placement.dest_x, self.placement.dest_y)
    }
}

/// A monitor that received its tile.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMonitor {
    pub index: usize,
    pub placement: Placement,
}

/// A monitor that was left as background.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedMonitor {
    pub index: usize,
    pub monitor: Rectangle,
    pub reason: PlacementError,
}

/// What happened to each monitor during one composition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositeReport {
    pub placed: Vec<PlacedMonitor>,
    pub skipped: Vec<SkippedMonitor>,
}

impl CompositeReport {
    /// Returns `true` when every monitor received its tile.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Plans and renders the tile for a single monitor.
///
/// # Errors
///
/// Propagates [`PlacementError`] from [`plan_placement`].
pub fn render_tile<'a>(
    source: &'a RgbaImage,
    monitor_index: usize,
    monitor: &Rectangle,
    mode: PlacementMode,
    filter: ResampleFilter,
) -> Result<MonitorTile<'a>, PlacementError> {
    let placement = plan_placement(source.width(), source.height(), monitor, mode)?;
    let image = render_placement(source, &placement, filter);
    Ok(MonitorTile {
        monitor_index,
        placement,
        image,
    })
}

/// Copies a tile into the canvas. Pixels falling outside the canvas are dropped.
pub fn blit_tile(canvas: &mut RgbaImage, tile: &MonitorTile<'_>) {
    let (x, y) = tile.destination();
    imageops::replace(canvas, tile.image.as_ref(), x, y);
}

/// Places one source image on every monitor of a layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Compositor {
    mode: PlacementMode,
    filter: ResampleFilter,
}

impl Compositor {
    /// Creates a compositor using the default (Lanczos3) filter.
    pub fn new(mode: PlacementMode) -> Self {
        Self {
            mode,
            filter: ResampleFilter::default(),
        }
    }

    pub fn with_filter(mut self, filter: ResampleFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn mode(&self) -> PlacementMode {
        self.mode
    }

    pub fn filter(&self) -> ResampleFilter {
        self.filter
    }

    /// Draws `source` into each monitor's region of `canvas`.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::EmptySource`] before touching the canvas if the
    /// source has no pixels. Degenerate monitors do not fail the call; they
    /// are listed in [`CompositeReport::skipped`].
    pub fn composite(
        &self,
        canvas: &mut RgbaImage,
        source: &DynamicImage,
        layout: &ScreenLayout,
    ) -> Result<CompositeReport, ComposeError> {
        let source = as_rgba(source);
        self.composite_rgba(canvas, &source, layout)
    }

    /// [`Compositor::composite`] for a source that is already RGBA.
    ///
    /// # Errors
    ///
    /// See [`Compositor::composite`].
    pub fn composite_rgba(
        &self,
        canvas: &mut RgbaImage,
        source: &RgbaImage,
        layout: &ScreenLayout,
    ) -> Result<CompositeReport, ComposeError> {
        ensure_not_empty(source.width(), source.height())?;

        let mut report = CompositeReport::default();
        for (index, monitor) in layout.monitors().iter().enumerate() {
            match render_tile(source, index, monitor, self.mode, self.filter) {
                Ok(tile) => {
                    let placement = tile.placement;
                    debug!(
                        monitor = index,
                        strategy = ?placement.strategy,
                        scaled = ?(placement.scaled_width, placement.scaled_height),
                        crop = ?placement.crop,
                        dest = ?(placement.dest_x, placement.dest_y),
                        "placing wallpaper"
                    );
                    blit_tile(canvas, &tile);
                    report.placed.push(PlacedMonitor { index, placement });
                }
                Err(reason) => {
                    warn!(monitor = index, ?monitor, %reason, "skipping monitor");
                    report.skipped.push(SkippedMonitor {
                        index,
                        monitor: *monitor,
                        reason,
                    });
                }
            }
        }
        Ok(report)
    }

    /// Allocates a canvas for `layout` and composes `source` into it.
    ///
    /// The source is validated before the canvas is allocated, so an
    /// uninterpretable source never costs a full-screen allocation.
    ///
    /// # Errors
    ///
    /// [`ComposeError::EmptySource`] or [`ComposeError::Canvas`].
    pub fn compose(
        &self,
        source: &DynamicImage,
        layout: &ScreenLayout,
    ) -> Result<(RgbaImage, CompositeReport), ComposeError> {
        ensure_not_empty(source.width(), source.height())?;
        let mut canvas = allocate_canvas(layout)?;
        let report = self.composite(&mut canvas, source, layout)?;
        Ok((canvas, report))
    }
}

/// Composes with the default filter; `clip` selects fill instead of fit.
///
/// # Errors
///
/// See [`Compositor::composite`].
pub fn composite(
    canvas: &mut RgbaImage,
    source: &DynamicImage,
    layout: &ScreenLayout,
    clip: bool,
) -> Result<CompositeReport, ComposeError> {
    Compositor::new(PlacementMode::from_clip(clip)).composite(canvas, source, layout)
}

// ── Private helpers ───────────────────────────────────────────────────────────

fn ensure_not_empty(width: u32, height: u32) -> Result<(), ComposeError> {
    if width == 0 || height == 0 {
        return Err(ComposeError::EmptySource { width, height });
    }
    Ok(())
}

fn as_rgba(source: &DynamicImage) -> Cow<'_, RgbaImage> {
    match source {
        DynamicImage::ImageRgba8(rgba) => Cow::Borrowed(rgba),
        other => Cow::Owned(other.to_rgba8()),
    }
}

fn render_placement<'a>(
    source: &'a RgbaImage,
    placement: &Placement,
    filter: ResampleFilter,
) -> Cow<'a, RgbaImage> {
    let crop = placement.crop;
    if placement.is_scaled() {
        let scaled = imageops::resize(
            source,
            placement.scaled_width,
            placement.scaled_height,
            filter.filter_type(),
        );
        if placement.is_cropped() {
            Cow::Owned(imageops::crop_imm(&scaled, crop.x, crop.y, crop.width, crop.height).to_image())
        } else {
            Cow::Owned(scaled)
        }
    } else if placement.is_cropped() {
        Cow::Owned(imageops::crop_imm(source, crop.x, crop.y, crop.width, crop.height).to_image())
    } else {
        Cow::Borrowed(source)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
