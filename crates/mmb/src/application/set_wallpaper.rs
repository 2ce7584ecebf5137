//! SetWallpaperUseCase: decode a source image, compose it across the monitor
//! layout and hand the canvas to a sink.
//!
//! The use case owns no I/O itself. Decoding goes through an [`ImageLoader`]
//! and the finished canvas through a [`CanvasSink`]; both are injected at
//! construction time and implemented in the infrastructure layer (file
//! decoding, PNG output, the X11 root window).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{DynamicImage, RgbaImage};
use mmb_core::{ComposeError, CompositeReport, Compositor, ScreenLayout};
use thiserror::Error;
use tracing::{info, warn};

/// Error type for reading the source image.
#[derive(Debug, Error)]
pub enum ImageSourceError {
    /// The file could not be opened or read.
    #[error("cannot read image {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but its contents are not a decodable image.
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Error type for delivering the finished canvas.
#[derive(Debug, Error)]
pub enum CanvasSinkError {
    /// The canvas could not be encoded or written to a file.
    #[error("failed to write canvas to {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The display server rejected the canvas.
    #[error("display server error: {0}")]
    Platform(String),
}

/// Aggregate error for one wallpaper run.
#[derive(Debug, Error)]
pub enum SetWallpaperError {
    #[error(transparent)]
    Source(#[from] ImageSourceError),

    #[error(transparent)]
    Compose(#[from] ComposeError),

    #[error(transparent)]
    Sink(#[from] CanvasSinkError),
}

/// Decodes a source image from a path.
#[cfg_attr(test, mockall::automock)]
pub trait ImageLoader: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ImageSourceError`] if the file is unreadable or undecodable.
    /// Callers must not retry.
    fn load(&self, path: &Path) -> Result<DynamicImage, ImageSourceError>;
}

/// Receives the composed canvas.
#[cfg_attr(test, mockall::automock)]
pub trait CanvasSink: Send + Sync {
    /// # Errors
    ///
    /// Returns [`CanvasSinkError`] if the canvas cannot be delivered.
    fn apply(&self, canvas: &RgbaImage) -> Result<(), CanvasSinkError>;

    /// Short human-readable target description for logs.
    fn describe(&self) -> String;
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct WallpaperOutcome {
    pub source_size: (u32, u32),
    pub canvas_size: (u32, u32),
    pub report: CompositeReport,
}

/// The Set Wallpaper use case.
pub struct SetWallpaperUseCase {
    loader: Arc<dyn ImageLoader>,
    sink: Arc<dyn CanvasSink>,
    compositor: Compositor,
}

impl SetWallpaperUseCase {
    pub fn new(
        loader: Arc<dyn ImageLoader>,
        sink: Arc<dyn CanvasSink>,
        compositor: Compositor,
    ) -> Self {
        Self {
            loader,
            sink,
            compositor,
        }
    }

    /// Runs decode → compose → sink for `source` across `layout`.
    ///
    /// Nothing reaches the sink unless decoding and composition succeeded.
    /// Monitors skipped as degenerate are reported in the outcome and do not
    /// fail the run.
    ///
    /// # Errors
    ///
    /// Returns [`SetWallpaperError`] from whichever step failed first.
    pub fn execute(
        &self,
        source: &Path,
        layout: &ScreenLayout,
    ) -> Result<WallpaperOutcome, SetWallpaperError> {
        let image = self.loader.load(source)?;
        let source_size = (image.width(), image.height());
        info!(
            path = %source.display(),
            width = source_size.0,
            height = source_size.1,
            "decoded source image"
        );

        let (canvas, report) = self.compositor.compose(&image, layout)?;
        drop(image);
        if !report.is_complete() {
            warn!(
                skipped = report.skipped.len(),
                total = layout.monitor_count(),
                "some monitors were left blank"
            );
        }

        self.sink.apply(&canvas)?;
        info!(target = %self.sink.describe(), "wallpaper applied");

        Ok(WallpaperOutcome {
            source_size,
            canvas_size: canvas.dimensions(),
            report,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use mmb_core::{CanvasError, PlacementMode, Rectangle, BACKGROUND};
    use std::sync::Mutex;

    fn red_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255])))
    }

    fn loader_returning(width: u32, height: u32) -> MockImageLoader {
        let mut loader = MockImageLoader::new();
        loader
            .expect_load()
            .times(1)
            .returning(move |_| Ok(red_image(width, height)));
        loader
    }

    fn layout_1080p() -> ScreenLayout {
        ScreenLayout::build(1920.0, 1080.0, Vec::new()).expect("layout")
    }

    #[test]
    fn test_execute_hands_composed_canvas_to_sink() {
        // Arrange
        let captured = Arc::new(Mutex::new(None));
        let captured_in_sink = Arc::clone(&captured);
        let mut sink = MockCanvasSink::new();
        sink.expect_apply().times(1).returning(move |canvas| {
            *captured_in_sink.lock().expect("lock") = Some(canvas.clone());
            Ok(())
        });
        sink.expect_describe().return_const("test sink".to_string());
        let use_case = SetWallpaperUseCase::new(
            Arc::new(loader_returning(800, 600)),
            Arc::new(sink),
            Compositor::new(PlacementMode::Fit),
        );

        // Act
        let outcome = use_case
            .execute(Path::new("wall.png"), &layout_1080p())
            .expect("execute");

        // Assert
        assert_eq!(outcome.source_size, (800, 600));
        assert_eq!(outcome.canvas_size, (1920, 1080));
        assert!(outcome.report.is_complete());
        let canvas = captured.lock().expect("lock").take().expect("sink called");
        assert_eq!(*canvas.get_pixel(560, 240), Rgba([255, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(0, 0), BACKGROUND);
    }

    #[test]
    fn test_execute_passes_source_path_to_loader() {
        let mut loader = MockImageLoader::new();
        loader
            .expect_load()
            .withf(|path| path.to_str() == Some("/tmp/wallpapers/sunset.jpg"))
            .times(1)
            .returning(|_| Ok(red_image(4, 4)));
        let mut sink = MockCanvasSink::new();
        sink.expect_apply().returning(|_| Ok(()));
        sink.expect_describe().return_const(String::new());
        let use_case =
            SetWallpaperUseCase::new(Arc::new(loader), Arc::new(sink), Compositor::default());

        let result = use_case.execute(Path::new("/tmp/wallpapers/sunset.jpg"), &layout_1080p());

        assert!(result.is_ok());
    }

    #[test]
    fn test_execute_decode_failure_never_reaches_sink() {
        // Arrange
        let mut loader = MockImageLoader::new();
        loader.expect_load().times(1).returning(|path| {
            Err(ImageSourceError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        });
        let mut sink = MockCanvasSink::new();
        sink.expect_apply().times(0);
        let use_case =
            SetWallpaperUseCase::new(Arc::new(loader), Arc::new(sink), Compositor::default());

        // Act
        let result = use_case.execute(Path::new("missing.png"), &layout_1080p());

        // Assert
        assert!(matches!(
            result,
            Err(SetWallpaperError::Source(ImageSourceError::Io { .. }))
        ));
    }

    #[test]
    fn test_execute_empty_source_is_rejected_before_sink() {
        let mut sink = MockCanvasSink::new();
        sink.expect_apply().times(0);
        let use_case = SetWallpaperUseCase::new(
            Arc::new(loader_returning(0, 10)),
            Arc::new(sink),
            Compositor::default(),
        );

        let result = use_case.execute(Path::new("empty.png"), &layout_1080p());

        assert!(matches!(
            result,
            Err(SetWallpaperError::Compose(ComposeError::EmptySource {
                width: 0,
                height: 10
            }))
        ));
    }

    #[test]
    fn test_execute_zero_sized_screen_reports_canvas_error() {
        let layout = ScreenLayout::build(0.0, 0.0, vec![Rectangle::new(0.0, 0.0, 10.0, 10.0)])
            .expect("layout");
        let mut sink = MockCanvasSink::new();
        sink.expect_apply().times(0);
        let use_case = SetWallpaperUseCase::new(
            Arc::new(loader_returning(4, 4)),
            Arc::new(sink),
            Compositor::default(),
        );

        let result = use_case.execute(Path::new("wall.png"), &layout);

        assert!(matches!(
            result,
            Err(SetWallpaperError::Compose(ComposeError::Canvas(
                CanvasError::ZeroSized { .. }
            )))
        ));
    }

    #[test]
    fn test_execute_propagates_sink_failure() {
        let mut sink = MockCanvasSink::new();
        sink.expect_apply()
            .times(1)
            .returning(|_| Err(CanvasSinkError::Platform("BadAlloc".to_string())));
        let use_case = SetWallpaperUseCase::new(
            Arc::new(loader_returning(16, 16)),
            Arc::new(sink),
            Compositor::default(),
        );

        let result = use_case.execute(Path::new("wall.png"), &layout_1080p());

        match result {
            Err(SetWallpaperError::Sink(CanvasSinkError::Platform(msg))) => {
                assert_eq!(msg, "BadAlloc")
            }
            other => panic!("expected sink error, got {other:?}"),
        }
    }

    #[test]
    fn test_execute_degenerate_monitor_still_applies_canvas() {
        let layout = ScreenLayout::build(
            200.0,
            100.0,
            vec![
                Rectangle::new(0.0, 0.0, 100.0, 100.0),
                Rectangle::new(100.0, 0.0, 0.0, 0.0),
            ],
        )
        .expect("layout");
        let mut sink = MockCanvasSink::new();
        sink.expect_apply().times(1).returning(|_| Ok(()));
        sink.expect_describe().return_const("test sink".to_string());
        let use_case = SetWallpaperUseCase::new(
            Arc::new(loader_returning(50, 50)),
            Arc::new(sink),
            Compositor::default(),
        );

        let outcome = use_case
            .execute(Path::new("wall.png"), &layout)
            .expect("execute");

        assert_eq!(outcome.report.placed.len(), 1);
        assert_eq!(outcome.report.skipped.len(), 1);
        assert_eq!(outcome.report.skipped[0].index, 1);
    }
}
