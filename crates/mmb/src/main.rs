//! MMB multi-monitor background setter entry point.
//!
//! # Usage
//!
//! ```text
//! mmb [OPTIONS]
//!
//! Options:
//!   -i, --input <PATH>     Source image to place on every monitor
//!   -o, --output <PATH>    Write the canvas as PNG instead of applying it
//!   -c, --clip             Fill each monitor, cropping overflow
//!   -p, --print            Print the monitor layout
//!       --json             With --print, emit JSON
//!       --filter <NAME>    Resampling filter [lanczos3, catmull-rom, gaussian, triangle]
//!       --display <NAME>   X display to use instead of $DISPLAY
//!       --config <PATH>    Configuration file to use
//!       --dump-config      Print the effective configuration as TOML
//! ```
//!
//! # Flow
//!
//! ```text
//! main()
//!  ├─ load config, initialise tracing
//!  ├─ resolve layout   ── [layout] override, or X11 + Xinerama
//!  ├─ SetWallpaperUseCase::execute   (if --input)
//!  │     └─ sink: PngFileSink (--output) or X11RootSink
//!  └─ print layout                   (if --print)
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{ArgGroup, Parser};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use mmb::application::set_wallpaper::{CanvasSink, SetWallpaperUseCase};
use mmb::infrastructure::background::{PngFileSink, X11RootSink};
use mmb::infrastructure::image_source::FileImageLoader;
use mmb::infrastructure::screen_info::{
    build_screen_layout, ConfiguredScreenEnumerator, PlatformScreenEnumerator,
    X11ScreenEnumerator,
};
use mmb::infrastructure::storage::config::{self, AppConfig};
use mmb::infrastructure::x11::X11Session;
use mmb_core::{Compositor, PlacementMode, ResampleFilter, ScreenLayout};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Places one wallpaper image across every monitor of an X11 desktop.
#[derive(Debug, Parser)]
#[command(name = "mmb", about = "Multi-monitor background setter for X11", version)]
#[command(group(
    ArgGroup::new("action")
        .required(true)
        .multiple(true)
        .args(["input", "print", "dump_config"])
))]
struct Cli {
    /// Source image. A canvas is composed only when this is given.
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Write the composed canvas to this PNG file instead of setting it as
    /// the root window background.
    #[arg(short, long, value_name = "PATH", requires = "input")]
    output: Option<PathBuf>,

    /// Fill every monitor and crop the overflow, instead of fitting the
    /// whole image with black bars.
    #[arg(short, long)]
    clip: bool,

    /// Print the monitor layout after any composition.
    #[arg(short, long)]
    print: bool,

    /// Print the layout as JSON.
    #[arg(long, requires = "print")]
    json: bool,

    /// Resampling filter for scaled placements.
    #[arg(long, value_name = "NAME")]
    filter: Option<ResampleFilter>,

    /// X display, e.g. `:0`. Defaults to `$DISPLAY`.
    #[arg(long, value_name = "NAME", env = "MMB_DISPLAY")]
    display: Option<String>,

    /// Configuration file. Defaults to `$XDG_CONFIG_HOME/mmb/config.toml`.
    #[arg(long, value_name = "PATH", env = "MMB_CONFIG")]
    config: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    dump_config: bool,
}

impl Cli {
    /// Folds command-line overrides into the loaded configuration.
    fn apply_overrides(&self, mut cfg: AppConfig) -> AppConfig {
        if self.clip {
            cfg.render.clip = true;
        }
        if let Some(filter) = self.filter {
            cfg.render.filter = filter;
        }
        if let Some(display) = &self.display {
            cfg.x11.display = Some(display.clone());
        }
        cfg
    }

    /// Whether a live display connection is required.
    fn needs_display(&self, cfg: &AppConfig) -> bool {
        let applies_live = self.input.is_some() && self.output.is_none();
        applies_live || cfg.layout.is_none()
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Config is loaded before tracing exists, so its failure is reported
    // once the subscriber is up.
    let loaded = match &cli.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    };
    let level = loaded
        .as_ref()
        .map(|cfg| cfg.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    init_tracing(&level);

    let cfg = match (loaded, &cli.config) {
        (Ok(cfg), _) => cfg,
        // An explicitly named config must be usable.
        (Err(e), Some(path)) => {
            return Err(e).with_context(|| format!("cannot load config {}", path.display()))
        }
        (Err(e), None) => {
            warn!("ignoring unusable config file: {e}");
            AppConfig::default()
        }
    };
    let cfg = cli.apply_overrides(cfg);

    if cli.dump_config {
        print!("{}", config::to_toml_string(&cfg)?);
        return Ok(());
    }

    if let Err(e) = run(&cli, &cfg, &mut std::io::stdout().lock()) {
        error!("{e:#}");
        return Err(e);
    }
    Ok(())
}

fn run(cli: &Cli, cfg: &AppConfig, out: &mut impl Write) -> anyhow::Result<()> {
    let session = if cli.needs_display(cfg) {
        let session = X11Session::connect(cfg.x11.clone()).context("cannot open X display")?;
        debug!(options = ?session.options(), "X11 session ready");
        Some(Arc::new(session))
    } else {
        None
    };

    let layout = resolve_layout(cfg, session.as_ref())?;
    info!(
        width = layout.bounds().width(),
        height = layout.bounds().height(),
        monitors = layout.monitor_count(),
        "screen layout"
    );

    let applied = match &cli.input {
        Some(input) => apply_wallpaper(cli, cfg, session.as_ref(), input, &layout),
        None => Ok(()),
    };

    // The layout is printed even when applying the wallpaper failed.
    if cli.print {
        out.write_all(render_layout(&layout, cli.json)?.as_bytes())?;
    }
    applied
}

fn apply_wallpaper(
    cli: &Cli,
    cfg: &AppConfig,
    session: Option<&Arc<X11Session>>,
    input: &Path,
    layout: &ScreenLayout,
) -> anyhow::Result<()> {
    let sink: Arc<dyn CanvasSink> = match (&cli.output, session) {
        (Some(path), _) => Arc::new(PngFileSink::new(path)),
        (None, Some(session)) => Arc::new(X11RootSink::new(Arc::clone(session))),
        (None, None) => anyhow::bail!("no X display available to apply the wallpaper"),
    };
    let compositor = Compositor::new(PlacementMode::from_clip(cfg.render.clip))
        .with_filter(cfg.render.filter);
    let use_case = SetWallpaperUseCase::new(Arc::new(FileImageLoader::new()), sink, compositor);

    let outcome = use_case
        .execute(input, layout)
        .with_context(|| format!("cannot set wallpaper from {}", input.display()))?;
    info!(
        placed = outcome.report.placed.len(),
        skipped = outcome.report.skipped.len(),
        "done"
    );
    Ok(())
}

/// Formats the layout for `--print`, as JSON or as the plain report.
fn render_layout(layout: &ScreenLayout, json: bool) -> anyhow::Result<String> {
    if json {
        Ok(format!("{}\n", serde_json::to_string_pretty(layout)?))
    } else {
        Ok(layout.to_string())
    }
}

/// Uses the `[layout]` override when configured, otherwise asks the display.
fn resolve_layout(
    cfg: &AppConfig,
    session: Option<&Arc<X11Session>>,
) -> anyhow::Result<ScreenLayout> {
    let enumerator: Box<dyn PlatformScreenEnumerator> = match (&cfg.layout, session) {
        (Some(layout), _) => {
            debug!("using layout from configuration");
            Box::new(ConfiguredScreenEnumerator::new(layout.clone()))
        }
        (None, Some(session)) => Box::new(X11ScreenEnumerator::new(Arc::clone(session))),
        (None, None) => anyhow::bail!("no layout configured and no X display available"),
    };
    build_screen_layout(enumerator.as_ref()).context("cannot determine monitor layout")
}

/// Initialises the stderr subscriber. `RUST_LOG` wins over `level`.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_requires_input_or_print() {
        assert!(Cli::try_parse_from(["mmb"]).is_err());
        assert!(Cli::try_parse_from(["mmb", "--clip"]).is_err());
        assert!(Cli::try_parse_from(["mmb", "-p"]).is_ok());
        assert!(Cli::try_parse_from(["mmb", "-i", "wall.png"]).is_ok());
    }

    #[test]
    fn test_cli_output_requires_input() {
        assert!(Cli::try_parse_from(["mmb", "-p", "-o", "out.png"]).is_err());
    }

    #[test]
    fn test_cli_parses_filter_names() {
        let cli = Cli::try_parse_from(["mmb", "-p", "--filter", "bicubic"]).expect("parse");
        assert_eq!(cli.filter, Some(ResampleFilter::CatmullRom));
        assert!(Cli::try_parse_from(["mmb", "-p", "--filter", "nearest"]).is_err());
    }

    #[test]
    fn test_apply_overrides_prefers_command_line() {
        // Arrange
        let cli = Cli::try_parse_from([
            "mmb", "-i", "w.png", "-c", "--filter", "triangle", "--display", ":3",
        ])
        .expect("parse");
        let mut cfg = AppConfig::default();
        cfg.render.filter = ResampleFilter::Gaussian;

        // Act
        let cfg = cli.apply_overrides(cfg);

        // Assert
        assert!(cfg.render.clip);
        assert_eq!(cfg.render.filter, ResampleFilter::Triangle);
        assert_eq!(cfg.x11.display.as_deref(), Some(":3"));
    }

    fn configured(width: u32, height: u32) -> AppConfig {
        AppConfig {
            layout: Some(config::LayoutOverride {
                screen_width: width,
                screen_height: height,
                monitors: Vec::new(),
            }),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_run_prints_layout_even_when_wallpaper_fails() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("mmb_main_{}", uuid::Uuid::new_v4()));
        let missing = dir.join("missing.png");
        let output = dir.join("out.png");
        let cli = Cli::try_parse_from([
            "mmb",
            "-p",
            "-i",
            missing.to_str().expect("utf-8 temp path"),
            "-o",
            output.to_str().expect("utf-8 temp path"),
        ])
        .expect("parse");
        let cfg = configured(640, 480);
        let mut out = Vec::new();

        // Act
        let result = run(&cli, &cfg, &mut out);

        // Assert
        assert!(result.is_err());
        assert!(!output.exists());
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "Total size:    640 480\nNum. monitors: 1\n\t 0: 0 0 -> 640 480\n"
        );
    }

    #[test]
    fn test_run_prints_json_layout_without_input() {
        let cli = Cli::try_parse_from(["mmb", "-p", "--json"]).expect("parse");
        let mut out = Vec::new();

        run(&cli, &configured(800, 600), &mut out).expect("run");

        let json: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(json["bounds"]["width"], 800.0);
        assert_eq!(json["monitors"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_needs_display_only_without_layout_or_when_applying_live() {
        let mut cfg = AppConfig::default();
        let print = Cli::try_parse_from(["mmb", "-p"]).expect("parse");
        let to_file = Cli::try_parse_from(["mmb", "-i", "w.png", "-o", "o.png"]).expect("parse");
        let live = Cli::try_parse_from(["mmb", "-i", "w.png"]).expect("parse");

        assert!(print.needs_display(&cfg));

        cfg.layout = Some(config::LayoutOverride {
            screen_width: 1920,
            screen_height: 1080,
            monitors: Vec::new(),
        });
        assert!(!print.needs_display(&cfg));
        assert!(!to_file.needs_display(&cfg));
        assert!(live.needs_display(&cfg));
    }
}
