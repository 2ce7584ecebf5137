//! X11 connection shared by monitor enumeration and the root-window sink.
//!
//! Protocol errors are delivered as values on checked requests. Which of
//! them are tolerated is decided per session by [`X11Options`], passed in
//! when the session is opened; there is no process-wide error callback.
//!
//! The two tolerated classes match what wallpaper setters traditionally
//! ignore:
//!
//! - `BadWindow`, raised when a window disappears between enumeration and
//!   use (only when [`X11Options::ignore_bad_window`] is set).
//! - Any `BadValue` / `BadPixmap` / `BadDrawable` / `BadWindow` / `BadMatch`
//!   raised while reclaiming the previous wallpaper owner's pixmap, whose
//!   client may be long gone (only when
//!   [`X11Options::tolerate_stale_owner_errors`] is set).

pub mod visual;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use x11rb::connection::Connection;
use x11rb::errors::{ConnectError, ConnectionError, ReplyError, ReplyOrIdError};
use x11rb::protocol::xproto::{ConnectionExt as _, Screen};
use x11rb::protocol::ErrorKind;
use x11rb::rust_connection::RustConnection;

/// Error type for X11 operations.
#[derive(Debug, Error)]
pub enum X11Error {
    #[error("cannot open display {display}: {source}")]
    Connect {
        display: String,
        #[source]
        source: ConnectError,
    },

    #[error("X11 connection failed: {0}")]
    Connection(#[from] ConnectionError),

    #[error("X11 request {request} failed: {source}")]
    Request {
        request: &'static str,
        #[source]
        source: ReplyError,
    },

    #[error("cannot allocate X11 resource id: {0}")]
    ResourceId(#[from] ReplyOrIdError),

    #[error("display has no screen {0}")]
    NoSuchScreen(usize),

    #[error("unsupported root visual: {0}")]
    UnsupportedVisual(String),

    #[error("{width}x{height} image exceeds the X11 16-bit size limit")]
    ImageTooLarge { width: u32, height: u32 },

    #[error("cannot create atom {0}")]
    AtomUnavailable(&'static str),
}

/// Connection and error-policy settings for an X11 session.
///
/// Doubles as the `[x11]` section of the configuration file; missing keys
/// take their default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct X11Options {
    /// Display name such as `":0"`. `None` uses `$DISPLAY`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    /// Treat `BadWindow` as a warning instead of a failure.
    pub ignore_bad_window: bool,
    /// Treat errors raised while reclaiming a previous wallpaper pixmap as
    /// warnings instead of failures.
    pub tolerate_stale_owner_errors: bool,
}

impl Default for X11Options {
    fn default() -> Self {
        Self {
            display: None,
            ignore_bad_window: true,
            tolerate_stale_owner_errors: true,
        }
    }
}

/// Which part of a wallpaper update a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    /// Querying the display (screens, Xinerama).
    Query,
    /// Reading and killing the previous owner of the root pixmap.
    ReclaimPreviousOwner,
    /// Creating, uploading and installing the new pixmap.
    Install,
}

impl X11Options {
    /// Returns `true` if an error of `kind` raised during `phase` should be
    /// logged and ignored.
    pub fn tolerates(&self, kind: ErrorKind, phase: RequestPhase) -> bool {
        if self.ignore_bad_window && kind == ErrorKind::Window {
            return true;
        }
        self.tolerate_stale_owner_errors
            && phase == RequestPhase::ReclaimPreviousOwner
            && matches!(
                kind,
                ErrorKind::Value
                    | ErrorKind::Pixmap
                    | ErrorKind::Drawable
                    | ErrorKind::Window
                    | ErrorKind::Match
            )
    }
}

/// An open display connection plus the error policy that applies to it.
pub struct X11Session {
    conn: RustConnection,
    screen_num: usize,
    options: X11Options,
}

impl X11Session {
    /// Opens the display named in `options` (or `$DISPLAY`).
    ///
    /// # Errors
    ///
    /// Returns [`X11Error::Connect`] if the display cannot be opened and
    /// [`X11Error::NoSuchScreen`] if the server reports no default screen.
    pub fn connect(options: X11Options) -> Result<Self, X11Error> {
        let (conn, screen_num) =
            x11rb::connect(options.display.as_deref()).map_err(|source| X11Error::Connect {
                display: describe_display(options.display.as_deref()),
                source,
            })?;
        if conn.setup().roots.get(screen_num).is_none() {
            return Err(X11Error::NoSuchScreen(screen_num));
        }
        debug!(screen = screen_num, "connected to X11 display");
        Ok(Self {
            conn,
            screen_num,
            options,
        })
    }

    pub fn connection(&self) -> &RustConnection {
        &self.conn
    }

    pub fn options(&self) -> &X11Options {
        &self.options
    }

    /// The default screen. Its existence is checked in [`X11Session::connect`].
    pub fn screen(&self) -> &Screen {
        &self.conn.setup().roots[self.screen_num]
    }

    /// Applies the session's error policy to a request result.
    ///
    /// Tolerated X11 errors are logged and turned into `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`X11Error::Request`] for any error the policy does not
    /// tolerate, including connection failures.
    pub fn tolerate<T>(
        &self,
        result: Result<T, ReplyError>,
        phase: RequestPhase,
        request: &'static str,
    ) -> Result<Option<T>, X11Error> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(ReplyError::X11Error(error)) if self.options.tolerates(error.error_kind, phase) => {
                warn!(
                    request,
                    kind = ?error.error_kind,
                    bad_value = error.bad_value,
                    "ignoring X11 error"
                );
                Ok(None)
            }
            Err(source) => Err(X11Error::Request { request, source }),
        }
    }

    /// Round-trips to the server so every queued request has been processed.
    ///
    /// # Errors
    ///
    /// Returns [`X11Error`] if the connection fails.
    pub fn sync(&self) -> Result<(), X11Error> {
        self.conn
            .get_input_focus()?
            .reply()
            .map_err(|source| X11Error::Request {
                request: "GetInputFocus",
                source,
            })?;
        Ok(())
    }
}

fn describe_display(display: Option<&str>) -> String {
    display
        .map(str::to_string)
        .or_else(|| std::env::var("DISPLAY").ok())
        .unwrap_or_else(|| "<unset>".to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
