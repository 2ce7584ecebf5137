//! Monitor enumeration from the X server.
//!
//! The screen size comes from the default screen. Monitor rectangles come
//! from Xinerama when the extension is present and active; otherwise the
//! monitor list is left empty and the layout falls back to one monitor
//! covering the whole screen.

use std::sync::Arc;

use mmb_core::Rectangle;
use tracing::debug;
use x11rb::connection::RequestConnection;
use x11rb::protocol::xinerama::{self, ConnectionExt as _};

use super::{PlatformScreenEnumerator, ScreenInfoError, ScreenReport};
use crate::infrastructure::x11::{RequestPhase, X11Error, X11Session};

/// X11 implementation of [`PlatformScreenEnumerator`].
pub struct X11ScreenEnumerator {
    session: Arc<X11Session>,
}

impl X11ScreenEnumerator {
    pub fn new(session: Arc<X11Session>) -> Self {
        Self { session }
    }

    fn xinerama_monitors(&self) -> Result<Vec<Rectangle>, X11Error> {
        let conn = self.session.connection();
        if conn
            .extension_information(xinerama::X11_EXTENSION_NAME)?
            .is_none()
        {
            debug!("Xinerama extension not present");
            return Ok(Vec::new());
        }

        let active = self.session.tolerate(
            conn.xinerama_is_active()?.reply(),
            RequestPhase::Query,
            "XineramaIsActive",
        )?;
        if active.map_or(true, |reply| reply.state == 0) {
            debug!("Xinerama inactive");
            return Ok(Vec::new());
        }

        let screens = self.session.tolerate(
            conn.xinerama_query_screens()?.reply(),
            RequestPhase::Query,
            "XineramaQueryScreens",
        )?;
        Ok(screens
            .map(|reply| {
                reply
                    .screen_info
                    .iter()
                    .map(|info| {
                        Rectangle::new(
                            f64::from(info.x_org),
                            f64::from(info.y_org),
                            f64::from(info.width),
                            f64::from(info.height),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}

impl PlatformScreenEnumerator for X11ScreenEnumerator {
    fn enumerate_screens(&self) -> Result<ScreenReport, ScreenInfoError> {
        let screen = self.session.screen();
        let monitors = self
            .xinerama_monitors()
            .map_err(|e| ScreenInfoError::PlatformError(e.to_string()))?;
        Ok(ScreenReport {
            screen_width: f64::from(screen.width_in_pixels),
            screen_height: f64::from(screen.height_in_pixels),
            monitors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::screen_info::build_screen_layout;
    use crate::infrastructure::x11::X11Options;

    /// Smoke test: with a display the layout has at least one monitor;
    /// without one, connecting fails and there is nothing to enumerate.
    #[test]
    fn test_x11_screen_enumerator_smoke() {
        let Ok(session) = X11Session::connect(X11Options::default()) else {
            return;
        };
        let enumerator = X11ScreenEnumerator::new(Arc::new(session));

        let layout = build_screen_layout(&enumerator).expect("layout from live display");

        assert!(layout.monitor_count() >= 1);
        assert!(layout.bounds().width() >= 1.0);
    }
}
