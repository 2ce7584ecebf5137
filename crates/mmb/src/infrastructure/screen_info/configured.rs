//! Screen layout taken from the configuration file instead of the display.

use mmb_core::Rectangle;

use super::{PlatformScreenEnumerator, ScreenInfoError, ScreenReport};
use crate::infrastructure::storage::config::LayoutOverride;

/// Reports the `[layout]` section of the config verbatim.
///
/// Lets `--output` render a wallpaper on a machine with no display, or for a
/// monitor arrangement other than the current one.
pub struct ConfiguredScreenEnumerator {
    layout: LayoutOverride,
}

impl ConfiguredScreenEnumerator {
    pub fn new(layout: LayoutOverride) -> Self {
        Self { layout }
    }
}

impl PlatformScreenEnumerator for ConfiguredScreenEnumerator {
    fn enumerate_screens(&self) -> Result<ScreenReport, ScreenInfoError> {
        Ok(ScreenReport {
            screen_width: f64::from(self.layout.screen_width),
            screen_height: f64::from(self.layout.screen_height),
            monitors: self
                .layout
                .monitors
                .iter()
                .map(|m| {
                    Rectangle::new(
                        f64::from(m.x),
                        f64::from(m.y),
                        f64::from(m.width),
                        f64::from(m.height),
                    )
                })
                .collect(),
        })
    }
}
