//! Installs the canvas as the X11 root window background.
//!
//! The canvas is uploaded into a new pixmap, which is then published the
//! way pseudo-transparent clients expect:
//!
//! 1. If `_XROOTPMAP_ID` and `ESETROOT_PMAP_ID` both exist and name the same
//!    pixmap, the client that owns it (a previous wallpaper setter that
//!    retained its resources) is killed so the old pixmap is freed.
//! 2. Both properties are set to the new pixmap, creating the atoms if needed.
//! 3. The pixmap becomes the root window background and the root is cleared.
//! 4. The close-down mode is set to `RetainPermanent` so the pixmap outlives
//!    this process.

use std::sync::Arc;

use image::RgbaImage;
use tracing::{debug, info};
use x11rb::connection::{Connection, RequestConnection};
use x11rb::protocol::xproto::{
    Atom, AtomEnum, ChangeWindowAttributesAux, CloseDown, ConnectionExt as _, CreateGCAux,
    ImageFormat, Pixmap, PropMode, Window,
};
use x11rb::wrapper::ConnectionExt as _;
use x11rb::NONE;

use crate::application::set_wallpaper::{CanvasSink, CanvasSinkError};
use crate::infrastructure::x11::visual::{rows_per_request, PixelFormat};
use crate::infrastructure::x11::{RequestPhase, X11Error, X11Session};

const ROOT_PIXMAP_ATOM: &str = "_XROOTPMAP_ID";
const ESETROOT_ATOM: &str = "ESETROOT_PMAP_ID";

/// [`CanvasSink`] that sets the canvas as the root window background.
pub struct X11RootSink {
    session: Arc<X11Session>,
}

impl X11RootSink {
    pub fn new(session: Arc<X11Session>) -> Self {
        Self { session }
    }

    fn install(&self, canvas: &RgbaImage) -> Result<(), X11Error> {
        let (width, height) = protocol_size(canvas.width(), canvas.height())?;
        let conn = self.session.connection();
        let screen = self.session.screen();
        let format = PixelFormat::for_root(conn.setup(), screen)?;

        let pixmap = conn.generate_id()?;
        let created = conn
            .create_pixmap(format.depth, pixmap, screen.root, width, height)?
            .check();
        self.session
            .tolerate(created, RequestPhase::Install, "CreatePixmap")?;

        if let Err(e) = self.upload(pixmap, canvas, &format) {
            conn.free_pixmap(pixmap)?.ignore_error();
            return Err(e);
        }
        debug!(pixmap, width, height, "canvas uploaded");

        self.reclaim_previous_owner(screen.root)?;
        self.publish(screen.root, pixmap)?;

        let retained = conn.set_close_down_mode(CloseDown::RETAIN_PERMANENT)?.check();
        self.session
            .tolerate(retained, RequestPhase::Install, "SetCloseDownMode")?;
        conn.flush()?;
        info!(pixmap, "root background installed");
        Ok(())
    }

    /// Copies the canvas into `pixmap` in chunks that fit the request limit.
    fn upload(&self, pixmap: Pixmap, canvas: &RgbaImage, format: &PixelFormat) -> Result<(), X11Error> {
        let conn = self.session.connection();
        let gc = conn.generate_id()?;
        let created = conn.create_gc(gc, pixmap, &CreateGCAux::new())?.check();
        self.session.tolerate(created, RequestPhase::Install, "CreateGC")?;

        let (width, height) = protocol_size(canvas.width(), canvas.height())?;
        let chunk = rows_per_request(canvas.width(), conn.maximum_request_bytes());
        let mut result = Ok(());
        let mut first_row = 0u32;
        while first_row < canvas.height() && result.is_ok() {
            let rows = chunk.min(canvas.height() - first_row);
            let data = format.encode_rows(canvas, first_row, rows);
            // Both values are bounded by `height`, which fits an i16.
            let dst_y = first_row as i16;
            result = conn
                .put_image(
                    ImageFormat::Z_PIXMAP,
                    pixmap,
                    gc,
                    width,
                    rows as u16,
                    0,
                    dst_y,
                    0,
                    format.depth,
                    &data,
                )
                .map_err(X11Error::from)
                .and_then(|cookie| {
                    self.session
                        .tolerate(cookie.check(), RequestPhase::Install, "PutImage")
                        .map(|_| ())
                });
            first_row += rows;
        }
        debug!(height, chunk, "uploaded rows");

        conn.free_gc(gc)?.ignore_error();
        result
    }

    /// Kills the client owning the currently published root pixmap, if both
    /// properties agree on it.
    fn reclaim_previous_owner(&self, root: Window) -> Result<(), X11Error> {
        let (Some(prop_root), Some(prop_esetroot)) = (
            self.existing_atom(ROOT_PIXMAP_ATOM)?,
            self.existing_atom(ESETROOT_ATOM)?,
        ) else {
            return Ok(());
        };

        let Some(old_root) = self.pixmap_property(root, prop_root)? else {
            return Ok(());
        };
        let Some(old_esetroot) = self.pixmap_property(root, prop_esetroot)? else {
            return Ok(());
        };
        if old_root != old_esetroot {
            debug!(old_root, old_esetroot, "root pixmap properties disagree; not killing");
            return Ok(());
        }

        info!(pixmap = old_root, "killing client owning previous root pixmap");
        let conn = self.session.connection();
        let killed = conn.kill_client(old_root)?.check();
        self.session
            .tolerate(killed, RequestPhase::ReclaimPreviousOwner, "KillClient")?;
        self.session.sync()
    }

    /// Sets both root pixmap properties and the root background.
    fn publish(&self, root: Window, pixmap: Pixmap) -> Result<(), X11Error> {
        let conn = self.session.connection();
        for name in [ROOT_PIXMAP_ATOM, ESETROOT_ATOM] {
            let atom = self.created_atom(name)?;
            let changed = conn
                .change_property32(PropMode::REPLACE, root, atom, AtomEnum::PIXMAP, &[pixmap])?
                .check();
            self.session
                .tolerate(changed, RequestPhase::Install, "ChangeProperty")?;
        }

        let attributes = ChangeWindowAttributesAux::new().background_pixmap(pixmap);
        let changed = conn.change_window_attributes(root, &attributes)?.check();
        self.session
            .tolerate(changed, RequestPhase::Install, "ChangeWindowAttributes")?;
        // Zero width and height clear to the window's edges.
        let cleared = conn.clear_area(false, root, 0, 0, 0, 0)?.check();
        self.session.tolerate(cleared, RequestPhase::Install, "ClearArea")?;
        Ok(())
    }

    fn existing_atom(&self, name: &'static str) -> Result<Option<Atom>, X11Error> {
        let reply = self.session.tolerate(
            self.session
                .connection()
                .intern_atom(true, name.as_bytes())?
                .reply(),
            RequestPhase::ReclaimPreviousOwner,
            "InternAtom",
        )?;
        Ok(reply.map(|r| r.atom).filter(|&atom| atom != NONE))
    }

    fn created_atom(&self, name: &'static str) -> Result<Atom, X11Error> {
        let reply = self
            .session
            .connection()
            .intern_atom(false, name.as_bytes())?
            .reply()
            .map_err(|source| X11Error::Request {
                request: "InternAtom",
                source,
            })?;
        if reply.atom == NONE {
            return Err(X11Error::AtomUnavailable(name));
        }
        Ok(reply.atom)
    }

    /// Reads a single PIXMAP-typed value from a root window property.
    fn pixmap_property(&self, root: Window, property: Atom) -> Result<Option<Pixmap>, X11Error> {
        let reply = self.session.tolerate(
            self.session
                .connection()
                .get_property(false, root, property, AtomEnum::ANY, 0, 1)?
                .reply(),
            RequestPhase::ReclaimPreviousOwner,
            "GetProperty",
        )?;
        let Some(reply) = reply.filter(|r| r.type_ == u32::from(AtomEnum::PIXMAP)) else {
            return Ok(None);
        };
        let pixmap = reply.value32().and_then(|mut values| values.next());
        Ok(pixmap)
    }
}

impl CanvasSink for X11RootSink {
    fn apply(&self, canvas: &RgbaImage) -> Result<(), CanvasSinkError> {
        self.install(canvas)
            .map_err(|e| CanvasSinkError::Platform(e.to_string()))
    }

    fn describe(&self) -> String {
        "X11 root window".to_string()
    }
}

/// Checks that a canvas can be addressed by X11 requests, whose coordinates
/// are signed 16-bit.
fn protocol_size(width: u32, height: u32) -> Result<(u16, u16), X11Error> {
    let limit = i16::MAX as u32;
    if width == 0 || height == 0 || width > limit || height > limit {
        return Err(X11Error::ImageTooLarge { width, height });
    }
    Ok((width as u16, height as u16))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_size_accepts_common_screens() {
        assert_eq!(protocol_size(3200, 1080).expect("size"), (3200, 1080));
        assert_eq!(protocol_size(32767, 32767).expect("size"), (32767, 32767));
    }

    #[test]
    fn test_protocol_size_rejects_oversized_canvas() {
        assert!(matches!(
            protocol_size(40_000, 1080),
            Err(X11Error::ImageTooLarge {
                width: 40_000,
                height: 1080
            })
        ));
    }

    #[test]
    fn test_protocol_size_rejects_empty_canvas() {
        assert!(protocol_size(0, 10).is_err());
    }
}
