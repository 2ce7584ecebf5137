//! Infrastructure layer.
//!
//! Contains the adapters between the application layer and the outside
//! world: files, the X server and the configuration file.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `mmb_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`image_source`** – [`FileImageLoader`](image_source::FileImageLoader),
//!   decoding the source image with the `image` crate.
//! - **`screen_info`** – monitor enumeration from X11/Xinerama, from the
//!   config file, or from a fixed mock.
//! - **`background`** – canvas sinks: PNG file or X11 root window.
//! - **`x11`** – the shared X11 session and its error policy.
//! - **`storage`** – TOML configuration.

pub mod background;
pub mod image_source;
pub mod screen_info;
pub mod storage;
pub mod x11;
