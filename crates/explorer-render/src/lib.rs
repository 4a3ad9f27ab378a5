//! Viewer-facing pieces of camera-explorer.
//!
//! The splat renderer itself is an external collaborator. This crate holds
//! what the explorer hands to it and what it reads back:
//! - [`ViewerCamera`]: the per-frame camera (matrices and a GPU uniform block)
//! - [`RgbaFrame`]: a rendered frame buffer read back for capture
//! - [`Thumbnail`]: PNG-encoded snapshot previews

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod camera;
pub mod frame;
pub mod thumbnail;

pub use camera::{CameraUniforms, ViewerCamera};
pub use frame::{PixelFormat, RgbaFrame};
pub use thumbnail::{encode_thumbnail, Thumbnail, ThumbnailError};
