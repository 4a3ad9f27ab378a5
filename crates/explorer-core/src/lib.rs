//! Core state for camera-explorer.
//!
//! This crate provides the engine-independent pieces of the camera explorer:
//! - [`lens`] presets with precomputed full-frame fields of view
//! - [`CameraNavigation`], the bounded first-person camera state
//! - [`SceneBounds`] derived from a reconstructed scene
//! - [`ExplorerOptions`] for speeds, padding and photo-alignment defaults

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod bounds;
pub mod error;
pub mod lens;
pub mod navigation;
pub mod options;
pub mod transform;

pub use bounds::SceneBounds;
pub use error::{ExplorerError, Result};
pub use lens::LensPreset;
pub use navigation::{CameraNavigation, MoveDirection, PITCH_LIMIT_DEGREES};
pub use options::{ExplorerOptions, PhotoAlignment, MAX_TICK_HZ};
pub use transform::{CameraTransform, Rotation};

// Re-export glam types for convenience
pub use glam::{Mat4, Vec3};
