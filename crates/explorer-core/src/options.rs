//! Configuration options for the camera explorer.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{ExplorerError, Result};
use crate::lens;
use crate::transform::Rotation;

/// Highest accepted movement tick rate.
pub const MAX_TICK_HZ: u32 = 1000;

/// Photo-alignment defaults.
///
/// Orientation offset (degrees) between the reconstruction's coordinate frame
/// and the framing of the source photo. Reconstructions from different
/// services disagree here, so this stays a configurable parameter.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoAlignment {
    /// Pitch offset in degrees.
    pub pitch: f32,
    /// Yaw offset in degrees.
    pub yaw: f32,
    /// Roll offset in degrees.
    pub roll: f32,
}

impl PhotoAlignment {
    /// Returns the offset as a rotation.
    pub fn rotation(self) -> Rotation {
        Rotation::new(self.pitch, self.yaw, self.roll)
    }
}

/// Options for camera navigation and capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerOptions {
    /// Distance moved per tick while a movement key is held.
    pub move_speed: f32,

    /// Look rotation in degrees per pixel of pointer drag.
    pub look_sensitivity: f32,

    /// Height change per scroll line.
    pub height_step: f32,

    /// Rate at which held movement keys are polled.
    pub tick_hz: u32,

    /// Fraction of the scene extent trimmed from each side of the bounds.
    pub bounds_padding: f32,

    /// Camera position restored by a reset.
    pub default_position: Vec3,

    /// Lens restored by a reset.
    pub default_lens: String,

    /// Photo-alignment orientation offset applied by the viewer.
    pub photo_alignment: PhotoAlignment,

    /// Scale move speed and height step with the scene diagonal.
    pub scale_speed_with_scene: bool,

    /// Longest edge of captured thumbnails in pixels (0 keeps full size).
    pub thumbnail_max_edge: u32,
}

impl Default for ExplorerOptions {
    fn default() -> Self {
        Self {
            move_speed: 0.05,
            look_sensitivity: 0.2,
            height_step: 0.05,
            tick_hz: 60,
            bounds_padding: 0.1,
            default_position: Vec3::new(0.0, 0.0, 0.1),
            default_lens: lens::default_preset().id.to_string(),
            photo_alignment: PhotoAlignment::default(),
            scale_speed_with_scene: false,
            thumbnail_max_edge: 512,
        }
    }
}

impl ExplorerOptions {
    /// Loads options from a JSON file and validates them.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let options = Self::from_json(&text)?;
        log::debug!("loaded explorer options from {}", path.as_ref().display());
        Ok(options)
    }

    /// Parses options from JSON and validates them. Missing fields keep defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(text)?;
        options.validate()?;
        Ok(options)
    }

    /// Saves options as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<()> {
        positive("move_speed", self.move_speed)?;
        positive("look_sensitivity", self.look_sensitivity)?;
        positive("height_step", self.height_step)?;

        if !(1..=MAX_TICK_HZ).contains(&self.tick_hz) {
            return Err(invalid(
                "tick_hz",
                format!("{} is outside [1, {MAX_TICK_HZ}]", self.tick_hz),
            ));
        }
        if !(0.0..0.5).contains(&self.bounds_padding) {
            return Err(invalid(
                "bounds_padding",
                format!("{} is outside [0, 0.5)", self.bounds_padding),
            ));
        }
        if !self.default_position.is_finite() {
            return Err(invalid("default_position", "must be finite".into()));
        }
        if lens::find(&self.default_lens).is_none() {
            return Err(invalid(
                "default_lens",
                format!("unknown lens '{}'", self.default_lens),
            ));
        }
        let a = self.photo_alignment;
        if !(a.pitch.is_finite() && a.yaw.is_finite() && a.roll.is_finite()) {
            return Err(invalid("photo_alignment", "must be finite".into()));
        }
        Ok(())
    }

    /// Returns the tick period in seconds.
    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.tick_hz.max(1) as f32
    }
}

fn positive(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(name, format!("{value} is not a positive number")))
    }
}

fn invalid(name: &'static str, reason: String) -> ExplorerError {
    ExplorerError::InvalidOption { name, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let options = ExplorerOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.default_lens, "50mm");
        assert_eq!(options.tick_hz, 60);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options =
            ExplorerOptions::from_json(r#"{ "move_speed": 0.2, "photo_alignment": { "yaw": 180.0 } }"#)
                .unwrap();
        assert_eq!(options.move_speed, 0.2);
        assert_eq!(options.photo_alignment.yaw, 180.0);
        assert_eq!(options.photo_alignment.pitch, 0.0);
        assert_eq!(options.height_step, ExplorerOptions::default().height_step);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            ExplorerOptions::from_json(r#"{ "move_speed": -1.0 }"#),
            Err(ExplorerError::InvalidOption { name: "move_speed", .. })
        ));
        assert!(matches!(
            ExplorerOptions::from_json(r#"{ "default_lens": "300mm" }"#),
            Err(ExplorerError::InvalidOption { name: "default_lens", .. })
        ));
        assert!(matches!(
            ExplorerOptions::from_json(r#"{ "bounds_padding": 0.5 }"#),
            Err(ExplorerError::InvalidOption { name: "bounds_padding", .. })
        ));
        assert!(matches!(
            ExplorerOptions::from_json(r#"{ "tick_hz": 0 }"#),
            Err(ExplorerError::InvalidOption { name: "tick_hz", .. })
        ));
        assert!(matches!(
            ExplorerOptions::from_json(r#"{ "tick_hz": 100000000 }"#),
            Err(ExplorerError::InvalidOption { name: "tick_hz", .. })
        ));
        assert!(ExplorerOptions::from_json(r#"{ "tick_hz": 1000 }"#).is_ok());
        assert!(matches!(
            ExplorerOptions::from_json("not json"),
            Err(ExplorerError::JsonError(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!(
            "camera-explorer-options-{}.json",
            std::process::id()
        ));
        let mut options = ExplorerOptions::default();
        options.scale_speed_with_scene = true;
        options.save(&path).unwrap();
        let loaded = ExplorerOptions::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, options);
    }
}
