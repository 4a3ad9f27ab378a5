//! Cinema lens presets.
//!
//! Fields of view are precomputed for a 36mm x 24mm full-frame sensor so the
//! HUD and the renderer always agree on the same numbers:
//! `fov = 2 * atan(sensor / (2 * focal_length))`.

use serde::Serialize;

/// Full-frame sensor width in millimetres.
pub const SENSOR_WIDTH_MM: f32 = 36.0;

/// Full-frame sensor height in millimetres.
pub const SENSOR_HEIGHT_MM: f32 = 24.0;

/// Id of the preset used when a lens id is unknown.
pub const FALLBACK_LENS_ID: &str = "50mm";

/// An immutable lens preset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LensPreset {
    /// Stable identifier, the focal length label (e.g. `"35mm"`).
    pub id: &'static str,
    /// Focal length in millimetres.
    pub focal_length_mm: f32,
    /// Horizontal field of view in degrees.
    pub fov_horizontal_deg: f32,
    /// Vertical field of view in degrees.
    pub fov_vertical_deg: f32,
    /// Name shown in the lens picker.
    pub display_name: &'static str,
    /// Keyboard shortcut selecting this lens.
    pub shortcut_key: char,
    /// Whether this is the default lens.
    pub is_default: bool,
}

/// Preset table in ascending focal length.
static PRESETS: [LensPreset; 6] = [
    LensPreset {
        id: "14mm",
        focal_length_mm: 14.0,
        fov_horizontal_deg: 104.25,
        fov_vertical_deg: 81.20,
        display_name: "Ultra Wide",
        shortcut_key: '1',
        is_default: false,
    },
    LensPreset {
        id: "24mm",
        focal_length_mm: 24.0,
        fov_horizontal_deg: 73.74,
        fov_vertical_deg: 53.13,
        display_name: "Wide",
        shortcut_key: '2',
        is_default: false,
    },
    LensPreset {
        id: "35mm",
        focal_length_mm: 35.0,
        fov_horizontal_deg: 54.43,
        fov_vertical_deg: 37.85,
        display_name: "Standard Wide",
        shortcut_key: '3',
        is_default: false,
    },
    LensPreset {
        id: "50mm",
        focal_length_mm: 50.0,
        fov_horizontal_deg: 39.60,
        fov_vertical_deg: 26.99,
        display_name: "Normal",
        shortcut_key: '4',
        is_default: true,
    },
    LensPreset {
        id: "85mm",
        focal_length_mm: 85.0,
        fov_horizontal_deg: 23.91,
        fov_vertical_deg: 16.07,
        display_name: "Portrait",
        shortcut_key: '5',
        is_default: false,
    },
    LensPreset {
        id: "135mm",
        focal_length_mm: 135.0,
        fov_horizontal_deg: 15.19,
        fov_vertical_deg: 10.16,
        display_name: "Telephoto",
        shortcut_key: '6',
        is_default: false,
    },
];

/// Index of the fallback ("normal") preset in [`PRESETS`].
const FALLBACK_INDEX: usize = 3;

/// Returns all presets, ordered by ascending focal length.
pub fn presets() -> &'static [LensPreset] {
    &PRESETS
}

/// Returns the default preset.
pub fn default_preset() -> &'static LensPreset {
    PRESETS
        .iter()
        .find(|p| p.is_default)
        .unwrap_or(&PRESETS[FALLBACK_INDEX])
}

/// Returns the fixed fallback preset used for unknown ids.
pub fn fallback_preset() -> &'static LensPreset {
    &PRESETS[FALLBACK_INDEX]
}

/// Looks up a preset by id, falling back to the normal lens.
pub fn preset(lens_id: &str) -> &'static LensPreset {
    find(lens_id).unwrap_or_else(|| {
        log::debug!("unknown lens '{lens_id}', using {FALLBACK_LENS_ID}");
        fallback_preset()
    })
}

/// Looks up a preset by id without falling back.
pub fn find(lens_id: &str) -> Option<&'static LensPreset> {
    PRESETS.iter().find(|p| p.id == lens_id)
}

/// Vertical field of view in degrees for a lens id.
pub fn vertical_fov(lens_id: &str) -> f32 {
    preset(lens_id).fov_vertical_deg
}

/// Horizontal field of view in degrees for a lens id.
pub fn horizontal_fov(lens_id: &str) -> f32 {
    preset(lens_id).fov_horizontal_deg
}

/// Reverse lookup from a keyboard shortcut to a lens id.
pub fn lens_for_shortcut(key: char) -> Option<&'static str> {
    PRESETS
        .iter()
        .find(|p| p.shortcut_key == key)
        .map(|p| p.id)
}

/// Computes a full-frame field of view in degrees for a sensor dimension.
///
/// Used to check the precomputed table; runtime lookups never call it.
pub fn field_of_view_degrees(sensor_mm: f32, focal_length_mm: f32) -> f32 {
    (2.0 * (sensor_mm / (2.0 * focal_length_mm)).atan()).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_exactly_one_default() {
        assert_eq!(presets().iter().filter(|p| p.is_default).count(), 1);
        assert_eq!(default_preset().id, FALLBACK_LENS_ID);
        assert_eq!(fallback_preset().id, FALLBACK_LENS_ID);
    }

    #[test]
    fn test_presets_ascending() {
        let focal: Vec<f32> = presets().iter().map(|p| p.focal_length_mm).collect();
        assert!(focal.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_table_matches_sensor_geometry() {
        for p in presets() {
            let h = field_of_view_degrees(SENSOR_WIDTH_MM, p.focal_length_mm);
            let v = field_of_view_degrees(SENSOR_HEIGHT_MM, p.focal_length_mm);
            assert!((h - p.fov_horizontal_deg).abs() < 0.01, "{} h-fov", p.id);
            assert!((v - p.fov_vertical_deg).abs() < 0.01, "{} v-fov", p.id);
        }
    }

    #[test]
    fn test_shortcuts_unique() {
        let mut keys: Vec<char> = presets().iter().map(|p| p.shortcut_key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), presets().len());
    }

    #[test]
    fn test_shortcut_three_is_35mm() {
        assert_eq!(lens_for_shortcut('3'), Some("35mm"));
        assert_eq!(preset("35mm").focal_length_mm, 35.0);
    }

    #[test]
    fn test_unclaimed_shortcut() {
        assert_eq!(lens_for_shortcut('9'), None);
        assert_eq!(lens_for_shortcut('g'), None);
    }

    #[test]
    fn test_known_lookup() {
        assert_eq!(preset("85mm").display_name, "Portrait");
        assert!((vertical_fov("24mm") - 53.13).abs() < 1e-4);
        assert!((horizontal_fov("135mm") - 15.19).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn unknown_ids_fall_back(id in "[a-z0-9]{0,8}") {
            prop_assume!(find(&id).is_none());
            prop_assert_eq!(preset(&id).id, FALLBACK_LENS_ID);
            prop_assert_eq!(vertical_fov(&id), fallback_preset().fov_vertical_deg);
            prop_assert_eq!(horizontal_fov(&id), fallback_preset().fov_horizontal_deg);
        }
    }
}
