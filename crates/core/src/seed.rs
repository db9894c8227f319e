//! Reproducible description of a rendered scene.
//!
//! A [`SceneSeed`] captures everything needed to regenerate an artwork:
//! scene kind, canvas size, parameter overrides, PRNG seed, the render time
//! and, for animations, the frame count.

use crate::error::SceneError;
use serde::{Deserialize, Serialize};

/// Reproducible specification for a tilemaker render.
///
/// Two identical seeds fed to the same binary produce byte-identical SVG.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneSeed {
    pub scene: String,
    pub size: f64,
    pub params: serde_json::Value,
    pub seed: u64,
    #[serde(default)]
    pub time: f64,
    #[serde(default)]
    pub frames: usize,
}

impl SceneSeed {
    /// Creates a seed with empty params, time 0 and no animation frames.
    pub fn new(scene: &str, size: f64, seed: u64) -> Self {
        Self {
            scene: scene.to_string(),
            size,
            params: serde_json::Value::Object(serde_json::Map::new()),
            seed,
            time: 0.0,
            frames: 0,
        }
    }

    /// Checks that the canvas size is positive and finite.
    pub fn validate(&self) -> Result<(), SceneError> {
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(SceneError::InvalidDimensions);
        }
        Ok(())
    }

    /// Reads a seed from a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self, SceneError> {
        let seed: SceneSeed =
            serde_json::from_str(text).map_err(|e| SceneError::MalformedSeed(e.to_string()))?;
        seed.validate()?;
        Ok(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_has_empty_params_and_no_frames() {
        let s = SceneSeed::new("city", 900.0, 42);
        assert_eq!(s.scene, "city");
        assert_eq!(s.seed, 42);
        assert_eq!(s.frames, 0);
        assert_eq!(s.params, serde_json::json!({}));
    }

    #[test]
    fn json_round_trip_with_params() {
        let mut s = SceneSeed::new("citywave", 600.0, 7);
        s.params = serde_json::json!({"max_buildings": 300, "terrain_tint": true});
        s.frames = 48;
        s.time = 1.5;
        let json = serde_json::to_string_pretty(&s).unwrap();
        assert_eq!(SceneSeed::from_json_str(&json).unwrap(), s);
    }

    #[test]
    fn missing_time_and_frames_default_to_zero() {
        let json = r#"{"scene":"city","size":900.0,"params":{},"seed":1}"#;
        let s = SceneSeed::from_json_str(json).unwrap();
        assert_eq!(s.time, 0.0);
        assert_eq!(s.frames, 0);
    }

    #[test]
    fn validate_rejects_zero_and_nan_sizes() {
        assert!(SceneSeed::new("city", 0.0, 1).validate().is_err());
        assert!(SceneSeed::new("city", f64::NAN, 1).validate().is_err());
        assert!(SceneSeed::new("city", -5.0, 1).validate().is_err());
        assert!(SceneSeed::new("city", 900.0, 1).validate().is_ok());
    }

    #[test]
    fn malformed_json_is_a_malformed_seed() {
        let err = SceneSeed::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, SceneError::MalformedSeed(_)), "got {err:?}");
        let err = SceneSeed::from_json_str(r#"{"scene":"city"}"#).unwrap_err();
        assert!(matches!(err, SceneError::MalformedSeed(_)), "got {err:?}");
    }
}
