//! Error types for the tilemaker core.

use thiserror::Error;

/// Errors produced while building, painting, or saving a scene.
#[derive(Debug, Error)]
pub enum SceneError {
    /// Painting was requested without a drawing surface to paint onto.
    #[error("drawing surface missing: a scene cannot be painted without a surface")]
    MissingSurface,

    /// Canvas size was zero or not a finite positive number.
    #[error("invalid dimensions: canvas size must be positive and finite")]
    InvalidDimensions,

    /// The requested scene kind is not registered.
    #[error("unknown scene: {0}")]
    UnknownScene(String),

    /// A parameter existed but had the wrong JSON type.
    #[error("parameter type mismatch for '{name}': expected {expected}, got {got}")]
    ParamTypeMismatch {
        name: String,
        expected: String,
        got: String,
    },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A surface group was closed more times than it was opened, or left open.
    #[error("unbalanced group: {0}")]
    UnbalancedGroup(String),

    /// A saved seed document was not valid seed JSON.
    #[error("malformed seed: {0}")]
    MalformedSeed(String),

    /// Writing a document to disk failed.
    #[error("i/o error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_surface_mentions_surface() {
        let msg = SceneError::MissingSurface.to_string();
        assert!(msg.contains("surface"), "got: {msg}");
    }

    #[test]
    fn unknown_scene_includes_name() {
        let msg = SceneError::UnknownScene("harbor".into()).to_string();
        assert!(msg.contains("harbor"), "got: {msg}");
    }

    #[test]
    fn param_type_mismatch_includes_all_fields() {
        let err = SceneError::ParamTypeMismatch {
            name: "max_buildings".into(),
            expected: "integer".into(),
            got: "string".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("max_buildings"), "missing param name in: {msg}");
        assert!(msg.contains("integer"), "missing expected type in: {msg}");
        assert!(msg.contains("string"), "missing got type in: {msg}");
    }

    #[test]
    fn io_error_includes_message() {
        let msg = SceneError::Io("disk full".into()).to_string();
        assert!(msg.contains("disk full"), "got: {msg}");
    }

    #[test]
    fn malformed_seed_is_not_an_io_error() {
        let err = SceneError::MalformedSeed("expected value at line 1".into());
        assert!(!matches!(err, SceneError::Io(_)));
        assert!(err.to_string().starts_with("malformed seed"));
    }

    #[test]
    fn scene_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SceneError>();
    }
}
