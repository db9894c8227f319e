//! Helpers for reading typed scene parameters out of a JSON object.
//!
//! Missing keys fall back to the default. A key that is present with the
//! wrong JSON type is reported as [`SceneError::ParamTypeMismatch`], so a
//! typo in `--params` does not silently render the default scene.

use crate::error::SceneError;
use serde_json::Value;

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(name: &str, expected: &str, got: &Value) -> SceneError {
    SceneError::ParamTypeMismatch {
        name: name.to_string(),
        expected: expected.to_string(),
        got: json_type_name(got).to_string(),
    }
}

/// Reads a number (integers accepted) from `params[name]`.
pub fn param_f64(params: &Value, name: &str, default: f64) -> Result<f64, SceneError> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(default),
        Some(v) => v.as_f64().ok_or_else(|| mismatch(name, "number", v)),
    }
}

/// Reads a non-negative integer from `params[name]`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> Result<usize, SceneError> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(default),
        Some(v) => v
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| mismatch(name, "non-negative integer", v)),
    }
}

/// Reads a boolean from `params[name]`.
pub fn param_bool(params: &Value, name: &str, default: bool) -> Result<bool, SceneError> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(default),
        Some(v) => v.as_bool().ok_or_else(|| mismatch(name, "bool", v)),
    }
}

/// Reads a string from `params[name]`.
pub fn param_string(params: &Value, name: &str, default: &str) -> Result<String, SceneError> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(default.to_owned()),
        Some(v) => v
            .as_str()
            .map(String::from)
            .ok_or_else(|| mismatch(name, "string", v)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn param_f64_accepts_integers() {
        let params = json!({"warp_lateral": 1});
        assert_eq!(param_f64(&params, "warp_lateral", 0.9).unwrap(), 1.0);
    }

    #[test]
    fn param_f64_defaults_when_missing_or_null() {
        let params = json!({"warp_lateral": null});
        assert_eq!(param_f64(&params, "warp_lateral", 0.9).unwrap(), 0.9);
        assert_eq!(param_f64(&params, "sea_fraction", 0.08).unwrap(), 0.08);
    }

    #[test]
    fn param_f64_rejects_strings() {
        let params = json!({"warp_lateral": "lots"});
        let err = param_f64(&params, "warp_lateral", 0.9).unwrap_err();
        assert!(matches!(err, SceneError::ParamTypeMismatch { .. }));
        assert!(err.to_string().contains("string"));
    }

    #[test]
    fn param_usize_rejects_negative_and_fractional() {
        assert!(param_usize(&json!({"n": -1}), "n", 3).is_err());
        assert!(param_usize(&json!({"n": 2.5}), "n", 3).is_err());
        assert_eq!(param_usize(&json!({"n": 12}), "n", 3).unwrap(), 12);
    }

    #[test]
    fn param_bool_reads_and_defaults() {
        assert!(param_bool(&json!({"tint": true}), "tint", false).unwrap());
        assert!(param_bool(&json!({}), "tint", true).unwrap());
        assert!(param_bool(&json!({"tint": 1}), "tint", false).is_err());
    }

    #[test]
    fn param_string_reads_and_defaults() {
        let params = json!({"shore_style": "strips"});
        assert_eq!(param_string(&params, "shore_style", "smooth").unwrap(), "strips");
        assert_eq!(param_string(&json!({}), "shore_style", "smooth").unwrap(), "smooth");
    }

    #[test]
    fn non_object_params_fall_back_to_defaults() {
        let params = json!("not an object");
        assert_eq!(param_usize(&params, "n", 4).unwrap(), 4);
    }
}
