//! CLI errors and their process exit codes.
//!
//! | code | cause |
//! |------|-------|
//! | 2    | bad arguments (clap, before `run`) |
//! | 10   | scene could not be built or painted |
//! | 11   | reading or writing a file failed |
//! | 12   | arguments parse but make no sense (no scene name, still scene animated) |
//! | 13   | malformed JSON in `--params` or a seed file |

use std::path::Path;

use thiserror::Error;
use tilemaker_core::SceneError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Scene(SceneError),

    #[error("{0}")]
    Io(String),

    #[error("{0}")]
    Input(String),

    /// `origin` names where the JSON came from, e.g. `--params` or a file path.
    #[error("malformed JSON in {origin}: {detail}")]
    Parse { origin: String, detail: String },
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Scene(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Parse { .. } => 13,
        }
    }

    /// A failed file operation on `path`.
    pub fn io(path: &Path, err: std::io::Error) -> Self {
        CliError::Io(format!("{}: {err}", path.display()))
    }

    pub fn parse(origin: impl Into<String>, detail: impl ToString) -> Self {
        CliError::Parse {
            origin: origin.into(),
            detail: detail.to_string(),
        }
    }
}

impl From<SceneError> for CliError {
    fn from(e: SceneError) -> Self {
        match e {
            SceneError::Io(msg) => CliError::Io(msg),
            SceneError::MalformedSeed(detail) => CliError::parse("seed file", detail),
            other => CliError::Scene(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_write_failure_is_io() {
        let err = CliError::from(SceneError::Io("out/x.svg: No such file".into()));
        assert_eq!(err.exit_code(), 11);
        assert_eq!(err.to_string(), "out/x.svg: No such file");
    }

    #[test]
    fn malformed_seed_is_a_parse_error() {
        let err = CliError::from(SceneError::MalformedSeed("EOF while parsing".into()));
        assert_eq!(err.exit_code(), 13);
        assert_eq!(err.to_string(), "malformed JSON in seed file: EOF while parsing");
    }

    #[test]
    fn scene_errors_keep_their_message() {
        let err = CliError::from(SceneError::UnknownScene("harbor".into()));
        assert_eq!(err.exit_code(), 10);
        assert!(err.to_string().contains("harbor"));
    }

    #[test]
    fn io_helper_names_the_path() {
        let err = CliError::io(
            Path::new("frames"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.exit_code(), 11);
        assert!(err.to_string().starts_with("frames: "));
    }
}
