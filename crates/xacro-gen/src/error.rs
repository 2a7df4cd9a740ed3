use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = CompileError> = core::result::Result<T, E>;

/// Failure modes of a compilation run. Every variant is fatal: a single
/// malformed sensor aborts the whole run rather than silently dropping the
/// sensor from the generated model.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),
    #[error("failed to parse {path}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },
    #[error("sensor '{sensor}' has unknown type '{kind}'")]
    UnknownSensorType { sensor: String, kind: String },
    #[error("sensor '{sensor}' is missing required parameter '{param}'")]
    MissingRequiredParameter { sensor: String, param: String },
    #[error("template not found: {0}")]
    TemplateNotFound(String),
    #[error("duplicate sensor name: {0}")]
    DuplicateSensorName(String),
    #[error("I/O error: {0}")]
    Io(String),
}
