use thiserror::Error;

pub type Result<T, E = RegistryError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown sensor type: {0}")]
    UnknownType(String),
}
