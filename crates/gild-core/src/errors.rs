use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatchConfigError {
    #[error("connection-secret must be set to true when using connection-secret-name or connection-secret-namespace")]
    ConnectionSecretUnset,
}
