use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Secure storage unavailable: {0}")]
    SecureStorageUnavailable(String),

    #[error("Credential serialization failed: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;
