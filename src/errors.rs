use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in Durin.
#[derive(Debug, Error)]
pub enum DurinError {
    // --- Locking ---
    #[error("Store at {0} is locked by another process")]
    LockHeld(PathBuf),

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Deliberately carries no detail: a wrong password and a corrupted
    /// file must look the same to the caller.
    #[error("Authentication failed — wrong password or corrupted data")]
    AuthenticationFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Store errors ---
    #[error("Invalid store format: {0}")]
    InvalidFormat(String),

    #[error("Record '{0}' not found")]
    RecordNotFound(String),

    #[error("Invalid record name: {0}")]
    InvalidName(String),

    // --- Config errors ---
    #[error("Config error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,
}

impl DurinError {
    /// Build a closure that attaches `path` to an `io::Error`.
    ///
    /// Meant for `map_err`: `fs::read(&p).map_err(DurinError::io(&p))?`.
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

/// Convenience type alias for Durin results.
pub type Result<T> = std::result::Result<T, DurinError>;
