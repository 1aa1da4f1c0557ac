//! Error types for the TLS hash-state core
//!
//! Every public operation either succeeds or fails with exactly one
//! [`HashError`]. Failures are never retried or downgraded: digest routines are
//! deterministic, so an error means a caller contract violation, an exhausted
//! handle library, or an algorithm the current mode does not permit.

use crate::hashing::HashAlgorithm;
use thiserror::Error;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, HashError>;

/// Main error type for hash-state operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HashError {
    /// Unknown algorithm tag, or an algorithm the current mode forbids
    #[error("Invalid hash algorithm '{algorithm}': {reason}")]
    InvalidAlgorithm { algorithm: String, reason: String },

    /// Native context or handle initialisation failed
    #[error("Hash init failed for algorithm '{algorithm}': {reason}")]
    InitFailed {
        algorithm: HashAlgorithm,
        reason: String,
    },

    /// Feeding data into the digest failed
    #[error("Hash update failed for algorithm '{algorithm}': {reason}")]
    UpdateFailed {
        algorithm: HashAlgorithm,
        reason: String,
    },

    /// Finalising the digest failed
    #[error("Hash digest failed for algorithm '{algorithm}': {reason}")]
    DigestFailed {
        algorithm: HashAlgorithm,
        reason: String,
    },

    /// Duplicating a hash state failed
    #[error("Hash copy failed for algorithm '{algorithm}': {reason}")]
    CopyFailed {
        algorithm: HashAlgorithm,
        reason: String,
    },

    /// Resetting digest handles in place failed
    #[error("Hash wipe failed for algorithm '{algorithm}': {reason}")]
    WipeFailed {
        algorithm: HashAlgorithm,
        reason: String,
    },

    /// The handle library could not provide a digest handle
    #[error("Digest handle allocation failed: {reason}")]
    AllocFailed { reason: String },

    /// Caller-supplied output buffer does not match the digest size
    #[error(
        "Digest size mismatch for algorithm '{algorithm}': expected {expected} bytes, got {actual} bytes"
    )]
    SizeMismatch {
        algorithm: HashAlgorithm,
        expected: usize,
        actual: usize,
    },

    /// Configuration could not be loaded
    #[error("Invalid configuration: {message}")]
    Config { message: String },
}

/// Category of a [`HashError`], without the context fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidAlgorithm,
    InitFailed,
    UpdateFailed,
    DigestFailed,
    CopyFailed,
    WipeFailed,
    AllocFailed,
    SizeMismatch,
    Config,
}

impl HashError {
    /// Create an invalid algorithm error
    pub fn invalid_algorithm(algorithm: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        Self::InvalidAlgorithm {
            algorithm: algorithm.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an init failure
    pub fn init_failed(algorithm: HashAlgorithm, reason: impl Into<String>) -> Self {
        Self::InitFailed {
            algorithm,
            reason: reason.into(),
        }
    }

    /// Create an update failure
    pub fn update_failed(algorithm: HashAlgorithm, reason: impl Into<String>) -> Self {
        Self::UpdateFailed {
            algorithm,
            reason: reason.into(),
        }
    }

    /// Create a digest failure
    pub fn digest_failed(algorithm: HashAlgorithm, reason: impl Into<String>) -> Self {
        Self::DigestFailed {
            algorithm,
            reason: reason.into(),
        }
    }

    /// Create a copy failure
    pub fn copy_failed(algorithm: HashAlgorithm, reason: impl Into<String>) -> Self {
        Self::CopyFailed {
            algorithm,
            reason: reason.into(),
        }
    }

    /// Create a wipe failure
    pub fn wipe_failed(algorithm: HashAlgorithm, reason: impl Into<String>) -> Self {
        Self::WipeFailed {
            algorithm,
            reason: reason.into(),
        }
    }

    /// Create a handle allocation failure
    pub fn alloc_failed(reason: impl Into<String>) -> Self {
        Self::AllocFailed {
            reason: reason.into(),
        }
    }

    /// Create a digest size mismatch error
    pub fn size_mismatch(algorithm: HashAlgorithm, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            algorithm,
            expected,
            actual,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAlgorithm { .. } => ErrorKind::InvalidAlgorithm,
            Self::InitFailed { .. } => ErrorKind::InitFailed,
            Self::UpdateFailed { .. } => ErrorKind::UpdateFailed,
            Self::DigestFailed { .. } => ErrorKind::DigestFailed,
            Self::CopyFailed { .. } => ErrorKind::CopyFailed,
            Self::WipeFailed { .. } => ErrorKind::WipeFailed,
            Self::AllocFailed { .. } => ErrorKind::AllocFailed,
            Self::SizeMismatch { .. } => ErrorKind::SizeMismatch,
            Self::Config { .. } => ErrorKind::Config,
        }
    }
}

impl From<figment::Error> for HashError {
    fn from(err: figment::Error) -> Self {
        Self::config(err.to_string())
    }
}
