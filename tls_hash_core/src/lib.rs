//! TLS Hash Core Library
//!
//! Hash-state abstraction used by the TLS stack for handshake transcripts,
//! the PRF and signatures. A [`HashState`] computes MD5, SHA-1, SHA-2 or the
//! MD5+SHA1 composite through one of two backends, chosen from the
//! certified-mode ("FIPS") predicate on every mode-sensitive call.

pub mod config;
pub mod environment;
pub mod error;
pub mod handle;
pub mod hashing;
pub mod mode;

// Re-export main types
pub use config::HashConfig;
pub use environment::HashEnvironment;
pub use error::{ErrorKind, HashError, Result};
pub use handle::{DigestHandle, DigestProvider, HandleError, MessageDigest, SoftwareProvider};
pub use hashing::{
    BackendKind, HashAlgorithm, HashState, MAX_DIGEST_LENGTH, Phase, digest_size, is_available,
};
pub use mode::{CertifiedMode, FixedMode, ModeSwitch, ProcessMode, is_certified_mode, set_certified_mode};
