//! Opaque digest handles
//!
//! The generic backend never touches digest state directly. It drives handles
//! through this interface: acquire, initialise by identifier, update,
//! finalise, duplicate into another handle, reset in place, destroy (drop).
//! [`SoftwareProvider`] implements it on top of the RustCrypto digests; other
//! providers (a validated module, a test double) plug in through
//! [`DigestProvider`].

use std::any::Any;
use std::fmt;
use thiserror::Error;

mod software;

pub use software::{SoftwareHandle, SoftwareProvider};

/// Native digest identifiers understood by a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageDigest {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl MessageDigest {
    /// Output size in bytes
    pub const fn size(self) -> usize {
        match self {
            MessageDigest::Md5 => 16,
            MessageDigest::Sha1 => 20,
            MessageDigest::Sha224 => 28,
            MessageDigest::Sha256 => 32,
            MessageDigest::Sha384 => 48,
            MessageDigest::Sha512 => 64,
        }
    }
}

/// Failures reported by a digest handle
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandleError {
    /// Operation needs an initialised handle
    #[error("digest handle is not initialized")]
    Uninitialized,

    /// Handle was finalised and must be reset or re-initialised
    #[error("digest handle was already finalized")]
    Finalized,

    /// Output buffer does not match the digest size
    #[error("output buffer of {actual} bytes does not fit a {expected}-byte digest")]
    OutputSize { expected: usize, actual: usize },

    /// Source handle comes from a different provider
    #[error("cannot copy from an incompatible digest handle")]
    Incompatible,

    /// Provider-specific failure
    #[error("{0}")]
    Library(String),
}

/// One in-progress digest computation owned by a provider
///
/// Dropping the box destroys the handle.
pub trait DigestHandle: Send + fmt::Debug {
    /// Initialise (or re-initialise) for `md`, discarding prior input
    fn init(&mut self, md: MessageDigest) -> Result<(), HandleError>;

    /// Absorb `data`
    fn update(&mut self, data: &[u8]) -> Result<(), HandleError>;

    /// Write the digest into `out`, which must be exactly the digest size
    fn finalize_into(&mut self, out: &mut [u8]) -> Result<(), HandleError>;

    /// Make this handle an independent duplicate of `src`
    fn copy_from(&mut self, src: &dyn DigestHandle) -> Result<(), HandleError>;

    /// Return to the freshly acquired state, keeping the handle itself
    ///
    /// Clears flags, including the MD5 allowance.
    fn reset(&mut self) -> Result<(), HandleError>;

    /// Permit MD5 on this handle while certified mode is active
    fn set_allow_md5_for_fips(&mut self);

    /// Whether MD5 is permitted on this handle in certified mode
    fn is_md5_allowed_for_fips(&self) -> bool;

    /// Identifier this handle was last initialised with
    fn message_digest(&self) -> Option<MessageDigest>;

    /// Downcast support for [`DigestHandle::copy_from`]
    fn as_any(&self) -> &dyn Any;
}

/// Hands out digest handles
pub trait DigestProvider: Send + Sync + fmt::Debug {
    /// Acquire a fresh handle, or `None` when the library cannot provide one
    fn new_handle(&self) -> Option<Box<dyn DigestHandle>>;

    /// Short provider name for logging
    fn name(&self) -> &'static str;
}
