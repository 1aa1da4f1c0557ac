//! Hash-state abstraction for the TLS stack
//!
//! This module contains the algorithm registry, the availability policy, the
//! two digest backends and the [`HashState`] dispatcher that selects between
//! them on every mode-sensitive call.

use crate::{HashError, Result};
use serde::{Deserialize, Serialize};

mod backends;
mod policy;
mod registry;
mod state;
mod traits;

pub use backends::BackendKind;
pub use policy::{is_available, is_tag_available, permits};
pub use registry::{
    MAX_DIGEST_LENGTH, MD5_DIGEST_LENGTH, SHA1_DIGEST_LENGTH, SHA224_DIGEST_LENGTH,
    SHA256_DIGEST_LENGTH, SHA384_DIGEST_LENGTH, SHA512_DIGEST_LENGTH, digest_size, digest_size_of,
};
pub use state::{HashState, Phase};

/// Hash algorithms a TLS connection may ask for
///
/// The numeric tags of `None` through `SHA512` match the TLS 1.2
/// `HashAlgorithm` registry; `MD5SHA1` is the internal composite used by the
/// TLS 1.0/1.1 PRF and handshake signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// No digest; every operation is a successful no-op
    #[default]
    None,
    /// MD5
    MD5,
    /// SHA-1
    SHA1,
    /// SHA-224
    SHA224,
    /// SHA-256
    SHA256,
    /// SHA-384
    SHA384,
    /// SHA-512
    SHA512,
    /// MD5 and SHA-1 over the same input, output `MD5 || SHA1`
    #[serde(rename = "md5_sha1")]
    MD5SHA1,
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for HashAlgorithm {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(HashAlgorithm::None),
            "md5" => Ok(HashAlgorithm::MD5),
            "sha1" => Ok(HashAlgorithm::SHA1),
            "sha224" => Ok(HashAlgorithm::SHA224),
            "sha256" => Ok(HashAlgorithm::SHA256),
            "sha384" => Ok(HashAlgorithm::SHA384),
            "sha512" => Ok(HashAlgorithm::SHA512),
            "md5_sha1" => Ok(HashAlgorithm::MD5SHA1),
            _ => Err(HashError::invalid_algorithm(s, "unknown algorithm name")),
        }
    }
}

impl TryFrom<u8> for HashAlgorithm {
    type Error = HashError;

    fn try_from(tag: u8) -> Result<Self> {
        HashAlgorithm::ALL
            .into_iter()
            .find(|alg| alg.tag() == tag)
            .ok_or_else(|| HashError::invalid_algorithm(tag, "unknown algorithm tag"))
    }
}

impl From<HashAlgorithm> for u8 {
    fn from(alg: HashAlgorithm) -> Self {
        alg.tag()
    }
}
