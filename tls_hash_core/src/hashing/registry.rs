//! Fixed per-algorithm properties: digest sizes, block sizes and numeric tags

use super::HashAlgorithm;
use crate::Result;

pub const MD5_DIGEST_LENGTH: usize = 16;
pub const SHA1_DIGEST_LENGTH: usize = 20;
pub const SHA224_DIGEST_LENGTH: usize = 28;
pub const SHA256_DIGEST_LENGTH: usize = 32;
pub const SHA384_DIGEST_LENGTH: usize = 48;
pub const SHA512_DIGEST_LENGTH: usize = 64;

/// Largest output any supported algorithm produces
pub const MAX_DIGEST_LENGTH: usize = SHA512_DIGEST_LENGTH;

impl HashAlgorithm {
    /// Every algorithm, in tag order
    pub const ALL: [HashAlgorithm; 8] = [
        HashAlgorithm::None,
        HashAlgorithm::MD5,
        HashAlgorithm::SHA1,
        HashAlgorithm::SHA224,
        HashAlgorithm::SHA256,
        HashAlgorithm::SHA384,
        HashAlgorithm::SHA512,
        HashAlgorithm::MD5SHA1,
    ];

    /// Lowercase identifier used for display and parsing
    pub const fn name(self) -> &'static str {
        match self {
            HashAlgorithm::None => "none",
            HashAlgorithm::MD5 => "md5",
            HashAlgorithm::SHA1 => "sha1",
            HashAlgorithm::SHA224 => "sha224",
            HashAlgorithm::SHA256 => "sha256",
            HashAlgorithm::SHA384 => "sha384",
            HashAlgorithm::SHA512 => "sha512",
            HashAlgorithm::MD5SHA1 => "md5_sha1",
        }
    }

    /// Numeric tag of this algorithm
    pub const fn tag(self) -> u8 {
        match self {
            HashAlgorithm::None => 0,
            HashAlgorithm::MD5 => 1,
            HashAlgorithm::SHA1 => 2,
            HashAlgorithm::SHA224 => 3,
            HashAlgorithm::SHA256 => 4,
            HashAlgorithm::SHA384 => 5,
            HashAlgorithm::SHA512 => 6,
            HashAlgorithm::MD5SHA1 => 7,
        }
    }

    /// Output size in bytes
    pub const fn digest_size(self) -> usize {
        match self {
            HashAlgorithm::None => 0,
            HashAlgorithm::MD5 => MD5_DIGEST_LENGTH,
            HashAlgorithm::SHA1 => SHA1_DIGEST_LENGTH,
            HashAlgorithm::SHA224 => SHA224_DIGEST_LENGTH,
            HashAlgorithm::SHA256 => SHA256_DIGEST_LENGTH,
            HashAlgorithm::SHA384 => SHA384_DIGEST_LENGTH,
            HashAlgorithm::SHA512 => SHA512_DIGEST_LENGTH,
            HashAlgorithm::MD5SHA1 => MD5_DIGEST_LENGTH + SHA1_DIGEST_LENGTH,
        }
    }

    /// Compression-function block size in bytes (always a power of two)
    pub const fn block_size(self) -> usize {
        match self {
            HashAlgorithm::SHA384 | HashAlgorithm::SHA512 => 128,
            _ => 64,
        }
    }

    /// Whether this is the two-digest MD5+SHA1 composite
    pub const fn is_composite(self) -> bool {
        matches!(self, HashAlgorithm::MD5SHA1)
    }

    /// Whether computing this algorithm involves MD5
    pub const fn uses_md5(self) -> bool {
        matches!(self, HashAlgorithm::MD5 | HashAlgorithm::MD5SHA1)
    }
}

/// Digest size of an algorithm
pub fn digest_size(alg: HashAlgorithm) -> usize {
    alg.digest_size()
}

/// Digest size for a raw algorithm tag
///
/// Unknown tags are an error rather than a default size.
pub fn digest_size_of(tag: u8) -> Result<usize> {
    HashAlgorithm::try_from(tag).map(HashAlgorithm::digest_size)
}
