//! Algorithm availability under certified mode

use super::HashAlgorithm;
use crate::Result;

/// Whether `alg` may be used without an override
///
/// MD5 and the MD5+SHA1 composite are unavailable in certified mode; every
/// other algorithm, `None` included, is always available.
pub fn is_available(alg: HashAlgorithm, certified: bool) -> bool {
    !(certified && alg.uses_md5())
}

/// Availability for a raw algorithm tag
///
/// An unknown tag is an error, not "unavailable".
pub fn is_tag_available(tag: u8, certified: bool) -> Result<bool> {
    HashAlgorithm::try_from(tag).map(|alg| is_available(alg, certified))
}

/// Gate applied by `init` and `reset`: available, or plain MD5 with the
/// override set
///
/// The override exists for the TLS 1.0/1.1 PRF, which needs MD5 even in
/// certified mode. It never unlocks the MD5+SHA1 composite.
pub fn permits(alg: HashAlgorithm, certified: bool, md5_override: bool) -> bool {
    is_available(alg, certified) || (md5_override && alg == HashAlgorithm::MD5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_everything_available_outside_certified_mode() {
        for alg in HashAlgorithm::ALL {
            assert!(is_available(alg, false), "{alg} should be available");
        }
    }

    #[test]
    fn test_md5_family_unavailable_in_certified_mode() {
        assert!(!is_available(HashAlgorithm::MD5, true));
        assert!(!is_available(HashAlgorithm::MD5SHA1, true));

        for alg in [
            HashAlgorithm::None,
            HashAlgorithm::SHA1,
            HashAlgorithm::SHA224,
            HashAlgorithm::SHA256,
            HashAlgorithm::SHA384,
            HashAlgorithm::SHA512,
        ] {
            assert!(is_available(alg, true), "{alg} should be available");
        }
    }

    #[test]
    fn test_unknown_tag_is_invalid_not_unavailable() {
        let err = is_tag_available(200, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAlgorithm);
        assert!(!is_tag_available(1, true).unwrap());
        assert!(is_tag_available(4, true).unwrap());
    }

    #[test]
    fn test_override_permits_plain_md5_only() {
        assert!(!permits(HashAlgorithm::MD5, true, false));
        assert!(permits(HashAlgorithm::MD5, true, true));
        assert!(!permits(HashAlgorithm::MD5SHA1, true, false));
        assert!(!permits(HashAlgorithm::MD5SHA1, true, true));
        assert!(permits(HashAlgorithm::MD5SHA1, false, false));
        assert!(permits(HashAlgorithm::SHA256, true, false));
    }
}
