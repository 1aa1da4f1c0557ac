//! Software digest handles backed by the RustCrypto hashes

use super::{DigestHandle, DigestProvider, HandleError, MessageDigest};
use digest::{Digest, FixedOutputReset};
use md5::Md5;
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};
use std::any::Any;
use std::fmt;

/// Object-safe view of a RustCrypto digest
trait NativeDigest: Send {
    fn absorb(&mut self, data: &[u8]);
    fn finalize_into_reset(&mut self, out: &mut [u8]);
    fn box_clone(&self) -> Box<dyn NativeDigest>;
}

impl<D> NativeDigest for D
where
    D: Digest + FixedOutputReset + Clone + Send + 'static,
{
    fn absorb(&mut self, data: &[u8]) {
        Digest::update(self, data);
    }

    fn finalize_into_reset(&mut self, out: &mut [u8]) {
        out.copy_from_slice(&Digest::finalize_reset(self));
    }

    fn box_clone(&self) -> Box<dyn NativeDigest> {
        Box::new(self.clone())
    }
}

fn new_native(md: MessageDigest) -> Box<dyn NativeDigest> {
    match md {
        MessageDigest::Md5 => Box::new(Md5::new()),
        MessageDigest::Sha1 => Box::new(Sha1::new()),
        MessageDigest::Sha224 => Box::new(Sha224::new()),
        MessageDigest::Sha256 => Box::new(Sha256::new()),
        MessageDigest::Sha384 => Box::new(Sha384::new()),
        MessageDigest::Sha512 => Box::new(Sha512::new()),
    }
}

/// Heap-allocated digest handle
#[derive(Default)]
pub struct SoftwareHandle {
    md: Option<MessageDigest>,
    ctx: Option<Box<dyn NativeDigest>>,
    finalized: bool,
    allow_md5_for_fips: bool,
}

impl fmt::Debug for SoftwareHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoftwareHandle")
            .field("md", &self.md)
            .field("finalized", &self.finalized)
            .field("allow_md5_for_fips", &self.allow_md5_for_fips)
            .finish()
    }
}

impl DigestHandle for SoftwareHandle {
    fn init(&mut self, md: MessageDigest) -> Result<(), HandleError> {
        self.md = Some(md);
        self.ctx = Some(new_native(md));
        self.finalized = false;
        Ok(())
    }

    fn update(&mut self, data: &[u8]) -> Result<(), HandleError> {
        if self.finalized {
            return Err(HandleError::Finalized);
        }
        let ctx = self.ctx.as_mut().ok_or(HandleError::Uninitialized)?;
        ctx.absorb(data);
        Ok(())
    }

    fn finalize_into(&mut self, out: &mut [u8]) -> Result<(), HandleError> {
        if self.finalized {
            return Err(HandleError::Finalized);
        }
        let (Some(md), Some(ctx)) = (self.md, self.ctx.as_mut()) else {
            return Err(HandleError::Uninitialized);
        };
        if out.len() != md.size() {
            return Err(HandleError::OutputSize {
                expected: md.size(),
                actual: out.len(),
            });
        }
        ctx.finalize_into_reset(out);
        self.finalized = true;
        Ok(())
    }

    fn copy_from(&mut self, src: &dyn DigestHandle) -> Result<(), HandleError> {
        let src = src
            .as_any()
            .downcast_ref::<SoftwareHandle>()
            .ok_or(HandleError::Incompatible)?;
        self.md = src.md;
        self.ctx = src.ctx.as_ref().map(|ctx| ctx.box_clone());
        self.finalized = src.finalized;
        self.allow_md5_for_fips = src.allow_md5_for_fips;
        Ok(())
    }

    fn reset(&mut self) -> Result<(), HandleError> {
        *self = Self::default();
        Ok(())
    }

    fn set_allow_md5_for_fips(&mut self) {
        self.allow_md5_for_fips = true;
    }

    fn is_md5_allowed_for_fips(&self) -> bool {
        self.allow_md5_for_fips
    }

    fn message_digest(&self) -> Option<MessageDigest> {
        self.md
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Provider of [`SoftwareHandle`]s; never runs out
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareProvider;

impl DigestProvider for SoftwareProvider {
    fn new_handle(&self) -> Option<Box<dyn DigestHandle>> {
        Some(Box::new(SoftwareHandle::default()))
    }

    fn name(&self) -> &'static str {
        "software"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finalize(handle: &mut dyn DigestHandle, md: MessageDigest) -> Vec<u8> {
        let mut out = vec![0u8; md.size()];
        handle.finalize_into(&mut out).unwrap();
        out
    }

    #[test]
    fn test_known_vector() {
        let mut handle = SoftwareHandle::default();
        handle.init(MessageDigest::Sha1).unwrap();
        handle.update(b"abc").unwrap();

        let out = finalize(&mut handle, MessageDigest::Sha1);
        assert_eq!(
            hex::encode(out),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn test_uninitialized_handle_rejects_input() {
        let mut handle = SoftwareHandle::default();
        assert_eq!(handle.update(b"x"), Err(HandleError::Uninitialized));

        let mut out = [0u8; 16];
        assert_eq!(
            handle.finalize_into(&mut out),
            Err(HandleError::Uninitialized)
        );
    }

    #[test]
    fn test_finalized_handle_needs_reinit() {
        let mut handle = SoftwareHandle::default();
        handle.init(MessageDigest::Md5).unwrap();
        finalize(&mut handle, MessageDigest::Md5);

        assert_eq!(handle.update(b"more"), Err(HandleError::Finalized));

        handle.init(MessageDigest::Md5).unwrap();
        assert!(handle.update(b"more").is_ok());
    }

    #[test]
    fn test_output_size_checked() {
        let mut handle = SoftwareHandle::default();
        handle.init(MessageDigest::Sha256).unwrap();

        let mut out = [0u8; 31];
        assert_eq!(
            handle.finalize_into(&mut out),
            Err(HandleError::OutputSize {
                expected: 32,
                actual: 31
            })
        );
    }

    #[test]
    fn test_copy_is_independent() {
        let mut original = SoftwareHandle::default();
        original.init(MessageDigest::Sha256).unwrap();
        original.update(b"ab").unwrap();

        let mut copy = SoftwareHandle::default();
        copy.copy_from(&original).unwrap();

        original.update(b"c").unwrap();
        copy.update(b"c").unwrap();
        copy.update(b"d").unwrap();

        let a = finalize(&mut original, MessageDigest::Sha256);
        let b = finalize(&mut copy, MessageDigest::Sha256);
        assert_eq!(
            hex::encode(a),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            hex::encode(b),
            "88d4266fd4e6338d13b845fcf289579d209c897823b9217da3e161936f031589"
        );
    }

    #[test]
    fn test_reset_clears_flags_and_state() {
        let mut handle = SoftwareHandle::default();
        handle.set_allow_md5_for_fips();
        handle.init(MessageDigest::Md5).unwrap();
        assert!(handle.is_md5_allowed_for_fips());

        handle.reset().unwrap();
        assert!(!handle.is_md5_allowed_for_fips());
        assert_eq!(handle.message_digest(), None);
        assert_eq!(handle.update(b"x"), Err(HandleError::Uninitialized));
    }

    #[test]
    fn test_provider_hands_out_fresh_handles() {
        let provider = SoftwareProvider;
        let handle = provider.new_handle().unwrap();
        assert_eq!(handle.message_digest(), None);
        assert_eq!(provider.name(), "software");
    }
}
