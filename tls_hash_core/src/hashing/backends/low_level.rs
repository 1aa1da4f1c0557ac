//! Low-level backend: native digest contexts stored inline in the state

use super::{BackendKind, DigestContext, check_output_size};
use crate::hashing::HashAlgorithm;
use crate::hashing::registry::MD5_DIGEST_LENGTH;
use crate::hashing::state::HashState;
use crate::hashing::traits::HashBackend;
use crate::{HashError, Result};
use digest::{Digest, FixedOutputReset};
use md5::Md5;
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};
use std::fmt;

/// One native context per algorithm; the composite keeps both halves
#[derive(Clone)]
pub(crate) enum LowLevelDigest {
    None,
    Md5(Md5),
    Sha1(Sha1),
    Sha224(Sha224),
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
    Md5Sha1 { sha1: Sha1, md5: Md5 },
}

impl fmt::Debug for LowLevelDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LowLevelDigest")
            .field(&self.algorithm())
            .finish()
    }
}

fn finish_into<D: Digest + FixedOutputReset>(ctx: &mut D, out: &mut [u8]) {
    out.copy_from_slice(&Digest::finalize_reset(ctx));
}

impl LowLevelDigest {
    pub(crate) fn new(alg: HashAlgorithm) -> Self {
        match alg {
            HashAlgorithm::None => LowLevelDigest::None,
            HashAlgorithm::MD5 => LowLevelDigest::Md5(Md5::new()),
            HashAlgorithm::SHA1 => LowLevelDigest::Sha1(Sha1::new()),
            HashAlgorithm::SHA224 => LowLevelDigest::Sha224(Sha224::new()),
            HashAlgorithm::SHA256 => LowLevelDigest::Sha256(Sha256::new()),
            HashAlgorithm::SHA384 => LowLevelDigest::Sha384(Sha384::new()),
            HashAlgorithm::SHA512 => LowLevelDigest::Sha512(Sha512::new()),
            HashAlgorithm::MD5SHA1 => LowLevelDigest::Md5Sha1 {
                sha1: Sha1::new(),
                md5: Md5::new(),
            },
        }
    }

    pub(crate) fn algorithm(&self) -> HashAlgorithm {
        match self {
            LowLevelDigest::None => HashAlgorithm::None,
            LowLevelDigest::Md5(_) => HashAlgorithm::MD5,
            LowLevelDigest::Sha1(_) => HashAlgorithm::SHA1,
            LowLevelDigest::Sha224(_) => HashAlgorithm::SHA224,
            LowLevelDigest::Sha256(_) => HashAlgorithm::SHA256,
            LowLevelDigest::Sha384(_) => HashAlgorithm::SHA384,
            LowLevelDigest::Sha512(_) => HashAlgorithm::SHA512,
            LowLevelDigest::Md5Sha1 { .. } => HashAlgorithm::MD5SHA1,
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            LowLevelDigest::None => {}
            LowLevelDigest::Md5(ctx) => Digest::update(ctx, data),
            LowLevelDigest::Sha1(ctx) => Digest::update(ctx, data),
            LowLevelDigest::Sha224(ctx) => Digest::update(ctx, data),
            LowLevelDigest::Sha256(ctx) => Digest::update(ctx, data),
            LowLevelDigest::Sha384(ctx) => Digest::update(ctx, data),
            LowLevelDigest::Sha512(ctx) => Digest::update(ctx, data),
            LowLevelDigest::Md5Sha1 { sha1, md5 } => {
                Digest::update(sha1, data);
                Digest::update(md5, data);
            }
        }
    }

    /// `out` must already be checked against the digest size
    fn finalize_into(&mut self, out: &mut [u8]) {
        match self {
            LowLevelDigest::None => {}
            LowLevelDigest::Md5(ctx) => finish_into(ctx, out),
            LowLevelDigest::Sha1(ctx) => finish_into(ctx, out),
            LowLevelDigest::Sha224(ctx) => finish_into(ctx, out),
            LowLevelDigest::Sha256(ctx) => finish_into(ctx, out),
            LowLevelDigest::Sha384(ctx) => finish_into(ctx, out),
            LowLevelDigest::Sha512(ctx) => finish_into(ctx, out),
            LowLevelDigest::Md5Sha1 { sha1, md5 } => {
                let (md5_out, sha1_out) = out.split_at_mut(MD5_DIGEST_LENGTH);
                finish_into(md5, md5_out);
                finish_into(sha1, sha1_out);
            }
        }
    }
}

/// Backend that owns no external resources
pub(crate) struct LowLevelBackend;

impl LowLevelBackend {
    fn context<'a>(
        state: &'a mut HashState,
        fail: fn(HashAlgorithm, String) -> HashError,
    ) -> Result<&'a mut LowLevelDigest> {
        let alg = state.alg;
        match &state.digest {
            DigestContext::LowLevel(ctx) if ctx.algorithm() == alg => {}
            DigestContext::LowLevel(ctx) => {
                return Err(fail(
                    alg,
                    format!("context was initialized for {}", ctx.algorithm()),
                ));
            }
            other => return Err(fail(alg, other.mismatch(BackendKind::LowLevel))),
        }
        match &mut state.digest {
            DigestContext::LowLevel(ctx) => Ok(ctx),
            other => Err(fail(alg, other.mismatch(BackendKind::LowLevel))),
        }
    }
}

impl HashBackend for LowLevelBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::LowLevel
    }

    fn create(&self, _state: &mut HashState) -> Result<()> {
        Ok(())
    }

    fn allow_md5_for_fips(&self, state: &mut HashState) -> Result<()> {
        state.md5_allowed_for_fips = true;
        Ok(())
    }

    fn init(&self, state: &mut HashState) -> Result<()> {
        if let Some(previous) = state.digest.owner().filter(|kind| *kind != self.kind()) {
            log::debug!(
                "Replacing {previous} context with inline {} context",
                state.alg
            );
        }
        state.digest = DigestContext::LowLevel(LowLevelDigest::new(state.alg));
        Ok(())
    }

    fn update(&self, state: &mut HashState, data: &[u8]) -> Result<()> {
        Self::context(state, |alg, reason| HashError::update_failed(alg, reason))?.update(data);
        Ok(())
    }

    fn digest(&self, state: &mut HashState, out: &mut [u8]) -> Result<()> {
        check_output_size(state.alg, out)?;
        Self::context(state, |alg, reason| HashError::digest_failed(alg, reason))?
            .finalize_into(out);
        Ok(())
    }

    fn copy(&self, to: &mut HashState, from: &HashState) -> Result<()> {
        let DigestContext::LowLevel(ctx) = &from.digest else {
            return Err(HashError::copy_failed(
                from.alg,
                from.digest.mismatch(BackendKind::LowLevel),
            ));
        };
        to.digest = DigestContext::LowLevel(ctx.clone());
        to.alg = from.alg;
        to.md5_allowed_for_fips = from.md5_allowed_for_fips;
        Ok(())
    }

    fn reset(&self, state: &mut HashState) -> Result<()> {
        self.init(state)
    }

    fn release(&self, _state: &mut HashState) -> Result<()> {
        Ok(())
    }
}
