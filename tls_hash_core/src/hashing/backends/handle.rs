//! Handle backend: digests computed through provider-owned handles

use super::{BackendKind, DigestContext, check_output_size};
use crate::handle::{DigestHandle, DigestProvider, HandleError, MessageDigest};
use crate::hashing::HashAlgorithm;
use crate::hashing::registry::MD5_DIGEST_LENGTH;
use crate::hashing::state::HashState;
use crate::hashing::traits::HashBackend;
use crate::{HashError, Result};

/// Primary handle, plus the secondary used for the MD5 half of the composite
///
/// Each slot is acquired independently so a failed acquisition leaves the
/// other one in place for release.
#[derive(Debug, Default)]
pub(crate) struct HandleDigest {
    primary: Option<Box<dyn DigestHandle>>,
    secondary: Option<Box<dyn DigestHandle>>,
}

impl HandleDigest {
    /// Number of handles currently held
    pub(crate) fn held(&self) -> usize {
        usize::from(self.primary.is_some()) + usize::from(self.secondary.is_some())
    }

    fn handles_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn DigestHandle>> {
        self.primary.iter_mut().chain(self.secondary.iter_mut())
    }
}

fn native(alg: HashAlgorithm) -> Option<MessageDigest> {
    match alg {
        HashAlgorithm::None | HashAlgorithm::MD5SHA1 => None,
        HashAlgorithm::MD5 => Some(MessageDigest::Md5),
        HashAlgorithm::SHA1 => Some(MessageDigest::Sha1),
        HashAlgorithm::SHA224 => Some(MessageDigest::Sha224),
        HashAlgorithm::SHA256 => Some(MessageDigest::Sha256),
        HashAlgorithm::SHA384 => Some(MessageDigest::Sha384),
        HashAlgorithm::SHA512 => Some(MessageDigest::Sha512),
    }
}

/// Log a handle-library failure and convert it to the operation's error
fn library_failure(
    fail: fn(HashAlgorithm, String) -> HashError,
    alg: HashAlgorithm,
) -> impl FnOnce(HandleError) -> HashError {
    move |err| {
        let error = fail(alg, err.to_string());
        log::warn!("Digest handle failure: {error}");
        error
    }
}

fn acquire(
    provider: &dyn DigestProvider,
    role: &str,
    allow_md5: bool,
) -> Result<Box<dyn DigestHandle>> {
    let Some(mut handle) = provider.new_handle() else {
        log::warn!(
            "Digest provider '{}' could not supply a {role} handle",
            provider.name()
        );
        return Err(HashError::alloc_failed(format!(
            "provider '{}' has no {role} digest handle available",
            provider.name()
        )));
    };
    if allow_md5 {
        handle.set_allow_md5_for_fips();
    }
    Ok(handle)
}

pub(crate) struct HandleBackend;

impl HandleBackend {
    /// Make sure the state holds handle storage with both handles acquired
    ///
    /// Storage left by the other backend is discarded. Slots that are already
    /// filled are kept.
    fn ensure_handles(state: &mut HashState) -> Result<&mut HandleDigest> {
        if !matches!(state.digest, DigestContext::Handle(_)) {
            if let Some(previous) = state.digest.owner() {
                log::debug!("Replacing {previous} context with digest handles");
            }
            state.digest = DigestContext::Handle(HandleDigest::default());
        }

        let allow_md5 = state.md5_allowed_for_fips;
        let provider = state.env.provider();
        let DigestContext::Handle(handles) = &mut state.digest else {
            return Err(HashError::alloc_failed("handle storage could not be installed"));
        };

        if handles.primary.is_none() {
            handles.primary = Some(acquire(provider.as_ref(), "primary", allow_md5)?);
        }
        if handles.secondary.is_none() {
            handles.secondary = Some(acquire(provider.as_ref(), "secondary", allow_md5)?);
        }
        log::trace!("Digest handles ready from provider '{}'", provider.name());
        Ok(handles)
    }

    /// Primary and secondary handles of an initialised state
    fn handles(
        state: &mut HashState,
        fail: fn(HashAlgorithm, String) -> HashError,
    ) -> Result<(&mut Box<dyn DigestHandle>, &mut Box<dyn DigestHandle>)> {
        let alg = state.alg;
        match &mut state.digest {
            DigestContext::Handle(HandleDigest {
                primary: Some(primary),
                secondary: Some(secondary),
            }) => Ok((primary, secondary)),
            DigestContext::Handle(_) => Err(fail(alg, "digest handles were not acquired".into())),
            other => Err(fail(alg, other.mismatch(BackendKind::Handle))),
        }
    }
}

impl HashBackend for HandleBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Handle
    }

    fn create(&self, state: &mut HashState) -> Result<()> {
        Self::ensure_handles(state).map(|_| ())
    }

    fn allow_md5_for_fips(&self, state: &mut HashState) -> Result<()> {
        state.md5_allowed_for_fips = true;
        if let DigestContext::Handle(handles) = &mut state.digest {
            for handle in handles.handles_mut() {
                handle.set_allow_md5_for_fips();
            }
        }
        Ok(())
    }

    fn init(&self, state: &mut HashState) -> Result<()> {
        let alg = state.alg;
        let handles = Self::ensure_handles(state)?;
        let fail = library_failure(HashError::init_failed, alg);
        let (Some(primary), Some(secondary)) = (&mut handles.primary, &mut handles.secondary)
        else {
            return Err(HashError::init_failed(alg, "digest handles were not acquired"));
        };

        match alg {
            HashAlgorithm::None => Ok(()),
            HashAlgorithm::MD5SHA1 => primary
                .init(MessageDigest::Sha1)
                .and_then(|()| secondary.init(MessageDigest::Md5))
                .map_err(fail),
            _ => match native(alg) {
                Some(md) => primary.init(md).map_err(fail),
                None => Err(HashError::init_failed(alg, "no native digest identifier")),
            },
        }
    }

    fn update(&self, state: &mut HashState, data: &[u8]) -> Result<()> {
        let alg = state.alg;
        if alg == HashAlgorithm::None {
            return Ok(());
        }
        let (primary, secondary) = Self::handles(state, HashError::update_failed)?;
        let fail = library_failure(HashError::update_failed, alg);

        primary.update(data).map_err(fail)?;
        if alg.is_composite() {
            secondary
                .update(data)
                .map_err(library_failure(HashError::update_failed, alg))?;
        }
        Ok(())
    }

    fn digest(&self, state: &mut HashState, out: &mut [u8]) -> Result<()> {
        let alg = state.alg;
        check_output_size(alg, out)?;
        if alg == HashAlgorithm::None {
            return Ok(());
        }
        let (primary, secondary) = Self::handles(state, HashError::digest_failed)?;

        if alg.is_composite() {
            let (md5_out, sha1_out) = out.split_at_mut(MD5_DIGEST_LENGTH);
            primary
                .finalize_into(sha1_out)
                .map_err(library_failure(HashError::digest_failed, alg))?;
            secondary
                .finalize_into(md5_out)
                .map_err(library_failure(HashError::digest_failed, alg))
        } else {
            primary
                .finalize_into(out)
                .map_err(library_failure(HashError::digest_failed, alg))
        }
    }

    fn copy(&self, to: &mut HashState, from: &HashState) -> Result<()> {
        let alg = from.alg;
        let DigestContext::Handle(source) = &from.digest else {
            return Err(HashError::copy_failed(
                alg,
                from.digest.mismatch(BackendKind::Handle),
            ));
        };
        let Some(source_primary) = source.primary.as_deref() else {
            return Err(HashError::copy_failed(alg, "source has no primary handle"));
        };
        let source_secondary = if alg.is_composite() {
            match source.secondary.as_deref() {
                Some(handle) => Some(handle),
                None => return Err(HashError::copy_failed(alg, "source has no secondary handle")),
            }
        } else {
            None
        };

        // `to` is only touched once every duplicate call has succeeded
        let allow_md5 = from.md5_allowed_for_fips;
        let provider = to.env.provider().as_ref();
        let mut staged = HandleDigest {
            primary: Some(acquire(provider, "primary", allow_md5)?),
            secondary: Some(acquire(provider, "secondary", allow_md5)?),
        };
        if let Some(primary) = staged.primary.as_mut() {
            primary
                .copy_from(source_primary)
                .map_err(library_failure(HashError::copy_failed, alg))?;
        }
        if let (Some(secondary), Some(source_secondary)) =
            (staged.secondary.as_mut(), source_secondary)
        {
            secondary
                .copy_from(source_secondary)
                .map_err(library_failure(HashError::copy_failed, alg))?;
        }
        if allow_md5 {
            for handle in staged.handles_mut() {
                handle.set_allow_md5_for_fips();
            }
        }

        if let Some(previous) = to.digest.owner().filter(|kind| *kind != self.kind()) {
            log::debug!("Replacing {previous} context with copied digest handles");
        }
        to.digest = DigestContext::Handle(staged);
        to.alg = alg;
        to.md5_allowed_for_fips = allow_md5;
        Ok(())
    }

    fn reset(&self, state: &mut HashState) -> Result<()> {
        let alg = state.alg;
        let reapply_md5_allowance = alg == HashAlgorithm::MD5 && state.md5_allowed_for_fips;

        if let DigestContext::Handle(handles) = &mut state.digest {
            if let Some(primary) = handles.primary.as_mut() {
                primary
                    .reset()
                    .map_err(library_failure(HashError::wipe_failed, alg))?;
            }
            if alg.is_composite()
                && let Some(secondary) = handles.secondary.as_mut()
            {
                secondary
                    .reset()
                    .map_err(library_failure(HashError::wipe_failed, alg))?;
            }
        }

        if reapply_md5_allowance {
            self.allow_md5_for_fips(state)?;
        }
        self.init(state)
    }

    fn release(&self, state: &mut HashState) -> Result<()> {
        if let DigestContext::Handle(handles) = &mut state.digest {
            let released = handles.held();
            *handles = HandleDigest::default();
            if released > 0 {
                log::debug!("Released {released} digest handle(s)");
            }
        }
        Ok(())
    }
}
