//! Digest backends and their per-state context storage
//!
//! Two backends exist for the lifetime of the process. The low-level backend
//! keeps native digest contexts inline in the state; the handle backend drives
//! opaque handles from a [`DigestProvider`](crate::handle::DigestProvider) and
//! is the only one used while certified mode is active.

mod handle;
mod low_level;
mod selector;

use super::HashAlgorithm;
use super::traits::HashBackend;
use crate::{HashError, Result};
use serde::{Deserialize, Serialize};

pub(crate) use handle::HandleDigest;
pub(crate) use low_level::LowLevelDigest;

static LOW_LEVEL_BACKEND: low_level::LowLevelBackend = low_level::LowLevelBackend;
static HANDLE_BACKEND: handle::HandleBackend = handle::HandleBackend;

/// Identifies one of the two process-wide backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Inline native contexts
    #[default]
    LowLevel,
    /// Opaque handles from the digest provider
    Handle,
}

impl BackendKind {
    /// Operation set for this backend
    pub(crate) fn ops(self) -> &'static dyn HashBackend {
        match self {
            BackendKind::LowLevel => &LOW_LEVEL_BACKEND,
            BackendKind::Handle => &HANDLE_BACKEND,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            BackendKind::LowLevel => "low_level",
            BackendKind::Handle => "handle",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Context storage of a hash state
///
/// Only the backend that produced a variant may interpret it.
#[derive(Debug, Default)]
pub(crate) enum DigestContext {
    #[default]
    Empty,
    LowLevel(LowLevelDigest),
    Handle(HandleDigest),
}

impl DigestContext {
    /// Backend that owns this storage, if any
    pub(crate) fn owner(&self) -> Option<BackendKind> {
        match self {
            DigestContext::Empty => None,
            DigestContext::LowLevel(_) => Some(BackendKind::LowLevel),
            DigestContext::Handle(_) => Some(BackendKind::Handle),
        }
    }

    /// Reason string used when a backend is handed storage it does not own
    pub(crate) fn mismatch(&self, expected: BackendKind) -> String {
        match self.owner() {
            Some(owner) => format!("context belongs to the {owner} backend, not {expected}"),
            None => format!("no {expected} context; init was not called under this backend"),
        }
    }
}

/// Reject output buffers that are not exactly the digest size
pub(crate) fn check_output_size(alg: HashAlgorithm, out: &[u8]) -> Result<()> {
    let expected = alg.digest_size();
    if out.len() != expected {
        return Err(HashError::size_mismatch(alg, expected, out.len()));
    }
    Ok(())
}
