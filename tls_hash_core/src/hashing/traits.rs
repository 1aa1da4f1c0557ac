//! Backend operation set

use super::backends::BackendKind;
use super::state::HashState;
use crate::Result;

/// Operations every digest backend provides
///
/// Implementations are stateless; all per-computation data lives in the
/// [`HashState`] they are handed. Exactly one static instance of each
/// implementation exists, reached through [`BackendKind::ops`].
pub(crate) trait HashBackend: Send + Sync {
    /// Which backend this is
    fn kind(&self) -> BackendKind;

    /// Prepare storage for a freshly created or re-resolved state
    fn create(&self, state: &mut HashState) -> Result<()>;

    /// Record the MD5 override on the state and any live context
    fn allow_md5_for_fips(&self, state: &mut HashState) -> Result<()>;

    /// Start a new computation for `state.algorithm()`
    fn init(&self, state: &mut HashState) -> Result<()>;

    /// Absorb `data`
    fn update(&self, state: &mut HashState, data: &[u8]) -> Result<()>;

    /// Finalise into `out`, which must match the digest size exactly
    fn digest(&self, state: &mut HashState, out: &mut [u8]) -> Result<()>;

    /// Make `to` an independent duplicate of `from`
    fn copy(&self, to: &mut HashState, from: &HashState) -> Result<()>;

    /// Restart the computation for the same algorithm
    fn reset(&self, state: &mut HashState) -> Result<()>;

    /// Free external resources held by the state
    fn release(&self, state: &mut HashState) -> Result<()>;
}
