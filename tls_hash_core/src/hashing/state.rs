//! Public hash state and the dispatcher in front of the backends
//!
//! Mode-sensitive entry points (`create`, [`HashState::allow_md5_for_fips`],
//! [`HashState::init`], [`HashState::reset`], [`HashState::release`]) read the
//! certified-mode predicate once, select a backend and store it on the state.
//! [`HashState::update`], [`HashState::digest`] and [`HashState::copy_from`]
//! use the stored backend. A context produced by one backend is never handed
//! to the other: after a mode change the state has to be re-initialised or
//! reset, and using it without doing so fails with the operation's error.

use super::backends::{BackendKind, DigestContext};
use super::traits::HashBackend;
use super::{HashAlgorithm, policy};
use crate::environment::HashEnvironment;
use crate::mode::CertifiedMode;
use crate::{HashError, Result};
use std::fmt;

/// Lifecycle position of a [`HashState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Backend storage prepared, no algorithm selected yet
    Created,
    /// `init` or `reset` succeeded; no input yet
    Configured,
    /// At least one `update` since the last `init` or `reset`
    Active,
    /// `digest` produced output; `reset` or `init` is needed before reuse
    Finalized,
    /// Resources released; only `release` is still accepted
    Released,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Created => "created",
            Phase::Configured => "configured",
            Phase::Active => "active",
            Phase::Finalized => "finalized",
            Phase::Released => "released",
        };
        f.write_str(name)
    }
}

/// One in-progress digest computation
///
/// A state is owned by one computation at a time: it is `Send` but not
/// `Sync`, and every mutating operation takes `&mut self`. Dropping a state
/// releases any digest handles it holds.
#[derive(Debug)]
pub struct HashState {
    pub(crate) alg: HashAlgorithm,
    pub(crate) backend: BackendKind,
    pub(crate) digest: DigestContext,
    pub(crate) md5_allowed_for_fips: bool,
    pub(crate) phase: Phase,
    pub(crate) bytes_hashed: u64,
    pub(crate) env: HashEnvironment,
}

impl HashState {
    /// Create a state reading the process-wide mode, using software handles
    pub fn new() -> Result<Self> {
        Self::with_environment(HashEnvironment::default())
    }

    /// Create a state reading certified mode from `mode`
    pub fn with_mode(mode: impl CertifiedMode + 'static) -> Result<Self> {
        Self::with_environment(HashEnvironment::default().with_mode(mode))
    }

    /// Create a state with an explicit environment
    pub fn with_environment(env: HashEnvironment) -> Result<Self> {
        let mut state = Self {
            alg: HashAlgorithm::None,
            backend: BackendKind::default(),
            digest: DigestContext::Empty,
            md5_allowed_for_fips: false,
            phase: Phase::Created,
            bytes_hashed: 0,
            env,
        };
        let (_, backend) = state.resolve();
        backend.create(&mut state)?;
        log::debug!("Created hash state on the {} backend", state.backend);
        Ok(state)
    }

    /// Read the mode once and store the matching backend
    fn resolve(&mut self) -> (bool, &'static dyn HashBackend) {
        let certified = self.env.is_certified();
        let selected = BackendKind::select(certified);
        if selected != self.backend {
            log::debug!(
                "Hash state backend changed: {} -> {selected} (certified mode: {certified})",
                self.backend
            );
            self.backend = selected;
        }
        (certified, selected.ops())
    }

    /// Permit plain MD5 while certified mode is active
    ///
    /// Has to be called before [`HashState::init`]; an allowance set later
    /// is only honoured from the next `init` or `reset` on. The MD5+SHA1
    /// composite stays unavailable in certified mode either way.
    ///
    /// Outside certified mode the flag is only recorded, so it is already in
    /// place if the state later moves to the handle backend. s2n has no such
    /// operation on its low-level path and rejects the call there instead.
    pub fn allow_md5_for_fips(&mut self) -> Result<()> {
        if self.phase == Phase::Released {
            return Err(HashError::init_failed(self.alg, "hash state was released"));
        }
        let (_, backend) = self.resolve();
        if self.phase != Phase::Created {
            log::warn!(
                "MD5 allowance set on a {} state; it applies from the next init or reset",
                self.phase
            );
        }
        backend.allow_md5_for_fips(self)
    }

    /// Start a new computation for `alg`, discarding any previous input
    pub fn init(&mut self, alg: HashAlgorithm) -> Result<()> {
        if self.phase == Phase::Released {
            return Err(HashError::init_failed(alg, "hash state was released"));
        }
        let (certified, backend) = self.resolve();
        if !policy::permits(alg, certified, self.md5_allowed_for_fips) {
            return Err(HashError::invalid_algorithm(
                alg,
                "not available while certified mode is active",
            ));
        }

        self.alg = alg;
        self.bytes_hashed = 0;
        if let Err(error) = backend.init(self) {
            self.phase = Phase::Created;
            return Err(error);
        }
        self.phase = Phase::Configured;
        log::debug!("Initialized {alg} on the {} backend", self.backend);
        Ok(())
    }

    /// Absorb `data`
    pub fn update(&mut self, data: &[u8]) -> Result<()> {
        if !self.is_ready_for_input() {
            return Err(HashError::update_failed(
                self.alg,
                format!("hash state is {}", self.phase),
            ));
        }
        self.backend.ops().update(self, data)?;
        self.bytes_hashed += data.len() as u64;
        self.phase = Phase::Active;
        log::trace!("Hashed {} bytes with {}", data.len(), self.alg);
        Ok(())
    }

    /// Write the digest into `out`, which must be exactly
    /// [`digest_size`](crate::hashing::digest_size) bytes long
    pub fn digest(&mut self, out: &mut [u8]) -> Result<()> {
        if !self.is_ready_for_input() {
            return Err(HashError::digest_failed(
                self.alg,
                format!("hash state is {}", self.phase),
            ));
        }
        self.backend.ops().digest(self, out)?;
        self.phase = Phase::Finalized;
        Ok(())
    }

    /// Digest into a freshly allocated buffer
    pub fn finish(&mut self) -> Result<Vec<u8>> {
        let mut out = vec![0u8; self.alg.digest_size()];
        self.digest(&mut out)?;
        Ok(out)
    }

    /// Make this state an independent duplicate of `from`
    ///
    /// Both states continue separately afterwards; the copy keeps `from`'s
    /// algorithm, MD5 allowance, phase and byte count.
    pub fn copy_from(&mut self, from: &HashState) -> Result<()> {
        if self.phase == Phase::Released {
            return Err(HashError::copy_failed(
                from.alg,
                "destination hash state was released",
            ));
        }
        if !matches!(
            from.phase,
            Phase::Configured | Phase::Active | Phase::Finalized
        ) {
            return Err(HashError::copy_failed(
                from.alg,
                format!("source hash state is {}", from.phase),
            ));
        }

        from.backend.ops().copy(self, from)?;
        self.backend = from.backend;
        self.phase = from.phase;
        self.bytes_hashed = from.bytes_hashed;
        Ok(())
    }

    /// Create a new state in the same environment holding a copy of this one
    pub fn try_clone(&self) -> Result<HashState> {
        let mut copy = HashState::with_environment(self.env.clone())?;
        copy.copy_from(self)?;
        Ok(copy)
    }

    /// Restart the computation for the current algorithm
    ///
    /// The backend is re-selected first, so a reset after a mode change moves
    /// the state onto the backend for the new mode. The availability check
    /// from `init` is applied again.
    pub fn reset(&mut self) -> Result<()> {
        if self.phase == Phase::Released {
            return Err(HashError::wipe_failed(self.alg, "hash state was released"));
        }
        let (certified, backend) = self.resolve();
        if !policy::permits(self.alg, certified, self.md5_allowed_for_fips) {
            return Err(HashError::invalid_algorithm(
                self.alg,
                "not available while certified mode is active",
            ));
        }

        self.bytes_hashed = 0;
        if let Err(error) = backend.reset(self) {
            self.phase = Phase::Created;
            return Err(error);
        }
        self.phase = Phase::Configured;
        Ok(())
    }

    /// Free digest handles and other backend resources
    ///
    /// Safe to call more than once, and on a state whose handle acquisition
    /// only partly succeeded.
    pub fn release(&mut self) -> Result<()> {
        if self.phase == Phase::Released {
            return Ok(());
        }
        let (_, backend) = self.resolve();
        backend.release(self)?;
        self.digest = DigestContext::Empty;
        self.phase = Phase::Released;
        log::debug!("Released hash state ({})", self.alg);
        Ok(())
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.alg
    }

    /// Backend stored by the most recent mode-sensitive call
    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_md5_allowed_for_fips(&self) -> bool {
        self.md5_allowed_for_fips
    }

    /// Bytes absorbed since the last `init` or `reset`
    pub fn bytes_hashed(&self) -> u64 {
        self.bytes_hashed
    }

    /// Position within the current compression block
    ///
    /// Computed with a mask so the cost does not depend on the byte count.
    pub fn currently_in_block(&self) -> usize {
        let mask = self.alg.block_size() as u64 - 1;
        (self.bytes_hashed & mask) as usize
    }

    pub fn is_ready_for_input(&self) -> bool {
        matches!(self.phase, Phase::Configured | Phase::Active)
    }

    pub fn environment(&self) -> &HashEnvironment {
        &self.env
    }

    /// Number of digest handles the state currently holds
    #[doc(hidden)]
    pub fn held_handles(&self) -> usize {
        match &self.digest {
            DigestContext::Handle(handles) => handles.held(),
            _ => 0,
        }
    }
}

impl Drop for HashState {
    fn drop(&mut self) {
        if let Err(error) = self.release() {
            log::warn!("Failed to release hash state on drop: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::mode::{FixedMode, ModeSwitch};

    fn low_level_state() -> HashState {
        HashState::with_mode(FixedMode(false)).unwrap()
    }

    fn handle_state() -> HashState {
        HashState::with_mode(FixedMode(true)).unwrap()
    }

    #[test]
    fn test_backend_follows_mode_at_creation() {
        assert_eq!(low_level_state().backend(), BackendKind::LowLevel);
        assert_eq!(handle_state().backend(), BackendKind::Handle);
        assert_eq!(handle_state().held_handles(), 2);
        assert_eq!(low_level_state().held_handles(), 0);
    }

    #[test]
    fn test_phase_transitions() {
        let mut state = low_level_state();
        assert_eq!(state.phase(), Phase::Created);
        assert!(!state.is_ready_for_input());

        state.init(HashAlgorithm::SHA256).unwrap();
        assert_eq!(state.phase(), Phase::Configured);

        state.update(b"abc").unwrap();
        assert_eq!(state.phase(), Phase::Active);

        state.finish().unwrap();
        assert_eq!(state.phase(), Phase::Finalized);

        state.reset().unwrap();
        assert_eq!(state.phase(), Phase::Configured);

        state.release().unwrap();
        assert_eq!(state.phase(), Phase::Released);
    }

    #[test]
    fn test_update_before_init_fails() {
        let mut state = low_level_state();
        let err = state.update(b"abc").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UpdateFailed);
        assert!(err.to_string().contains("created"));
    }

    #[test]
    fn test_digest_after_finalize_fails() {
        let mut state = handle_state();
        state.init(HashAlgorithm::SHA1).unwrap();
        state.finish().unwrap();

        let err = state.finish().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DigestFailed);
        assert_eq!(state.update(b"x").unwrap_err().kind(), ErrorKind::UpdateFailed);
    }

    #[test]
    fn test_operations_after_release() {
        let mut state = low_level_state();
        state.init(HashAlgorithm::SHA1).unwrap();
        state.release().unwrap();
        state.release().unwrap();

        assert_eq!(
            state.init(HashAlgorithm::SHA1).unwrap_err().kind(),
            ErrorKind::InitFailed
        );
        assert_eq!(state.update(b"x").unwrap_err().kind(), ErrorKind::UpdateFailed);
        assert_eq!(state.finish().unwrap_err().kind(), ErrorKind::DigestFailed);
        assert_eq!(state.reset().unwrap_err().kind(), ErrorKind::WipeFailed);
    }

    #[test]
    fn test_byte_counter_and_block_position() {
        let mut state = low_level_state();
        state.init(HashAlgorithm::SHA512).unwrap();
        state.update(&[0u8; 100]).unwrap();
        state.update(&[0u8; 100]).unwrap();

        assert_eq!(state.bytes_hashed(), 200);
        assert_eq!(state.currently_in_block(), 72);

        state.reset().unwrap();
        assert_eq!(state.bytes_hashed(), 0);
        assert_eq!(state.currently_in_block(), 0);

        state.init(HashAlgorithm::SHA1).unwrap();
        state.update(&[0u8; 70]).unwrap();
        assert_eq!(state.currently_in_block(), 6);
    }

    #[test]
    fn test_init_rejects_md5_in_certified_mode() {
        let mut state = handle_state();
        let err = state.init(HashAlgorithm::MD5).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAlgorithm);
        assert_eq!(state.phase(), Phase::Created);
        assert_eq!(state.algorithm(), HashAlgorithm::None);
    }

    #[test]
    fn test_allowance_permits_md5_in_certified_mode() {
        let mut state = handle_state();
        state.allow_md5_for_fips().unwrap();
        assert!(state.is_md5_allowed_for_fips());

        state.init(HashAlgorithm::MD5).unwrap();
        state.update(b"abc").unwrap();
        assert_eq!(
            state.finish().unwrap(),
            [
                0x90, 0x01, 0x50, 0x98, 0x3c, 0xd2, 0x4f, 0xb0, 0xd6, 0x96, 0x3f, 0x7d, 0x28,
                0xe1, 0x7f, 0x72
            ]
        );
    }

    #[test]
    fn test_allowance_recorded_outside_certified_mode() {
        let switch = ModeSwitch::new(false);
        let mut state = HashState::with_mode(switch.clone()).unwrap();
        state.allow_md5_for_fips().unwrap();
        assert!(state.is_md5_allowed_for_fips());
        assert_eq!(state.backend(), BackendKind::LowLevel);

        switch.set(true);
        state.init(HashAlgorithm::MD5).unwrap();
        assert_eq!(state.backend(), BackendKind::Handle);
    }

    #[test]
    fn test_copy_from_requires_initialized_source() {
        let source = low_level_state();
        let mut target = low_level_state();
        let err = target.copy_from(&source).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CopyFailed);
    }

    #[test]
    fn test_copy_carries_phase_and_counter() {
        let mut source = handle_state();
        source.init(HashAlgorithm::SHA224).unwrap();
        source.update(b"abc").unwrap();

        let copy = source.try_clone().unwrap();
        assert_eq!(copy.phase(), Phase::Active);
        assert_eq!(copy.bytes_hashed(), 3);
        assert_eq!(copy.algorithm(), HashAlgorithm::SHA224);
        assert_eq!(copy.backend(), BackendKind::Handle);
    }

    #[test]
    fn test_reset_moves_state_after_mode_change() {
        let switch = ModeSwitch::new(false);
        let mut state = HashState::with_mode(switch.clone()).unwrap();
        state.init(HashAlgorithm::SHA256).unwrap();
        state.update(b"stale").unwrap();

        switch.set(true);
        state.reset().unwrap();
        assert_eq!(state.backend(), BackendKind::Handle);
        assert_eq!(state.held_handles(), 2);

        switch.set(false);
        state.reset().unwrap();
        assert_eq!(state.backend(), BackendKind::LowLevel);
        assert_eq!(state.held_handles(), 0);
    }

    #[test]
    fn test_release_drops_handles() {
        let mut state = handle_state();
        state.init(HashAlgorithm::SHA1).unwrap();
        assert_eq!(state.held_handles(), 2);

        state.release().unwrap();
        assert_eq!(state.held_handles(), 0);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Created.to_string(), "created");
        assert_eq!(Phase::Finalized.to_string(), "finalized");
    }

    #[test]
    fn test_state_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<HashState>();
    }
}
