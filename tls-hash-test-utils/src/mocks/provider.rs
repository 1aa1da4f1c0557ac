//! Fault-injecting digest provider

use std::any::Any;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tls_hash_core::handle::SoftwareHandle;
use tls_hash_core::{DigestHandle, DigestProvider, HandleError, MessageDigest};

/// Handle operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleOp {
    Init,
    Update,
    Finalize,
    Copy,
    Reset,
}

/// Shared bookkeeping between a provider and the handles it hands out
#[derive(Debug, Default)]
struct MockBehavior {
    alloc_limit: Option<usize>,
    failing: HashSet<HandleOp>,
    acquired: usize,
    live: usize,
    md5_allowed: usize,
}

/// Digest provider for testing
///
/// Hands out software-backed handles while counting how many are alive, and
/// can refuse allocations or fail individual handle operations on demand.
/// Clones share the same counters and fault configuration.
///
/// # Examples
///
/// ```rust
/// use tls_hash_core::{FixedMode, HashAlgorithm, HashEnvironment, HashState};
/// use tls_hash_test_utils::{HandleOp, MockProvider};
///
/// let provider = MockProvider::new();
/// let env = HashEnvironment::default()
///     .with_mode(FixedMode(true))
///     .with_provider(provider.clone());
///
/// let mut state = HashState::with_environment(env).unwrap();
/// assert_eq!(provider.live_handles(), 2);
///
/// provider.fail_on(HandleOp::Init);
/// assert!(state.init(HashAlgorithm::SHA256).is_err());
///
/// drop(state);
/// assert_eq!(provider.live_handles(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    behavior: Arc<Mutex<MockBehavior>>,
}

impl MockProvider {
    /// Create a provider with no limits and no faults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider that hands out at most `limit` handles in total
    pub fn with_alloc_limit(limit: usize) -> Self {
        let provider = Self::new();
        provider.set_alloc_limit(Some(limit));
        provider
    }

    /// Change the total allocation limit
    pub fn set_alloc_limit(&self, limit: Option<usize>) {
        self.behavior.lock().unwrap().alloc_limit = limit;
    }

    /// Make every handle from this provider fail `op`
    pub fn fail_on(&self, op: HandleOp) {
        self.behavior.lock().unwrap().failing.insert(op);
    }

    /// Remove all injected faults
    pub fn clear_faults(&self) {
        self.behavior.lock().unwrap().failing.clear();
    }

    /// Handles currently alive
    pub fn live_handles(&self) -> usize {
        self.behavior.lock().unwrap().live
    }

    /// Handles handed out since creation
    pub fn acquired_handles(&self) -> usize {
        self.behavior.lock().unwrap().acquired
    }

    /// Live handles that currently carry the MD5 allowance
    pub fn md5_allowed_handles(&self) -> usize {
        self.behavior.lock().unwrap().md5_allowed
    }
}

impl DigestProvider for MockProvider {
    fn new_handle(&self) -> Option<Box<dyn DigestHandle>> {
        let mut behavior = self.behavior.lock().unwrap();
        if behavior
            .alloc_limit
            .is_some_and(|limit| behavior.acquired >= limit)
        {
            return None;
        }
        behavior.acquired += 1;
        behavior.live += 1;

        Some(Box::new(MockHandle {
            inner: SoftwareHandle::default(),
            behavior: Arc::clone(&self.behavior),
        }))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Handle produced by [`MockProvider`]
#[derive(Debug)]
pub struct MockHandle {
    inner: SoftwareHandle,
    behavior: Arc<Mutex<MockBehavior>>,
}

impl MockHandle {
    fn check(&self, op: HandleOp) -> Result<(), HandleError> {
        if self.behavior.lock().unwrap().failing.contains(&op) {
            return Err(HandleError::Library(format!("injected {op:?} failure")));
        }
        Ok(())
    }

    /// Run `op` on the inner handle, keeping the allowance count in step
    fn tracked<R>(&mut self, op: impl FnOnce(&mut SoftwareHandle) -> R) -> R {
        let before = self.inner.is_md5_allowed_for_fips();
        let result = op(&mut self.inner);
        let after = self.inner.is_md5_allowed_for_fips();
        if before != after {
            let mut behavior = self.behavior.lock().unwrap();
            if after {
                behavior.md5_allowed += 1;
            } else {
                behavior.md5_allowed -= 1;
            }
        }
        result
    }
}

impl DigestHandle for MockHandle {
    fn init(&mut self, md: MessageDigest) -> Result<(), HandleError> {
        self.check(HandleOp::Init)?;
        self.inner.init(md)
    }

    fn update(&mut self, data: &[u8]) -> Result<(), HandleError> {
        self.check(HandleOp::Update)?;
        self.inner.update(data)
    }

    fn finalize_into(&mut self, out: &mut [u8]) -> Result<(), HandleError> {
        self.check(HandleOp::Finalize)?;
        self.inner.finalize_into(out)
    }

    fn copy_from(&mut self, src: &dyn DigestHandle) -> Result<(), HandleError> {
        self.check(HandleOp::Copy)?;
        let src = src
            .as_any()
            .downcast_ref::<MockHandle>()
            .ok_or(HandleError::Incompatible)?;
        self.tracked(|inner| inner.copy_from(&src.inner))
    }

    fn reset(&mut self) -> Result<(), HandleError> {
        self.check(HandleOp::Reset)?;
        self.tracked(|inner| inner.reset())
    }

    fn set_allow_md5_for_fips(&mut self) {
        self.tracked(|inner| inner.set_allow_md5_for_fips());
    }

    fn is_md5_allowed_for_fips(&self) -> bool {
        self.inner.is_md5_allowed_for_fips()
    }

    fn message_digest(&self) -> Option<MessageDigest> {
        self.inner.message_digest()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for MockHandle {
    fn drop(&mut self) {
        let allowed = self.inner.is_md5_allowed_for_fips();
        if let Ok(mut behavior) = self.behavior.lock() {
            behavior.live -= 1;
            if allowed {
                behavior.md5_allowed -= 1;
            }
        }
    }
}
