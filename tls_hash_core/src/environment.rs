//! Inputs a hash state reads from outside itself

use crate::handle::{DigestProvider, SoftwareProvider};
use crate::hashing::{self, HashAlgorithm};
use crate::mode::{CertifiedMode, ProcessMode};
use std::sync::Arc;

/// Certified-mode source and digest-handle provider for hash states
///
/// Cloning is cheap; clones share the same mode source and provider.
#[derive(Clone, Debug)]
pub struct HashEnvironment {
    mode: Arc<dyn CertifiedMode>,
    provider: Arc<dyn DigestProvider>,
}

impl Default for HashEnvironment {
    fn default() -> Self {
        Self::new(Arc::new(ProcessMode), Arc::new(SoftwareProvider))
    }
}

impl HashEnvironment {
    pub fn new(mode: Arc<dyn CertifiedMode>, provider: Arc<dyn DigestProvider>) -> Self {
        Self { mode, provider }
    }

    /// Replace the certified-mode source
    pub fn with_mode(mut self, mode: impl CertifiedMode + 'static) -> Self {
        self.mode = Arc::new(mode);
        self
    }

    /// Replace the digest-handle provider
    pub fn with_provider(mut self, provider: impl DigestProvider + 'static) -> Self {
        self.provider = Arc::new(provider);
        self
    }

    /// Read the certified-mode predicate
    pub fn is_certified(&self) -> bool {
        self.mode.is_active()
    }

    /// Whether `alg` is available under the current mode, ignoring overrides
    pub fn is_available(&self, alg: HashAlgorithm) -> bool {
        hashing::is_available(alg, self.is_certified())
    }

    pub fn mode(&self) -> &Arc<dyn CertifiedMode> {
        &self.mode
    }

    pub fn provider(&self) -> &Arc<dyn DigestProvider> {
        &self.provider
    }
}
