//! Builder for hash states in a chosen mode

use std::sync::Arc;
use tls_hash_core::{
    CertifiedMode, DigestProvider, FixedMode, HashAlgorithm, HashEnvironment, HashState, Result,
    SoftwareProvider,
};

/// Builder for hash states used in tests
///
/// Defaults to non-certified mode, the software provider and no algorithm
/// (the state is left in the `Created` phase).
pub struct StateBuilder {
    mode: Arc<dyn CertifiedMode>,
    provider: Arc<dyn DigestProvider>,
    allow_md5: bool,
    algorithm: Option<HashAlgorithm>,
    input: Vec<u8>,
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StateBuilder {
    /// Create a new state builder
    pub fn new() -> Self {
        Self {
            mode: Arc::new(FixedMode(false)),
            provider: Arc::new(SoftwareProvider),
            allow_md5: false,
            algorithm: None,
            input: Vec::new(),
        }
    }

    /// Use a constant certified mode
    pub fn certified(mut self, certified: bool) -> Self {
        self.mode = Arc::new(FixedMode(certified));
        self
    }

    /// Use a custom mode source, such as a shared `ModeSwitch`
    pub fn with_mode(mut self, mode: impl CertifiedMode + 'static) -> Self {
        self.mode = Arc::new(mode);
        self
    }

    /// Use a custom digest provider
    pub fn with_provider(mut self, provider: impl DigestProvider + 'static) -> Self {
        self.provider = Arc::new(provider);
        self
    }

    /// Set the MD5 allowance before init
    pub fn allow_md5(mut self) -> Self {
        self.allow_md5 = true;
        self
    }

    /// Initialise the state for `alg`
    pub fn algorithm(mut self, alg: HashAlgorithm) -> Self {
        self.algorithm = Some(alg);
        self
    }

    /// Feed `data` after init
    pub fn with_input(mut self, data: &[u8]) -> Self {
        self.input.extend_from_slice(data);
        self
    }

    /// Environment the built state will use
    pub fn environment(&self) -> HashEnvironment {
        HashEnvironment::new(Arc::clone(&self.mode), Arc::clone(&self.provider))
    }

    /// Build the state
    pub fn build(self) -> Result<HashState> {
        let mut state = HashState::with_environment(self.environment())?;
        if self.allow_md5 {
            state.allow_md5_for_fips()?;
        }
        if let Some(alg) = self.algorithm {
            state.init(alg)?;
            if !self.input.is_empty() {
                state.update(&self.input)?;
            }
        }
        Ok(state)
    }
}
