//! Common test utilities for integration tests
//!
//! Helpers for running the same scenario on both backends. States built here
//! carry the MD5 allowance so plain MD5 can be initialised under certified
//! mode as well. The MD5+SHA1 composite stays low-level only.

#![allow(dead_code)]

use tls_hash_core::{BackendKind, FixedMode, HashAlgorithm, HashState};

pub const BACKENDS: [BackendKind; 2] = [BackendKind::LowLevel, BackendKind::Handle];

/// Initialise logging once per test binary
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Whether a state on `backend` with the allowance may be initialised for `alg`
pub fn permitted(backend: BackendKind, alg: HashAlgorithm) -> bool {
    backend == BackendKind::LowLevel || alg != HashAlgorithm::MD5SHA1
}

/// Fresh state that resolves to `backend`, with the MD5 allowance set
pub fn state_on(backend: BackendKind) -> HashState {
    let mut state = HashState::with_mode(FixedMode(backend == BackendKind::Handle)).unwrap();
    state.allow_md5_for_fips().unwrap();
    assert_eq!(state.backend(), backend);
    state
}

/// State on `backend` initialised for `alg`
pub fn init_on(backend: BackendKind, alg: HashAlgorithm) -> HashState {
    let mut state = state_on(backend);
    state.init(alg).unwrap();
    state
}

/// Digest `data` in a single update
pub fn one_shot(backend: BackendKind, alg: HashAlgorithm, data: &[u8]) -> Vec<u8> {
    let mut state = init_on(backend, alg);
    state.update(data).unwrap();
    state.finish().unwrap()
}
