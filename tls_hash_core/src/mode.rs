//! Certified-mode ("FIPS") switch
//!
//! The hash layer only ever reads the mode. Whoever owns the process
//! configuration flips [`set_certified_mode`]; embedders that want per-state
//! control inject their own [`CertifiedMode`] through a
//! [`HashEnvironment`](crate::HashEnvironment).

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Source of the certified-mode predicate
pub trait CertifiedMode: Send + Sync + fmt::Debug {
    /// Whether certified-mode restrictions are active right now
    fn is_active(&self) -> bool;
}

static CERTIFIED_MODE: AtomicBool = AtomicBool::new(false);

/// Set the process-wide certified mode
pub fn set_certified_mode(enabled: bool) {
    let previous = CERTIFIED_MODE.swap(enabled, Ordering::AcqRel);
    if previous != enabled {
        log::debug!("Process-wide certified mode changed: {previous} -> {enabled}");
    }
}

/// Get the process-wide certified mode
pub fn is_certified_mode() -> bool {
    CERTIFIED_MODE.load(Ordering::Acquire)
}

/// Reads the process-wide switch
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessMode;

impl CertifiedMode for ProcessMode {
    fn is_active(&self) -> bool {
        is_certified_mode()
    }
}

/// A mode that never changes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedMode(pub bool);

impl CertifiedMode for FixedMode {
    fn is_active(&self) -> bool {
        self.0
    }
}

/// Shared toggle, independent of the process-wide switch
///
/// Clones observe the same flag, so a state built with one clone sees flips
/// made through another.
#[derive(Debug, Clone, Default)]
pub struct ModeSwitch {
    active: Arc<AtomicBool>,
}

impl ModeSwitch {
    /// Create a switch with the given initial value
    pub fn new(active: bool) -> Self {
        Self {
            active: Arc::new(AtomicBool::new(active)),
        }
    }

    /// Change the mode
    pub fn set(&self, active: bool) {
        self.active.store(active, Ordering::Release);
    }
}

impl CertifiedMode for ModeSwitch {
    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}
