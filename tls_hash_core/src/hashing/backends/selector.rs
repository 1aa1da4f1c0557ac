//! Backend selection

use super::BackendKind;

impl BackendKind {
    /// Backend to use for the given certified-mode reading
    ///
    /// Certified mode always routes through the handle backend so that every
    /// digest goes through the provider; otherwise the inline contexts are used.
    pub fn select(certified: bool) -> Self {
        if certified {
            BackendKind::Handle
        } else {
            BackendKind::LowLevel
        }
    }
}
