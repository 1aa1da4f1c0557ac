//! Test utilities for the TLS hash-state core
//!
//! This crate provides a fault-injecting digest provider, a builder for hash
//! states in a chosen mode, and known-answer vectors.

pub mod builders;
pub mod mocks;
pub mod vectors;

// Re-export commonly used types
pub use builders::StateBuilder;
pub use mocks::{HandleOp, MockHandle, MockProvider};
pub use vectors::{KNOWN_ANSWERS, KnownAnswer};
