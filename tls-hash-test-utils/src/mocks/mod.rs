//! Mock implementations for testing

mod provider;

pub use provider::{HandleOp, MockHandle, MockProvider};
