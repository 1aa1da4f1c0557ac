//! Builders for test scenarios

mod state;

pub use state::StateBuilder;
