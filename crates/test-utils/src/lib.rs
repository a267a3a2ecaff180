// crates/test-utils/src/lib.rs

//! Shared helpers for ndkdrive integration tests: a scriptable command
//! backend, a recording result sink and fixture builders.

pub mod builders;
pub mod fake_backend;

pub use builders::{OptionsBuilder, ProjectBuilder};
pub use fake_backend::{FakeBackend, FakeResult, RecordingSink};
