// src/exec/mod.rs

//! Process execution layer.
//!
//! This module runs the build and device-run commands with
//! `tokio::process::Command` and multiplexes their output:
//!
//! - [`invocation`] describes one command line to run.
//! - [`runner`] spawns the child and concurrently drains stdout (through the
//!   protocol decoder), drains stderr (watching for the directory-race
//!   signature) and runs the heartbeat.
//! - [`heartbeat`] emits "still running" notices during long silences.
//! - [`retry`] re-runs operations that hit the transient race.
//! - [`backend`] provides the `CommandBackend` trait the driver talks to in
//!   production, and which tests can replace with a fake implementation.

pub mod backend;
pub mod heartbeat;
pub mod invocation;
pub mod retry;
pub mod runner;

pub use backend::{CommandBackend, EventHandler, ProcessBackend};
pub use heartbeat::{
    HeartbeatConfig, Milestones, format_elapsed, spawn_heartbeat, spawn_logging_heartbeat,
};
pub use invocation::Invocation;
pub use retry::{MAX_ATTEMPTS, with_retry};
pub use runner::{MKDIR_RACE_MARKER, ProcessOutcome, ProcessRunner};
