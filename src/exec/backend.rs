// src/exec/backend.rs

//! Pluggable command-execution backend.
//!
//! The driver talks to a `CommandBackend` instead of the process runner
//! directly. This makes it easy to swap in a fake backend in tests while
//! keeping the production runner in [`super::runner`].
//!
//! - `ProcessBackend` is the default implementation; it forwards each
//!   invocation to a [`ProcessRunner`].
//! - Tests can provide their own `CommandBackend` that, for example, records
//!   invocations and returns scripted outcomes without spawning processes.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::proto::Event;

use super::heartbeat::{HeartbeatConfig, Milestones};
use super::invocation::Invocation;
use super::runner::{ProcessOutcome, ProcessRunner};

/// Callback receiving decoded protocol events in stream order.
pub type EventHandler<'a> = Box<dyn FnMut(Event) + Send + 'a>;

/// Trait abstracting how invocations are executed.
///
/// Takes `&self` so a retry loop can issue the same operation repeatedly;
/// implementations that record state do so behind interior mutability.
pub trait CommandBackend: Send + Sync {
    fn run<'a>(
        &'a self,
        invocation: Invocation,
        on_event: Option<EventHandler<'a>>,
    ) -> Pin<Box<dyn Future<Output = Result<ProcessOutcome>> + Send + 'a>>;
}

/// Real backend used in production.
#[derive(Debug, Clone)]
pub struct ProcessBackend {
    runner: ProcessRunner,
}

impl ProcessBackend {
    pub fn new(milestones: Milestones) -> Self {
        Self {
            runner: ProcessRunner::new(milestones),
        }
    }

    pub fn with_heartbeat(milestones: Milestones, heartbeat: HeartbeatConfig) -> Self {
        Self {
            runner: ProcessRunner::with_heartbeat(milestones, heartbeat),
        }
    }
}

impl CommandBackend for ProcessBackend {
    fn run<'a>(
        &'a self,
        invocation: Invocation,
        mut on_event: Option<EventHandler<'a>>,
    ) -> Pin<Box<dyn Future<Output = Result<ProcessOutcome>> + Send + 'a>> {
        Box::pin(async move {
            match on_event.as_mut() {
                Some(callback) => self.runner.run(&invocation, Some(callback.as_mut())).await,
                None => self.runner.run(&invocation, None).await,
            }
        })
    }
}
