// crates/test-utils/src/fake_backend.rs

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use ndkdrive::errors::{DriveError, Result};
use ndkdrive::exec::{CommandBackend, EventHandler, Invocation, ProcessOutcome};
use ndkdrive::proto::{Event, ResultSink};

/// Scripted outcome for one backend call, consumed in FIFO order.
pub enum FakeResult {
    /// Exit zero, no events.
    Success,
    /// Exit zero after feeding these events to the caller's handler.
    Events(Vec<Event>),
    /// Exit zero after running a side effect (e.g. creating fake build
    /// artifacts in a mock filesystem).
    Effect(Arc<dyn Fn() + Send + Sync>),
    /// Non-zero exit without the race signature.
    CommandFailed,
    /// Non-zero exit with the directory-creation race signature.
    TransientInfra,
}

/// A fake executor that:
/// - records every invocation it was asked to run
/// - replies with the next scripted [`FakeResult`] (default: success).
#[derive(Clone, Default)]
pub struct FakeBackend {
    script: Arc<Mutex<VecDeque<FakeResult>>>,
    calls: Arc<Mutex<Vec<Invocation>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, result: FakeResult) {
        self.script.lock().unwrap().push_back(result);
    }

    /// All invocations run so far.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// Invocations whose program basename matches.
    pub fn calls_to(&self, program: &str) -> Vec<Invocation> {
        self.calls()
            .into_iter()
            .filter(|inv| inv.program_name() == program)
            .collect()
    }
}

impl CommandBackend for FakeBackend {
    fn run<'a>(
        &'a self,
        invocation: Invocation,
        mut on_event: Option<EventHandler<'a>>,
    ) -> Pin<Box<dyn Future<Output = Result<ProcessOutcome>> + Send + 'a>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(invocation.clone());

            let next = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(FakeResult::Success);

            match next {
                FakeResult::Success => Ok(ProcessOutcome {
                    success: true,
                    transient_marker: false,
                    events: Vec::new(),
                }),
                FakeResult::Events(events) => {
                    if let Some(callback) = on_event.as_mut() {
                        for event in &events {
                            callback(event.clone());
                        }
                    }
                    Ok(ProcessOutcome {
                        success: true,
                        transient_marker: false,
                        events,
                    })
                }
                FakeResult::Effect(effect) => {
                    effect();
                    Ok(ProcessOutcome {
                        success: true,
                        transient_marker: false,
                        events: Vec::new(),
                    })
                }
                FakeResult::CommandFailed => Err(DriveError::CommandFailed(format!(
                    "'{}' failed",
                    invocation.display_command()
                ))),
                FakeResult::TransientInfra => Err(DriveError::TransientInfra(format!(
                    "'{}'",
                    invocation.display_command()
                ))),
            }
        })
    }
}

/// A result sink that records every reported event.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

impl ResultSink for RecordingSink {
    fn report(&self, event: &Event) {
        self.events.lock().unwrap().push(event.clone());
    }
}
