// src/proto/sink.rs

use tracing::warn;

use super::event::Event;

/// Receiver for terminal per-phase events (one per build attempt and per
/// device-test attempt).
///
/// Production uses [`MroSink`]; tests substitute a recording implementation.
pub trait ResultSink: Send + Sync {
    fn report(&self, event: &Event);
}

/// Writes token-prefixed JSON event lines to stdout, so a parent harness
/// driving this program can decode them the same way we decode the device
/// runner's stream.
///
/// With no prefix configured the sink stays silent.
pub struct MroSink {
    prefix: Option<String>,
}

impl MroSink {
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }
}

impl ResultSink for MroSink {
    fn report(&self, event: &Event) {
        let Some(prefix) = &self.prefix else {
            return;
        };
        match serde_json::to_string(event) {
            Ok(json) => println!("{prefix}{json}"),
            Err(err) => warn!(error = %err, "can't serialize result event"),
        }
    }
}
