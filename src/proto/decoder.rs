// src/proto/decoder.rs

use std::fmt;

use tracing::warn;
use uuid::Uuid;

use super::event::Event;

/// Random per-invocation token prefixed to protocol lines.
///
/// A fresh token per invocation keeps stale or concurrent output (e.g. a
/// child re-printing an old log) from being mistaken for this run's events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolToken(String);

impl ProtocolToken {
    pub fn generate() -> Self {
        Self(format!("NDKDRIVE-MRO-{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProtocolToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Classification of a single stdout line.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedLine {
    /// A well-formed protocol line.
    Event(Event),
    /// Token prefix matched but the payload did not parse; already warned,
    /// the caller should drop the line.
    Malformed,
    /// Ordinary output, to be logged as-is.
    Plain,
}

/// Picks protocol events out of a line stream given the active token.
#[derive(Debug, Clone)]
pub struct EventDecoder {
    token: ProtocolToken,
}

impl EventDecoder {
    pub fn new(token: ProtocolToken) -> Self {
        Self { token }
    }

    /// Decode one line.
    ///
    /// Malformed payloads after a correct token prefix are logged as a
    /// warning and dropped; they must never abort a run.
    pub fn decode(&self, line: &str) -> DecodedLine {
        let Some(payload) = line.strip_prefix(self.token.as_str()) else {
            return DecodedLine::Plain;
        };

        match serde_json::from_str::<Event>(payload) {
            Ok(event) => DecodedLine::Event(event),
            Err(err) => {
                warn!(error = %err, line, "can't handle MRO output; dropping line");
                DecodedLine::Malformed
            }
        }
    }
}
