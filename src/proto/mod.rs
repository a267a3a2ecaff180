// src/proto/mod.rs

//! Machine-readable-output (MRO) protocol.
//!
//! Build and device-run tools share their stdout between human-readable log
//! lines and structured events. Protocol lines are a random per-invocation
//! token followed by a JSON object; everything that assumes this encoding
//! lives here:
//!
//! - [`event`] defines the event schema.
//! - [`decoder`] generates tokens and picks events out of a line stream.
//! - [`sink`] emits this crate's own terminal events for a parent harness.

pub mod decoder;
pub mod event;
pub mod sink;

pub use decoder::{DecodedLine, EventDecoder, ProtocolToken};
pub use event::Event;
pub use sink::{MroSink, ResultSink};
