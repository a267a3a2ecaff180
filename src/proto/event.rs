// src/proto/event.rs

use serde::{Deserialize, Serialize};

/// One structured event on a protocol stream.
///
/// The wire format is a JSON object tagged by an `event` field, e.g.
/// `{"event":"run","number":3,"total":120,"apilevel":21,"devmodel":"Nexus 5"}`.
///
/// `run`, `skip`, `fail`, `pause` and `timeout` are emitted by the device
/// runner while executing binaries; the `build-*`/`test-*` kinds are the
/// terminal per-phase results this crate reports upward through
/// [`super::sink::ResultSink`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum Event {
    Run {
        number: u32,
        total: u32,
        apilevel: u32,
        devmodel: String,
    },
    Skip {
        number: u32,
        total: u32,
        reason: String,
    },
    Fail {
        exe: String,
        args: Vec<String>,
        exitcode: i32,
    },
    Pause,
    Timeout {
        timeout: u64,
    },
    BuildSuccess {
        path: String,
        pie: bool,
    },
    /// Host-validation failures report without a PIE flag, so it is optional
    /// here.
    BuildFailed {
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pie: Option<bool>,
    },
    TestSuccess {
        path: String,
        name: String,
        abi: String,
        pie: bool,
    },
    TestFailed {
        path: String,
        name: String,
        abi: String,
        pie: bool,
    },
}
