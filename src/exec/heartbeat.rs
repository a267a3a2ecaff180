// src/exec/heartbeat.rs

//! "Still running" notices for long-silent child processes.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;

/// Timestamp of the most recent logged milestone.
///
/// Shared between the driver's progress logging (which calls [`touch`]) and
/// the heartbeat task (which reads the silence gap). Uses `tokio::time::
/// Instant` so tests can drive it with a paused clock.
///
/// [`touch`]: Milestones::touch
#[derive(Debug, Clone)]
pub struct Milestones {
    last: Arc<Mutex<Instant>>,
}

impl Milestones {
    pub fn new() -> Self {
        Self {
            last: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Record that a milestone was just logged.
    pub fn touch(&self) {
        *self.last.lock().unwrap() = Instant::now();
    }

    /// How long since the last milestone.
    pub fn silence(&self) -> Duration {
        self.last.lock().unwrap().elapsed()
    }
}

impl Default for Milestones {
    fn default() -> Self {
        Self::new()
    }
}

/// Timing knobs for the heartbeat, injectable for tests.
#[derive(Debug, Clone, Copy)]
pub struct HeartbeatConfig {
    /// How often to check the silence gap.
    pub poll: Duration,
    /// Silence gap after which a notice is emitted.
    pub threshold: Duration,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            poll: Duration::from_secs(5),
            threshold: Duration::from_secs(30),
        }
    }
}

/// Spawn the heartbeat task for one running invocation.
///
/// Every `poll` it compares the silence gap against `threshold`; once the
/// gap is reached it emits a single notice (with wall-clock time since
/// `started`) and touches the milestone timestamp, so the next notice only
/// comes after another full silence window.
///
/// The task loops forever; the process runner aborts the returned handle
/// once both stream drains have finished.
pub fn spawn_heartbeat(
    config: HeartbeatConfig,
    milestones: Milestones,
    started: Instant,
    notify: impl Fn(Duration) + Send + 'static,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(config.poll).await;
            if milestones.silence() < config.threshold {
                continue;
            }
            notify(started.elapsed());
            milestones.touch();
        }
    })
}

/// Spawn a heartbeat that logs `## STILL RUNNING (h:mm:ss)` notices.
pub fn spawn_logging_heartbeat(
    config: HeartbeatConfig,
    milestones: Milestones,
    started: Instant,
) -> JoinHandle<()> {
    spawn_heartbeat(config, milestones, started, |elapsed| {
        info!("## STILL RUNNING ({})", format_elapsed(elapsed));
    })
}

/// Format a duration as `h:mm:ss`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let s = total % 60;
    let m = (total / 60) % 60;
    let h = total / 3600;
    format!("{h}:{m:02}:{s:02}")
}
