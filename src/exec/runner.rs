// src/exec/runner.rs

//! Subprocess runner with concurrent output multiplexing.

use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{ChildStderr, ChildStdout, Command};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::errors::{DriveError, Result};
use crate::proto::{DecodedLine, Event, EventDecoder};

use super::heartbeat::{HeartbeatConfig, Milestones, spawn_logging_heartbeat};
use super::invocation::Invocation;

/// stderr lines starting with this marker indicate the directory-creation
/// race (`mkdir: cannot create directory ...`) that warrants a retry.
pub const MKDIR_RACE_MARKER: &str = "mkdir:";

/// What one invocation produced.
#[derive(Debug, Default)]
pub struct ProcessOutcome {
    pub success: bool,
    /// A stderr line matched [`MKDIR_RACE_MARKER`].
    pub transient_marker: bool,
    /// Decoded protocol events, in stdout emission order.
    pub events: Vec<Event>,
}

/// Runs one [`Invocation`] to completion.
///
/// Three activities run concurrently per invocation: the stdout drain (fed
/// through the protocol decoder when a token is configured), the stderr
/// drain (plain logging plus race detection) and the heartbeat. Both drains
/// are joined before the child's exit status is consumed; the heartbeat is
/// aborted at that point. Continuous draining matters: a child blocks on
/// pipe backpressure if either stream is left unread.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    milestones: Milestones,
    heartbeat: HeartbeatConfig,
}

impl ProcessRunner {
    pub fn new(milestones: Milestones) -> Self {
        Self {
            milestones,
            heartbeat: HeartbeatConfig::default(),
        }
    }

    pub fn with_heartbeat(milestones: Milestones, heartbeat: HeartbeatConfig) -> Self {
        Self {
            milestones,
            heartbeat,
        }
    }

    /// Run the invocation, mapping a non-zero exit to an error.
    ///
    /// - non-zero exit with the race marker seen → [`DriveError::TransientInfra`]
    /// - non-zero exit otherwise → [`DriveError::CommandFailed`]
    ///
    /// Every recognized event goes to `on_event` if supplied (in stream
    /// order), else it is logged.
    pub async fn run(
        &self,
        invocation: &Invocation,
        on_event: Option<&mut (dyn FnMut(Event) + Send)>,
    ) -> Result<ProcessOutcome> {
        let outcome = self.execute(invocation, on_event).await?;

        if outcome.success {
            Ok(outcome)
        } else if outcome.transient_marker {
            Err(DriveError::TransientInfra(format!(
                "'{}'",
                invocation.display_command()
            )))
        } else {
            Err(DriveError::CommandFailed(format!(
                "'{}' failed",
                invocation.display_command()
            )))
        }
    }

    /// Run the invocation and report the raw outcome without interpreting
    /// the exit status.
    pub async fn execute(
        &self,
        invocation: &Invocation,
        mut on_event: Option<&mut (dyn FnMut(Event) + Send)>,
    ) -> Result<ProcessOutcome> {
        info!("## COMMAND: {}", invocation.display_command());
        if let Some(cwd) = &invocation.cwd {
            info!("## CWD: {}", cwd.display());
        }

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        // Overrides layer on top of the ambient environment.
        for (key, value) in &invocation.env {
            cmd.env(key, value);
        }
        if let Some(cwd) = &invocation.cwd {
            cmd.current_dir(cwd);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let started = Instant::now();
        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning '{}'", invocation.display_command()))?;

        let stdout = child
            .stdout
            .take()
            .context("child stdout pipe not available")?;
        let stderr = child
            .stderr
            .take()
            .context("child stderr pipe not available")?;

        let decoder = invocation.token.clone().map(EventDecoder::new);
        let (event_tx, mut event_rx) = mpsc::channel::<Event>(64);
        let stdout_task = tokio::spawn(drain_stdout(stdout, decoder, event_tx));

        let marker = Arc::new(AtomicBool::new(false));
        let stderr_task = tokio::spawn(drain_stderr(stderr, Arc::clone(&marker)));

        let heartbeat =
            spawn_logging_heartbeat(self.heartbeat, self.milestones.clone(), started);

        // Consume events live while the drains run; the channel closes once
        // the stdout drain finishes.
        let mut events = Vec::new();
        while let Some(event) = event_rx.recv().await {
            match on_event.as_mut() {
                Some(callback) => callback(event.clone()),
                None => debug!(?event, "protocol event"),
            }
            events.push(event);
        }

        stdout_task.await.context("joining stdout drain")?;
        stderr_task.await.context("joining stderr drain")?;
        heartbeat.abort();

        let status = child
            .wait()
            .await
            .with_context(|| format!("waiting for '{}'", invocation.display_command()))?;

        Ok(ProcessOutcome {
            success: status.success(),
            transient_marker: marker.load(Ordering::Relaxed),
            events,
        })
    }
}

async fn drain_stdout(
    stdout: ChildStdout,
    decoder: Option<EventDecoder>,
    event_tx: mpsc::Sender<Event>,
) {
    let reader = BufReader::new(stdout);
    let mut lines = reader.lines();

    while let Ok(Some(line)) = lines.next_line().await {
        match &decoder {
            Some(decoder) => match decoder.decode(&line) {
                DecodedLine::Event(event) => {
                    if event_tx.send(event).await.is_err() {
                        break;
                    }
                }
                // Already warned by the decoder; don't echo it as output.
                DecodedLine::Malformed => {}
                DecodedLine::Plain => info!("   > {}", line),
            },
            None => info!("   > {}", line),
        }
    }
}

async fn drain_stderr(stderr: ChildStderr, marker: Arc<AtomicBool>) {
    let reader = BufReader::new(stderr);
    let mut lines = reader.lines();

    while let Ok(Some(line)) = lines.next_line().await {
        info!("   * {}", line);
        if line.starts_with(MKDIR_RACE_MARKER) {
            marker.store(true, Ordering::Relaxed);
        }
    }
}
