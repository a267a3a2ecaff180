// src/driver/device.rs

//! Per-ABI device run through the external device-test runner.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};

use crate::exec::{EventHandler, Invocation};
use crate::project::exe_basename;
use crate::proto::{Event, ProtocolToken};

use super::{CommandBackend, ProjectDriver, Result};

/// Marker separating an executable path from its JSON options in the
/// executables list file.
pub const RUNNER_OPTIONS_MARKER: &str = "ADBRUNNER-OPTIONS:";

impl<B: CommandBackend> ProjectDriver<B> {
    /// Run one built variant's binaries for one ABI on devices/emulators.
    ///
    /// An ABI with no eligible executables is logged as skipped and is not
    /// a failure.
    pub(super) async fn run_on_device(&self, abi: &str, pie: bool) -> Result<()> {
        let dstdir = self.variant_dir(pie);
        let logprefix = format!(
            "{} [{}]{}",
            self.project.class,
            self.project.name,
            self.variant(pie)
        );

        let bindir = dstdir.join("libs").join(abi);
        let executables = self.eligible_executables(&bindir)?;
        if executables.is_empty() {
            self.notice(format!("SKP {logprefix}: no {abi} binaries"));
            return Ok(());
        }

        let logprefix = format!("{logprefix}: {abi}");
        self.notice(format!("BEG {logprefix}"));

        let cmdslist = dstdir.join(format!("executables-{abi}.txt"));
        let listing = self.executables_listing(&executables)?;
        self.fs.write(&cmdslist, listing.as_bytes())?;

        // Fresh token per run so stale output can't be mistaken for events.
        let token = ProtocolToken::generate();
        let invocation = self.device_invocation(&dstdir, &bindir, abi, pie, &cmdslist, token);

        let on_event: EventHandler<'_> =
            Box::new(move |event: Event| self.render_progress(&logprefix, event));

        match self.backend.run(invocation, Some(on_event)).await {
            Ok(_) => {
                self.sink.report(&Event::TestSuccess {
                    path: self.path_str(),
                    name: self.project.name.clone(),
                    abi: abi.to_string(),
                    pie,
                });
                Ok(())
            }
            Err(err) => {
                info!("ERROR: {err}");
                self.sink.report(&Event::TestFailed {
                    path: self.path_str(),
                    name: self.project.name.clone(),
                    abi: abi.to_string(),
                    pie,
                });
                Err(err)
            }
        }
    }

    /// Binaries under `libs/<abi>/`, minus shared libraries and the
    /// project's `broken-run` exclusions, in name order.
    fn eligible_executables(&self, bindir: &Path) -> Result<Vec<PathBuf>> {
        if !self.fs.is_dir(bindir) {
            return Ok(Vec::new());
        }

        let mut binaries = self.fs.read_dir(bindir)?;
        binaries.sort();

        Ok(binaries
            .into_iter()
            .filter(|path| !self.fs.is_dir(path))
            .filter(|path| path.extension().and_then(|e| e.to_str()) != Some("so"))
            .filter(|path| {
                let name = exe_basename(path);
                !self
                    .project
                    .properties
                    .broken_run
                    .iter()
                    .any(|broken| broken == name)
            })
            .collect())
    }

    /// One executable per line, with per-binary runner options appended
    /// after the marker when the project declares any.
    fn executables_listing(&self, executables: &[PathBuf]) -> Result<String> {
        let mut listing = String::new();
        for exe in executables {
            listing.push_str(&exe.display().to_string());
            if let Some(options) = self.project.properties.runner_options_for(exe_basename(exe)) {
                let json =
                    serde_json::to_string(options).context("serializing runner options")?;
                listing.push_str(&format!(" {RUNNER_OPTIONS_MARKER}{json}"));
            }
            listing.push('\n');
        }
        Ok(listing)
    }

    fn device_invocation(
        &self,
        dstdir: &Path,
        bindir: &Path,
        abi: &str,
        pie: bool,
        cmdslist: &Path,
        token: ProtocolToken,
    ) -> Invocation {
        let mut symbol_dirs = self.options.symbols_dirs.clone();
        symbol_dirs.push(dstdir.join("obj").join("local").join(abi));
        let symbol_dirs: Vec<String> = symbol_dirs
            .into_iter()
            .filter(|dir| self.fs.is_dir(dir))
            .map(|dir| dir.display().to_string())
            .collect();

        let mut invocation =
            Invocation::new(self.options.ndk.join("tools").join("adbrunner")).arg("--verbose");
        if self.options.keep_going {
            invocation = invocation.arg("--keep-going");
        }
        invocation = invocation.arg("--no-print-timestamps");
        if let Some(adb) = &self.options.adb {
            invocation = invocation.arg(format!("--adb={}", adb.display()));
        }
        invocation = invocation
            .arg(format!("--ndk={}", self.options.ndk.display()))
            .arg(format!("--abi={abi}"))
            .arg(format!("--timeout={}", self.single_run_timeout()));
        if let Some(tag) = &self.options.emulator_tag {
            invocation = invocation.arg(format!("--emulator-tag={tag}"));
        }
        invocation
            .arg(format!("--device-path={}", self.options.device_path))
            .arg("--run-on-all-devices")
            .arg(if pie { "--pie" } else { "--no-pie" })
            .arg(format!("--mro-prefix={token}"))
            .arg(format!("--symbols-directories={}", symbol_dirs.join(",")))
            .arg(format!("--ld-library-path={}", bindir.display()))
            .arg(format!("@{}", cmdslist.display()))
            .protocol_token(token)
    }

    fn single_run_timeout(&self) -> u64 {
        self.project
            .properties
            .single_run_timeout
            .unwrap_or(self.options.timeout)
    }

    /// Render one decoded runner event as a progress notice.
    fn render_progress(&self, logprefix: &str, event: Event) {
        match event {
            Event::Run {
                number,
                total,
                apilevel,
                devmodel,
            } => self.notice(format!(
                "RUN {logprefix} [{}] android-{apilevel} '{devmodel}'",
                progress_counter(number, total)
            )),
            Event::Skip {
                number,
                total,
                reason,
            } => self.notice(format!(
                "SKP {logprefix} [{}] {reason}",
                progress_counter(number, total)
            )),
            Event::Fail {
                exe,
                args,
                exitcode,
            } => {
                let mut parts = vec![exe_basename(Path::new(&exe)).to_string()];
                parts.extend(args);
                self.notice(format!(
                    "   ---> FAILURE: TARGET TEST  [{}] \"{}\": $?={exitcode}",
                    self.project.name,
                    parts.join(" ")
                ));
            }
            Event::Pause => self.notice(format!("RUN {logprefix} [paused]")),
            Event::Timeout { timeout } => self.notice(format!(
                "   ---> FAILURE: TARGET TEST  [{}] TIMEOUT: {timeout} seconds",
                self.project.name
            )),
            other => debug!(?other, "unhandled device-runner event"),
        }
    }
}

/// Width-padded `n/total` counter, e.g. `  3/120`.
fn progress_counter(number: u32, total: u32) -> String {
    let width = total.to_string().len();
    format!("{number:>width$}/{total:>width$}")
}
