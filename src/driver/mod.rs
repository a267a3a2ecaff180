// src/driver/mod.rs

//! Per-project test driver.
//!
//! Sequences one project through its lifecycle: skip checks, host
//! validation, a build per PIE candidate and a device run per eligible ABI,
//! aggregating failures under `--keep-going`. All process execution goes
//! through a [`CommandBackend`]; all filesystem access goes through the
//! [`FileSystem`] seam.
//!
//! - [`host`] implements the pre-flight host validation gate.
//! - [`build`] implements the per-variant target build.
//! - [`device`] implements the per-ABI device run.

mod build;
mod device;
mod host;

pub use device::RUNNER_OPTIONS_MARKER;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{error, info};

use crate::config::DriveOptions;
use crate::errors::{DriveError, Result};
use crate::exec::{CommandBackend, Milestones};
use crate::fs::FileSystem;
use crate::matrix::{self, Variant};
use crate::project::Project;
use crate::proto::ResultSink;
use crate::types::{ProjectClass, ToolchainFamily};

/// Terminal state of one project's drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectOutcome {
    /// Every attempted phase succeeded.
    Passed,
    /// Nothing was attempted (broken project, or long project in quick
    /// mode).
    Skipped,
}

pub struct ProjectDriver<B: CommandBackend> {
    project: Project,
    options: DriveOptions,
    fs: Arc<dyn FileSystem>,
    backend: B,
    sink: Arc<dyn ResultSink>,
    milestones: Milestones,
    /// Failed build/run phases under `--keep-going`; only ever incremented.
    failures: AtomicUsize,
    tmpdir: PathBuf,
}

impl<B: CommandBackend> ProjectDriver<B> {
    pub fn new(
        project: Project,
        options: DriveOptions,
        fs: Arc<dyn FileSystem>,
        backend: B,
        sink: Arc<dyn ResultSink>,
        milestones: Milestones,
    ) -> Self {
        let tmpdir = options
            .out_dir
            .join(project.class.dir_name())
            .join(&project.name);
        Self {
            project,
            options,
            fs,
            backend,
            sink,
            milestones,
            failures: AtomicUsize::new(0),
            tmpdir,
        }
    }

    /// Drive the project to completion.
    ///
    /// With `--keep-going`, build and device-run failures are counted and
    /// the remaining variants still run; the drive then fails with the
    /// aggregate count. Without it, the first failure aborts the drive.
    /// Host-validation failures are always fatal.
    pub async fn run(&self) -> Result<ProjectOutcome> {
        self.failures.store(0, Ordering::Relaxed);

        let toolchain = self.options.toolchain_version.as_deref();
        if self.project.broken_for(toolchain) {
            self.notice(format!(
                "SKP {} [{}]: no build for {}",
                self.project.class,
                self.project.name,
                toolchain.unwrap_or("this configuration"),
            ));
            return Ok(ProjectOutcome::Skipped);
        }

        if self.project.properties.long
            && !self.options.full_testing
            && !self
                .options
                .selected
                .iter()
                .any(|name| name == &self.project.name)
        {
            self.notice(format!(
                "SKP {} [{}]: this is a long test, but we're running in quick mode",
                self.project.class, self.project.name
            ));
            return Ok(ProjectOutcome::Skipped);
        }

        self.run_on_host().await?;

        let family = self.family();
        let pies = matrix::pie_candidates(self.project.class, self.options.pie, family);

        for pie in pies {
            if let Err(err) = self.build(pie).await {
                error!(
                    project = %self.project.name,
                    pie,
                    error = %err,
                    "target build failed"
                );
                if !self.options.keep_going {
                    return Err(err);
                }
                self.failures.fetch_add(1, Ordering::Relaxed);
                // No device runs without a successful build of this variant.
                continue;
            }

            if self.project.class != ProjectClass::Device {
                continue;
            }

            let discovered = matrix::discover_abis(self.fs.as_ref(), &self.variant_dir(pie))?;
            let abis = matrix::filter_abis(discovered, self.options.abis.as_deref(), pie, family);

            for abi in abis {
                if let Err(err) = self.run_on_device(&abi, pie).await {
                    error!(
                        project = %self.project.name,
                        abi,
                        pie,
                        error = %err,
                        "device run failed"
                    );
                    if !self.options.keep_going {
                        return Err(err);
                    }
                    self.failures.fetch_add(1, Ordering::Relaxed);
                }
            }
        }

        let failed = self.failures.load(Ordering::Relaxed);
        if failed > 0 {
            return Err(DriveError::PhasesFailed { count: failed });
        }
        Ok(ProjectOutcome::Passed)
    }

    /// Number of failed phases recorded so far.
    pub fn failure_count(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    fn family(&self) -> Option<ToolchainFamily> {
        self.options
            .toolchain_version
            .as_deref()
            .map(ToolchainFamily::from_version)
    }

    fn variant(&self, pie: bool) -> Variant {
        Variant::new(pie, self.options.toolchain_version.clone())
    }

    /// Build tree for one PIE variant: `<out>/<class>/<name>/target[+PIE]`.
    fn variant_dir(&self, pie: bool) -> PathBuf {
        self.tmpdir.join(if pie { "target+PIE" } else { "target" })
    }

    /// Log a milestone. Touching the shared timestamp keeps the heartbeat
    /// quiet while real progress is being reported.
    fn notice(&self, msg: impl fmt::Display) {
        info!("{msg}");
        self.milestones.touch();
    }

    fn path_str(&self) -> String {
        self.project.path.display().to_string()
    }
}
