// src/lib.rs

pub mod cli;
pub mod config;
pub mod driver;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod matrix;
pub mod project;
pub mod proto;
pub mod types;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info};

use crate::cli::CliArgs;
use crate::config::DriveOptions;
use crate::driver::{ProjectDriver, ProjectOutcome};
use crate::errors::{DriveError, Result};
use crate::exec::{Milestones, ProcessBackend};
use crate::fs::{FileSystem, RealFileSystem};
use crate::project::Project;
use crate::proto::{MroSink, ResultSink};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - option mapping from the CLI
/// - the result sink for a parent harness
/// - the shared milestone timestamp read by the heartbeat
/// - one driver per project directory, honoring `--keep-going` across
///   projects
pub async fn run(args: CliArgs) -> Result<()> {
    let options = DriveOptions::from_args(&args)?;
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let sink: Arc<dyn ResultSink> = Arc::new(MroSink::new(args.mro_prefix.clone()));
    let milestones = Milestones::new();

    let mut passed = 0usize;
    let mut skipped = 0usize;
    let mut failed = 0usize;

    for dir in &args.projects {
        let project = Project::load(fs.as_ref(), PathBuf::from(dir), options.class)?;
        let backend = ProcessBackend::new(milestones.clone());
        let driver = ProjectDriver::new(
            project,
            options.clone(),
            Arc::clone(&fs),
            backend,
            Arc::clone(&sink),
            milestones.clone(),
        );

        match driver.run().await {
            Ok(ProjectOutcome::Passed) => passed += 1,
            Ok(ProjectOutcome::Skipped) => skipped += 1,
            Err(err) => {
                error!(project = %dir, error = %err, "project failed");
                if !options.keep_going {
                    return Err(err);
                }
                failed += 1;
            }
        }
    }

    info!(passed, skipped, failed, "all projects processed");
    if failed > 0 {
        return Err(DriveError::ProjectsFailed { count: failed });
    }
    Ok(())
}
