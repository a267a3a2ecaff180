// src/errors.rs

//! Crate-wide error types.
//!
//! The retry layer only ever retries [`DriveError::TransientInfra`]; every
//! other variant propagates on first occurrence.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriveError {
    /// A build/test command failed while its stderr showed the signature of a
    /// concurrent directory-creation race. Eligible for immediate retry.
    #[error("{0} failed due to a directory-creation race")]
    TransientInfra(String),

    /// A command exited non-zero without the race signature.
    #[error("{0}")]
    CommandFailed(String),

    /// A transient failure kept recurring past the retry bound.
    #[error("{what} still failing after {attempts} attempts; giving up")]
    RetriesExhausted { what: String, attempts: usize },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Aggregate failure under `--keep-going`: one count per failed
    /// build or device-run phase of a single project.
    #[error("{count} build/run phase(s) failed")]
    PhasesFailed { count: usize },

    /// Aggregate failure across projects under `--keep-going`.
    #[error("{count} project(s) failed")]
    ProjectsFailed { count: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DriveError {
    pub fn is_transient(&self) -> bool {
        matches!(self, DriveError::TransientInfra(_))
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DriveError>;
