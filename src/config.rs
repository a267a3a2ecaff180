// src/config.rs

//! Driver configuration.
//!
//! Every recognized option is an explicit field here; the CLI layer maps
//! into this structure and nothing downstream looks at raw arguments.

use std::path::PathBuf;

use crate::cli::CliArgs;
use crate::errors::{DriveError, Result};
use crate::types::ProjectClass;

#[derive(Debug, Clone)]
pub struct DriveOptions {
    /// NDK root, for the generic build driver and the device runner.
    pub ndk: PathBuf,
    /// Where build trees and intermediate files go.
    pub out_dir: PathBuf,
    /// Class of the projects being driven.
    pub class: ProjectClass,
    /// Parallel jobs for the build mechanism.
    pub jobs: Option<usize>,
    /// Pin builds to a single PIE value.
    pub pie: Option<bool>,
    /// Active toolchain version, e.g. "4.9" or "clang3.6".
    pub toolchain_version: Option<String>,
    /// Keep testing remaining variants/projects after a failure.
    pub keep_going: bool,
    /// Restrict device runs to these ABIs.
    pub abis: Option<Vec<String>>,
    /// Default per-executable timeout (seconds) for device runs.
    pub timeout: u64,
    /// Run long projects too.
    pub full_testing: bool,
    /// Explicitly selected project names; long projects among them run even
    /// in quick mode.
    pub selected: Vec<String>,
    /// adb executable forwarded to the device runner.
    pub adb: Option<PathBuf>,
    /// Only run on emulators carrying this tag.
    pub emulator_tag: Option<String>,
    /// Device-side deployment directory.
    pub device_path: String,
    /// Skip host validation even when a recipe exists.
    pub disable_host_tests: bool,
    /// Host compilers for host validation (pre-filtered by the caller).
    pub host_compilers: Vec<String>,
    /// GNU make executable for host validation recipes.
    pub make: PathBuf,
    /// Extra symbol directories for the device runner.
    pub symbols_dirs: Vec<PathBuf>,
}

impl Default for DriveOptions {
    fn default() -> Self {
        Self {
            ndk: PathBuf::new(),
            out_dir: PathBuf::from("out"),
            class: ProjectClass::Device,
            jobs: None,
            pie: None,
            toolchain_version: None,
            keep_going: false,
            abis: None,
            timeout: 900,
            full_testing: false,
            selected: Vec::new(),
            adb: None,
            emulator_tag: None,
            device_path: "/data/local/tmp/ndk-tests".to_string(),
            disable_host_tests: false,
            host_compilers: vec!["cc".to_string()],
            make: PathBuf::from("make"),
            symbols_dirs: Vec::new(),
        }
    }
}

impl DriveOptions {
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let class: ProjectClass = args.class.parse().map_err(DriveError::ConfigError)?;

        let pie = match (args.pie, args.no_pie) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };

        let host_compilers = if args.host_compilers.is_empty() {
            vec!["cc".to_string()]
        } else {
            args.host_compilers.clone()
        };

        Ok(Self {
            ndk: PathBuf::from(&args.ndk),
            out_dir: PathBuf::from(&args.out_dir),
            class,
            jobs: args.jobs,
            pie,
            toolchain_version: args.toolchain_version.clone(),
            keep_going: args.keep_going,
            abis: args.abis.clone(),
            timeout: args.timeout,
            full_testing: args.full_testing,
            selected: args.tests.clone(),
            adb: args.adb.clone().map(PathBuf::from),
            emulator_tag: args.emulator_tag.clone(),
            device_path: args.device_path.clone(),
            disable_host_tests: args.disable_host_tests,
            host_compilers,
            make: PathBuf::from(&args.make),
            symbols_dirs: args.symbols_dirs.iter().map(PathBuf::from).collect(),
        })
    }
}
