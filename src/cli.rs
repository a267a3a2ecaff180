// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `ndkdrive`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ndkdrive",
    version,
    about = "Build cross-compiled test projects and run them on devices/emulators.",
    long_about = None
)]
pub struct CliArgs {
    /// Project directories to test.
    #[arg(value_name = "DIR", required = true)]
    pub projects: Vec<String>,

    /// NDK root (provides the generic build driver and the device runner).
    #[arg(long, value_name = "PATH")]
    pub ndk: String,

    /// Directory for build trees and intermediate files.
    #[arg(long, value_name = "PATH", default_value = "out")]
    pub out_dir: String,

    /// Project class: device, build or sample.
    #[arg(long, value_name = "CLASS", default_value = "device")]
    pub class: String,

    /// Parallel build jobs passed to the build mechanism.
    #[arg(long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Build only PIE variants.
    #[arg(long, conflicts_with = "no_pie")]
    pub pie: bool,

    /// Build only non-PIE variants.
    #[arg(long)]
    pub no_pie: bool,

    /// Toolchain version, e.g. "4.9" or "clang3.6".
    #[arg(long, value_name = "VERSION")]
    pub toolchain_version: Option<String>,

    /// Keep testing remaining variants and projects after a failure.
    #[arg(long)]
    pub keep_going: bool,

    /// Restrict device runs to these ABIs.
    #[arg(long, value_name = "ABIS", value_delimiter = ',')]
    pub abis: Option<Vec<String>>,

    /// Per-executable timeout (seconds) for device runs; projects may
    /// override it via `single-run-timeout`.
    #[arg(long, value_name = "SECONDS", default_value_t = 900)]
    pub timeout: u64,

    /// Run long projects too (otherwise only explicitly selected ones).
    #[arg(long)]
    pub full_testing: bool,

    /// Explicitly selected project names (repeatable).
    #[arg(long = "test", value_name = "NAME")]
    pub tests: Vec<String>,

    /// adb executable forwarded to the device runner.
    #[arg(long, value_name = "PATH")]
    pub adb: Option<String>,

    /// Only run on emulators carrying this tag.
    #[arg(long, value_name = "TAG")]
    pub emulator_tag: Option<String>,

    /// Device-side directory for deployed binaries.
    #[arg(long, value_name = "PATH", default_value = "/data/local/tmp/ndk-tests")]
    pub device_path: String,

    /// Skip host-side validation even if a recipe exists.
    #[arg(long)]
    pub disable_host_tests: bool,

    /// Host compilers for host validation (repeatable; default: cc).
    #[arg(long = "host-cc", value_name = "CC")]
    pub host_compilers: Vec<String>,

    /// GNU make executable used for host validation recipes.
    #[arg(long, value_name = "PATH", default_value = "make")]
    pub make: String,

    /// Extra symbol directories passed to the device runner (repeatable).
    #[arg(long = "symbols-dir", value_name = "PATH")]
    pub symbols_dirs: Vec<String>,

    /// Prefix for machine-readable result events on stdout.
    #[arg(long, value_name = "PREFIX")]
    pub mro_prefix: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `NDKDRIVE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
