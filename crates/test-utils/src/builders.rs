// crates/test-utils/src/builders.rs

//! Chained builders for the fixtures most tests need.

use std::path::PathBuf;

use serde_json::Value;

use ndkdrive::config::DriveOptions;
use ndkdrive::project::{Project, Properties};
use ndkdrive::types::ProjectClass;

/// Builds a [`Project`] without touching any filesystem.
pub struct ProjectBuilder {
    path: PathBuf,
    class: ProjectClass,
    properties: Properties,
}

impl ProjectBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            path: PathBuf::from("/projects").join(name),
            class: ProjectClass::Device,
            properties: Properties::default(),
        }
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    pub fn class(mut self, class: ProjectClass) -> Self {
        self.class = class;
        self
    }

    pub fn broken(mut self) -> Self {
        self.properties.broken = true;
        self
    }

    pub fn long(mut self) -> Self {
        self.properties.long = true;
        self
    }

    pub fn broken_toolchain_type(mut self, prefix: &str) -> Self {
        self.properties
            .broken_toolchain_type
            .push(prefix.to_string());
        self
    }

    pub fn broken_toolchain_version(mut self, version: &str) -> Self {
        self.properties
            .broken_toolchain_version
            .push(version.to_string());
        self
    }

    pub fn onhost_disabled_os(mut self, os: &str) -> Self {
        self.properties.onhost_disabled_os.push(os.to_string());
        self
    }

    pub fn onhost_disabled_cc(mut self, cc: &str) -> Self {
        self.properties.onhost_disabled_cc.push(cc.to_string());
        self
    }

    pub fn broken_run(mut self, exe: &str) -> Self {
        self.properties.broken_run.push(exe.to_string());
        self
    }

    pub fn single_run_timeout(mut self, seconds: u64) -> Self {
        self.properties.single_run_timeout = Some(seconds);
        self
    }

    pub fn runner_options(mut self, exe: &str, options: Value) -> Self {
        self.properties
            .adbrunner_options
            .insert(exe.to_string(), options);
        self
    }

    pub fn build(self) -> Project {
        Project::new(self.path, self.class, self.properties)
    }
}

/// Builds a [`DriveOptions`] starting from defaults.
pub struct OptionsBuilder {
    options: DriveOptions,
}

impl OptionsBuilder {
    pub fn new() -> Self {
        Self {
            options: DriveOptions {
                ndk: PathBuf::from("/ndk"),
                ..DriveOptions::default()
            },
        }
    }

    pub fn ndk(mut self, ndk: impl Into<PathBuf>) -> Self {
        self.options.ndk = ndk.into();
        self
    }

    pub fn out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.options.out_dir = out_dir.into();
        self
    }

    pub fn class(mut self, class: ProjectClass) -> Self {
        self.options.class = class;
        self
    }

    pub fn jobs(mut self, jobs: usize) -> Self {
        self.options.jobs = Some(jobs);
        self
    }

    pub fn pie(mut self, pie: bool) -> Self {
        self.options.pie = Some(pie);
        self
    }

    pub fn toolchain_version(mut self, version: &str) -> Self {
        self.options.toolchain_version = Some(version.to_string());
        self
    }

    pub fn keep_going(mut self) -> Self {
        self.options.keep_going = true;
        self
    }

    pub fn abis(mut self, abis: &[&str]) -> Self {
        self.options.abis = Some(abis.iter().map(|abi| abi.to_string()).collect());
        self
    }

    pub fn timeout(mut self, seconds: u64) -> Self {
        self.options.timeout = seconds;
        self
    }

    pub fn full_testing(mut self) -> Self {
        self.options.full_testing = true;
        self
    }

    pub fn select(mut self, name: &str) -> Self {
        self.options.selected.push(name.to_string());
        self
    }

    pub fn emulator_tag(mut self, tag: &str) -> Self {
        self.options.emulator_tag = Some(tag.to_string());
        self
    }

    pub fn disable_host_tests(mut self) -> Self {
        self.options.disable_host_tests = true;
        self
    }

    pub fn host_compilers(mut self, compilers: &[&str]) -> Self {
        self.options.host_compilers = compilers.iter().map(|cc| cc.to_string()).collect();
        self
    }

    pub fn symbols_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options.symbols_dirs.push(dir.into());
        self
    }

    pub fn build(self) -> DriveOptions {
        self.options
    }
}

impl Default for OptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
