// src/types.rs

use std::fmt;
use std::str::FromStr;

/// Which kind of test project this is.
///
/// Device projects are built for every PIE candidate and then run on
/// devices/emulators; build tests and samples only get a PIE build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectClass {
    Device,
    Build,
    Sample,
}

impl ProjectClass {
    /// Directory component used for build trees (`<out>/<class>/<name>`).
    pub fn dir_name(&self) -> &'static str {
        match self {
            ProjectClass::Device => "device",
            ProjectClass::Build => "build",
            ProjectClass::Sample => "samples",
        }
    }
}

impl fmt::Display for ProjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProjectClass::Device => "device test",
            ProjectClass::Build => "build test",
            ProjectClass::Sample => "sample",
        };
        f.write_str(label)
    }
}

impl FromStr for ProjectClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "device" => Ok(ProjectClass::Device),
            "build" => Ok(ProjectClass::Build),
            "sample" | "samples" => Ok(ProjectClass::Sample),
            other => Err(format!(
                "invalid project class: {other} (expected \"device\", \"build\" or \"sample\")"
            )),
        }
    }
}

/// Toolchain family derived from a toolchain version string.
///
/// Versions like `clang3.6` are clang; anything else (e.g. `4.9`) is gcc.
/// Clang cannot produce non-PIE executables, which the variant matrix
/// accounts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolchainFamily {
    Gcc,
    Clang,
}

impl ToolchainFamily {
    pub fn from_version(version: &str) -> Self {
        if version.starts_with("clang") {
            ToolchainFamily::Clang
        } else {
            ToolchainFamily::Gcc
        }
    }
}

/// Leading non-digit prefix of a toolchain version string, e.g. `clang` for
/// `clang3.6`. Used to match `broken-toolchain-type` metadata entries.
/// Versions with no such prefix (like `4.9`) yield `None`.
pub fn toolchain_type_prefix(version: &str) -> Option<&str> {
    let end = version
        .find(|c: char| c.is_ascii_digit() || c == '-')
        .unwrap_or(version.len());
    if end == 0 { None } else { Some(&version[..end]) }
}
