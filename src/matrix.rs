// src/matrix.rs

//! Enumeration of the legal (PIE, ABI) build/run combinations.
//!
//! The PIE candidate set must be fixed before building (it controls build
//! flags), while the true ABI set is only knowable from the build output
//! layout, so the two halves are applied at different points of the driver's
//! lifecycle: [`pie_candidates`] before, [`discover_abis`] +
//! [`filter_abis`] after.

use std::fmt;
use std::path::Path;

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::types::{ProjectClass, ToolchainFamily};

/// ABIs that only exist as 64-bit targets; these require PIE executables.
pub const ABIS_64_BIT: &[&str] = &["arm64-v8a", "x86_64", "mips64"];

/// One (PIE flag, ABI) combination a project is built and/or run under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub pie: bool,
    pub abi: Option<String>,
    pub toolchain: Option<String>,
}

impl Variant {
    pub fn new(pie: bool, toolchain: Option<String>) -> Self {
        Self {
            pie,
            abi: None,
            toolchain,
        }
    }

    pub fn with_abi(mut self, abi: impl Into<String>) -> Self {
        self.abi = Some(abi.into());
        self
    }
}

impl fmt::Display for Variant {
    /// Log suffix like ` clang3.6 +PIE: armeabi-v7a`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(toolchain) = &self.toolchain {
            write!(f, " {toolchain}")?;
        }
        if self.pie {
            write!(f, " +PIE")?;
        }
        if let Some(abi) = &self.abi {
            write!(f, ": {abi}")?;
        }
        Ok(())
    }
}

/// PIE values to build, in build order.
///
/// - A pinned value wins outright.
/// - Device projects default to `[false, true]`, everything else to `[true]`.
/// - Clang can't produce non-PIE binaries, so `false` is dropped for it; if
///   that empties the set, fall back to `[true]`.
pub fn pie_candidates(
    class: ProjectClass,
    pinned: Option<bool>,
    family: Option<ToolchainFamily>,
) -> Vec<bool> {
    let mut pies = match pinned {
        Some(pie) => vec![pie],
        None if class == ProjectClass::Device => vec![false, true],
        None => vec![true],
    };

    if family == Some(ToolchainFamily::Clang) {
        pies.retain(|&pie| pie);
    }
    if pies.is_empty() {
        pies.push(true);
    }
    pies
}

/// ABIs actually produced by a build, from the `libs/<abi>/` output layout.
pub fn discover_abis(fs: &dyn FileSystem, build_dir: &Path) -> Result<Vec<String>> {
    let libs = build_dir.join("libs");
    if !fs.is_dir(&libs) {
        return Ok(Vec::new());
    }

    let mut abis: Vec<String> = fs
        .read_dir(&libs)?
        .into_iter()
        .filter(|path| fs.is_dir(path))
        .filter_map(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map(str::to_string)
        })
        .collect();
    abis.sort();
    Ok(abis)
}

/// Filter discovered ABIs down to the ones eligible for a device run.
///
/// - The optional project allowlist applies first.
/// - 64-bit-only ABIs are dropped for non-PIE variants (those targets
///   require position-independent executables).
/// - `armeabi` is dropped under clang due to known incompatibility.
pub fn filter_abis(
    discovered: impl IntoIterator<Item = String>,
    allowlist: Option<&[String]>,
    pie: bool,
    family: Option<ToolchainFamily>,
) -> Vec<String> {
    discovered
        .into_iter()
        .filter(|abi| {
            if let Some(allowed) = allowlist
                && !allowed.iter().any(|a| a == abi)
            {
                return false;
            }
            if !pie && ABIS_64_BIT.contains(&abi.as_str()) {
                return false;
            }
            if abi == "armeabi" && family == Some(ToolchainFamily::Clang) {
                return false;
            }
            true
        })
        .collect()
}
