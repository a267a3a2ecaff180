// src/project.rs

//! Per-project metadata (`properties.json`) and the project handle.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::errors::{DriveError, Result};
use crate::fs::FileSystem;
use crate::types::{ProjectClass, toolchain_type_prefix};

/// Declarative per-project knobs, read-only for the driver.
///
/// Historical files are loose with types: flags may be booleans or truthy
/// strings ("true"/"yes"/"1"), list-valued keys may be a single scalar.
/// Both forms are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Properties {
    /// Project can't be built/run at all.
    #[serde(deserialize_with = "truthy")]
    pub broken: bool,

    /// Long-running project; only tested in full mode or when selected by
    /// name.
    #[serde(deserialize_with = "truthy")]
    pub long: bool,

    /// Toolchain type prefixes (e.g. "clang") this project is broken for.
    #[serde(deserialize_with = "one_or_many")]
    pub broken_toolchain_type: Vec<String>,

    /// Exact toolchain versions this project is broken for.
    #[serde(deserialize_with = "one_or_many")]
    pub broken_toolchain_version: Vec<String>,

    /// Host OS substrings for which host validation is disabled.
    #[serde(deserialize_with = "one_or_many")]
    pub onhost_disabled_os: Vec<String>,

    /// Host compilers for which host validation is disabled.
    #[serde(deserialize_with = "one_or_many")]
    pub onhost_disabled_cc: Vec<String>,

    /// Executable basenames excluded from device runs.
    #[serde(deserialize_with = "one_or_many")]
    pub broken_run: Vec<String>,

    /// Per-executable timeout override (seconds) for device runs.
    pub single_run_timeout: Option<u64>,

    /// Per-executable device-runner options, keyed by executable basename.
    pub adbrunner_options: HashMap<String, Value>,
}

impl Properties {
    /// Device-runner options for one executable.
    ///
    /// Missing or malformed (non-object) entries simply mean "no options".
    pub fn runner_options_for(&self, exe: &str) -> Option<&serde_json::Map<String, Value>> {
        self.adbrunner_options
            .get(exe)
            .and_then(Value::as_object)
            .filter(|options| !options.is_empty())
    }
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}

fn truthy<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Truthy {
        Bool(bool),
        Str(String),
        Num(i64),
    }

    Ok(match Truthy::deserialize(deserializer)? {
        Truthy::Bool(value) => value,
        Truthy::Str(value) => {
            let lower = value.to_lowercase();
            lower.starts_with("true") || lower.starts_with("yes") || lower.starts_with('1')
        }
        Truthy::Num(value) => value != 0,
    })
}

/// One test project: a source directory plus its metadata.
#[derive(Debug, Clone)]
pub struct Project {
    pub path: PathBuf,
    pub name: String,
    pub class: ProjectClass,
    pub properties: Properties,
}

impl Project {
    pub fn new(path: impl Into<PathBuf>, class: ProjectClass, properties: Properties) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unnamed")
            .to_string();
        Self {
            path,
            name,
            class,
            properties,
        }
    }

    /// Load a project, reading `properties.json` when present.
    pub fn load(fs: &dyn FileSystem, path: impl Into<PathBuf>, class: ProjectClass) -> Result<Self> {
        let path = path.into();
        if !fs.is_dir(&path) {
            return Err(DriveError::ConfigError(format!(
                "no such project directory: {}",
                path.display()
            )));
        }

        let propf = path.join("properties.json");
        let properties = if fs.exists(&propf) {
            let contents = fs.read_to_string(&propf)?;
            serde_json::from_str(&contents)
                .with_context(|| format!("parsing {}", propf.display()))?
        } else {
            Properties::default()
        };

        Ok(Self::new(path, class, properties))
    }

    /// Whether the project is marked broken, either outright or for the
    /// active toolchain (by type prefix or exact version).
    pub fn broken_for(&self, toolchain_version: Option<&str>) -> bool {
        if self.properties.broken {
            return true;
        }

        let Some(version) = toolchain_version else {
            return false;
        };

        if let Some(prefix) = toolchain_type_prefix(version)
            && self
                .properties
                .broken_toolchain_type
                .iter()
                .any(|t| t == prefix)
        {
            return true;
        }

        self.properties
            .broken_toolchain_version
            .iter()
            .any(|v| v == version)
    }
}

/// Basename helper used for exclusion matching and option lookup.
pub fn exe_basename(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or("")
}
