//! Per-branch opt-out via a committed `.git-broadcast` file.
//!
//! The file is read from the working tree of the branch being considered,
//! so a target decides for itself whether it receives broadcasts. Every
//! ambiguous state resolves to "detached".

use crate::style::LogFormatter;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::Path;
use tracing::warn;

/// Filename of the detachment config at the repository root.
pub const CONFIG_FILE: &str = ".git-broadcast";

/// Contents of the detachment config.
///
/// `None` means the field was absent, which is not the same as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DetachConfig {
    /// Whether the branch is opted out of broadcasts
    #[serde(default)]
    pub detached: Option<bool>,
    /// Legacy field from an older schema; never honoured
    #[serde(default)]
    pub ignore: Option<bool>,
}

/// Why a branch is treated as detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetachReason {
    /// Config file exists but could not be read
    Unreadable,
    /// Config file is empty or whitespace
    Empty,
    /// Config file is not a JSON object of the expected shape
    Unparseable,
    /// Config parsed but has no `detached` field
    FlagMissing,
    /// Config explicitly sets `"detached": true`
    Configured,
}

/// Outcome of evaluating the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetachPolicy {
    /// Branch receives broadcasts
    Attached,
    /// Branch is skipped
    Detached(DetachReason),
}

impl DetachPolicy {
    /// Whether the branch must be skipped
    pub const fn is_detached(self) -> bool {
        matches!(self, Self::Detached(_))
    }
}

/// Raw state of the config file on disk.
#[derive(Debug)]
pub enum ConfigFile {
    /// No file at the repository root
    Missing,
    /// File exists but reading it failed
    Unreadable(io::Error),
    /// File contents
    Contents(String),
}

/// Read the config file under `root`.
pub fn read_config_file(root: &Path) -> ConfigFile {
    let path = root.join(CONFIG_FILE);
    // symlinks and directories count as "present"
    if fs::symlink_metadata(&path).is_err() {
        return ConfigFile::Missing;
    }
    match fs::read_to_string(&path) {
        Ok(contents) => ConfigFile::Contents(contents),
        Err(e) => ConfigFile::Unreadable(e),
    }
}

/// Parse config contents, accepting only a JSON object.
///
/// Derived struct deserializers also accept sequences (`[true]`), so the
/// object shape is checked on the untyped value first.
pub fn parse_config(raw: &str) -> serde_json::Result<DetachConfig> {
    let value: Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        return Err(serde::de::Error::custom(
            "expected a JSON object at the top level",
        ));
    }
    serde_json::from_value(value)
}

/// Decide the policy for an already-read config file.
pub fn evaluate(file: &ConfigFile, style: &dyn LogFormatter) -> DetachPolicy {
    let raw = match file {
        ConfigFile::Missing => return DetachPolicy::Attached,
        ConfigFile::Unreadable(e) => {
            warn!(
                "{}",
                style.warn(&format!(
                    "config file `{CONFIG_FILE}` was found, but is unreadable ({e}); \
                     assuming branch is detached for now"
                ))
            );
            return DetachPolicy::Detached(DetachReason::Unreadable);
        }
        ConfigFile::Contents(raw) => raw,
    };

    if raw.trim().is_empty() {
        return DetachPolicy::Detached(DetachReason::Empty);
    }

    let config = match parse_config(raw) {
        Ok(config) => config,
        Err(e) => {
            warn!(
                "{}",
                style.error(&format!(
                    "unable to parse `{CONFIG_FILE}` as JSON ({e}):\n-----\n{raw}\n-----"
                ))
            );
            return DetachPolicy::Detached(DetachReason::Unparseable);
        }
    };

    match config.detached {
        Some(true) => DetachPolicy::Detached(DetachReason::Configured),
        Some(false) => DetachPolicy::Attached,
        None => {
            let legacy = if config.ignore.is_some() {
                " (the legacy \"ignore\" field is no longer honoured)"
            } else {
                ""
            };
            warn!(
                "{}",
                style.warn(&format!(
                    "\"detached\" not set in `{CONFIG_FILE}`{legacy}; assuming detached. \
                     Set \"detached\": false or remove the file to re-enable broadcasts \
                     to this branch"
                ))
            );
            DetachPolicy::Detached(DetachReason::FlagMissing)
        }
    }
}

/// Detachment policy for the branch currently checked out in `root`.
pub fn detach_policy(root: &Path, style: &dyn LogFormatter) -> DetachPolicy {
    evaluate(&read_config_file(root), style)
}

/// Whether `branch` (checked out in `root`) must be skipped.
pub fn is_detached(root: &Path, branch: &str, style: &dyn LogFormatter) -> bool {
    let policy = detach_policy(root, style);
    if policy.is_detached() {
        warn!(
            branch,
            "{}",
            style.warn(&format!(
                "`{branch}` is detached via config file. If this is not intended, \
                 remove or update the {CONFIG_FILE} file at the root of the repo"
            ))
        );
    }
    policy.is_detached()
}
