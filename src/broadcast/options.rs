//! Broadcast options and their defaults

use crate::refs::IgnoreSet;
use crate::style::{LogFormatter, PlainFormatter};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Environment variable holding extra branch names to ignore (comma-separated)
pub const IGNORE_ENV_VAR: &str = "GIT_BROADCAST_IGNORE";

/// Remote used for both source and target when none is given
pub const DEFAULT_REMOTE: &str = "origin";

/// Target spec matching every branch
pub const MATCH_ALL: &str = "*";

/// Lines kept per output stream of a failed merge
pub const DEFAULT_MAX_ERROR_LINES: usize = 10;

/// Options for a broadcast run
#[derive(Clone)]
pub struct BroadcastOptions {
    /// Source branch; defaults to the repository's detected default branch
    pub from: Option<String>,
    /// Target specs (names or globs); empty means [`MATCH_ALL`]
    pub to: Vec<String>,
    /// Remote the source branch is read from
    pub from_remote: String,
    /// Remote targets are matched against and pushed to
    pub to_remote: String,
    /// Push successfully merged targets
    pub push: bool,
    /// Tolerate specs that match nothing
    pub ignore_missing_branches: bool,
    /// Branch names (or trailing segments) never used as targets
    pub ignore: Vec<String>,
    /// Repository directory; defaults to the current directory
    pub working_dir: Option<PathBuf>,
    /// Lines kept per output stream when recording a failed merge
    pub max_error_lines: usize,
    /// Message decoration policy
    pub formatter: Arc<dyn LogFormatter>,
}

impl Default for BroadcastOptions {
    fn default() -> Self {
        Self {
            from: None,
            to: vec![MATCH_ALL.to_string()],
            from_remote: DEFAULT_REMOTE.to_string(),
            to_remote: DEFAULT_REMOTE.to_string(),
            push: false,
            ignore_missing_branches: false,
            ignore: Vec::new(),
            working_dir: None,
            max_error_lines: DEFAULT_MAX_ERROR_LINES,
            formatter: Arc::new(PlainFormatter),
        }
    }
}

impl fmt::Debug for BroadcastOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BroadcastOptions")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("from_remote", &self.from_remote)
            .field("to_remote", &self.to_remote)
            .field("push", &self.push)
            .field("ignore_missing_branches", &self.ignore_missing_branches)
            .field("ignore", &self.ignore)
            .field("working_dir", &self.working_dir)
            .field("max_error_lines", &self.max_error_lines)
            .finish_non_exhaustive()
    }
}

impl BroadcastOptions {
    /// Target specs to visit, falling back to [`MATCH_ALL`]
    pub fn resolved_to(&self) -> Vec<String> {
        if self.to.is_empty() {
            vec![MATCH_ALL.to_string()]
        } else {
            self.to.clone()
        }
    }

    /// Ignore set from the options plus a comma-separated extra list
    pub fn ignore_set_with(&self, extra_csv: Option<&str>) -> IgnoreSet {
        let mut set = IgnoreSet::new(&self.ignore);
        if let Some(csv) = extra_csv {
            set.extend_from_csv(csv);
        }
        set
    }

    /// Ignore set from the options plus [`IGNORE_ENV_VAR`]
    pub fn ignore_set(&self) -> IgnoreSet {
        let env = std::env::var(IGNORE_ENV_VAR).ok();
        self.ignore_set_with(env.as_deref())
    }

    /// Repository directory commands run in
    pub fn repo_dir(&self) -> PathBuf {
        self.working_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
