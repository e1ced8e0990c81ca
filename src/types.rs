//! Core types for git-broadcast

use serde::{Deserialize, Serialize};

/// Captured output of one git invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessOutput {
    /// Standard output, one entry per line
    pub stdout: Vec<String>,
    /// Standard error, one entry per line
    pub stderr: Vec<String>,
    /// Exit code (None when terminated by a signal)
    pub exit_code: Option<i32>,
}

impl ProcessOutput {
    /// Build a successful output from stdout lines
    pub fn from_stdout<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stdout: lines.into_iter().map(Into::into).collect(),
            stderr: Vec::new(),
            exit_code: Some(0),
        }
    }

    /// Whether the process exited cleanly
    pub const fn success(&self) -> bool {
        matches!(self.exit_code, Some(0))
    }

    /// Copy of this output with each stream cut to at most `max_lines` lines
    #[must_use]
    pub fn truncated(&self, max_lines: usize) -> Self {
        Self {
            stdout: self.stdout.iter().take(max_lines).cloned().collect(),
            stderr: self.stderr.iter().take(max_lines).cloned().collect(),
            exit_code: self.exit_code,
        }
    }
}

/// Author of the latest commit on the source branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorDetails {
    /// Author name
    pub name: String,
    /// Author email
    pub email: String,
}

impl AuthorDetails {
    /// Sentinel used when the commit log cannot be parsed
    pub fn unknown() -> Self {
        Self {
            name: "Unknown".to_string(),
            email: "unknown@no-reply.org".to_string(),
        }
    }
}

impl Default for AuthorDetails {
    fn default() -> Self {
        Self::unknown()
    }
}

/// A target that received the source branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeInfo {
    /// Target branch name
    pub target: String,
    /// Author name of the source's latest commit
    pub author_name: String,
    /// Author email of the source's latest commit
    pub author_email: String,
    /// Whether the merged target was pushed back to the remote
    pub pushed: bool,
}

impl MergeInfo {
    /// Unpushed merge record for `target`
    pub fn new(target: impl Into<String>, author: &AuthorDetails) -> Self {
        Self {
            target: target.into(),
            author_name: author.name.clone(),
            author_email: author.email.clone(),
            pushed: false,
        }
    }
}

/// A target whose merge attempt failed (usually a conflict)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedMerge {
    /// Target branch name
    pub target: String,
    /// Author name of the source's latest commit
    pub author_name: String,
    /// Author email of the source's latest commit
    pub author_email: String,
    /// Always false: failed merges are never pushed
    pub pushed: bool,
    /// Output of the failed merge, truncated per stream
    pub process_output: ProcessOutput,
}

impl FailedMerge {
    /// Failure record for `target`
    pub fn new(
        target: impl Into<String>,
        author: &AuthorDetails,
        process_output: ProcessOutput,
    ) -> Self {
        Self {
            target: target.into(),
            author_name: author.name.clone(),
            author_email: author.email.clone(),
            pushed: false,
            process_output,
        }
    }
}

/// Aggregate push outcome across a run
///
/// Stays `NotAttempted` until the first push. The first successful push
/// moves it to `AllPushed`; any failed push moves it to `Failed`, which is
/// terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PushStatus {
    /// No push has been attempted yet
    #[default]
    NotAttempted,
    /// Every attempted push succeeded
    AllPushed,
    /// At least one push failed
    Failed,
}

impl PushStatus {
    /// Record a successful push
    #[must_use]
    pub const fn after_success(self) -> Self {
        match self {
            Self::NotAttempted => Self::AllPushed,
            other => other,
        }
    }

    /// Record a failed push
    #[must_use]
    pub const fn after_failure(self) -> Self {
        Self::Failed
    }

    /// Collapse to the boolean reported in a finished result
    pub const fn pushed_all(self) -> bool {
        matches!(self, Self::AllPushed)
    }
}

/// Outcome of a broadcast run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastResult {
    /// Source branch that was broadcast
    pub from: String,
    /// Target specs as supplied (not the expanded branch names)
    pub to: Vec<String>,
    /// Whether unmatched specs were tolerated
    pub ignore_missing_branches: bool,
    /// Targets that received the source, in visit order
    pub merged: Vec<MergeInfo>,
    /// Targets whose merge failed, in visit order
    pub unmerged: Vec<FailedMerge>,
    /// True only if at least one push happened and none failed
    pub pushed_all: bool,
}

impl BroadcastResult {
    /// Check whether any target failed to merge
    pub fn has_failures(&self) -> bool {
        !self.unmerged.is_empty()
    }

    /// Whether `target` was visited with a recorded outcome
    pub fn contains_target(&self, target: &str) -> bool {
        self.merged.iter().any(|m| m.target == target)
            || self.unmerged.iter().any(|m| m.target == target)
    }
}

/// Accumulates a run's outcome; converted into a [`BroadcastResult`] at the end
#[derive(Debug, Clone)]
pub struct ResultBuilder {
    from: String,
    to: Vec<String>,
    ignore_missing_branches: bool,
    merged: Vec<MergeInfo>,
    unmerged: Vec<FailedMerge>,
    push_status: PushStatus,
}

impl ResultBuilder {
    /// Start an empty result for the given source and specs
    pub const fn new(from: String, to: Vec<String>, ignore_missing_branches: bool) -> Self {
        Self {
            from,
            to,
            ignore_missing_branches,
            merged: Vec::new(),
            unmerged: Vec::new(),
            push_status: PushStatus::NotAttempted,
        }
    }

    /// Append a successful merge
    pub fn record_merged(&mut self, info: MergeInfo) {
        self.merged.push(info);
    }

    /// Append a failed merge
    pub fn record_unmerged(&mut self, failed: FailedMerge) {
        self.unmerged.push(failed);
    }

    /// Fold one push outcome into the aggregate status
    pub fn record_push(&mut self, succeeded: bool) {
        self.push_status = if succeeded {
            self.push_status.after_success()
        } else {
            self.push_status.after_failure()
        };
    }

    /// Current aggregate push status
    pub const fn push_status(&self) -> PushStatus {
        self.push_status
    }

    /// Finish the run, coercing the push status to a boolean
    pub fn finish(self) -> BroadcastResult {
        BroadcastResult {
            from: self.from,
            to: self.to,
            ignore_missing_branches: self.ignore_missing_branches,
            merged: self.merged,
            unmerged: self.unmerged,
            pushed_all: self.push_status.pushed_all(),
        }
    }
}
