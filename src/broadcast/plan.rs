//! Broadcast planning - pure helpers
//!
//! Nothing here runs git. Target resolution, history comparison and log
//! parsing take plain data so they can be unit tested directly.

use crate::types::{AuthorDetails, FailedMerge, MergeInfo};
use regex::Regex;
use std::sync::LazyLock;

static AUTHOR_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Author: (.*) <(.*)>").expect("valid author regex"));

/// Why a target was passed over without a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// `git checkout -f <target>` failed
    CheckoutFailed,
    /// No branch is checked out after the checkout
    NoCurrentBranch,
    /// The target opted out via its config file
    Detached,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CheckoutFailed => write!(f, "checkout failed"),
            Self::NoCurrentBranch => write!(f, "no current branch"),
            Self::Detached => write!(f, "detached"),
        }
    }
}

/// Outcome of visiting one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeAttempt {
    /// Not merged and not recorded
    Skipped(SkipReason),
    /// Target history already equals the source; nothing to do
    Equivalent,
    /// Source merged into target
    Merged(MergeInfo),
    /// Merge failed and was aborted
    Conflict(FailedMerge),
}

/// `<remote>/<branch>`
pub fn fully_qualified(remote: &str, branch: &str) -> String {
    format!("{remote}/{branch}")
}

/// Strip a `remotes/<remote>/` prefix for any known remote
pub fn strip_remote<'a>(name: &'a str, remotes: &[String]) -> &'a str {
    for remote in remotes {
        let prefix = format!("remotes/{remote}/");
        if let Some(stripped) = name.strip_prefix(&prefix) {
            return stripped;
        }
    }
    name
}

/// Turn matcher output into the concrete branches to visit
///
/// Keeps local branches and remote branches of `to_remote`, strips the
/// remote prefix, deduplicates in first-seen order and drops `source`.
pub fn resolve_targets(
    matches: &[String],
    remotes: &[String],
    to_remote: &str,
    source: &str,
) -> Vec<String> {
    let wanted_remote = format!("remotes/{to_remote}/");
    let mut targets: Vec<String> = Vec::new();
    for name in matches {
        if name.starts_with("remotes/") && !name.starts_with(&wanted_remote) {
            continue;
        }
        let branch = strip_remote(name, remotes);
        if branch == source || targets.iter().any(|t| t == branch) {
            continue;
        }
        targets.push(branch.to_string());
    }
    targets
}

/// Whether two commit histories are identical
///
/// Both slices are newest-first (`git rev-list` order). Divergence nearly
/// always shows near the tip, so the comparison starts there.
pub fn histories_equivalent(left: &[String], right: &[String]) -> bool {
    left.len() == right.len() && left.iter().zip(right).all(|(a, b)| a == b)
}

/// Parse an `Author: Name <email>` log line
pub fn parse_author_line(line: &str) -> Option<AuthorDetails> {
    let captures = AUTHOR_LINE.captures(line)?;
    Some(AuthorDetails {
        name: captures[1].to_string(),
        email: captures[2].to_string(),
    })
}

/// Author of a `git log -1` entry, or the unknown sentinel
pub fn author_from_log(lines: &[String]) -> AuthorDetails {
    lines
        .iter()
        .filter(|l| l.to_lowercase().starts_with("author:"))
        .find_map(|l| parse_author_line(l))
        .unwrap_or_else(AuthorDetails::unknown)
}
