//! Target spec matching

use super::{RefLister, strip_current_marker};
use crate::error::Result;
use crate::git::GitRepo;
use std::collections::BTreeSet;

/// Branch names that must never be treated as targets
///
/// A listing line is ignored when the whole line, the line without its
/// `remotes/<remote>/` prefix, or its last `/`-separated segment is in the set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    names: BTreeSet<String>,
}

impl IgnoreSet {
    /// Build from explicit names (blank entries are dropped)
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        set.extend(names);
        set
    }

    /// Add names, trimming whitespace and skipping blanks
    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.names.extend(
            names
                .into_iter()
                .map(|n| n.as_ref().trim().to_string())
                .filter(|n| !n.is_empty()),
        );
    }

    /// Add a comma-separated list, e.g. from an environment variable
    pub fn extend_from_csv(&mut self, csv: &str) {
        self.extend(csv.split(','));
    }

    /// Check a cleaned listing line against the set
    pub fn is_ignored(&self, line: &str) -> bool {
        if self.names.contains(line) {
            return true;
        }
        // "remotes/origin/env/qa" is also checked as "env/qa"
        if let Some(branch) = line
            .strip_prefix("remotes/")
            .and_then(|rest| rest.split_once('/'))
            .map(|(_, branch)| branch)
        {
            if self.names.contains(branch) {
                return true;
            }
        }
        line.rsplit('/')
            .next()
            .is_some_and(|last| self.names.contains(last))
    }

    /// Number of ignored names
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing is ignored
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Clean raw listing lines into candidate branch names
///
/// Strips the current-branch marker, trims, drops symbolic `->` pointers,
/// blank lines and ignored names, then deduplicates keeping listing order.
pub fn clean_listing(lines: &[String], ignore: &IgnoreSet) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();
    for line in lines {
        let name = strip_current_marker(line).trim().to_string();
        if name.is_empty() || name.contains(" -> ") || ignore.is_ignored(&name) {
            continue;
        }
        if !result.contains(&name) {
            result.push(name);
        }
    }
    result
}

/// Expand a target spec into branch names from the (cached) listing
pub async fn match_branches(
    lister: &mut RefLister,
    repo: &GitRepo<'_>,
    spec: &str,
    ignore: &IgnoreSet,
) -> Result<Vec<String>> {
    let lines = lister.list(repo, Some(spec)).await?;
    Ok(clean_listing(&lines, ignore))
}
