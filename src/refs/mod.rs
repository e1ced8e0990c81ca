//! Branch discovery
//!
//! [`RefLister`] wraps `git branch -a --list` with a cache that is filled
//! once per run; [`match_branches`] turns its raw lines into branch names.

mod matcher;

pub use matcher::{IgnoreSet, clean_listing, match_branches};

use crate::error::Result;
use crate::git::GitRepo;
use regex::Regex;
use std::sync::LazyLock;

static CURRENT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\s").expect("valid current-branch regex"));

static HEAD_POINTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"HEAD -> (.*)").expect("valid head-pointer regex"));

/// Remove the leading `* ` that marks the current branch
pub fn strip_current_marker(line: &str) -> String {
    CURRENT_MARKER.replace(line, "").into_owned()
}

/// Raw branch listing, populated at most once until cleared
///
/// The first call fills the cache with whatever the listing command
/// returned for that call's spec; later calls reuse it regardless of their
/// own spec. Call [`RefLister::clear`] after anything that changes refs.
#[derive(Debug, Default)]
pub struct RefLister {
    cache: Option<Vec<String>>,
}

impl RefLister {
    /// Empty lister
    pub const fn new() -> Self {
        Self { cache: None }
    }

    /// Raw listing lines, from cache when populated
    ///
    /// An empty result is returned but not cached, so the next call asks
    /// git again (possibly with a different spec).
    pub async fn list(&mut self, repo: &GitRepo<'_>, spec: Option<&str>) -> Result<Vec<String>> {
        if let Some(cached) = &self.cache {
            return Ok(cached.clone());
        }
        let lines = repo.list_branches(spec).await?;
        // an empty listing never counts as populated
        if !lines.is_empty() {
            self.cache = Some(lines.clone());
        }
        Ok(lines)
    }

    /// Drop the cached listing
    pub fn clear(&mut self) {
        self.cache = None;
    }

    /// Whether a listing is currently cached
    pub const fn is_cached(&self) -> bool {
        self.cache.is_some()
    }
}

/// Current branch named by a listing, `None` when HEAD is detached
pub fn current_branch_from_listing(lines: &[String]) -> Option<String> {
    let line = lines.iter().find(|l| l.starts_with('*'))?;
    let name = strip_current_marker(line).trim().to_string();
    // "(HEAD detached at 1a2b3c4)", "(no branch, rebasing dev)"
    if name.is_empty() || (name.starts_with('(') && name.ends_with(')')) {
        return None;
    }
    Some(name)
}

/// Default branch named by the remote `HEAD -> origin/<name>` pointer
pub fn default_branch_from_listing(lines: &[String]) -> Option<String> {
    let head_ref = lines
        .iter()
        .filter_map(|l| HEAD_POINTER.captures(l))
        .map(|c| c[1].trim().to_string())
        .find(|r| !r.is_empty())?;
    // drop the remote name: "origin/release/2.x" -> "release/2.x"
    let mut parts = head_ref.split('/');
    parts.next();
    let name = parts.collect::<Vec<_>>().join("/");
    (!name.is_empty()).then_some(name)
}
