//! Run-scoped state
//!
//! A fresh [`RunContext`] is built for every broadcast, so the branch
//! listing cache, the fetch guard and the set of visited targets can never
//! leak between runs.

use crate::error::Result;
use crate::git::GitRepo;
use crate::refs::{
    IgnoreSet, RefLister, current_branch_from_listing, default_branch_from_listing,
    match_branches,
};
use std::collections::BTreeSet;
use tracing::debug;

/// State shared by every step of one broadcast run
pub struct RunContext<'a> {
    repo: GitRepo<'a>,
    lister: RefLister,
    fetched: bool,
    visited: BTreeSet<String>,
}

impl<'a> RunContext<'a> {
    /// Fresh context: empty listing cache, nothing fetched or visited
    pub const fn new(repo: GitRepo<'a>) -> Self {
        Self {
            repo,
            lister: RefLister::new(),
            fetched: false,
            visited: BTreeSet::new(),
        }
    }

    /// Repository the run operates on
    pub const fn repo(&self) -> GitRepo<'a> {
        self.repo
    }

    /// Whether remote history was fetched during this run
    pub const fn has_fetched(&self) -> bool {
        self.fetched
    }

    /// Fetch remote history once per run
    ///
    /// Tries `--unshallow` first (for shallow CI clones) and falls back to
    /// `--all` when that is refused.
    pub async fn fetch_once(&mut self) -> Result<()> {
        if self.fetched {
            return Ok(());
        }
        if let Err(e) = self.repo.fetch_unshallow().await {
            debug!(error = %e, "unshallow fetch refused, fetching all");
            self.repo.fetch_all().await?;
        }
        self.fetched = true;
        Ok(())
    }

    /// Record a visit to `target`
    ///
    /// Returns false when the target was already visited during this run,
    /// e.g. because two specs resolve to it.
    pub fn mark_visited(&mut self, target: &str) -> bool {
        self.visited.insert(target.to_string())
    }

    /// Forget the cached branch listing
    pub fn invalidate_listing(&mut self) {
        self.lister.clear();
    }

    /// Whether a branch listing is cached
    pub const fn listing_cached(&self) -> bool {
        self.lister.is_cached()
    }

    /// Current branch according to the (cached) listing
    pub async fn current_branch(&mut self) -> Result<Option<String>> {
        let lines = self.lister.list(&self.repo, None).await?;
        Ok(current_branch_from_listing(&lines))
    }

    /// Default branch according to the (cached) listing
    pub async fn default_branch(&mut self) -> Result<Option<String>> {
        let lines = self.lister.list(&self.repo, None).await?;
        Ok(default_branch_from_listing(&lines))
    }

    /// Branch names matching `spec`
    pub async fn match_branches(&mut self, spec: &str, ignore: &IgnoreSet) -> Result<Vec<String>> {
        match_branches(&mut self.lister, &self.repo, spec, ignore).await
    }
}
