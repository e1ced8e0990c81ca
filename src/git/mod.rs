//! Git command execution
//!
//! The engine never touches repository internals. It only drives the `git`
//! command line through [`GitRunner`], which makes every step scriptable in
//! tests.

mod system;

pub use system::SystemGit;

use crate::error::{Error, Result};
use crate::types::ProcessOutput;
use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

/// Runs git commands
///
/// Implementations must return `Err(Error::CommandFailed { .. })` for a
/// non-zero exit, carrying the captured output so callers can inspect it.
#[async_trait]
pub trait GitRunner: Send + Sync {
    /// Run `git <args>` inside `dir`
    async fn run(&self, dir: &Path, args: &[&str]) -> Result<ProcessOutput>;
}

/// Render a git command line for messages
pub fn command_line(args: &[&str]) -> String {
    let mut line = String::from("git");
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// Typed view of one repository, bound to a runner and a working directory
///
/// Each method maps to exactly one git invocation.
#[derive(Clone, Copy)]
pub struct GitRepo<'a> {
    runner: &'a dyn GitRunner,
    dir: &'a Path,
}

impl<'a> GitRepo<'a> {
    /// Bind a runner to a repository directory
    pub const fn new(runner: &'a dyn GitRunner, dir: &'a Path) -> Self {
        Self { runner, dir }
    }

    /// Repository directory commands run in
    pub const fn dir(&self) -> &'a Path {
        self.dir
    }

    /// Run an arbitrary git command
    pub async fn git(&self, args: &[&str]) -> Result<ProcessOutput> {
        debug!(command = %command_line(args), dir = %self.dir.display(), "running git");
        self.runner.run(self.dir, args).await
    }

    /// Configured remote names, deduplicated in listing order
    pub async fn remotes(&self) -> Result<Vec<String>> {
        let output = self.git(&["remote", "-v"]).await?;
        let mut names: Vec<String> = Vec::new();
        for line in &output.stdout {
            let Some(name) = line.split_whitespace().next() else {
                continue;
            };
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    /// Raw `git branch -a --list [spec]` lines
    ///
    /// The match-everything spec `*` is not passed through.
    pub async fn list_branches(&self, spec: Option<&str>) -> Result<Vec<String>> {
        let mut args = vec!["branch", "-a", "--list"];
        if let Some(spec) = spec.filter(|s| *s != "*") {
            args.push(spec);
        }
        Ok(self.git(&args).await?.stdout)
    }

    /// Current branch read straight from git, bypassing any listing cache
    ///
    /// Returns `None` on a detached HEAD.
    pub async fn show_current_branch(&self) -> Result<Option<String>> {
        let output = self.git(&["branch", "--show-current"]).await?;
        Ok(output
            .stdout
            .into_iter()
            .map(|line| line.trim().to_string())
            .find(|line| !line.is_empty()))
    }

    /// Commit id HEAD points at, if any
    pub async fn head_commit(&self) -> Result<Option<String>> {
        let output = self.git(&["rev-parse", "HEAD"]).await?;
        Ok(output
            .stdout
            .into_iter()
            .map(|line| line.trim().to_string())
            .find(|line| !line.is_empty()))
    }

    /// `git fetch --unshallow`
    pub async fn fetch_unshallow(&self) -> Result<ProcessOutput> {
        self.git(&["fetch", "--unshallow"]).await
    }

    /// `git fetch --all`
    pub async fn fetch_all(&self) -> Result<ProcessOutput> {
        self.git(&["fetch", "--all"]).await
    }

    /// Force-checkout a branch or commit, discarding local modifications
    pub async fn checkout_force(&self, reference: &str) -> Result<ProcessOutput> {
        self.git(&["checkout", "-f", reference]).await
    }

    /// Commit ids reachable from `reference`, newest first
    pub async fn rev_list(&self, reference: &str) -> Result<Vec<String>> {
        Ok(self.git(&["rev-list", reference]).await?.stdout)
    }

    /// `git log -1 <reference>` lines
    pub async fn latest_log(&self, reference: &str) -> Result<Vec<String>> {
        Ok(self.git(&["log", "-1", reference]).await?.stdout)
    }

    /// Merge `reference` into the current checkout
    pub async fn merge(&self, reference: &str) -> Result<ProcessOutput> {
        self.git(&["merge", "--no-edit", reference]).await
    }

    /// Abort an in-progress merge
    pub async fn abort_merge(&self) -> Result<ProcessOutput> {
        self.git(&["merge", "--abort"]).await
    }

    /// Push `branch` to `remote`
    pub async fn push(&self, remote: &str, branch: &str) -> Result<ProcessOutput> {
        self.git(&["push", remote, branch]).await
    }
}

/// Build the error a runner returns for a non-zero exit
pub fn command_failed(args: &[&str], output: ProcessOutput) -> Error {
    Error::CommandFailed {
        command: command_line(args),
        output,
    }
}
