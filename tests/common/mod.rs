//! Shared test helpers

#![allow(dead_code)]

pub mod mock_git;

pub use mock_git::MockGit;

use git_broadcast::broadcast::BroadcastOptions;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Options pointing at `dir` with everything else defaulted
pub fn options_in(dir: &Path) -> BroadcastOptions {
    BroadcastOptions {
        working_dir: Some(dir.to_path_buf()),
        ..Default::default()
    }
}

/// Run git in `dir`, panicking on failure; returns trimmed stdout
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn configure_identity(dir: &Path) {
    git(dir, &["config", "user.email", "test@test.com"]);
    git(dir, &["config", "user.name", "Test"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
    git(dir, &["config", "merge.ff", "true"]);
}

/// An `origin` repository and a `local` clone of it inside one temp dir
pub struct TempGitRepos {
    temp: TempDir,
    origin: PathBuf,
    local: PathBuf,
}

impl TempGitRepos {
    /// Origin with two commits on `main` (readme "initial commit" then
    /// "secondary commit"); local is a fresh clone
    pub fn new() -> Self {
        let temp = TempDir::new().expect("tempdir");
        let origin = temp.path().join("origin");
        let local = temp.path().join("local");
        fs::create_dir(&origin).expect("create origin");

        git(&origin, &["init", "--initial-branch=main"]);
        configure_identity(&origin);
        write_file(&origin, "readme.md", "initial commit\n");
        commit_all(&origin, ":tada: initial commit");
        write_file(&origin, "readme.md", "secondary commit\n");
        commit_all(&origin, ":memo: update readme");

        git(
            temp.path(),
            &["clone", origin.to_str().expect("utf-8 path"), "local"],
        );
        configure_identity(&local);

        Self {
            temp,
            origin,
            local,
        }
    }

    /// Path of the origin repository
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    /// Path of the local clone
    pub fn local(&self) -> &Path {
        &self.local
    }

    /// Create `branch` in the clone from `main~1` with one extra commit
    pub fn branch_from_first_commit(&self, branch: &str, file: &str, contents: &str) {
        git(&self.local, &["checkout", "-b", branch, "main~1"]);
        write_file(&self.local, file, contents);
        commit_all(&self.local, &format!("work on {branch}"));
    }

    /// Commit id of `reference` in the clone
    pub fn rev(&self, reference: &str) -> String {
        git(&self.local, &["rev-parse", reference])
    }

    /// Latest commit subject of `reference` in the clone
    pub fn subject(&self, reference: &str) -> String {
        git(&self.local, &["log", "-1", "--format=%s", reference])
    }

    /// Branch currently checked out in the clone
    pub fn current_branch(&self) -> String {
        git(&self.local, &["branch", "--show-current"])
    }
}

impl Default for TempGitRepos {
    fn default() -> Self {
        Self::new()
    }
}

/// Write a file relative to `dir`
pub fn write_file(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).expect("write file");
}

/// Stage everything and commit
pub fn commit_all(dir: &Path, message: &str) {
    git(dir, &["add", "-A"]);
    git(dir, &["commit", "-m", message]);
}
