//! Scripted git runner for engine tests
//!
//! Responses are keyed by the git argument string, so a test only scripts
//! the commands whose outcome matters to it.

#![allow(dead_code)]

use async_trait::async_trait;
use git_broadcast::error::{Error, Result};
use git_broadcast::git::{GitRunner, command_line};
use git_broadcast::types::ProcessOutput;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// Scripted response for one command line
#[derive(Debug, Clone)]
enum Response {
    Ok(Vec<String>),
    Fail(ProcessOutput),
}

/// Simple mock git runner
///
/// Commands are keyed by their argument string (`"checkout -f dev"`).
/// Unscripted commands succeed with no output, except:
/// - `branch -a --list [spec]` returns the configured listing
/// - `branch --show-current` returns the last successfully checked-out ref
///
/// Every call is recorded for verification.
pub struct MockGit {
    responses: Mutex<HashMap<String, Response>>,
    listing: Mutex<Vec<String>>,
    current: Mutex<Option<String>>,
    calls: Mutex<Vec<String>>,
}

impl MockGit {
    /// Mock with a single `origin` remote and no branches
    pub fn new() -> Self {
        let mock = Self {
            responses: Mutex::new(HashMap::new()),
            listing: Mutex::new(Vec::new()),
            current: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        };
        mock.set_remotes(&["origin"]);
        mock
    }

    /// Configure `git remote -v`
    pub fn set_remotes(&self, remotes: &[&str]) {
        let lines = remotes
            .iter()
            .flat_map(|r| {
                [
                    format!("{r}\tgit@example.com:{r}/repo.git (fetch)"),
                    format!("{r}\tgit@example.com:{r}/repo.git (push)"),
                ]
            })
            .collect();
        self.respond("remote -v", lines);
    }

    /// Configure the raw `git branch -a --list` output
    pub fn set_listing(&self, lines: &[&str]) {
        *self.listing.lock().unwrap() = lines.iter().map(|l| (*l).to_string()).collect();
    }

    /// Standard listing: `* <current>`, the given locals, and origin copies
    pub fn set_branches(&self, current: &str, others: &[&str]) {
        let mut lines = vec![format!("* {current}")];
        lines.extend(others.iter().map(|b| format!("  {b}")));
        lines.push(format!("  remotes/origin/HEAD -> origin/{current}"));
        lines.push(format!("  remotes/origin/{current}"));
        lines.extend(others.iter().map(|b| format!("  remotes/origin/{b}")));
        *self.listing.lock().unwrap() = lines;
        *self.current.lock().unwrap() = Some(current.to_string());
    }

    /// Configure `git rev-list <reference>`
    pub fn set_history(&self, reference: &str, ids: &[&str]) {
        self.respond(
            &format!("rev-list {reference}"),
            ids.iter().map(|s| (*s).to_string()).collect(),
        );
    }

    /// Give each target a history that differs from the source
    pub fn set_diverged(&self, targets: &[&str]) {
        for target in targets {
            self.set_history(target, &[&format!("{target}-tip"), "base"]);
        }
    }

    /// Configure the author of `<reference>`'s latest commit
    pub fn set_author(&self, reference: &str, name: &str, email: &str) {
        self.respond(
            &format!("log -1 {reference}"),
            vec![
                "commit 0123456789abcdef".to_string(),
                format!("Author: {name} <{email}>"),
                "Date:   Mon Jan 1 00:00:00 2024 +0000".to_string(),
            ],
        );
    }

    /// Succeed with the given stdout lines
    pub fn respond(&self, args: &str, stdout: Vec<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(args.to_string(), Response::Ok(stdout));
    }

    /// Fail with exit code 1 and the given output
    pub fn fail(&self, args: &str, stdout: &[&str], stderr: &[&str]) {
        self.responses.lock().unwrap().insert(
            args.to_string(),
            Response::Fail(ProcessOutput {
                stdout: stdout.iter().map(|s| (*s).to_string()).collect(),
                stderr: stderr.iter().map(|s| (*s).to_string()).collect(),
                exit_code: Some(1),
            }),
        );
    }

    /// Make a merge of `source` into `target` conflict
    ///
    /// Both histories differ, so the equivalence check does not short-circuit.
    pub fn conflict_on(&self, target: &str, source: &str, stdout: &[&str]) {
        self.set_history(target, &[&format!("{target}-tip"), "base"]);
        self.fail_merge_while_on(target, source, stdout);
    }

    fn fail_merge_while_on(&self, target: &str, source: &str, stdout: &[&str]) {
        self.fail(
            &format!("@{target} merge --no-edit {source}"),
            stdout,
            &["Automatic merge failed; fix conflicts and then commit the result."],
        );
    }

    // === Call tracking ===

    /// All recorded calls, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls equal to `args`
    pub fn call_count(&self, args: &str) -> usize {
        self.calls().iter().filter(|c| *c == args).count()
    }

    /// Number of calls starting with `prefix`
    pub fn calls_starting_with(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    /// Assert a call was made
    pub fn assert_called(&self, args: &str) {
        let calls = self.calls();
        assert!(
            calls.iter().any(|c| c == args),
            "expected `{args}` in calls: {calls:#?}"
        );
    }

    /// Assert a call was never made
    pub fn assert_not_called(&self, args: &str) {
        let calls = self.calls();
        assert!(
            !calls.iter().any(|c| c == args),
            "did not expect `{args}` in calls: {calls:#?}"
        );
    }

    /// Branch the mock believes is checked out
    pub fn current(&self) -> Option<String> {
        self.current.lock().unwrap().clone()
    }

    fn lookup(&self, key: &str) -> Option<Response> {
        let responses = self.responses.lock().unwrap();
        // responses scoped to the current checkout win ("@dev merge ...")
        if let Some(current) = self.current.lock().unwrap().as_deref() {
            if let Some(r) = responses.get(&format!("@{current} {key}")) {
                return Some(r.clone());
            }
        }
        responses.get(key).cloned()
    }
}

impl Default for MockGit {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GitRunner for MockGit {
    async fn run(&self, _dir: &Path, args: &[&str]) -> Result<ProcessOutput> {
        let key = args.join(" ");
        self.calls.lock().unwrap().push(key.clone());

        match self.lookup(&key) {
            Some(Response::Ok(stdout)) => {
                if args.first() == Some(&"checkout") {
                    *self.current.lock().unwrap() = args.last().map(|s| (*s).to_string());
                }
                return Ok(ProcessOutput::from_stdout(stdout));
            }
            Some(Response::Fail(output)) => {
                return Err(Error::CommandFailed {
                    command: command_line(args),
                    output,
                });
            }
            None => {}
        }

        match args {
            ["branch", "-a", "--list", ..] => {
                Ok(ProcessOutput::from_stdout(self.listing.lock().unwrap().clone()))
            }
            ["branch", "--show-current"] => Ok(ProcessOutput::from_stdout(
                self.current.lock().unwrap().clone(),
            )),
            ["checkout", "-f", reference] => {
                *self.current.lock().unwrap() = Some((*reference).to_string());
                Ok(ProcessOutput::from_stdout(Vec::<String>::new()))
            }
            _ => Ok(ProcessOutput::from_stdout(Vec::<String>::new())),
        }
    }
}
