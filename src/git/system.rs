//! Runner that spawns the system `git` executable

use super::{GitRunner, command_failed, command_line};
use crate::error::{Error, Result};
use crate::types::ProcessOutput;
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

/// Production [`GitRunner`] backed by `tokio::process`
#[derive(Debug, Clone)]
pub struct SystemGit {
    program: String,
}

impl SystemGit {
    /// Runner using `git` from `PATH`
    pub fn new() -> Self {
        Self::with_program("git")
    }

    /// Runner using a specific git executable
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SystemGit {
    fn default() -> Self {
        Self::new()
    }
}

fn split_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl GitRunner for SystemGit {
    async fn run(&self, dir: &Path, args: &[&str]) -> Result<ProcessOutput> {
        let output = Command::new(&self.program)
            .args(args)
            .current_dir(dir)
            // never block on credential prompts
            .env("GIT_TERMINAL_PROMPT", "0")
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| Error::Spawn {
                command: command_line(args),
                source,
            })?;

        let result = ProcessOutput {
            stdout: split_lines(&output.stdout),
            stderr: split_lines(&output.stderr),
            exit_code: output.status.code(),
        };

        if output.status.success() {
            Ok(result)
        } else {
            Err(command_failed(args, result))
        }
    }
}
