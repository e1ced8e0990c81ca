//! Error types for git-broadcast

use crate::types::ProcessOutput;
use thiserror::Error;

/// Errors raised while broadcasting a branch
#[derive(Debug, Error)]
pub enum Error {
    /// More than one remote is configured for the repository
    #[error("multiple remotes are not supported (found: {})", .0.join(", "))]
    MultipleRemotes(Vec<String>),

    /// No `--from` given and no default branch could be detected
    #[error("cannot determine default branch and no explicit branch set to start from")]
    NoSourceBranch,

    /// A required target spec matched no branches
    #[error("can't match branch spec '{0}'")]
    UnmatchedSpec(String),

    /// A git command exited with a non-zero status
    #[error("`{command}` failed{}", exit_suffix(.output))]
    CommandFailed {
        /// The command line that was run
        command: String,
        /// Captured output of the failed command
        output: ProcessOutput,
    },

    /// A git command could not be started at all
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        /// The command line that was attempted
        command: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Captured output of a failed command, if this error carries one
    pub const fn process_output(&self) -> Option<&ProcessOutput> {
        match self {
            Self::CommandFailed { output, .. } => Some(output),
            _ => None,
        }
    }
}

fn exit_suffix(output: &ProcessOutput) -> String {
    output
        .exit_code
        .map_or_else(String::new, |code| format!(" with exit code {code}"))
}

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;
