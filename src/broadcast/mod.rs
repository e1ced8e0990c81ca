//! Broadcast engine
//!
//! Split the same way as the rest of the crate:
//! 1. Options - defaults and the ignore set (`options`)
//! 2. Plan - pure target resolution, history comparison, log parsing (`plan`)
//! 3. Execute - the git-driving state machine (`execute`), with per-run
//!    state held in a [`RunContext`]

mod context;
mod execute;
mod options;
mod plan;

pub use context::RunContext;
pub use execute::{RestorePoint, best_effort, broadcast, git_broadcast, try_merge};
pub use options::{
    BroadcastOptions, DEFAULT_MAX_ERROR_LINES, DEFAULT_REMOTE, IGNORE_ENV_VAR, MATCH_ALL,
};
pub use plan::{
    MergeAttempt, SkipReason, author_from_log, fully_qualified, histories_equivalent,
    parse_author_line, resolve_targets, strip_remote,
};
