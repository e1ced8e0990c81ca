//! git-broadcast: merge one source branch into many target branches
//!
//! Targets are named by branch name or glob. Each target can opt out by
//! committing a `.git-broadcast` file with `{"detached": true}`. Conflicts
//! are aborted and recorded; successful merges can be pushed back.
//!
//! ```no_run
//! use git_broadcast::broadcast::{BroadcastOptions, broadcast};
//!
//! # async fn run() -> git_broadcast::error::Result<()> {
//! let options = BroadcastOptions {
//!     from: Some("main".to_string()),
//!     to: vec!["env/*".to_string()],
//!     push: true,
//!     ..Default::default()
//! };
//! let result = broadcast(&options).await?;
//! println!("merged into {} branches", result.merged.len());
//! # Ok(())
//! # }
//! ```

pub mod broadcast;
pub mod detach;
pub mod error;
pub mod git;
pub mod refs;
pub mod style;
pub mod types;

pub use broadcast::{BroadcastOptions, broadcast, git_broadcast};
pub use error::{Error, Result};
pub use types::BroadcastResult;
