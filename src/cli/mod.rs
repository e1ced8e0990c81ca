//! CLI plumbing for the `git-broadcast` binary

mod broadcast;
mod logging;
pub mod style;
mod summary;

pub use broadcast::{BroadcastArgs, run_broadcast};
pub use logging::init_logging;
