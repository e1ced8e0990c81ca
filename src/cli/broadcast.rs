//! Broadcast command - merge the source branch into every matched target

use crate::cli::style::Stylize;
use crate::cli::summary::summary_lines;
use anstream::println;
use anyhow::Context;
use clap::Args;
use git_broadcast::broadcast::{
    BroadcastOptions, DEFAULT_MAX_ERROR_LINES, DEFAULT_REMOTE, MATCH_ALL, git_broadcast,
};
use git_broadcast::git::SystemGit;
use git_broadcast::style::{LogFormatter, PlainFormatter, Prefixed, PrettyFormatter};
use git_broadcast::types::BroadcastResult;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;

/// Arguments for a broadcast run
#[derive(Args, Debug, Clone)]
pub struct BroadcastArgs {
    /// Source branch which is to be merged into recipients (default: the remote's default branch)
    #[arg(short, long)]
    pub from: Option<String>,

    /// Branch, branches or glob (eg feature/*) which will have the source branch merged in
    #[arg(short, long, num_args = 1.., default_value = MATCH_ALL)]
    pub to: Vec<String>,

    /// Remote the source branch is read from
    #[arg(long, default_value = DEFAULT_REMOTE)]
    pub from_remote: String,

    /// Remote targets are matched against and pushed to
    #[arg(long, default_value = DEFAULT_REMOTE)]
    pub to_remote: String,

    /// Push successfully-merged branches when complete
    #[arg(short, long)]
    pub push: bool,

    /// Finding no matches for a particular --to glob does not raise an error
    #[arg(long)]
    pub ignore_missing_branches: bool,

    /// Run in the specified folder instead of the current working directory
    #[arg(short = 'i', long = "in", value_name = "DIR")]
    pub in_dir: Option<PathBuf>,

    /// Branch names to ignore (also read from GIT_BROADCAST_IGNORE, comma-separated)
    #[arg(long, num_args = 1..)]
    pub ignore: Vec<String>,

    /// Lines of merge output kept per stream for failed merges
    #[arg(long, default_value_t = DEFAULT_MAX_ERROR_LINES)]
    pub max_error_lines: usize,

    /// Print a summary of operations at the end (eg for piping into a notifier)
    #[arg(long)]
    pub print_summary: bool,

    /// Enable emoji and back-tick formatting (eg when forwarding to chat)
    #[arg(long)]
    pub pretty: bool,

    /// Prefix all logging with this string (eg the repository name)
    #[arg(long, value_name = "TEXT", default_value = "")]
    pub prefix_logs_with: String,
}

impl BroadcastArgs {
    /// Engine options for these arguments
    pub fn to_options(&self) -> BroadcastOptions {
        let formatter: Arc<dyn LogFormatter> = if self.pretty {
            Arc::new(Prefixed::new(self.prefix_logs_with.clone(), PrettyFormatter))
        } else {
            Arc::new(Prefixed::new(self.prefix_logs_with.clone(), PlainFormatter))
        };

        BroadcastOptions {
            from: self.from.clone(),
            to: self.to.clone(),
            from_remote: self.from_remote.clone(),
            to_remote: self.to_remote.clone(),
            push: self.push,
            ignore_missing_branches: self.ignore_missing_branches,
            ignore: self.ignore.clone(),
            working_dir: self.in_dir.clone(),
            max_error_lines: self.max_error_lines,
            formatter,
        }
    }
}

/// Exit code for a finished run
///
/// 2 when a requested push did not fully succeed or any target is unmerged.
pub fn exit_code_for(result: &BroadcastResult, push_requested: bool) -> u8 {
    let failed_to_push = push_requested && !result.pushed_all;
    if failed_to_push || result.has_failures() {
        2
    } else {
        0
    }
}

/// Run the broadcast command
pub async fn run_broadcast(args: &BroadcastArgs) -> anyhow::Result<ExitCode> {
    let options = args.to_options();
    debug!(?options, "starting broadcast");

    let result = git_broadcast(&SystemGit::new(), &options)
        .await
        .with_context(|| format!("broadcast in {} failed", options.repo_dir().display()))?;

    if args.print_summary {
        print_summary(&result);
    }

    Ok(ExitCode::from(exit_code_for(&result, args.push)))
}

fn print_summary(result: &BroadcastResult) {
    println!("{}", "Broadcast summary".emphasis());
    for line in summary_lines(result) {
        if line.starts_with("  ") {
            println!("{}", line.accent());
        } else {
            println!("{line}");
        }
    }
    if result.has_failures() {
        println!("{}", "Some targets could not be merged".warn());
    } else if !result.merged.is_empty() {
        println!("{}", "All merges succeeded".success());
    } else {
        println!("{}", "Nothing to merge".muted());
    }
}
