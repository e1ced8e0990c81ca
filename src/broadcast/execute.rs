//! Broadcast execution - effectful operations
//!
//! Drives git through a [`GitRunner`]: resolve the source, fetch, visit each
//! target in order (checkout, detach check, equivalence check, merge, push)
//! and finally put the original checkout back.

use super::context::RunContext;
use super::options::BroadcastOptions;
use super::plan::{
    MergeAttempt, SkipReason, author_from_log, fully_qualified, histories_equivalent,
    resolve_targets,
};
use crate::detach::is_detached;
use crate::error::{Error, Result};
use crate::git::{GitRepo, GitRunner, SystemGit};
use crate::refs::IgnoreSet;
use crate::style::LogFormatter;
use crate::types::{
    AuthorDetails, BroadcastResult, FailedMerge, MergeInfo, ProcessOutput, ResultBuilder,
};
use std::future::Future;
use tracing::{debug, error, info, warn};

/// Where to return once every target has been visited
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestorePoint {
    /// A named branch
    Branch(String),
    /// A bare commit (the run started on a detached HEAD)
    Commit(String),
    /// Nothing could be determined; the checkout is left as is
    Nowhere,
}

/// Run a cleanup step whose failure must not mask anything else
///
/// Errors are logged and swallowed.
pub async fn best_effort<T, F>(what: &str, step: F)
where
    F: Future<Output = Result<T>>,
{
    if let Err(e) = step.await {
        warn!(error = %e, "{what} failed (ignored)");
    }
}

/// Broadcast using the system `git` executable
pub async fn broadcast(options: &BroadcastOptions) -> Result<BroadcastResult> {
    git_broadcast(&SystemGit::new(), options).await
}

/// Merge the source branch into every branch matched by `options.to`
///
/// Configuration problems (several remotes, no source, an unmatched
/// required spec) fail the whole run. Conflicts and push failures are
/// reported in the returned [`BroadcastResult`].
pub async fn git_broadcast(
    runner: &dyn GitRunner,
    options: &BroadcastOptions,
) -> Result<BroadcastResult> {
    let dir = options.repo_dir();
    let repo = GitRepo::new(runner, &dir);
    let mut ctx = RunContext::new(repo);
    let style = options.formatter.as_ref();

    let remotes = repo.remotes().await?;
    if remotes.len() > 1 {
        return Err(Error::MultipleRemotes(remotes));
    }

    let source = match &options.from {
        Some(from) => from.clone(),
        None => ctx.default_branch().await?.ok_or(Error::NoSourceBranch)?,
    };

    let restore = record_restore_point(&mut ctx, style).await?;

    ctx.fetch_once().await?;
    ctx.invalidate_listing();

    match visit_all(&mut ctx, options, &remotes, &source).await {
        Ok(result) => {
            restore_checkout(repo, &restore).await?;
            debug!("{}", style.success("all targets have been visited!"));
            Ok(result)
        }
        Err(e) => {
            best_effort("restoring original checkout", restore_checkout(repo, &restore)).await;
            Err(e)
        }
    }
}

async fn record_restore_point(
    ctx: &mut RunContext<'_>,
    style: &dyn LogFormatter,
) -> Result<RestorePoint> {
    if let Some(branch) = ctx.current_branch().await? {
        return Ok(RestorePoint::Branch(branch));
    }
    warn!("{}", style.warn("starting from a detached HEAD"));
    match ctx.repo().head_commit().await.ok().flatten() {
        Some(commit) => {
            warn!(
                "{}",
                style.warn(&format!(
                    "Unable to determine \"starting branch\"; when this process completes, \
                     this repo will be restored to `{commit}`"
                ))
            );
            Ok(RestorePoint::Commit(commit))
        }
        None => {
            warn!(
                "{}",
                style.warn(
                    "Unable to determine \"starting branch\"; when this process completes, \
                     this repo will not be restored to the original checkout"
                )
            );
            Ok(RestorePoint::Nowhere)
        }
    }
}

async fn restore_checkout(repo: GitRepo<'_>, restore: &RestorePoint) -> Result<()> {
    match restore {
        RestorePoint::Branch(reference) | RestorePoint::Commit(reference) => {
            repo.checkout_force(reference).await?;
        }
        RestorePoint::Nowhere => {}
    }
    Ok(())
}

async fn visit_all(
    ctx: &mut RunContext<'_>,
    options: &BroadcastOptions,
    remotes: &[String],
    source: &str,
) -> Result<BroadcastResult> {
    let specs = options.resolved_to();
    let ignore: IgnoreSet = options.ignore_set();
    let style = options.formatter.as_ref();
    let mut result = ResultBuilder::new(
        source.to_string(),
        specs.clone(),
        options.ignore_missing_branches,
    );

    for spec in &specs {
        let matches = ctx.match_branches(spec, &ignore).await?;
        let targets = resolve_targets(&matches, remotes, &options.to_remote, source);
        debug!(spec = %spec, ?matches, ?targets, "resolved target spec");

        if targets.is_empty() {
            if options.ignore_missing_branches {
                continue;
            }
            return Err(Error::UnmatchedSpec(spec.clone()));
        }

        for target in &targets {
            if !ctx.mark_visited(target) {
                debug!(branch = %target, spec = %spec, "already visited; skipping");
                continue;
            }
            match try_merge(ctx, options, source, target).await? {
                MergeAttempt::Merged(info) => {
                    let info =
                        push_if_requested(ctx.repo(), options, source, info, &mut result).await;
                    result.record_merged(info);
                }
                MergeAttempt::Conflict(failed) => {
                    debug!(
                        branch = %target,
                        "{}",
                        style.debug("adding to the unmerged collection")
                    );
                    result.record_unmerged(failed);
                }
                MergeAttempt::Equivalent | MergeAttempt::Skipped(_) => {}
            }
        }
    }

    Ok(result.finish())
}

async fn push_if_requested(
    repo: GitRepo<'_>,
    options: &BroadcastOptions,
    source: &str,
    mut info: MergeInfo,
    result: &mut ResultBuilder,
) -> MergeInfo {
    let style = options.formatter.as_ref();
    let remote = &options.to_remote;
    let target = info.target.clone();

    if !options.push {
        warn!(
            branch = %target,
            "{}",
            style.warn(&format!(
                "successful merge of `{target}` will NOT be pushed back to `{remote}` (disabled at cli)"
            ))
        );
        return info;
    }

    debug!(branch = %target, remote = %remote, "attempting push");
    match repo.push(remote, &target).await {
        Ok(_) => {
            info.pushed = true;
            result.record_push(true);
            info!(
                branch = %target,
                "{}",
                style.success(&format!(
                    "`{source}` merged into `{target}` and pushed to `{remote}`"
                ))
            );
        }
        Err(e) => {
            result.record_push(false);
            error!(
                branch = %target,
                "{}",
                style.error(&format!("push of `{target}` to `{remote}` fails: {e}"))
            );
        }
    }
    info
}

/// Visit one target: checkout, gate, compare, merge
pub async fn try_merge(
    ctx: &mut RunContext<'_>,
    options: &BroadcastOptions,
    source: &str,
    target: &str,
) -> Result<MergeAttempt> {
    let repo = ctx.repo();
    let style = options.formatter.as_ref();

    debug!(branch = %target, "{}", style.debug(&format!("check out target: `{target}`")));
    if let Err(e) = repo.checkout_force(target).await {
        // e.g. a remote's symbolic HEAD, which is never a merge target
        error!(
            branch = %target,
            error = %e,
            "{}",
            style.error(&format!("cannot check out `{target}`; skipping"))
        );
        return Ok(MergeAttempt::Skipped(SkipReason::CheckoutFailed));
    }

    if !matches!(repo.show_current_branch().await, Ok(Some(_))) {
        error!(branch = %target, "{}", style.error("can't find current branch!"));
        return Ok(MergeAttempt::Skipped(SkipReason::NoCurrentBranch));
    }

    if is_detached(repo.dir(), target, style) {
        return Ok(MergeAttempt::Skipped(SkipReason::Detached));
    }

    let qualified_source = fully_qualified(&options.from_remote, source);
    let source_history = repo.rev_list(&qualified_source).await?;
    let target_history = repo.rev_list(target).await?;
    if histories_equivalent(&source_history, &target_history) {
        debug!(
            branch = %target,
            "{}",
            style.success(&format!("`{target}` is equivalent to `{source}`"))
        );
        return Ok(MergeAttempt::Equivalent);
    }

    let author = repo
        .latest_log(&qualified_source)
        .await
        .map_or_else(|_| AuthorDetails::unknown(), |log| author_from_log(&log));

    debug!(
        branch = %target,
        "{}",
        style.debug(&format!("start merge: `{qualified_source}` -> `{target}`"))
    );
    match repo.merge(&qualified_source).await {
        Ok(_) => {
            debug!(
                branch = %target,
                "{}",
                style.success(&format!("successfully merged `{source}` -> `{target}`"))
            );
            Ok(MergeAttempt::Merged(MergeInfo::new(target, &author)))
        }
        Err(e) => {
            error!(
                branch = %target,
                "{}",
                style.error(&format!(
                    "could not merge `{source}` -> `{target}` (see error output for details)"
                ))
            );
            let output = failure_output(&e).truncated(options.max_error_lines);
            for line in output.stdout.iter().chain(&output.stderr) {
                error!(branch = %target, "{line}");
            }
            best_effort("aborting merge", repo.abort_merge()).await;
            Ok(MergeAttempt::Conflict(FailedMerge::new(target, &author, output)))
        }
    }
}

fn failure_output(e: &Error) -> ProcessOutput {
    e.process_output().cloned().unwrap_or_else(|| ProcessOutput {
        stdout: Vec::new(),
        stderr: vec![e.to_string()],
        exit_code: None,
    })
}
