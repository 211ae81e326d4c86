//! Fetch and fast-forward engine.
//!
//! For every repository the dispatcher hands us, [`update_repository`] picks
//! the remotes to fetch (all of them, or only the one tracked by the active
//! branch), fetches them in order, and then fast-forwards each local branch
//! whose upstream is valid. The checked-out branch goes through the working
//! tree so uncommitted state is respected; every other branch is a pure ref
//! move. Being ahead of or level with upstream counts as up to date; only a
//! branch strictly behind its upstream is touched.

use crate::core::dispatch::dispatch;
use crate::core::error::{GitupError, Result};
use crate::core::git::{FastForward, FetchOutcome, GitRepo};
use crate::core::output::{self, FetchLine, INDENT2};
use colored::*;

/// Immutable per-invocation update policy.
#[derive(Debug, Clone, Copy)]
pub struct UpdateOptions {
    /// Only fetch the remote tracked by the active branch.
    pub current_only: bool,
    /// Fetch remotes but skip branch fast-forwarding.
    pub fetch_only: bool,
    /// Prune remote-tracking refs deleted on the remote.
    pub prune: bool,
    /// Max recursion depth; -1 is unlimited, 0 disables recursion.
    pub max_depth: i32,
}

/// Per-branch result of one update attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchOutcome {
    NoUpstream,
    NoRevisions,
    UpstreamGone,
    NoMergeBase,
    UpToDate,
    Done,
    NotFastForward,
    UncommittedChanges,
}

impl BranchOutcome {
    fn message(&self) -> String {
        match self {
            BranchOutcome::NoUpstream => output::skipped("no upstream is tracked."),
            BranchOutcome::NoRevisions => output::skipped("branch has no revisions."),
            BranchOutcome::UpstreamGone => output::skipped("upstream does not exist."),
            BranchOutcome::NoMergeBase => {
                output::skipped("can't find merge base with upstream.")
            }
            BranchOutcome::UpToDate => format!("{}.", output::up_to_date()),
            BranchOutcome::Done => format!("{}.", output::done()),
            BranchOutcome::NotFastForward => output::skipped("not possible to fast-forward."),
            BranchOutcome::UncommittedChanges => output::skipped("uncommitted changes."),
        }
    }
}

/// Updates every bookmarked path. An empty bookmark list gets a hint instead
/// of silence.
pub fn update_bookmarks(bookmarks: &[String], opts: &UpdateOptions) {
    if bookmarks.is_empty() {
        println!("You don't have any bookmarks configured! Get help with 'gitup -h'.");
        return;
    }
    for path in bookmarks {
        dispatch(path, opts.max_depth, |repo, name| {
            update_repository(repo, name, opts);
        });
    }
}

/// Updates a list of directories supplied as command arguments.
pub fn update_directories(paths: &[String], opts: &UpdateOptions) {
    for path in paths {
        dispatch(path, opts.max_depth, |repo, name| {
            update_repository(repo, name, opts);
        });
    }
}

/// Runs the full fetch-and-update sequence on one repository. All failures
/// are reported inline and stay local to this repository.
pub fn update_repository(repo: &GitRepo, name: &str, opts: &UpdateOptions) {
    output::print_repo_header(name);

    let remotes = match select_remotes(repo, opts.current_only) {
        Ok(remotes) => remotes,
        Err(err) => {
            output::print_repo_error(&err.to_string());
            return;
        }
    };

    if !fetch_remotes(repo, &remotes, opts.prune) {
        // A fetch failure aborts the rest of this repository's update.
        return;
    }

    if opts.fetch_only {
        return;
    }

    let branches = match repo.local_branches() {
        Ok(branches) => branches,
        Err(err) => {
            output::print_repo_error(&err.to_string());
            return;
        }
    };
    let active = repo.active_branch();
    for branch in branches {
        let is_active = active.as_deref() == Some(branch.as_str());
        let result = match update_branch(repo, &branch, is_active) {
            Ok(outcome) => outcome.message(),
            Err(err) => output::inline_error(&error_message(&err)),
        };
        println!("{}Updating {}: {}", INDENT2, branch.bold(), result);
    }
}

/// Picks the remotes to fetch according to the policy. With `current_only`
/// an active branch with a tracked upstream is required.
fn select_remotes(repo: &GitRepo, current_only: bool) -> Result<Vec<String>> {
    let remotes = if current_only {
        let active = repo.active_branch().ok_or(GitupError::DetachedHead)?;
        let tracking = repo
            .tracking_branch(&active)
            .ok_or(GitupError::NoTrackedRemote)?;
        vec![tracking.remote]
    } else {
        repo.remote_names()?
    };
    if remotes.is_empty() {
        return Err(GitupError::NoRemotesConfigured);
    }
    Ok(remotes)
}

/// Fetches each remote in order, with an in-place progress line. Returns
/// false when a fetch failed, which stops remaining work on this repository.
fn fetch_remotes(repo: &GitRepo, remotes: &[String], prune: bool) -> bool {
    for remote in remotes {
        let line = FetchLine::new(remote);

        match repo.has_fetch_refspec(remote) {
            Ok(true) => {}
            Ok(false) => {
                line.finish(&output::skipped("no configured refspec."));
                continue;
            }
            Err(err) => {
                line.finish(&output::inline_error(&error_message(&err)));
                return false;
            }
        }

        let mut progress_line = line;
        let result = repo.fetch(remote, prune, |received, total| {
            progress_line.progress(received, total);
        });
        match result {
            Ok(outcome) => progress_line.finish(&format!("{}.", fetch_summary(&outcome))),
            Err(err) => {
                progress_line.finish(&output::inline_error(&error_message(&err)));
                return false;
            }
        }
    }
    true
}

/// Aggregates a fetch's touched refs into the one-line summary, e.g.
/// "new branch (feature), 2 branch updates (main, dev)".
fn fetch_summary(outcome: &FetchOutcome) -> String {
    let groups: [(&Vec<String>, &str, &str); 3] = [
        (&outcome.new_branches, "new branch", "new branches"),
        (&outcome.new_tags, "new tag", "new tags"),
        (&outcome.updates, "branch update", "branch updates"),
    ];

    let mut parts = Vec::new();
    for (names, singular, plural) in groups {
        if names.is_empty() {
            continue;
        }
        let desc = if names.len() == 1 { singular } else { plural };
        parts.push(format!("{} ({})", desc.green().bold(), names.join(", ")));
    }
    if parts.is_empty() {
        output::up_to_date()
    } else {
        parts.join(", ")
    }
}

/// Attempts to update a single branch, without printing.
///
/// The merge base against the upstream tip decides everything: equal to the
/// upstream tip means the branch already contains upstream (up to date, even
/// when ahead); equal to the branch tip means a clean fast-forward; anything
/// else is divergence and the branch is left untouched.
pub fn update_branch(repo: &GitRepo, branch: &str, is_active: bool) -> Result<BranchOutcome> {
    if repo.tracking_branch(branch).is_none() {
        return Ok(BranchOutcome::NoUpstream);
    }
    let Some(tip) = repo.branch_tip(branch) else {
        return Ok(BranchOutcome::NoRevisions);
    };
    let Some(upstream_tip) = repo.upstream_tip(branch) else {
        return Ok(BranchOutcome::UpstreamGone);
    };

    let base = match repo.merge_base(tip, upstream_tip) {
        Ok(base) => base,
        Err(_) => return Ok(BranchOutcome::NoMergeBase),
    };
    if base == upstream_tip {
        return Ok(BranchOutcome::UpToDate);
    }
    if base != tip {
        return Ok(BranchOutcome::NotFastForward);
    }

    if is_active {
        match repo.fast_forward_active(branch, upstream_tip)? {
            FastForward::Done => Ok(BranchOutcome::Done),
            FastForward::UncommittedChanges => Ok(BranchOutcome::UncommittedChanges),
            FastForward::NotPossible => Ok(BranchOutcome::NotFastForward),
        }
    } else {
        if !repo.is_descendant(upstream_tip, tip)? {
            return Ok(BranchOutcome::NotFastForward);
        }
        repo.force_update_branch(branch, upstream_tip)?;
        Ok(BranchOutcome::Done)
    }
}

/// Best-effort single-line message for inline error reporting.
fn error_message(err: &GitupError) -> String {
    let raw = match err {
        GitupError::Git(git_err) => git_err.message().to_string(),
        other => other.to_string(),
    };
    let mut message = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if message.is_empty() {
        message = "unknown git error".to_string();
    }
    if !message.ends_with('.') {
        message.push('.');
    }
    message
}
