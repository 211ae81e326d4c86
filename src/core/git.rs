//! Git repository adapter.
//!
//! This module provides a high-level interface to git operations through the
//! [`GitRepo`] struct. It wraps the `git2` library and is the only module
//! allowed to import it; everything the walker, dispatcher and update engine
//! need from git flows through here as structured data and typed errors.
//!
//! # Public API
//! - [`GitRepo`]: Main interface for git repository operations
//! - [`FetchOutcome`]: per-remote classification of fetched refs
//! - [`FastForward`]: result of an active-branch fast-forward attempt
//! - [`TrackingBranch`]: a branch's configured upstream
//!
//! # Key Features
//! - **Typed open errors**: "path does not exist" and "path is not a
//!   repository" are distinct variants, which the walker relies on
//! - **Fetch with progress**: synchronous transfer-progress callback plus
//!   per-ref classification via the update-tips callback
//! - **Safe fast-forwards**: the active branch goes through a non-forcing
//!   working-tree checkout; other branches are pure ref moves

use crate::core::error::{GitupError, Result};
use git2::build::CheckoutBuilder;
use git2::{BranchType, FetchOptions, FetchPrune, RemoteCallbacks, Repository};
use std::path::Path;

pub use git2::Oid;

/// A branch's configured upstream, read from repository configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingBranch {
    /// Name of the remote owning the upstream ref, e.g. "origin".
    pub remote: String,
    /// Shorthand name of the upstream ref, e.g. "origin/main".
    pub name: String,
}

/// Refs touched by a single remote fetch, grouped for the summary line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub new_branches: Vec<String>,
    pub new_tags: Vec<String>,
    pub updates: Vec<String>,
}

impl FetchOutcome {
    pub fn is_empty(&self) -> bool {
        self.new_branches.is_empty() && self.new_tags.is_empty() && self.updates.is_empty()
    }
}

/// Result of attempting to fast-forward the checked-out branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FastForward {
    Done,
    /// The working tree has local changes the checkout would overwrite.
    UncommittedChanges,
    NotPossible,
}

pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Opens the repository at exactly the given path.
    ///
    /// Unlike `Repository::discover` this does not search parent directories;
    /// the walker depends on a child directory that merely lives inside a
    /// repository not being classified as one itself.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match Repository::open(path) {
            Ok(repo) => Ok(GitRepo { repo }),
            Err(_) if !path.exists() => Err(GitupError::path_not_found(path)),
            Err(_) => Err(GitupError::not_a_repository(path)),
        }
    }

    /// Returns true when the path is directly openable as a repository.
    pub fn is_repository<P: AsRef<Path>>(path: P) -> bool {
        Repository::open(path.as_ref()).is_ok()
    }

    /// The directory commands should run in: the working tree, or the git
    /// directory itself for a bare repository.
    pub fn workdir(&self) -> &Path {
        self.repo.workdir().unwrap_or_else(|| self.repo.path())
    }

    /// Names of all configured remotes, in configuration order.
    pub fn remote_names(&self) -> Result<Vec<String>> {
        let remotes = self.repo.remotes()?;
        Ok(remotes.iter().flatten().map(str::to_string).collect())
    }

    /// Whether the remote has at least one fetch refspec configured.
    pub fn has_fetch_refspec(&self, remote: &str) -> Result<bool> {
        let remote = self.repo.find_remote(remote)?;
        Ok(!remote.fetch_refspecs()?.is_empty())
    }

    /// Name of the checked-out branch, or `None` when HEAD is detached or
    /// the repository has no commits yet.
    pub fn active_branch(&self) -> Option<String> {
        let head = self.repo.head().ok()?;
        if head.is_branch() {
            head.shorthand().map(str::to_string)
        } else {
            None
        }
    }

    /// Names of all local branches, sorted for deterministic processing.
    pub fn local_branches(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = entry?;
            if let Some(name) = branch.name()? {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// The branch's configured upstream, or `None` when no upstream is set
    /// or the configured upstream no longer resolves (stale remote).
    pub fn tracking_branch(&self, branch: &str) -> Option<TrackingBranch> {
        let local = self.repo.find_branch(branch, BranchType::Local).ok()?;
        let upstream = local.upstream().ok()?;
        let name = upstream.name().ok()??.to_string();
        let refname = format!("refs/heads/{branch}");
        let remote = self.repo.branch_upstream_remote(&refname).ok()?;
        Some(TrackingBranch {
            remote: remote.as_str()?.to_string(),
            name,
        })
    }

    /// Tip commit of a local branch, or `None` for a branch with no
    /// revisions.
    pub fn branch_tip(&self, branch: &str) -> Option<Oid> {
        let local = self.repo.find_branch(branch, BranchType::Local).ok()?;
        local.get().target()
    }

    /// Tip commit of a branch's upstream, or `None` when the upstream ref
    /// does not exist.
    pub fn upstream_tip(&self, branch: &str) -> Option<Oid> {
        let local = self.repo.find_branch(branch, BranchType::Local).ok()?;
        let upstream = local.upstream().ok()?;
        upstream.get().target()
    }

    /// Most recent common ancestor of two commits.
    pub fn merge_base(&self, a: Oid, b: Oid) -> Result<Oid> {
        Ok(self.repo.merge_base(a, b)?)
    }

    /// Whether `commit` is a strict descendant of `ancestor`.
    pub fn is_descendant(&self, commit: Oid, ancestor: Oid) -> Result<bool> {
        Ok(self.repo.graph_descendant_of(commit, ancestor)?)
    }

    /// Fetches one remote using its configured refspecs.
    ///
    /// `on_progress` is invoked synchronously with (received, total) object
    /// counts while the blocking fetch runs. Each updated ref is classified
    /// through the update-tips callback: a ref that did not exist before is a
    /// new branch or new tag depending on its namespace, anything else is a
    /// branch update.
    pub fn fetch<F>(&self, remote: &str, prune: bool, mut on_progress: F) -> Result<FetchOutcome>
    where
        F: FnMut(usize, usize),
    {
        let mut remote = self.repo.find_remote(remote)?;
        let outcome = std::cell::RefCell::new(FetchOutcome::default());

        {
            let mut callbacks = RemoteCallbacks::new();
            callbacks.transfer_progress(|stats| {
                on_progress(stats.received_objects(), stats.total_objects());
                true
            });
            callbacks.update_tips(|refname, old, new| {
                let short = refname.rsplit('/').next().unwrap_or(refname).to_string();
                let mut outcome = outcome.borrow_mut();
                if old.is_zero() {
                    if refname.starts_with("refs/tags/") {
                        outcome.new_tags.push(short);
                    } else {
                        outcome.new_branches.push(short);
                    }
                } else if !new.is_zero() {
                    outcome.updates.push(short);
                }
                true
            });

            let mut options = FetchOptions::new();
            options.remote_callbacks(callbacks);
            if prune {
                options.prune(FetchPrune::On);
            }

            // An empty refspec list fetches the remote's configured refspecs.
            remote.fetch(&[] as &[&str], Some(&mut options), None)?;
        }

        Ok(outcome.into_inner())
    }

    /// Fast-forwards the checked-out branch to `target` through the working
    /// tree.
    ///
    /// The checkout is non-forcing, so uncommitted changes that would be
    /// overwritten surface as [`FastForward::UncommittedChanges`] and leave
    /// the working tree untouched. The branch ref is only moved once the
    /// checkout has succeeded.
    pub fn fast_forward_active(&self, branch: &str, target: Oid) -> Result<FastForward> {
        let object = self.repo.find_object(target, None)?;
        let mut checkout = CheckoutBuilder::new();
        checkout.safe();
        match self.repo.checkout_tree(&object, Some(&mut checkout)) {
            Ok(()) => {}
            Err(err) if err.code() == git2::ErrorCode::Conflict => {
                return Ok(FastForward::UncommittedChanges);
            }
            Err(_) => return Ok(FastForward::NotPossible),
        }
        let mut reference = self.repo.find_reference(&format!("refs/heads/{branch}"))?;
        reference.set_target(target, &format!("gitup: fast-forward {branch}"))?;
        Ok(FastForward::Done)
    }

    /// Moves a non-active branch ref directly to `target`, without touching
    /// the working tree. Callers must have verified the ancestor relationship
    /// first.
    pub fn force_update_branch(&self, branch: &str, target: Oid) -> Result<()> {
        let mut reference = self.repo.find_reference(&format!("refs/heads/{branch}"))?;
        reference.set_target(target, &format!("gitup: fast-forward {branch}"))?;
        Ok(())
    }

    /// Runs an arbitrary shell command with the repository as its working
    /// directory, returning the raw output.
    pub fn run_command(&self, command_line: &str) -> Result<std::process::Output> {
        let words = shell_words::split(command_line)?;
        let (program, args) = match words.split_first() {
            Some(split) => split,
            None => return Err(GitupError::command_not_found(command_line)),
        };

        let mut cmd = std::process::Command::new(program);
        cmd.args(args).current_dir(self.workdir());
        match cmd.output() {
            Ok(output) => Ok(output),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(GitupError::command_not_found(program.clone()))
            }
            Err(err) => Err(GitupError::Io(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn git(dir: &Path, args: &[&str]) {
        let status = std::process::Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .expect("failed to run git");
        assert!(status.status.success(), "git {args:?} failed");
    }

    fn setup_test_repo() -> (TempDir, GitRepo) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().to_path_buf();
        git(&path, &["init", "-b", "main"]);
        git(&path, &["config", "user.name", "Test User"]);
        git(&path, &["config", "user.email", "test@example.com"]);
        let repo = GitRepo::open(&path).unwrap();
        (temp_dir, repo)
    }

    fn commit_file(dir: &Path, name: &str, content: &str, message: &str) {
        std::fs::write(dir.join(name), content).unwrap();
        git(dir, &["add", name]);
        git(dir, &["commit", "-m", message]);
    }

    #[test]
    fn test_open_missing_path_is_path_not_found() {
        let result = GitRepo::open("/definitely/not/a/real/path");
        assert!(matches!(result, Err(GitupError::PathNotFound { .. })));
    }

    #[test]
    fn test_open_plain_directory_is_not_a_repository() {
        let temp_dir = TempDir::new().unwrap();
        let result = GitRepo::open(temp_dir.path());
        assert!(matches!(result, Err(GitupError::NotARepository { .. })));
    }

    #[test]
    fn test_is_repository() {
        let (_temp, repo) = setup_test_repo();
        assert!(GitRepo::is_repository(repo.workdir()));
        let plain = TempDir::new().unwrap();
        assert!(!GitRepo::is_repository(plain.path()));
    }

    #[test]
    fn test_active_branch_on_fresh_repo() {
        let (_temp, repo) = setup_test_repo();
        commit_file(repo.workdir(), "a.txt", "a\n", "initial");
        assert_eq!(repo.active_branch().as_deref(), Some("main"));
    }

    #[test]
    fn test_active_branch_detached_head() {
        let (_temp, repo) = setup_test_repo();
        let dir = repo.workdir().to_path_buf();
        commit_file(&dir, "a.txt", "a\n", "initial");
        git(&dir, &["checkout", "--detach", "HEAD"]);
        assert_eq!(GitRepo::open(&dir).unwrap().active_branch(), None);
    }

    #[test]
    fn test_local_branches_sorted() {
        let (_temp, repo) = setup_test_repo();
        let dir = repo.workdir().to_path_buf();
        commit_file(&dir, "a.txt", "a\n", "initial");
        git(&dir, &["branch", "zebra"]);
        git(&dir, &["branch", "alpha"]);
        let branches = repo.local_branches().unwrap();
        assert_eq!(branches, vec!["alpha", "main", "zebra"]);
    }

    #[test]
    fn test_tracking_branch_absent_without_upstream() {
        let (_temp, repo) = setup_test_repo();
        commit_file(repo.workdir(), "a.txt", "a\n", "initial");
        assert_eq!(repo.tracking_branch("main"), None);
    }

    #[test]
    fn test_remote_names_and_refspecs() {
        let (_temp, repo) = setup_test_repo();
        let dir = repo.workdir().to_path_buf();
        git(&dir, &["remote", "add", "origin", "/tmp/nowhere"]);
        assert_eq!(repo.remote_names().unwrap(), vec!["origin"]);
        assert!(repo.has_fetch_refspec("origin").unwrap());
    }

    #[test]
    fn test_branch_tip_of_unborn_branch() {
        let (_temp, repo) = setup_test_repo();
        // No commits: HEAD points at an unborn branch, so no local branch
        // exists and there is no tip to resolve.
        assert_eq!(repo.branch_tip("main"), None);
    }

    #[test]
    fn test_run_command_missing_executable() {
        let (_temp, repo) = setup_test_repo();
        let result = repo.run_command("definitely-no-such-binary-xyz --flag");
        assert!(matches!(result, Err(GitupError::CommandNotFound { .. })));
    }

    #[test]
    fn test_run_command_captures_output() {
        let (_temp, repo) = setup_test_repo();
        commit_file(repo.workdir(), "a.txt", "a\n", "initial");
        let output = repo.run_command("git log --oneline").unwrap();
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("initial"));
    }
}
