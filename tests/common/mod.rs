//! Shared test fixtures.
//!
//! Builds real repositories on disk with the git CLI, including origin/clone
//! pairs wired up through filesystem remotes so fetch and fast-forward paths
//! can be exercised without any network access.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Runs a git command in `dir`, asserting success and returning stdout.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = std::process::Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Initializes a repository with deterministic branch name and identity.
pub fn init_repo(dir: &Path) {
    std::fs::create_dir_all(dir).unwrap();
    git(dir, &["init", "-b", "main"]);
    configure_identity(dir);
}

fn configure_identity(dir: &Path) {
    git(dir, &["config", "user.name", "Test User"]);
    git(dir, &["config", "user.email", "test@example.com"]);
}

/// Writes a file and commits it.
pub fn commit_file(dir: &Path, name: &str, content: &str, message: &str) {
    std::fs::write(dir.join(name), content).unwrap();
    git(dir, &["add", name]);
    git(dir, &["commit", "-m", message]);
}

/// Resolves a revision to its commit id.
pub fn rev_parse(dir: &Path, rev: &str) -> String {
    git(dir, &["rev-parse", rev])
}

/// An origin repository and a clone tracking it over a filesystem remote.
/// The TempDir must be kept alive for the duration of the test.
pub struct RemotePair {
    pub temp: TempDir,
    pub origin: PathBuf,
    pub clone: PathBuf,
}

/// Creates an origin with one commit and a clone whose `main` tracks
/// `origin/main`.
pub fn setup_remote_pair() -> RemotePair {
    let temp = TempDir::new().unwrap();
    let origin = temp.path().join("origin");
    let clone = temp.path().join("clone");

    init_repo(&origin);
    commit_file(&origin, "a.txt", "initial\n", "initial commit");

    git(
        temp.path(),
        &["clone", "--quiet", origin.to_str().unwrap(), "clone"],
    );
    configure_identity(&clone);

    RemotePair {
        temp,
        origin,
        clone,
    }
}
