//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`GitupError`] which covers every failure mode of the
//! discovery walk, the fetch/fast-forward engine, and the bookmark store. It
//! uses `thiserror` for ergonomic error definitions.
//!
//! # Public API
//! - [`GitupError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, GitupError>`
//!
//! # Error Categories
//! - **Path classification**: path missing, path is not a repository
//! - **Update preconditions**: detached HEAD, untracked branch, no remotes
//! - **Per-branch outcomes**: merge conflicts and dirty working trees are
//!   reported as skips by the engine, not surfaced through this enum
//! - **Infrastructure**: git2 failures, I/O, bookmark file access

use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types for gitup
#[derive(Error, Debug)]
pub enum GitupError {
    // Path classification errors
    #[error("{} doesn't exist!", .path.display())]
    PathNotFound { path: PathBuf },

    #[error("{} isn't a repository!", .path.display())]
    NotARepository { path: PathBuf },

    #[error("invalid glob pattern: {pattern}")]
    InvalidGlobPattern { pattern: String },

    // Update precondition errors (per repository)
    #[error("--current-only doesn't make sense with a detached HEAD.")]
    DetachedHead,

    #[error("no remote tracked by current branch.")]
    NoTrackedRemote,

    #[error("no remotes configured to fetch.")]
    NoRemotesConfigured,

    // Arbitrary command execution
    #[error("command not found: {command}")]
    CommandNotFound { command: String },

    #[error("invalid command line: {0}")]
    CommandParse(#[from] shell_words::ParseError),

    // Infrastructure errors
    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not determine the configuration directory")]
    ConfigDirectoryNotFound,

    #[error("failed to read bookmark file '{path}': {source}")]
    BookmarkReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write bookmark file '{path}': {source}")]
    BookmarkWriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience type alias for Results using GitupError
pub type Result<T> = std::result::Result<T, GitupError>;

impl GitupError {
    /// Create a path not found error
    pub fn path_not_found(path: impl Into<PathBuf>) -> Self {
        Self::PathNotFound { path: path.into() }
    }

    /// Create a not-a-repository error
    pub fn not_a_repository(path: impl Into<PathBuf>) -> Self {
        Self::NotARepository { path: path.into() }
    }

    /// Create a command not found error
    pub fn command_not_found(command: impl Into<String>) -> Self {
        Self::CommandNotFound {
            command: command.into(),
        }
    }

    /// Create a bookmark read error
    pub fn bookmark_read_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::BookmarkReadFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a bookmark write error
    pub fn bookmark_write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::BookmarkWriteFailed {
            path: path.into(),
            source,
        }
    }
}
