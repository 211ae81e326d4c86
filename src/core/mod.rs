//! Core functionality for gitup.
//!
//! This module provides the building blocks the commands are assembled from:
//! the git adapter, repository discovery, per-repository dispatch, bookmark
//! persistence, error handling and terminal output.

pub mod bookmarks;
pub mod dispatch;
pub mod error;
pub mod git;
pub mod output;
pub mod walker;

// === Error handling ===
// Core error types and result type used throughout the application
pub use error::{GitupError, Result};

// === Git operations ===
// Adapter over git2; the only module allowed to import it
pub use git::{FastForward, FetchOutcome, GitRepo, Oid, TrackingBranch};

// === Repository discovery ===
// Path classification and depth-bounded repository search
pub use walker::{discover, Discovery, RepoEntry};

// === Dispatch ===
// Apply-callback-to-every-discovered-repository driver
pub use dispatch::dispatch;
