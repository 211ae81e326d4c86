//! gitup - easily update multiple git repositories at once.
//!
//! This library provides the core functionality for the `gitup` binary: a
//! recursive repository discovery walk, a fetch-and-fast-forward update
//! engine built on `git2`, a dispatch driver shared with the arbitrary
//! command feature, and a persisted bookmark list.
//!
//! # Public API
//! The main public interface is re-exported from the [`core`] module:
//! - Repository discovery and classification
//! - The git adapter used by the update engine
//! - Bookmark persistence
//! - Error handling and result types

pub mod commands;
pub mod core;

pub use core::{
    discover,
    dispatch,
    // Error handling
    GitupError,
    // Git operations
    GitRepo,
    RepoEntry,
    Result,
    TrackingBranch,
};

pub use commands::{update_repository, BranchOutcome, UpdateOptions};
