//! User-facing commands: updating repositories and running shell commands
//! across them.

pub mod exec;
pub mod update;

pub use exec::run_command;
pub use update::{
    update_bookmarks, update_directories, update_repository, BranchOutcome, UpdateOptions,
};
