//! Run an arbitrary shell command across repositories.
//!
//! Reuses the same dispatch driver as the update engine: every repository
//! discovered under the given paths gets the command executed with its
//! working directory as the process cwd, and the combined stdout/stderr is
//! printed indented under the repository's name. A missing executable is a
//! reportable error for that repository, not a crash.

use crate::core::dispatch::dispatch;
use crate::core::git::GitRepo;
use crate::core::output;

/// Runs `command` in every repository found under each path.
pub fn run_command(paths: &[String], command: &str, max_depth: i32) {
    for path in paths {
        dispatch(path, max_depth, |repo, name| {
            run_in_repository(repo, name, command);
        });
    }
}

fn run_in_repository(repo: &GitRepo, name: &str, command: &str) {
    output::print_repo_header(name);

    let cmd_output = match repo.run_command(command) {
        Ok(cmd_output) => cmd_output,
        Err(err) => {
            output::print_repo_error(&err.to_string());
            return;
        }
    };

    let stdout = String::from_utf8_lossy(&cmd_output.stdout);
    let stderr = String::from_utf8_lossy(&cmd_output.stderr);
    for line in stdout.lines().chain(stderr.lines()) {
        output::print_repo_line(line);
    }
}
