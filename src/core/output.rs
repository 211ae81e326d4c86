//! Unified output formatting utilities for consistent CLI presentation.
//!
//! All user-visible text goes through this module so that colors, indentation
//! and message structure stay consistent across the update, exec and bookmark
//! commands.
//!
//! # Layout conventions
//! - Top-level path headers are flush left and bold
//! - Repository names are indented one level ([`INDENT1`])
//! - Per-remote and per-branch lines are indented two levels ([`INDENT2`])
//! - Errors carry a red `Error:` prefix, skips a yellow `skipped:` prefix

use colored::*;
use std::io::{self, Write};

/// Indentation for repository names under a path header.
pub const INDENT1: &str = "   ";
/// Indentation for per-remote and per-branch lines.
pub const INDENT2: &str = "       ";

/// Prints the startup banner.
pub fn print_banner() {
    println!("{}: the git-repo-updater\n", "gitup".bold());
}

/// Prints a flush-left error line for a top-level path argument.
pub fn print_error(message: &str) {
    println!("{} {}", "Error:".red().bold(), message);
}

/// Prints an indented error line scoped to a single repository.
pub fn print_repo_error(message: &str) {
    println!("{}{} {}", INDENT2, "Error:".red().bold(), message);
}

/// Prints the `<base> (N repos):` header for one dispatched path.
pub fn print_path_header(base: &str, count: usize) {
    let suffix = if count == 1 { "" } else { "s" };
    println!("{} ({} repo{}):", base.bold(), count, suffix);
}

/// Prints the `<name>:` line introducing one repository's output.
pub fn print_repo_header(name: &str) {
    println!("{}{}:", INDENT1, name.bold());
}

/// Prints an echoed comment line from the bookmark file.
pub fn print_comment(comment: &str) {
    println!("{}", comment.cyan().bold());
}

/// Prints a plain indented line (used for `--exec` output).
pub fn print_repo_line(line: &str) {
    println!("{}{}", INDENT2, line);
}

/// Prints a section heading for bookmark reports (e.g. "Added bookmarks:").
pub fn print_bookmark_heading(heading: &str, warning: bool) {
    if warning {
        println!("{}", heading.red().bold());
    } else {
        println!("{}", heading.yellow().bold());
    }
}

/// Prints one bookmark path under a heading.
pub fn print_bookmark_entry(path: &str) {
    println!("{}{}", INDENT1, path);
}

/// In-place progress line for a single remote fetch.
///
/// The line is redrawn with a carriage return on every progress tick and
/// finished with the fetch summary. Tracks the longest line printed so far so
/// a shrinking redraw never leaves stale characters behind.
pub struct FetchLine {
    prefix: String,
    width: usize,
}

impl FetchLine {
    pub fn new(remote: &str) -> Self {
        let prefix = format!("{}Fetching {}", INDENT2, remote.bold());
        print!("{prefix}");
        let _ = io::stdout().flush();
        Self { prefix, width: 0 }
    }

    /// Redraws the line with the current received/total object counts.
    pub fn progress(&mut self, received: usize, total: usize) {
        let line = format!("{} ({received}/{total})", self.prefix);
        self.redraw(&line);
    }

    /// Finishes the line with a result, e.g. "up to date." or an error.
    pub fn finish(mut self, result: &str) {
        let line = format!("{}: {result}", self.prefix);
        self.redraw(&line);
        println!();
    }

    fn redraw(&mut self, line: &str) {
        // Pad with spaces to cover whatever the previous draw left behind.
        let pad = self.width.saturating_sub(line.len());
        print!("\r{line}{}", " ".repeat(pad));
        let _ = io::stdout().flush();
        self.width = self.width.max(line.len());
    }
}

/// Formats a "skipped: <reason>" fragment with the skip marker colored.
pub fn skipped(reason: &str) -> String {
    format!("{} {reason}", "skipped:".yellow().bold())
}

/// Formats an "error: <message>" fragment for inline use after a colon.
pub fn inline_error(message: &str) -> String {
    format!("{} {message}", "error:".red().bold())
}

/// Formats the "up to date" fragment.
pub fn up_to_date() -> String {
    format!("{}", "up to date".blue().bold())
}

/// Formats the "done" fragment.
pub fn done() -> String {
    format!("{}", "done".green().bold())
}
