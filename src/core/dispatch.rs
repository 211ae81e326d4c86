//! Generic per-repository dispatch.
//!
//! [`dispatch`] expands one path or bookmark into repositories and applies a
//! callback to each, printing the shared header first. The update engine and
//! the `--exec` feature both run through this driver. A failure on one path
//! is reported and never aborts processing of sibling paths; comment lines
//! from the bookmark file are echoed instead of expanded.

use crate::core::git::GitRepo;
use crate::core::{output, walker};

/// Applies `callback(repository, display_name)` to every repository found
/// under `base_path`, up to `max_depth` directory levels down.
pub fn dispatch<F>(base_path: &str, max_depth: i32, mut callback: F)
where
    F: FnMut(&GitRepo, &str),
{
    let trimmed = base_path.trim_start();
    if let Some(comment) = trimmed.strip_prefix('#') {
        let comment = comment.trim_start_matches('#').trim();
        if !comment.is_empty() {
            output::print_comment(comment);
        }
        return;
    }

    let discovery = match walker::discover(base_path, max_depth) {
        Ok(discovery) => discovery,
        Err(err) => {
            output::print_error(&err.to_string());
            return;
        }
    };

    log::debug!(
        "expanded {} into {} repositories",
        base_path,
        discovery.repos.len()
    );
    output::print_path_header(&discovery.base.display().to_string(), discovery.repos.len());

    for entry in &discovery.repos {
        match GitRepo::open(&entry.path) {
            Ok(repo) => callback(&repo, &entry.name),
            // The path was valid at discovery time; report and move on.
            Err(err) => output::print_error(&err.to_string()),
        }
    }
}
