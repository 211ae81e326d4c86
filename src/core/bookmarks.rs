//! Persistent bookmark store.
//!
//! Bookmarks are a newline-delimited list of paths in a single file,
//! defaulting to `gitup/bookmarks` under the user's configuration directory.
//! Order is preserved for display, uniqueness is enforced on add, and a line
//! starting with `#` is kept verbatim as a comment. Whether a bookmark still
//! points at anything useful is only checked lazily: at update time, or
//! explicitly by [`clean`].

use crate::core::error::{GitupError, Result};
use crate::core::output;
use crate::core::walker::expand_home;
use std::path::{Path, PathBuf};

/// Default path of the bookmark file, honoring `XDG_CONFIG_HOME`.
pub fn default_bookmark_path() -> Result<PathBuf> {
    let base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::config_dir().ok_or(GitupError::ConfigDirectoryNotFound)?,
    };
    Ok(base.join("gitup").join("bookmarks"))
}

fn resolve(config_path: Option<&Path>) -> Result<PathBuf> {
    match config_path {
        Some(path) => Ok(path.to_path_buf()),
        None => default_bookmark_path(),
    }
}

/// Loads all bookmark lines, comments included. A missing file is an empty
/// list, not an error.
pub fn load(config_path: Option<&Path>) -> Result<Vec<String>> {
    let path = resolve(config_path)?;
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(GitupError::bookmark_read_failed(path, err)),
    };
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn save(bookmarks: &[String], config_path: Option<&Path>) -> Result<()> {
    let path = resolve(config_path)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|err| GitupError::bookmark_write_failed(&path, err))?;
    }
    std::fs::write(&path, bookmarks.join("\n"))
        .map_err(|err| GitupError::bookmark_write_failed(&path, err))
}

/// Normalizes a path for storage: `~`-prefixed paths stay in `~` form,
/// everything else is absolutized.
fn normalize_path(path: &str) -> String {
    if path.starts_with('~') {
        path.trim_end_matches('/').to_string()
    } else {
        let absolute = std::path::absolute(Path::new(path))
            .unwrap_or_else(|_| PathBuf::from(path));
        absolute.display().to_string()
    }
}

fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

/// A bookmark is valid when it is a directory or its pattern still matches
/// something on disk.
fn is_valid(path: &str) -> bool {
    let expanded = expand_home(path);
    if expanded.is_dir() {
        return true;
    }
    glob::glob(&expanded.to_string_lossy())
        .map(|mut matches| matches.next().is_some())
        .unwrap_or(false)
}

/// Adds paths to the bookmark file, reporting what was added and what was
/// already present.
pub fn add(paths: &[String], config_path: Option<&Path>) -> Result<()> {
    let mut bookmarks = load(config_path)?;
    let mut added = Vec::new();
    let mut exists = Vec::new();

    for path in paths {
        let normalized = normalize_path(path);
        if bookmarks.contains(&normalized) {
            exists.push(normalized);
        } else {
            bookmarks.push(normalized.clone());
            added.push(normalized);
        }
    }
    save(&bookmarks, config_path)?;

    if !added.is_empty() {
        output::print_bookmark_heading("Added bookmarks:", false);
        for path in &added {
            output::print_bookmark_entry(path);
        }
    }
    if !exists.is_empty() {
        output::print_bookmark_heading("Already bookmarked:", true);
        for path in &exists {
            output::print_bookmark_entry(path);
        }
    }
    Ok(())
}

/// Removes paths from the bookmark file, leaving the directories themselves
/// alone.
pub fn delete(paths: &[String], config_path: Option<&Path>) -> Result<()> {
    let mut bookmarks = load(config_path)?;
    let mut deleted = Vec::new();
    let mut notmarked = Vec::new();

    if bookmarks.is_empty() {
        notmarked = paths.iter().map(|path| normalize_path(path)).collect();
    } else {
        for path in paths {
            let normalized = normalize_path(path);
            if let Some(position) = bookmarks.iter().position(|b| *b == normalized) {
                bookmarks.remove(position);
                deleted.push(normalized);
            } else {
                notmarked.push(normalized);
            }
        }
        save(&bookmarks, config_path)?;
    }

    if !deleted.is_empty() {
        output::print_bookmark_heading("Deleted bookmarks:", false);
        for path in &deleted {
            output::print_bookmark_entry(path);
        }
    }
    if !notmarked.is_empty() {
        output::print_bookmark_heading("Not bookmarked:", true);
        for path in &notmarked {
            output::print_bookmark_entry(path);
        }
    }
    Ok(())
}

/// Prints the current bookmarks.
pub fn list(config_path: Option<&Path>) -> Result<()> {
    let bookmarks = load(config_path)?;
    if bookmarks.is_empty() {
        println!("You have no bookmarks to display.");
        return Ok(());
    }
    output::print_bookmark_heading("Current bookmarks:", false);
    for path in &bookmarks {
        output::print_bookmark_entry(path);
    }
    Ok(())
}

/// Deletes bookmarks whose paths no longer exist on disk. Comment lines are
/// always kept.
pub fn clean(config_path: Option<&Path>) -> Result<()> {
    let bookmarks = load(config_path)?;
    if bookmarks.is_empty() {
        println!("You have no bookmarks to clean up.");
        return Ok(());
    }

    let (kept, deleted): (Vec<String>, Vec<String>) = bookmarks
        .into_iter()
        .partition(|path| is_comment(path) || is_valid(path));
    if deleted.is_empty() {
        println!("All of your bookmarks are valid.");
        return Ok(());
    }

    save(&kept, config_path)?;
    output::print_bookmark_heading("Deleted bookmarks:", false);
    for path in &deleted {
        output::print_bookmark_entry(path);
    }
    Ok(())
}
