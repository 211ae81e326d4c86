//! Repository classification and discovery.
//!
//! Given a path argument (literal directory, single repository, or shell
//! glob), [`discover`] produces the flat, named, sorted list of repositories
//! to act on. Classification happens once per argument and is represented as
//! an explicit [`PathKind`] rather than being driven by error control flow.
//!
//! Depth accounting: `max_depth == -1` recurses without limit, `0` requires
//! the argument itself to be a repository, and `N > 0` searches at most `N`
//! directory levels below the argument. A repository is a leaf: the walk
//! never descends into it looking for nested repositories.

use crate::core::error::{GitupError, Result};
use crate::core::git::GitRepo;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One repository produced by the walk: a display name (the path suffix
/// relative to the walked base) and the absolute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoEntry {
    pub name: String,
    pub path: PathBuf,
}

/// Result of expanding one path argument.
#[derive(Debug)]
pub struct Discovery {
    /// Absolute form of the argument, used for the report header.
    pub base: PathBuf,
    /// Deduplicated entries, sorted by display name.
    pub repos: Vec<RepoEntry>,
}

/// How a path argument was classified, resolved once before walking.
#[derive(Debug)]
enum PathKind {
    /// The argument itself is a repository.
    Repository(PathBuf),
    /// An existing directory to search for repositories.
    Directory(PathBuf),
    /// A glob pattern with at least one match.
    GlobSet(Vec<PathBuf>),
}

fn classify(expanded: &Path, raw: &str, max_depth: i32) -> Result<PathKind> {
    if GitRepo::is_repository(expanded) {
        return Ok(PathKind::Repository(expanded.to_path_buf()));
    }
    if expanded.exists() {
        if expanded.is_dir() && max_depth != 0 {
            return Ok(PathKind::Directory(expanded.to_path_buf()));
        }
        return Err(GitupError::not_a_repository(expanded));
    }

    let pattern = expanded.to_string_lossy();
    let matches = glob::glob(&pattern)
        .map_err(|_| GitupError::InvalidGlobPattern {
            pattern: raw.to_string(),
        })?
        .flatten()
        .collect::<Vec<_>>();
    if matches.is_empty() {
        return Err(GitupError::path_not_found(expanded));
    }
    Ok(PathKind::GlobSet(matches))
}

/// Expands one path argument into its repositories.
///
/// Errors are limited to the argument itself ([`GitupError::PathNotFound`],
/// [`GitupError::NotARepository`]); anything unsuitable found *during*
/// recursion is silently skipped.
pub fn discover(base_path: &str, max_depth: i32) -> Result<Discovery> {
    let expanded = expand_home(base_path);
    let kind = classify(&expanded, base_path, max_depth)?;

    let found = match kind {
        PathKind::Repository(path) => vec![path],
        PathKind::Directory(path) => {
            let mut found = Vec::new();
            collect(vec![path], budget(max_depth), &mut found);
            found
        }
        PathKind::GlobSet(matches) => {
            let mut found = Vec::new();
            collect(matches, budget(max_depth), &mut found);
            found
        }
    };

    let base = absolutize(&expanded);
    let mut seen = HashSet::new();
    let mut repos: Vec<RepoEntry> = Vec::new();
    for path in found {
        let path = absolutize(&path);
        if seen.insert(path.clone()) {
            repos.push(RepoEntry {
                name: display_name(&base, &path),
                path,
            });
        }
    }
    repos.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(Discovery { base, repos })
}

/// The walk consumes one budget level for the base itself, so a user-facing
/// depth of N allows repositories N directory levels down.
fn budget(max_depth: i32) -> i32 {
    if max_depth >= 0 {
        max_depth + 1
    } else {
        -1
    }
}

/// Depth-bounded recursive collection. A repository stops the descent; a
/// plain directory is recursed into while budget remains; anything else is
/// skipped.
fn collect(paths: Vec<PathBuf>, budget: i32, found: &mut Vec<PathBuf>) {
    if budget == 0 {
        return;
    }
    for path in paths {
        if GitRepo::is_repository(&path) {
            found.push(path);
        } else if path.is_dir() {
            let children = match std::fs::read_dir(&path) {
                Ok(entries) => entries.flatten().map(|e| e.path()).collect(),
                Err(_) => continue,
            };
            collect(children, budget - 1, found);
        }
    }
}

/// Display name for a discovered path: its suffix relative to the base, or
/// relative to the deepest common ancestor when the base was a glob pattern
/// (or the repository itself, which yields its directory name).
fn display_name(base: &Path, path: &Path) -> String {
    if path != base {
        if let Ok(suffix) = path.strip_prefix(base) {
            return suffix.to_string_lossy().into_owned();
        }
    }

    let mut prefix = PathBuf::new();
    for (a, b) in base.components().zip(path.components()) {
        if a != b {
            break;
        }
        prefix.push(a.as_os_str());
    }
    // Back off until the prefix is a proper ancestor of the base.
    while !prefix.as_os_str().is_empty()
        && (prefix.as_path() == base || base.strip_prefix(&prefix).is_err())
    {
        if !prefix.pop() {
            break;
        }
    }

    match path.strip_prefix(&prefix) {
        Ok(suffix) if !suffix.as_os_str().is_empty() => suffix.to_string_lossy().into_owned(),
        _ => path.to_string_lossy().into_owned(),
    }
}

/// Expands a leading `~` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

fn absolutize(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn git_init(dir: &Path) {
        std::fs::create_dir_all(dir).unwrap();
        let output = std::process::Command::new("git")
            .args(["init", "-b", "main"])
            .current_dir(dir)
            .output()
            .expect("failed to run git");
        assert!(output.status.success());
    }

    fn names(discovery: &Discovery) -> Vec<&str> {
        discovery.repos.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_single_repository_at_depth_zero() {
        let temp = TempDir::new().unwrap();
        let repo = temp.path().join("project");
        git_init(&repo);

        let discovery = discover(repo.to_str().unwrap(), 0).unwrap();
        assert_eq!(names(&discovery), vec!["project"]);
        assert_eq!(discovery.repos[0].path, std::path::absolute(&repo).unwrap());
    }

    #[test]
    fn test_plain_directory_at_depth_zero_is_not_a_repository() {
        let temp = TempDir::new().unwrap();
        let result = discover(temp.path().to_str().unwrap(), 0);
        assert!(matches!(result, Err(GitupError::NotARepository { .. })));
    }

    #[test]
    fn test_missing_path_without_glob_matches() {
        let result = discover("/no/such/path/anywhere", 3);
        assert!(matches!(result, Err(GitupError::PathNotFound { .. })));
    }

    #[test]
    fn test_container_finds_repos_one_level_down() {
        let temp = TempDir::new().unwrap();
        git_init(&temp.path().join("beta"));
        git_init(&temp.path().join("alpha"));
        std::fs::write(temp.path().join("notes.txt"), "plain file\n").unwrap();
        std::fs::create_dir(temp.path().join("empty")).unwrap();

        let discovery = discover(temp.path().to_str().unwrap(), 1).unwrap();
        assert_eq!(names(&discovery), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_depth_limit_excludes_deeper_repos() {
        let temp = TempDir::new().unwrap();
        git_init(&temp.path().join("shallow"));
        git_init(&temp.path().join("group/deep"));

        let at_one = discover(temp.path().to_str().unwrap(), 1).unwrap();
        assert_eq!(names(&at_one), vec!["shallow"]);

        let at_two = discover(temp.path().to_str().unwrap(), 2).unwrap();
        assert_eq!(names(&at_two), vec!["group/deep", "shallow"]);
    }

    #[test]
    fn test_unlimited_depth() {
        let temp = TempDir::new().unwrap();
        git_init(&temp.path().join("a/b/c/d/repo"));

        let discovery = discover(temp.path().to_str().unwrap(), -1).unwrap();
        assert_eq!(names(&discovery), vec!["a/b/c/d/repo"]);
    }

    #[test]
    fn test_nested_repository_is_a_leaf() {
        let temp = TempDir::new().unwrap();
        let outer = temp.path().join("outer");
        git_init(&outer);
        git_init(&outer.join("vendored"));

        let discovery = discover(temp.path().to_str().unwrap(), -1).unwrap();
        assert_eq!(names(&discovery), vec!["outer"]);
    }

    #[test]
    fn test_glob_expansion() {
        let temp = TempDir::new().unwrap();
        git_init(&temp.path().join("proj-one"));
        git_init(&temp.path().join("proj-two"));
        git_init(&temp.path().join("other"));

        let pattern = format!("{}/proj-*", temp.path().display());
        let discovery = discover(&pattern, 3).unwrap();
        assert_eq!(names(&discovery), vec!["proj-one", "proj-two"]);
    }

    #[test]
    fn test_entries_are_deduplicated() {
        let temp = TempDir::new().unwrap();
        git_init(&temp.path().join("only"));

        // A glob where both the directory and its sole child match still
        // yields one entry per absolute path.
        let pattern = format!("{}/*", temp.path().display());
        let discovery = discover(&pattern, 3).unwrap();
        let mut paths: Vec<_> = discovery.repos.iter().map(|r| &r.path).collect();
        paths.dedup();
        assert_eq!(paths.len(), discovery.repos.len());
    }

    #[test]
    fn test_existing_file_argument_is_not_a_repository() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("plain.txt");
        std::fs::write(&file, "contents\n").unwrap();

        let result = discover(file.to_str().unwrap(), 3);
        assert!(matches!(result, Err(GitupError::NotARepository { .. })));
    }

    #[test]
    fn test_display_name_relative_to_base() {
        let base = Path::new("/repos");
        assert_eq!(display_name(base, Path::new("/repos/a/b")), "a/b");
        assert_eq!(display_name(Path::new("/repos/a"), Path::new("/repos/a")), "a");
        // Glob base: fall back to the common ancestor
        assert_eq!(display_name(Path::new("/repos/pro-*"), Path::new("/repos/pro-x")), "pro-x");
    }
}
