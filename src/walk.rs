//! Directory traversal driven by a path filter

use std::path::Path;
use std::sync::Arc;

use ignore::WalkBuilder;
use tracing::trace;

use crate::error::Result;
use crate::filter::PathFilter;
use crate::paths::relative_slash_path;

/// Walk `root` and return the root-relative paths of every included file, in
/// traversal (file-name) order.
///
/// Each entry below the root is evaluated exactly once: directories while
/// deciding whether to enter them, files when they are yielded. Symlinks are
/// not followed and no ignore files are consulted implicitly.
pub fn collect_files(root: &Path, filter: Arc<dyn PathFilter>) -> Result<Vec<String>> {
    let dir_filter = Arc::clone(&filter);
    let dir_root = root.to_path_buf();

    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            if !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                return true;
            }
            let Some(rel) = relative_slash_path(&dir_root, entry.path()) else {
                return true;
            };
            let descend = dir_filter.evaluate(&rel, true).descend;
            if !descend {
                trace!(path = %rel, "pruned directory");
            }
            descend
        })
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.depth() == 0 || entry.file_type().is_some_and(|ft| ft.is_dir()) {
            continue;
        }
        // Unfollowed links to directories have no content of their own.
        if entry.path_is_symlink() && entry.path().is_dir() {
            continue;
        }
        let Some(rel) = relative_slash_path(root, entry.path()) else {
            continue;
        };
        if filter.evaluate(&rel, false).include {
            files.push(rel);
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{Decision, GitignoreFilter, Mode};
    use crate::gitignore::Matcher;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn filter(mode: Mode, rules: &str) -> Arc<dyn PathFilter> {
        Arc::new(GitignoreFilter::new(mode, Matcher::parse(rules, "test").unwrap()))
    }

    /// Records every evaluated path before delegating.
    struct Recording {
        inner: Arc<dyn PathFilter>,
        seen: Mutex<Vec<(String, bool)>>,
    }

    impl PathFilter for Recording {
        fn evaluate(&self, path: &str, is_dir: bool) -> Decision {
            self.seen.lock().unwrap().push((path.to_string(), is_dir));
            self.inner.evaluate(path, is_dir)
        }
    }

    #[test]
    fn test_collects_sorted_relative_paths() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.txt", "b");
        write(dir.path(), "a/z.txt", "z");
        write(dir.path(), "a/y.txt", "y");

        let files = collect_files(dir.path(), filter(Mode::Blacklist, "")).unwrap();
        assert_eq!(files, vec!["a/y.txt", "a/z.txt", "b.txt"]);
    }

    #[test]
    fn test_blacklisted_directory_is_pruned() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/main.rs", "");
        write(dir.path(), "target/debug/app", "");

        let recording = Arc::new(Recording {
            inner: filter(Mode::Blacklist, "target/\n"),
            seen: Mutex::new(Vec::new()),
        });
        let files = collect_files(dir.path(), recording.clone()).unwrap();

        assert_eq!(files, vec!["src/main.rs"]);
        let seen = recording.seen.lock().unwrap();
        assert!(seen.contains(&("target".to_string(), true)));
        assert!(!seen.iter().any(|(path, _)| path.starts_with("target/")));
    }

    #[test]
    fn test_each_entry_evaluated_once() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "docs/guide.md", "");
        write(dir.path(), "notes.txt", "");

        let recording = Arc::new(Recording {
            inner: filter(Mode::Whitelist, "docs/\n"),
            seen: Mutex::new(Vec::new()),
        });
        let files = collect_files(dir.path(), recording.clone()).unwrap();
        assert_eq!(files, vec!["docs/guide.md"]);

        let mut seen = recording.seen.lock().unwrap().clone();
        seen.sort();
        assert_eq!(
            seen,
            vec![
                ("docs".to_string(), true),
                ("docs/guide.md".to_string(), false),
                ("notes.txt".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_hidden_files_are_not_skipped_implicitly() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ".env", "");
        write(dir.path(), ".gitignore", "*\n");
        write(dir.path(), "visible.txt", "");

        let files = collect_files(dir.path(), filter(Mode::Blacklist, "")).unwrap();
        assert_eq!(files, vec![".env", ".gitignore", "visible.txt"]);
    }
}
