//! Path normalization helpers
//!
//! Filters only ever see slash-separated paths relative to a scan root.
//! These helpers convert between native paths and that form.

use std::io;
use std::path::{Component, Path, PathBuf};

use path_clean::PathClean;

/// Make `path` absolute against the current directory and clean it lexically
/// (`.` removed, `..` folded).
pub fn absolute_clean(path: &Path) -> io::Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    Ok(absolute.clean())
}

/// Slash-separated form of `path` relative to `root`.
///
/// Returns `None` when `path` is not below `root` or is `root` itself.
pub fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy()),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

/// Root-relative path of `target` when it lies strictly inside `root`.
///
/// Both paths are cleaned first so `root/./a/../out.txt` resolves to `out.txt`.
pub fn relative_if_within(root: &Path, target: &Path) -> Option<String> {
    relative_slash_path(&root.clean(), &target.clean())
}

/// Final component of `path`, or `root` when there is none (e.g. `/`).
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .filter(|name| !name.is_empty() && name != ".")
        .unwrap_or_else(|| "root".to_string())
}
