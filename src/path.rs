//! Lexical path handling: resolution against the current directory and the
//! root boundary check used by `cd`. Nothing here touches the filesystem.

use std::path::{Component, Path, PathBuf};

use clean_path::Clean;
use tracing::debug;

/// Resolve `raw` against `current_dir` and normalize it.
///
/// Absolute inputs replace `current_dir` entirely. `.` and `..` are collapsed
/// lexically, so the result does not need to exist. `..` at the root stays at
/// the root.
pub fn resolve(raw: impl AsRef<Path>, current_dir: impl AsRef<Path>) -> PathBuf {
    let raw = raw.as_ref();
    let resolved = current_dir.as_ref().join(raw).clean();
    debug!("resolve: raw={:?}, resolved={:?}", raw, resolved);

    resolved
}

/// The root part of `path`: the prefix (drive, UNC share) plus the root
/// separator. `None` for relative paths.
pub fn root_of(path: impl AsRef<Path>) -> Option<PathBuf> {
    let root: PathBuf = path
        .as_ref()
        .components()
        .take_while(|c| matches!(c, Component::Prefix(_) | Component::RootDir))
        .collect();

    if root.as_os_str().is_empty() {
        None
    } else {
        Some(root)
    }
}

/// Whether moving from `current_dir` to `candidate` would change roots.
///
/// A candidate without a root never crosses.
pub fn crosses_root(candidate: impl AsRef<Path>, current_dir: impl AsRef<Path>) -> bool {
    match root_of(candidate) {
        Some(candidate_root) => Some(candidate_root) != root_of(current_dir),
        None => false,
    }
}
