//! Thin wrappers over `std::fs` that speak [`ShellError`].

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ShellError, ShellResult};
use crate::size::format_size;

/// One row of a directory listing.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NodeInfo {
    pub name: String,
    pub is_dir: bool,
    pub size_in_bytes: u64,
    pub human_readable_size: String,
}

impl NodeInfo {
    /// The extension of a file (see [`extension_of`]), `None` for directories.
    pub fn extension(&self) -> Option<&str> {
        (!self.is_dir).then(|| extension_of(&self.name))
    }
}

/// Everything after the last `.`, dot included. Names whose only dot is the
/// first character (`.bashrc`) have no extension.
pub fn extension_of(name: &str) -> &str {
    match name.rfind('.') {
        Some(index) if index > 0 => &name[index..],
        _ => "",
    }
}

/// Whether the current user may read `path`.
#[cfg(unix)]
pub fn is_readable(path: &Path) -> bool {
    use nix::unistd::{access, AccessFlags};

    access(path, AccessFlags::R_OK).is_ok()
}

#[cfg(not(unix))]
pub fn is_readable(path: &Path) -> bool {
    if path.is_dir() {
        fs::read_dir(path).is_ok()
    } else {
        fs::File::open(path).is_ok()
    }
}

/// Read the entries of `dir`, sorted by name.
///
/// Entries whose metadata cannot be read are returned separately instead of
/// failing the whole listing.
pub fn read_entries(dir: &Path) -> ShellResult<(Vec<NodeInfo>, Vec<ShellError>)> {
    let mut nodes = Vec::new();
    let mut failures = Vec::new();

    for entry in fs::read_dir(dir).map_err(|e| ShellError::from_io(dir, e))? {
        let entry = entry.map_err(|e| ShellError::from_io(dir, e))?;
        let path = entry.path();

        // Follows symlinks, so a link to a directory lists as a folder.
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("read_entries: skipping {:?}: {}", path, e);
                failures.push(ShellError::from_io(path, e));
                continue;
            }
        };

        let size_in_bytes = metadata.len();
        nodes.push(NodeInfo {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir: metadata.is_dir(),
            size_in_bytes,
            human_readable_size: format_size(size_in_bytes),
        });
    }

    nodes.sort_by(|a, b| a.name.cmp(&b.name));
    debug!("read_entries: dir={:?}, nodes={}", dir, nodes.len());

    Ok((nodes, failures))
}

/// Create `dir` and any missing parents.
pub fn make_dir(dir: &Path) -> ShellResult<PathBuf> {
    if fs::symlink_metadata(dir).is_ok() {
        return Err(ShellError::AlreadyExists {
            path: dir.to_path_buf(),
        });
    }

    fs::create_dir_all(dir).map_err(|e| ShellError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;
    info!("make_dir: created {:?}", dir);

    Ok(dir.to_path_buf())
}

/// Remove a single file or an empty directory.
pub fn remove(path: &Path) -> ShellResult<PathBuf> {
    let metadata = fs::symlink_metadata(path).map_err(|e| ShellError::from_io(path, e))?;

    if metadata.is_dir() {
        let mut children = fs::read_dir(path).map_err(|e| ShellError::from_io(path, e))?;
        if children.next().is_some() {
            return Err(ShellError::NotEmpty {
                path: path.to_path_buf(),
            });
        }

        fs::remove_dir(path).map_err(|e| ShellError::from_io(path, e))?;
    } else {
        fs::remove_file(path).map_err(|e| ShellError::from_io(path, e))?;
    }
    info!("remove: deleted {:?}", path);

    Ok(path.to_path_buf())
}
