//! Copying a single file into a directory without ever overwriting an
//! existing entry.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ShellError, ShellResult};
use crate::fs::is_readable;
use crate::path::resolve;

/// Result of a successful [`copy`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CopyOutcome {
    /// Where the bytes were written.
    pub destination: PathBuf,
    /// The target directory, if it had to be created.
    pub created_dir: Option<PathBuf>,
}

/// Copy `source` into the directory `target_dir`, both resolved against
/// `current_dir`.
///
/// A missing target directory is created along with its parents. If the
/// source's name is taken in the target, `_1`, `_2`, ... is inserted before
/// the extension until a free name is found.
pub fn copy(
    source: impl AsRef<Path>,
    target_dir: impl AsRef<Path>,
    current_dir: impl AsRef<Path>,
) -> ShellResult<CopyOutcome> {
    let current_dir = current_dir.as_ref();
    let source = resolve(source, current_dir);
    validate_source(&source)?;

    let target_dir = resolve(target_dir, current_dir);
    let created_dir = ensure_target_dir(&target_dir)?;

    let file_name = source.file_name().ok_or_else(|| ShellError::IsADirectory {
        path: source.clone(),
    })?;
    let destination = next_free_destination(&target_dir, file_name);

    // Not atomic with the collision check: a concurrent writer can still win.
    fs::copy(&source, &destination).map_err(|e| ShellError::Io {
        path: destination.clone(),
        source: e,
    })?;
    info!("copy: {:?} -> {:?}", source, destination);

    Ok(CopyOutcome {
        destination,
        created_dir,
    })
}

fn validate_source(source: &Path) -> ShellResult<()> {
    let metadata = fs::metadata(source).map_err(|e| ShellError::from_io(source, e))?;

    if metadata.is_dir() {
        return Err(ShellError::IsADirectory {
            path: source.to_path_buf(),
        });
    }

    if !is_readable(source) {
        return Err(ShellError::Unreadable {
            path: source.to_path_buf(),
        });
    }

    Ok(())
}

/// Returns the directory if it was created by this call.
fn ensure_target_dir(target_dir: &Path) -> ShellResult<Option<PathBuf>> {
    match fs::metadata(target_dir) {
        Ok(metadata) if metadata.is_dir() => Ok(None),
        Ok(_) => Err(ShellError::NotADirectory {
            path: target_dir.to_path_buf(),
        }),
        Err(_) => {
            fs::create_dir_all(target_dir).map_err(|e| ShellError::Io {
                path: target_dir.to_path_buf(),
                source: e,
            })?;
            info!("copy: created target directory {:?}", target_dir);
            Ok(Some(target_dir.to_path_buf()))
        }
    }
}

/// Split a file name at its last dot. The dot stays with the extension and a
/// name without a dot has an empty extension.
pub fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(index) => file_name.split_at(index),
        None => (file_name, ""),
    }
}

fn numbered_name(file_name: &OsStr, n: u64) -> OsString {
    match file_name.to_str() {
        Some(name) => {
            let (base, extension) = split_extension(name);
            format!("{base}_{n}{extension}").into()
        }
        None => {
            let mut name = file_name.to_os_string();
            name.push(format!("_{n}"));
            name
        }
    }
}

/// First path in `target_dir` named `file_name`, `base_1.ext`, `base_2.ext`,
/// ... that has no entry yet. Dangling symlinks count as entries.
///
/// Linear in the number of existing numbered copies.
pub fn next_free_destination(target_dir: &Path, file_name: &OsStr) -> PathBuf {
    let mut candidate = target_dir.join(file_name);
    let mut n = 1;

    while fs::symlink_metadata(&candidate).is_ok() {
        debug!("copy: {:?} is taken", candidate);
        candidate = target_dir.join(numbered_name(file_name, n));
        n += 1;
    }

    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_split_extension() {
        // Arrange
        let inputs = ["a.txt", "archive.tar.gz", "README", ".env", "dot."];

        let outputs = [
            ("a", ".txt"),
            ("archive.tar", ".gz"),
            ("README", ""),
            ("", ".env"),
            ("dot", "."),
        ];

        for (input, output) in inputs.iter().zip(outputs.iter()) {
            // Assert
            assert_eq!(split_extension(input), *output);
        }
    }

    #[test]
    fn test_collision_skips_taken_numbers() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("a.txt"), b"0")?;
        fs::write(dir.path().join("a_1.txt"), b"1")?;

        let destination = next_free_destination(dir.path(), OsStr::new("a.txt"));

        assert_eq!(destination, dir.path().join("a_2.txt"));
        Ok(())
    }

    #[test]
    fn test_collision_without_extension() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("README"), b"")?;

        let destination = next_free_destination(dir.path(), OsStr::new("README"));

        assert_eq!(destination, dir.path().join("README_1"));
        Ok(())
    }

    #[test]
    fn test_no_collision_keeps_name() -> Result<()> {
        let dir = tempdir()?;

        let destination = next_free_destination(dir.path(), OsStr::new("fresh.md"));

        assert_eq!(destination, dir.path().join("fresh.md"));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_a_collision() -> Result<()> {
        let dir = tempdir()?;
        std::os::unix::fs::symlink(dir.path().join("nowhere"), dir.path().join("link.txt"))?;

        let destination = next_free_destination(dir.path(), OsStr::new("link.txt"));

        assert_eq!(destination, dir.path().join("link_1.txt"));
        Ok(())
    }

    #[test]
    fn test_copy_creates_target_then_renames() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("note.txt"), b"first")?;

        let first = copy("note.txt", "sub", dir.path())?;
        assert_eq!(first.destination, dir.path().join("sub").join("note.txt"));
        assert_eq!(first.created_dir, Some(dir.path().join("sub")));

        fs::write(dir.path().join("note.txt"), b"second")?;
        let second = copy("note.txt", "sub", dir.path())?;
        assert_eq!(second.destination, dir.path().join("sub").join("note_1.txt"));
        assert_eq!(second.created_dir, None);

        assert_eq!(fs::read(&first.destination)?, b"first");
        assert_eq!(fs::read(&second.destination)?, b"second");
        Ok(())
    }

    #[test]
    fn test_copy_with_absolute_paths() -> Result<()> {
        let dir = tempdir()?;
        let elsewhere = tempdir()?;
        let source = dir.path().join("data.bin");
        fs::write(&source, [1u8, 2, 3])?;

        let outcome = copy(&source, elsewhere.path().join("nested/deeper"), "/")?;

        assert_eq!(
            outcome.destination,
            elsewhere.path().join("nested").join("deeper").join("data.bin")
        );
        assert_eq!(fs::read(outcome.destination)?, vec![1u8, 2, 3]);
        Ok(())
    }

    #[test]
    fn test_copy_into_same_directory() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("same.txt"), b"x")?;

        let outcome = copy("same.txt", ".", dir.path())?;

        assert_eq!(outcome.destination, dir.path().join("same_1.txt"));
        Ok(())
    }

    #[test]
    fn test_copy_validation_order() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join("folder"))?;
        fs::write(dir.path().join("file.txt"), b"x")?;
        fs::write(dir.path().join("blocker"), b"x")?;

        let missing = copy("ghost.txt", "out", dir.path());
        assert!(matches!(missing, Err(ShellError::NotFound { .. })));

        let directory = copy("folder", "out", dir.path());
        assert!(matches!(directory, Err(ShellError::IsADirectory { .. })));

        let not_a_dir = copy("file.txt", "blocker", dir.path());
        assert!(matches!(not_a_dir, Err(ShellError::NotADirectory { .. })));

        // Failed validation never creates the target directory.
        assert!(!dir.path().join("out").exists());
        Ok(())
    }
}
