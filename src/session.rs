use std::env;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::complete_command::{ChangeDirCommand, CopyCommand, MakeDirCommand, RemoveCommand};
use crate::copy::{self, CopyOutcome};
use crate::error::{ShellError, ShellResult};
use crate::fs::{self, is_readable};
use crate::path::{crosses_root, resolve, root_of};
use crate::system::{ListCommandOutput, System};

/// The shell's only state: where it currently is.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Session {
    current_dir: PathBuf,
}

impl Session {
    /// Start in `dir`, which must be a readable directory. Relative paths are
    /// taken from the process working directory.
    pub fn new(dir: impl AsRef<Path>) -> ShellResult<Self> {
        let dir = dir.as_ref();
        let current_dir = if dir.is_absolute() {
            resolve(dir, dir)
        } else {
            let cwd = env::current_dir().map_err(|e| ShellError::from_io(dir, e))?;
            resolve(dir, cwd)
        };

        check_enterable(&current_dir)?;
        debug!("session: starting in {:?}", current_dir);

        Ok(Self { current_dir })
    }

    /// Start in the process working directory.
    pub fn from_env() -> ShellResult<Self> {
        let cwd = env::current_dir().map_err(|e| ShellError::from_io(".", e))?;
        Self::new(cwd)
    }
}

/// The directory exists, is a directory and can be listed.
fn check_enterable(dir: &Path) -> ShellResult<()> {
    match std::fs::metadata(dir) {
        Ok(metadata) if metadata.is_dir() => {}
        Ok(_) => {
            return Err(ShellError::NotADirectory {
                path: dir.to_path_buf(),
            })
        }
        Err(e) => return Err(ShellError::from_io(dir, e)),
    }

    if !is_readable(dir) {
        return Err(ShellError::Unreadable {
            path: dir.to_path_buf(),
        });
    }

    Ok(())
}

fn non_blank(arg: String, what: &str) -> ShellResult<String> {
    if arg.trim().is_empty() {
        return Err(ShellError::invalid_argument(
            &arg,
            0..arg.len(),
            format!("{what} cannot be empty"),
        ));
    }

    Ok(arg)
}

impl System for Session {
    fn get_cwd(&self) -> &Path {
        &self.current_dir
    }

    fn list(&self) -> ShellResult<ListCommandOutput> {
        let (nodes, failures) = fs::read_entries(&self.current_dir)?;

        Ok(ListCommandOutput {
            dir: self.current_dir.clone(),
            nodes,
            failures,
        })
    }

    fn chdir(&mut self, cmd: &ChangeDirCommand) -> ShellResult<PathBuf> {
        let candidate = resolve(cmd.path(), &self.current_dir);

        if crosses_root(&candidate, &self.current_dir) {
            return Err(ShellError::BoundaryViolation {
                root: root_of(&self.current_dir).unwrap_or_default(),
                path: candidate,
            });
        }

        check_enterable(&candidate)?;

        info!("chdir: {:?} -> {:?}", self.current_dir, candidate);
        self.current_dir = candidate;

        Ok(self.current_dir.clone())
    }

    fn copy(&mut self, cmd: &CopyCommand) -> ShellResult<CopyOutcome> {
        copy::copy(&cmd.source, &cmd.target_dir, &self.current_dir)
    }

    fn make_dir(&mut self, cmd: &MakeDirCommand) -> ShellResult<PathBuf> {
        let dir = non_blank(cmd.dir(), "directory name")?;

        fs::make_dir(&resolve(dir, &self.current_dir))
    }

    fn remove(&mut self, cmd: &RemoveCommand) -> ShellResult<PathBuf> {
        let raw = non_blank(cmd.path(), "name")?;
        let target = resolve(&raw, &self.current_dir);

        if self.current_dir.starts_with(&target) {
            let message = "refusing to remove the current directory";
            return Err(ShellError::invalid_argument(&raw, 0..raw.len(), message)
                .with_hint(None, Some("cd out of it first".into())));
        }

        fs::remove(&target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_new_requires_a_directory() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("file"), b"")?;

        let ok = Session::new(dir.path())?;
        assert_eq!(ok.get_cwd(), dir.path());

        let missing = Session::new(dir.path().join("missing"));
        assert!(matches!(missing, Err(ShellError::NotFound { .. })));

        let file = Session::new(dir.path().join("file"));
        assert!(matches!(file, Err(ShellError::NotADirectory { .. })));
        Ok(())
    }

    #[test]
    fn test_new_normalizes() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join("sub"))?;

        let session = Session::new(dir.path().join("sub").join(".."))?;

        assert_eq!(session.get_cwd(), dir.path());
        Ok(())
    }

    #[test]
    fn test_chdir_relative_and_back() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("a").join("b"))?;
        let mut session = Session::new(dir.path())?;

        let moved = session.chdir(&ChangeDirCommand::new("a/b"))?;
        assert_eq!(moved, dir.path().join("a").join("b"));

        let back = session.chdir(&ChangeDirCommand::new("../.."))?;
        assert_eq!(back, dir.path());
        assert_eq!(session.get_cwd(), dir.path());
        Ok(())
    }

    #[test]
    fn test_chdir_failure_keeps_current_dir() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("plain.txt"), b"")?;
        let mut session = Session::new(dir.path())?;

        let missing = session.chdir(&ChangeDirCommand::new("nope"));
        assert!(matches!(missing, Err(ShellError::NotFound { .. })));

        let file = session.chdir(&ChangeDirCommand::new("plain.txt"));
        assert!(matches!(file, Err(ShellError::NotADirectory { .. })));

        assert_eq!(session.get_cwd(), dir.path());
        Ok(())
    }

    #[test]
    fn test_chdir_across_roots_is_refused() {
        let mut session = Session {
            current_dir: PathBuf::from("relative").join("dir"),
        };

        let result = session.chdir(&ChangeDirCommand::new("/"));

        assert!(matches!(result, Err(ShellError::BoundaryViolation { .. })));
        assert_eq!(session.get_cwd(), Path::new("relative").join("dir"));
    }

    #[cfg(unix)]
    #[test]
    fn test_chdir_above_root_stays_at_root() -> Result<()> {
        let mut session = Session::new("/")?;

        let moved = session.chdir(&ChangeDirCommand::new("../../.."))?;

        assert_eq!(moved, PathBuf::from("/"));
        Ok(())
    }

    #[test]
    fn test_mkdir_and_rm_are_relative_to_cwd() -> Result<()> {
        let dir = tempdir()?;
        let mut session = Session::new(dir.path())?;

        let created = session.make_dir(&MakeDirCommand::new("x/y"))?;
        assert_eq!(created, dir.path().join("x").join("y"));

        let again = session.make_dir(&MakeDirCommand::new("x/y"));
        assert!(matches!(again, Err(ShellError::AlreadyExists { .. })));

        let not_empty = session.remove(&RemoveCommand::new("x"));
        assert!(matches!(not_empty, Err(ShellError::NotEmpty { .. })));

        session.remove(&RemoveCommand::new("x/y"))?;
        session.remove(&RemoveCommand::new("x"))?;
        assert!(!dir.path().join("x").exists());
        Ok(())
    }

    #[test]
    fn test_rm_refuses_current_dir() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join("inner"))?;
        let mut session = Session::new(dir.path().join("inner"))?;

        for raw in [".", "..", "  "] {
            let result = session.remove(&RemoveCommand::new(raw));

            assert!(matches!(result, Err(ShellError::InvalidArgument(_))), "{raw}");
        }
        assert!(dir.path().join("inner").is_dir());
        Ok(())
    }

    #[test]
    fn test_list() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("one.txt"), b"1")?;
        let session = Session::new(dir.path())?;

        let listing = session.list()?;

        assert_eq!(listing.dir, dir.path());
        assert_eq!(listing.nodes.len(), 1);
        assert_eq!(listing.nodes[0].name, "one.txt");
        Ok(())
    }
}
