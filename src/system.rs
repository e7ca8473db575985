use std::fmt;
use std::path::{Path, PathBuf};

use tabled::{settings::Style, Table, Tabled};
use tracing::debug;

use crate::complete_command::{
    ChangeDirCommand, CompleteCommand, CopyCommand, MakeDirCommand, ParsedLine, RemoveCommand,
};
use crate::copy::CopyOutcome;
use crate::error::{ShellError, ShellResult};
use crate::fs::NodeInfo;
use crate::tokenizer::{Token, Tokenizer};

/// Marker shown instead of an extension for directories.
pub const FOLDER_MARKER: &str = "folder";

pub struct ListCommandOutput {
    pub dir: PathBuf,
    pub nodes: Vec<NodeInfo>,
    /// Entries that could not be inspected.
    pub failures: Vec<ShellError>,
}

#[derive(Tabled)]
struct ListingRow<'a> {
    #[tabled(rename = "Name")]
    name: &'a str,
    #[tabled(rename = "Extension/type")]
    kind: &'a str,
    #[tabled(rename = "Size")]
    size: &'a str,
}

impl<'a> From<&'a NodeInfo> for ListingRow<'a> {
    fn from(node: &'a NodeInfo) -> Self {
        Self {
            name: &node.name,
            kind: node.extension().unwrap_or(FOLDER_MARKER),
            size: &node.human_readable_size,
        }
    }
}

impl fmt::Display for ListCommandOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.dir.display())?;

        let mut table = Table::new(self.nodes.iter().map(ListingRow::from));
        table.with(Style::psql());

        writeln!(f, "{table}")
    }
}

/// A system that can execute shell commands
///
/// Implementors own the session state; every method either commits its
/// change completely or leaves the state untouched.
pub trait System {
    /// Get the current working directory
    fn get_cwd(&self) -> &Path;
    /// List the contents of the current directory
    fn list(&self) -> ShellResult<ListCommandOutput>;
    /// Change the current directory, returning the new one
    fn chdir(&mut self, cmd: &ChangeDirCommand) -> ShellResult<PathBuf>;
    /// Copy a file into a directory
    fn copy(&mut self, cmd: &CopyCommand) -> ShellResult<CopyOutcome>;
    /// Create a new directory
    fn make_dir(&mut self, cmd: &MakeDirCommand) -> ShellResult<PathBuf>;
    /// Remove a file or empty directory
    fn remove(&mut self, cmd: &RemoveCommand) -> ShellResult<PathBuf>;
}

/// What a successfully executed line has to say.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum CommandOutput {
    Nothing,
    Help(String),
    ChangedDir(PathBuf),
    Copied(CopyOutcome),
    Created(PathBuf),
    Removed(PathBuf),
    Exit,
}

impl fmt::Display for CommandOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutput::Nothing => Ok(()),
            CommandOutput::Help(text) => write!(f, "{}", text.trim_end()),
            CommandOutput::ChangedDir(dir) => write!(f, "moved to {}", dir.display()),
            CommandOutput::Copied(outcome) => {
                if let Some(dir) = &outcome.created_dir {
                    writeln!(f, "created target directory {}", dir.display())?;
                }
                write!(f, "copied to {}", outcome.destination.display())
            }
            CommandOutput::Created(dir) => write!(f, "created {}", dir.display()),
            CommandOutput::Removed(path) => write!(f, "removed {}", path.display()),
            CommandOutput::Exit => write!(f, "bye"),
        }
    }
}

/// Tokenize, parse and run one command line against `system`.
pub fn execute<S: System>(system: &mut S, line: &str) -> ShellResult<CommandOutput> {
    let line = line.trim();
    let tokens: Vec<Token> = Tokenizer::new(line).collect();

    let command = match CompleteCommand::from_tokens(line, &tokens)? {
        ParsedLine::Blank => return Ok(CommandOutput::Nothing),
        ParsedLine::Help(text) => return Ok(CommandOutput::Help(text)),
        ParsedLine::Command(command) => command,
    };
    debug!("execute: {:?}", command);

    let output = match command {
        CompleteCommand::Copy(cmd) => CommandOutput::Copied(system.copy(&cmd)?),
        CompleteCommand::Cd(cmd) => CommandOutput::ChangedDir(system.chdir(&cmd)?),
        CompleteCommand::MakeDir(cmd) => CommandOutput::Created(system.make_dir(&cmd)?),
        CompleteCommand::Remove(cmd) => CommandOutput::Removed(system.remove(&cmd)?),
        CompleteCommand::Exit => CommandOutput::Exit,
    };

    Ok(output)
}
