use clap::{error::ErrorKind, Args, CommandFactory, Parser};

use crate::error::{ShellError, ShellResult};
use crate::tokenizer::Token;

/// The complete set of commands understood by the shell
#[derive(Debug, Clone, Eq, PartialEq, Parser)]
#[command(name = "", no_binary_name = true, disable_version_flag = true)]
pub enum CompleteCommand {
    /// Copy a file into a directory, renaming it if the name is taken
    #[command(disable_help_flag = true)]
    Copy(CopyCommand),
    /// Change the current directory
    #[command(disable_help_flag = true)]
    Cd(ChangeDirCommand),
    /// Create a directory and any missing parents
    #[command(name = "mkdir", disable_help_flag = true)]
    MakeDir(MakeDirCommand),
    /// Remove a file or an empty directory
    #[command(name = "rm", disable_help_flag = true)]
    Remove(RemoveCommand),
    /// Leave the shell, in any letter case
    #[command(disable_help_flag = true)]
    Exit,
}

#[derive(Debug, Clone, Eq, PartialEq, Args)]
pub struct CopyCommand {
    /// The file to copy
    #[arg(allow_hyphen_values = true)]
    pub source: String,
    /// The directory to copy into, created if missing
    #[arg(allow_hyphen_values = true)]
    pub target_dir: String,
}

#[derive(Debug, Clone, Eq, PartialEq, Args)]
pub struct ChangeDirCommand {
    /// The directory to move to
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    path: Vec<String>,
}

#[derive(Debug, Clone, Eq, PartialEq, Args)]
pub struct MakeDirCommand {
    /// The directory to create
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    dir: Vec<String>,
}

#[derive(Debug, Clone, Eq, PartialEq, Args)]
pub struct RemoveCommand {
    /// The file or empty directory to remove
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    path: Vec<String>,
}

// These commands take the rest of the line, so `cd My Documents` works
// without quotes.
impl ChangeDirCommand {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: vec![path.into()],
        }
    }

    pub fn path(&self) -> String {
        self.path.join(" ")
    }
}

impl MakeDirCommand {
    pub fn new(dir: impl Into<String>) -> Self {
        Self {
            dir: vec![dir.into()],
        }
    }

    pub fn dir(&self) -> String {
        self.dir.join(" ")
    }
}

impl RemoveCommand {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: vec![path.into()],
        }
    }

    pub fn path(&self) -> String {
        self.path.join(" ")
    }
}

/// What a tokenized line turned out to be.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ParsedLine {
    Blank,
    Command(CompleteCommand),
    /// `help` was asked for, holds the rendered text.
    Help(String),
}

impl CompleteCommand {
    /// Names (and aliases) accepted as the first token, `help` included.
    pub fn names() -> Vec<String> {
        let command = Self::command();
        let mut names: Vec<String> = command
            .get_subcommands()
            .flat_map(|sub| {
                std::iter::once(sub.get_name().to_string())
                    .chain(sub.get_all_aliases().map(str::to_string))
            })
            .collect();
        names.push("help".into());
        names
    }

    /// Parse the tokens of `line` into a command.
    pub fn from_tokens(line: &str, tokens: &[Token]) -> ShellResult<ParsedLine> {
        let Some(first) = tokens.first() else {
            return Ok(ParsedLine::Blank);
        };

        let name = if first.value.eq_ignore_ascii_case("exit") {
            "exit"
        } else {
            first.value.as_str()
        };

        let names = Self::names();
        if !names.iter().any(|known| known == name) {
            return Err(
                ShellError::invalid_argument(
                    line,
                    first.span,
                    format!("unknown command `{}`", first.value),
                )
                .with_hint(
                    Some("not a command".into()),
                    Some(format!("available commands: {}", names.join(", "))),
                ),
            );
        }

        // Everything after the command name is an operand, so file names such
        // as `-h`, `--help` or `--` reach the command untouched.
        let mut args = vec![name];
        if name != "help" {
            args.push("--");
        }
        args.extend(tokens[1..].iter().map(|t| t.value.as_str()));

        match Self::try_parse_from(args) {
            Ok(command) => Ok(ParsedLine::Command(command)),
            Err(err) if is_help(err.kind()) => Ok(ParsedLine::Help(err.render().to_string())),
            Err(err) => {
                let rendered = err.render().to_string();
                let message = error_message(&rendered);
                let usage = rendered
                    .lines()
                    .find_map(|l| l.trim().strip_prefix("Usage: "))
                    .map(|u| format!("usage: {u}"));

                let last = tokens.last().unwrap_or(first);
                let span = first.span.offset()..last.span.offset() + last.span.len();

                Err(ShellError::invalid_argument(line, span, message)
                    .with_hint(Some("in this command".into()), usage))
            }
        }
    }
}

/// The leading paragraph of a rendered clap error, on one line.
fn error_message(rendered: &str) -> String {
    rendered
        .lines()
        .take_while(|l| !l.trim().is_empty())
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
        .trim_start_matches("error: ")
        .to_string()
}

fn is_help(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            | ErrorKind::DisplayVersion
    )
}
