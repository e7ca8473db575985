use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

pub type ShellResult<T> = Result<T, ShellError>;

/// Every way a shell command can fail.
///
/// None of these are fatal to the interactive loop: the dispatcher renders
/// the error and reads the next line.
#[derive(Debug, Diagnostic, Error)]
pub enum ShellError {
    #[error("no such file or directory: {}", path.display())]
    #[diagnostic(code(fmsh::not_found))]
    NotFound { path: PathBuf },

    #[error("not a directory: {}", path.display())]
    #[diagnostic(code(fmsh::not_a_directory))]
    NotADirectory { path: PathBuf },

    #[error("is a directory, expected a file: {}", path.display())]
    #[diagnostic(code(fmsh::is_a_directory))]
    IsADirectory { path: PathBuf },

    #[error("already exists: {}", path.display())]
    #[diagnostic(code(fmsh::already_exists))]
    AlreadyExists { path: PathBuf },

    #[error("directory is not empty: {}", path.display())]
    #[diagnostic(
        code(fmsh::not_empty),
        help("rm only removes files and empty directories")
    )]
    NotEmpty { path: PathBuf },

    #[error("permission denied: {}", path.display())]
    #[diagnostic(code(fmsh::unreadable))]
    Unreadable { path: PathBuf },

    #[error(transparent)]
    #[diagnostic(transparent)]
    InvalidArgument(CommandDiagnostic),

    #[error("cannot leave root {}: {} is on another root", root.display(), path.display())]
    #[diagnostic(code(fmsh::boundary_violation))]
    BoundaryViolation { path: PathBuf, root: PathBuf },

    #[error("i/o failure on {}: {source}", path.display())]
    #[diagnostic(code(fmsh::io))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ShellError {
    /// Classify an error coming from a filesystem primitive.
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::AlreadyExists => Self::AlreadyExists { path },
            io::ErrorKind::PermissionDenied => Self::Unreadable { path },
            _ => Self::Io { path, source },
        }
    }

    pub fn invalid_argument(
        input: &str,
        span: impl Into<SourceSpan>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument(CommandDiagnostic {
            input: Arc::new(input.to_string()),
            span: span.into(),
            message: message.into(),
            label: None,
            help: None,
        })
    }

    /// Attach a label and help text to an [`ShellError::InvalidArgument`].
    /// Other variants are returned unchanged.
    pub fn with_hint(mut self, label: Option<String>, help: Option<String>) -> Self {
        if let Self::InvalidArgument(diagnostic) = &mut self {
            diagnostic.label = label.or(diagnostic.label.take());
            diagnostic.help = help.or(diagnostic.help.take());
        }
        self
    }
}

/// A diagnostic pointing into the command line that produced it.
#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
#[error("{message}")]
#[diagnostic(code(fmsh::invalid_argument))]
pub struct CommandDiagnostic {
    /// The raw command line.
    #[source_code]
    pub input: Arc<String>,

    /// Byte range of the offending token.
    #[label("{}", label.clone().unwrap_or_else(|| "here".into()))]
    pub span: SourceSpan,

    pub message: String,

    /// Label text for this span. Defaults to `"here"`.
    pub label: Option<String>,

    #[help]
    pub help: Option<String>,
}
