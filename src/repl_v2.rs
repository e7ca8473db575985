use std::borrow::Cow;
use std::path::PathBuf;

use miette::{IntoDiagnostic, Report, Result};

use clap_repl::reedline::{
    Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus, Reedline, Signal,
};

use crate::system::{execute, CommandOutput, System};

static DEFAULT_PROMPT_INDICATOR: &str = "$ ";
static DEFAULT_MULTILINE_INDICATOR: &str = "::: ";

#[derive(Clone)]
pub enum ShellPromptSegment {
    /// A basic user-defined prompt (i.e. just text)
    Basic(String),
    /// The path of the current working directory
    WorkingDirectory,
    /// An empty prompt segment
    Empty,
}

/// Prompt for one read. Rebuilt every iteration so it always shows the
/// directory the session is in.
pub struct ShellPrompt {
    segment: ShellPromptSegment,
    cwd: PathBuf,
}

impl ShellPrompt {
    pub fn new(cwd: PathBuf, segment: ShellPromptSegment) -> Self {
        Self { segment, cwd }
    }

    fn render_prompt_segment(&self) -> Cow<str> {
        match &self.segment {
            ShellPromptSegment::Basic(s) => s.into(),
            ShellPromptSegment::WorkingDirectory => {
                Cow::Owned(format!("{}{}", self.cwd.display(), "@fmsh"))
            }
            ShellPromptSegment::Empty => Cow::Borrowed(""),
        }
    }
}

impl Prompt for ShellPrompt {
    fn render_prompt_left(&self) -> Cow<str> {
        self.render_prompt_segment()
    }

    fn render_prompt_right(&self) -> Cow<str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _prompt_mode: PromptEditMode) -> Cow<str> {
        DEFAULT_PROMPT_INDICATOR.into()
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<str> {
        Cow::Borrowed(DEFAULT_MULTILINE_INDICATOR)
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!(
            "({}reverse-search: {}) ",
            prefix, history_search.term
        ))
    }
}

/// Interactive front end with line editing and history.
pub struct ReplV2 {}

impl ReplV2 {
    pub fn run<S: System>(mut system: S, segment: ShellPromptSegment) -> Result<()> {
        let mut line_editor = Reedline::create();

        loop {
            match system.list() {
                Ok(listing) => {
                    println!("{listing}");
                    for failure in listing.failures {
                        eprintln!("{:?}", Report::new(failure));
                    }
                }
                Err(err) => eprintln!("{:?}", Report::new(err)),
            }

            let prompt = ShellPrompt::new(system.get_cwd().to_path_buf(), segment.clone());

            match line_editor.read_line(&prompt).into_diagnostic()? {
                Signal::Success(line) => match execute(&mut system, &line) {
                    Ok(CommandOutput::Exit) => {
                        println!("{}", CommandOutput::Exit);
                        break;
                    }
                    Ok(CommandOutput::Nothing) => {}
                    Ok(output) => println!("{output}"),
                    Err(err) => eprintln!("{:?}", Report::new(err)),
                },
                Signal::CtrlD => {
                    println!("{}", CommandOutput::Exit);
                    break;
                }
                // Ctrl-C drops the current line only.
                _ => {}
            }
        }

        Ok(())
    }
}
