use miette::{Diagnostic, IntoDiagnostic, Result};

use crate::error::ShellError;
use crate::system::{execute, CommandOutput, System};

/// Line oriented front end over any reader and writer.
///
/// Used when stdin is not a terminal, and by the tests.
#[derive(Debug, Default)]
pub struct Repl<I, O, S>
where
    I: std::io::BufRead,
    O: std::io::Write,
    S: System,
{
    input_stream: I,
    output_stream: O,
    system: S,
}

impl<I, O, S> Repl<I, O, S>
where
    I: std::io::BufRead,
    O: std::io::Write,
    S: System,
{
    pub fn new(input_stream: I, output_stream: O, system: S) -> Self {
        Self {
            input_stream,
            output_stream,
            system,
        }
    }

    pub fn system(&self) -> &S {
        &self.system
    }

    pub fn into_output(self) -> O {
        self.output_stream
    }

    /// Run until `exit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        let mut buffer = String::new();

        loop {
            self.show_listing()?;

            self.output_stream.write_all(b"$ ").into_diagnostic()?;
            self.output_stream.flush().into_diagnostic()?;

            buffer.clear();
            if self.input_stream.read_line(&mut buffer).into_diagnostic()? == 0 {
                writeln!(self.output_stream).into_diagnostic()?;
                writeln!(self.output_stream, "{}", CommandOutput::Exit).into_diagnostic()?;
                break;
            }

            match execute(&mut self.system, &buffer) {
                Ok(CommandOutput::Exit) => {
                    writeln!(self.output_stream, "{}", CommandOutput::Exit).into_diagnostic()?;
                    break;
                }
                Ok(CommandOutput::Nothing) => {}
                Ok(output) => writeln!(self.output_stream, "{output}").into_diagnostic()?,
                Err(err) => self.report(&err)?,
            }
        }

        self.output_stream.flush().into_diagnostic()
    }

    fn show_listing(&mut self) -> Result<()> {
        match self.system.list() {
            Ok(listing) => {
                writeln!(self.output_stream, "{listing}").into_diagnostic()?;
                for failure in &listing.failures {
                    self.report(failure)?;
                }
                Ok(())
            }
            Err(err) => self.report(&err),
        }
    }

    fn report(&mut self, err: &ShellError) -> Result<()> {
        writeln!(self.output_stream, "error: {err}").into_diagnostic()?;
        if let Some(help) = err.help() {
            writeln!(self.output_stream, "  help: {help}").into_diagnostic()?;
        }
        Ok(())
    }
}
