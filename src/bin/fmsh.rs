use std::io::IsTerminal;

use clap::Parser;
use fmsh::{
    cli::ShellCli,
    repl::Repl,
    repl_v2::{ReplV2, ShellPromptSegment},
    session::Session,
};
use miette::Result;

fn main() -> Result<()> {
    let cli = ShellCli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    let session = match &cli.start_dir {
        Some(dir) => Session::new(dir)?,
        None => Session::from_env()?,
    };

    if cli.plain || !std::io::stdin().is_terminal() {
        let stdin = std::io::stdin();
        Repl::new(stdin.lock(), std::io::stdout(), session).run()?;
    } else {
        ReplV2::run(session, ShellPromptSegment::WorkingDirectory)?;
    }

    Ok(())
}
