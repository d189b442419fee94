//! `phasechain completions` command

use std::io::{self, Write};

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::generate;

use crate::cli::{Cli, CompletionsArgs};

pub fn execute(args: CompletionsArgs) -> Result<()> {
    let mut stdout = io::stdout().lock();
    generate(args.shell, &mut Cli::command(), "phasechain", &mut stdout);
    stdout.flush()?;

    Ok(())
}
