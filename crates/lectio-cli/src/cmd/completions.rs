//! `lct completions` — shell completion scripts.

use anyhow::Result;
use clap::Args;
use clap_complete::Shell;
use std::io;

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run_completions(shell: Shell, command: &mut clap::Command) -> Result<()> {
    clap_complete::generate(shell, command, "lct", &mut io::stdout());
    Ok(())
}
