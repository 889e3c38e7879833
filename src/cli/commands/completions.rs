//! `aerocode completions` - tab completion for the section commands
//!
//! The script is printed to stdout; load it from the shell's startup file,
//! e.g. `eval "$(aerocode completions bash)"`.

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use miette::{IntoDiagnostic, Result};
use std::io::{self, Write};

use crate::cli::Cli;

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell (bash, zsh, fish, powershell, elvish)
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run(args: CompletionsArgs) -> Result<()> {
    io::stdout()
        .write_all(&script(args.shell))
        .into_diagnostic()
}

fn script(shell: Shell) -> Vec<u8> {
    let mut cmd = Cli::command();
    let mut out = Vec::new();
    generate(shell, &mut cmd, "aerocode", &mut out);
    out
}
