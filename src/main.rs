use clap::Parser;
use miette::Result;

use aerocode::cli::commands::{self, completions};
use aerocode::cli::{Cli, Commands, Context};

fn main() -> Result<()> {
    // Reset SIGPIPE so piping into `head` or `grep -q` exits quietly
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    aerocode::logging::init(global.verbose);

    // Completions need neither config nor login
    if let Commands::Completions(args) = cli.command {
        return completions::run(args);
    }

    let mut ctx = Context::open(&global)?;
    commands::run(cli.command, &mut ctx, &global)
}
