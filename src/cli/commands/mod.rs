//! CLI command implementations

pub mod records;

pub mod aircraft;
pub mod completions;
pub mod config;
pub mod employee;
pub mod part;
pub mod session;
pub mod shell;
pub mod stage;

use miette::Result;

use crate::cli::context::Context;
use crate::cli::{Commands, GlobalOpts};

/// Dispatch one parsed command against `ctx`
pub fn run(command: Commands, ctx: &mut Context, global: &GlobalOpts) -> Result<()> {
    match command {
        Commands::Login(args) => session::run_login(args, ctx, global),
        Commands::Logout => session::run_logout(ctx, global),
        Commands::Whoami => session::run_whoami(ctx, global),
        Commands::Nav => session::run_nav(ctx, global),
        Commands::Aircraft(cmd) => aircraft::run(cmd, ctx, global),
        Commands::Part(cmd) => part::run(cmd, ctx, global),
        Commands::Employee(cmd) => employee::run(cmd, ctx, global),
        Commands::Stage(cmd) => stage::run(cmd, ctx, global),
        Commands::Test(cmd) => test::run(cmd, ctx, global),
        Commands::Shell => shell::run(ctx, global),
        Commands::Config(cmd) => config::run(cmd, ctx, global),
        Commands::Completions(args) => completions::run(args),
    }
}
