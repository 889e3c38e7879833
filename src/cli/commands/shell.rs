//! `aerocode shell` - many commands over one in-memory dashboard
//!
//! Records created, edited or deleted here live until the shell exits.
//! The login is shared with one-shot commands through session storage.

use clap::{CommandFactory, Parser};
use console::style;
use miette::{IntoDiagnostic, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, BufRead, IsTerminal};

use crate::cli::commands;
use crate::cli::context::Context;
use crate::cli::helpers::split_line;
use crate::cli::{Cli, Commands, GlobalOpts, OutputFormat};

/// What to do after one shell line
#[derive(Debug, PartialEq, Eq)]
enum Step {
    Continue,
    Exit,
}

pub fn run(ctx: &mut Context, global: &GlobalOpts) -> Result<()> {
    if io::stdin().is_terminal() {
        if !global.quiet {
            println!(
                "{} Type a command (e.g. {}), {} or {}.",
                style("Aerocode shell.").bold(),
                style("aircraft list").cyan(),
                style("help").cyan(),
                style("exit").cyan()
            );
        }
        run_editor(ctx, global)?;
    } else {
        run_lines(io::stdin().lock(), ctx, global)?;
    }

    tracing::debug!("shell closed");
    Ok(())
}

/// Terminal input: line editing, history, Ctrl-C clears the line, Ctrl-D exits
fn run_editor(ctx: &mut Context, global: &GlobalOpts) -> Result<()> {
    let mut editor = DefaultEditor::new().into_diagnostic()?;
    let prompt = format!("{} ", style("aerocode>").green().bold());

    loop {
        match editor.readline(&prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = editor.add_history_entry(line.as_str());
                }
                if execute_line(&line, ctx, global) == Step::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).into_diagnostic(),
        }
    }
    Ok(())
}

/// Piped input: one command per line, no prompt
fn run_lines<R: BufRead>(reader: R, ctx: &mut Context, global: &GlobalOpts) -> Result<()> {
    for line in reader.lines() {
        let line = line.into_diagnostic()?;
        if execute_line(&line, ctx, global) == Step::Exit {
            break;
        }
    }
    Ok(())
}

/// Run one line; failures are reported and the shell carries on
fn execute_line(line: &str, ctx: &mut Context, outer: &GlobalOpts) -> Step {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Step::Continue;
    }

    let Some(words) = split_line(trimmed) else {
        eprintln!("{} unclosed quote", style("✗").red());
        return Step::Continue;
    };

    match words.first().map(String::as_str) {
        Some("exit") | Some("quit") => return Step::Exit,
        Some("help") => {
            let _ = Cli::command().print_help();
            return Step::Continue;
        }
        _ => {}
    }

    let cli = match Cli::try_parse_from(std::iter::once("aerocode".to_string()).chain(words)) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return Step::Continue;
        }
    };

    if matches!(cli.command, Commands::Shell) {
        eprintln!("{} already in a shell", style("!").yellow());
        return Step::Continue;
    }

    let global = line_options(outer, &cli.global);
    tracing::debug!(line = trimmed, "shell command");
    if let Err(report) = commands::run(cli.command, ctx, &global) {
        eprintln!("{:?}", report);
    }
    Step::Continue
}

/// Options for one line: its own flags, falling back to the shell's
fn line_options(outer: &GlobalOpts, line: &GlobalOpts) -> GlobalOpts {
    GlobalOpts {
        format: match line.format {
            OutputFormat::Auto => outer.format,
            format => format,
        },
        quiet: outer.quiet || line.quiet,
        verbose: outer.verbose,
        home: outer.home.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Dashboard, Holds, RecordId};
    use crate::entities::Part;

    fn context() -> (tempfile::TempDir, Context, GlobalOpts) {
        let tmp = tempfile::tempdir().unwrap();
        let global = GlobalOpts {
            format: OutputFormat::Auto,
            quiet: true,
            verbose: false,
            home: Some(tmp.path().to_path_buf()),
        };
        let mut ctx = Context::open(&global).unwrap();
        ctx.session = ctx.session.with_login_delay(std::time::Duration::ZERO);
        (tmp, ctx, global)
    }

    #[test]
    fn test_changes_persist_across_lines() {
        let (_tmp, mut ctx, global) = context();
        execute_line("login admin -p admin123", &mut ctx, &global);
        execute_line(
            r#"part new name="Fuel Pump" part_number=FP-9 quantity=4 min_quantity=2"#,
            &mut ctx,
            &global,
        );
        let parts = <Dashboard as Holds<Part>>::records(&ctx.dashboard);
        assert_eq!(parts.len(), 6);
        assert_eq!(parts.list()[5].record.name, "Fuel Pump");

        execute_line("part delete 1 --yes", &mut ctx, &global);
        let parts = <Dashboard as Holds<Part>>::records(&ctx.dashboard);
        assert_eq!(parts.len(), 5);
    }

    #[test]
    fn test_bad_lines_do_not_stop_the_shell() {
        let (_tmp, mut ctx, global) = context();
        assert_eq!(execute_line("frobnicate", &mut ctx, &global), Step::Continue);
        assert_eq!(execute_line("part list", &mut ctx, &global), Step::Continue);
        assert_eq!(execute_line("login \"admin", &mut ctx, &global), Step::Continue);
        assert_eq!(execute_line("shell", &mut ctx, &global), Step::Continue);
        assert_eq!(execute_line("# comment", &mut ctx, &global), Step::Continue);
        assert_eq!(execute_line("quit", &mut ctx, &global), Step::Exit);
    }

    #[test]
    fn test_piped_lines_stop_at_exit() {
        let (_tmp, mut ctx, global) = context();
        let input = "login admin -p admin123\npart delete 1 --yes\nexit\npart delete 2 --yes\n";
        run_lines(std::io::Cursor::new(input), &mut ctx, &global).unwrap();
        let parts = <Dashboard as Holds<Part>>::records(&ctx.dashboard);
        assert_eq!(parts.len(), 4);
        assert!(parts.get(RecordId::new(2)).is_some());
    }

    #[test]
    fn test_line_options_inherit_outer() {
        let outer = GlobalOpts {
            format: OutputFormat::Json,
            quiet: true,
            verbose: false,
            home: None,
        };
        let line = Cli::parse_from(["aerocode", "nav"]).global;
        let merged = line_options(&outer, &line);
        assert_eq!(merged.format, OutputFormat::Json);
        assert!(merged.quiet);

        let line = Cli::parse_from(["aerocode", "-f", "csv", "nav"]).global;
        assert_eq!(line_options(&outer, &line).format, OutputFormat::Csv);
    }
}
