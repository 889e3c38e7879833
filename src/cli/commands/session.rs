//! `aerocode login`, `logout`, `whoami` and `nav`

use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Password};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::context::Context;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Access, AccessPolicy, Section};

#[derive(clap::Args, Debug)]
pub struct LoginArgs {
    /// Username (prompted when omitted)
    pub username: Option<String>,

    /// Password (prompted when omitted)
    #[arg(long, short = 'p')]
    pub password: Option<String>,
}

pub fn run_login(args: LoginArgs, ctx: &mut Context, global: &GlobalOpts) -> Result<()> {
    let theme = ColorfulTheme::default();
    let username = match args.username {
        Some(u) => u,
        None => Input::<String>::with_theme(&theme)
            .with_prompt("Username")
            .interact_text()
            .into_diagnostic()?,
    };
    let password = match args.password {
        Some(p) => p,
        None => Password::with_theme(&theme)
            .with_prompt("Password")
            .interact()
            .into_diagnostic()?,
    };

    if !ctx.session.login(&ctx.credentials, &username, &password)? {
        let accounts: Vec<&str> = ctx.credentials.usernames().collect();
        return Err(miette::miette!(
            code = "aerocode::session::rejected",
            help = format!("demo accounts: {}", accounts.join(", ")),
            "Invalid username or password"
        ));
    }

    if let Some(identity) = ctx.session.current() {
        if global.quiet {
            return Ok(());
        }
        println!(
            "{} Logged in as {} ({})",
            style("✓").green(),
            style(&identity.name).yellow(),
            identity.role
        );
    }
    Ok(())
}

pub fn run_logout(ctx: &mut Context, global: &GlobalOpts) -> Result<()> {
    let was = ctx.session.current().map(|i| i.username.clone());
    ctx.session.logout()?;
    if global.quiet {
        return Ok(());
    }
    match was {
        Some(username) => println!("{} Logged out {}", style("✓").green(), username),
        None => println!("Not logged in."),
    }
    Ok(())
}

pub fn run_whoami(ctx: &Context, global: &GlobalOpts) -> Result<()> {
    let Some(identity) = ctx.session.current() else {
        println!("Not logged in.");
        return Ok(());
    };

    match ctx.format(global) {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(identity).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(identity).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Id => println!("{}", identity.username),
        _ => {
            println!("{}", style("─".repeat(60)).dim());
            println!("{}: {}", style("Name").bold(), style(&identity.name).yellow());
            println!("{}: {}", style("Username").bold(), identity.username);
            println!("{}: {}", style("Role").bold(), identity.role);
            println!("{}: {}", style("Phone").bold(), identity.phone);
            println!("{}: {}", style("Address").bold(), identity.address);
            println!("{}", style("─".repeat(60)).dim());
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct NavItem {
    section: Section,
    access: Access,
}

pub fn run_nav(ctx: &Context, global: &GlobalOpts) -> Result<()> {
    let identity = ctx.session.require()?;
    let items: Vec<NavItem> = ctx
        .policy
        .visible_sections(identity.role)
        .into_iter()
        .map(|(section, access)| NavItem { section, access })
        .collect();

    match ctx.format(global) {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&items).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&items).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Id => {
            for item in &items {
                println!("{}", item.section);
            }
        }
        _ => {
            if !global.quiet {
                println!(
                    "{} ({})",
                    style(&identity.name).yellow(),
                    style(identity.role).cyan()
                );
            }
            for item in &items {
                let access = match item.access {
                    Access::ReadWrite => style(item.access.to_string()).green(),
                    Access::ReadOnly => style(item.access.to_string()).dim(),
                };
                println!("  {:<12} {}", item.section.label(), access);
            }
        }
    }
    Ok(())
}
