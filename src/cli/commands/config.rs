//! `aerocode config` command - Configuration inspection

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::context::Context;
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration values
    Show(ShowArgs),

    /// Show paths to the configuration file and data directory
    Path,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,
}

/// Valid configuration keys
const CONFIG_KEYS: &[&str] = &["login_delay_ms", "delete_policy", "default_format"];

/// Configuration after defaults are filled in
#[derive(Debug, Serialize)]
struct Effective {
    login_delay_ms: u64,
    delete_policy: String,
    default_format: String,
}

impl Effective {
    fn from_context(ctx: &Context) -> Self {
        Self {
            login_delay_ms: ctx.config.login_delay().as_millis() as u64,
            delete_policy: ctx.config.delete_policy().to_string(),
            default_format: ctx
                .config
                .default_format
                .clone()
                .unwrap_or_else(|| "auto".to_string()),
        }
    }

    fn get(&self, key: &str) -> Option<String> {
        match key {
            "login_delay_ms" => Some(self.login_delay_ms.to_string()),
            "delete_policy" => Some(self.delete_policy.clone()),
            "default_format" => Some(self.default_format.clone()),
            _ => None,
        }
    }
}

pub fn run(cmd: ConfigCommands, ctx: &Context, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, ctx, global),
        ConfigCommands::Path => run_path(ctx),
    }
}

fn run_show(args: ShowArgs, ctx: &Context, global: &GlobalOpts) -> Result<()> {
    let effective = Effective::from_context(ctx);

    if let Some(key) = args.key {
        let key = key.replace('-', "_");
        let value = effective.get(&key).ok_or_else(|| {
            miette::miette!(
                "Unknown config key '{}'. Valid keys: {}",
                key,
                CONFIG_KEYS.join(", ")
            )
        })?;
        println!("{}", value);
        return Ok(());
    }

    match ctx.format(global) {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&effective).into_diagnostic()?;
            println!("{}", json);
        }
        _ => {
            let yaml = serde_yml::to_string(&effective).into_diagnostic()?;
            print!("{}", yaml);
        }
    }
    Ok(())
}

fn run_path(ctx: &Context) -> Result<()> {
    let exists = |p: &std::path::Path| {
        if p.exists() {
            style("(exists)").green()
        } else {
            style("(not found)").dim()
        }
    };

    println!(
        "Config file: {} {}",
        ctx.paths.config_file.display(),
        exists(&ctx.paths.config_file)
    );
    println!(
        "Data dir:    {} {}",
        ctx.paths.data_dir.display(),
        exists(&ctx.paths.data_dir)
    );
    Ok(())
}
