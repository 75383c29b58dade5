use anyhow::{anyhow, Result};
use clap::Subcommand;
use colored::Colorize;
use codebrain_core::{default_config_file, CodeBrainConfig, CodeBrainError};
use std::path::PathBuf;

use crate::config::CliContext;

#[derive(Subcommand)]
pub enum ConfigCommand {
    #[command(about = "Print the effective configuration")]
    Show,

    #[command(about = "Write a default config.toml")]
    Init {
        #[arg(long, help = "Target file (defaults to the user config directory)")]
        path: Option<PathBuf>,
    },
}

/// `Init` must work even when the current configuration does not load, so the
/// context is only built for `Show`.
pub fn handle_config_command<F>(context: F, action: Option<ConfigCommand>) -> Result<()>
where
    F: FnOnce() -> Result<CliContext>,
{
    match action {
        Some(ConfigCommand::Show) | None => cmd_config_show(&context()?),
        Some(ConfigCommand::Init { path }) => cmd_config_init(path),
    }
}

fn cmd_config_show(ctx: &CliContext) -> Result<()> {
    if ctx.is_json() {
        println!("{}", serde_json::to_string_pretty(&ctx.config)?);
        return Ok(());
    }

    println!("{}", "Effective Configuration".cyan().bold());
    println!("{}", "═".repeat(40).dimmed());
    println!(
        "  {:<18} {}",
        "API endpoint:".bold(),
        ctx.config.api.endpoint_base()
    );
    println!();
    print!(
        "{}",
        ctx.config.to_toml().map_err(CodeBrainError::from)?
    );

    Ok(())
}

fn cmd_config_init(path: Option<PathBuf>) -> Result<()> {
    let path = path
        .or_else(default_config_file)
        .ok_or_else(|| anyhow!("Could not determine config directory"))?;

    CodeBrainConfig::write_default(&path).map_err(CodeBrainError::from)?;

    println!(
        "{} Wrote default configuration to {}",
        "✓".green().bold(),
        path.display().to_string().bold()
    );

    Ok(())
}
