#![allow(clippy::useless_format, clippy::len_zero)]

use clap::{Parser, Subcommand};
use colored::Colorize;
use codebrain_core::{CliErrorDisplay, CodeBrainConfig, CodeBrainError, ConfigLoadError};
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;

use commands::{
    handle_config_command, handle_playbooks_command, handle_report_command,
    handle_tasks_command, ConfigCommand, PlaybooksCommand, TasksCommand,
};
use config::{CliContext, OutputFormat};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Parser)]
#[command(name = "codebrain")]
#[command(version = VERSION)]
#[command(about = "CodeBrain - plan, confirm and inspect code analysis tasks")]
#[command(long_about = r#"
CodeBrain submits natural-language tasks to the CodeBrain service, lets you
confirm the generated plan, answer follow-up questions and read the resulting
UI impact and compatibility report.

Point the client at a server with CODEBRAIN_API_URL or --api-url, then use
'codebrain tasks create "<description>"' to start a task.
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(
        short,
        long,
        global = true,
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "Output format"
    )]
    format: OutputFormat,

    #[arg(long, global = true, help = "Base URL of the CodeBrain API")]
    api_url: Option<String>,

    #[arg(long, global = true, help = "Path prefix of the API (empty for none)")]
    api_prefix: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "List, show, create and delete playbooks")]
    Playbooks {
        #[command(subcommand)]
        action: Option<PlaybooksCommand>,
    },

    #[command(about = "Create tasks, follow their plan and answer prompts")]
    Tasks {
        #[command(subcommand)]
        action: TasksCommand,
    },

    #[command(about = "Show the analysis report of a completed task")]
    Report {
        #[arg(help = "Task ID")]
        task_id: String,
    },

    #[command(about = "Inspect or initialize configuration")]
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommand>,
    },

    #[command(about = "Show version information")]
    Version {
        #[arg(short, long)]
        detailed: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = CodeBrainConfig::load()
        .map(|c| c.with_overrides(cli.api_url.clone(), cli.api_prefix.clone()))
        .and_then(|c| c.validate().map(|_| c));

    let json_logs = loaded
        .as_ref()
        .map(|c| c.logging.json_format)
        .unwrap_or(false);
    init_logging(cli.verbose, json_logs);

    if let Ok(config) = &loaded {
        if !config.display.color || std::env::var_os("NO_COLOR").is_some() {
            colored::control::set_override(false);
        }
    }

    match run(cli, loaded).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<CodeBrainError>() {
                Some(err) => eprint!("{}: {}", "Error".red().bold(), CliErrorDisplay::new(err)),
                None => eprintln!("{}: {}", "Error".red().bold(), e),
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool, json: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

async fn run(cli: Cli, loaded: Result<CodeBrainConfig, ConfigLoadError>) -> anyhow::Result<()> {
    let format = cli.format;
    let context = || -> anyhow::Result<CliContext> {
        let config = loaded.map_err(CodeBrainError::from)?;
        Ok(CliContext::new(config, format))
    };

    match cli.command {
        Commands::Playbooks { action } => handle_playbooks_command(&context()?, action).await,
        Commands::Tasks { action } => handle_tasks_command(&context()?, action).await,
        Commands::Report { task_id } => handle_report_command(&context()?, &task_id).await,
        Commands::Config { action } => handle_config_command(context, action),
        Commands::Version { detailed } => cmd_version(detailed, format),
    }
}

fn cmd_version(detailed: bool, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        let output = serde_json::json!({
            "name": NAME,
            "version": VERSION,
            "core_version": codebrain_core::VERSION,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if detailed {
        println!("{}", "CodeBrain Version Information".cyan().bold());
        println!("{}", "═".repeat(40).dimmed());
        println!("  {:<15} {}", "Version:".bold(), VERSION);
        println!("  {:<15} {}", "Name:".bold(), NAME);
        println!("  {:<15} {}", "Core:".bold(), codebrain_core::VERSION);
        println!("  {:<15} Apache-2.0", "License:".bold());
        println!();
        println!("  {}", "Build Information:".bold());
        println!("    Rust Edition: 2021");
        #[cfg(debug_assertions)]
        println!("    Build:        Debug");
        #[cfg(not(debug_assertions))]
        println!("    Build:        Release");
    } else {
        println!("codebrain {}", VERSION);
    }

    Ok(())
}
