use std::fs::OpenOptions;
use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tokio::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codebrain_core::{CodeBrainConfig, DynCodeBrainApi, HttpApiClient};
use codebrain_tui::app::App;
use codebrain_tui::client::spawn_request;
use codebrain_tui::events::{spawn_terminal_events, spawn_ticker, AppEvent};
use codebrain_tui::ui::draw;

#[derive(Parser)]
#[command(name = "codebrain-tui")]
#[command(author, version, about = "Interactive terminal client for CodeBrain")]
struct Args {
    #[arg(long, help = "Base URL of the CodeBrain service")]
    api_url: Option<String>,

    #[arg(long, help = "Path prefix of the API (empty for none)")]
    api_prefix: Option<String>,
}

struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("enter alt screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("create terminal")?;
        terminal.clear().context("clear terminal")?;
        Ok(Self { terminal })
    }

    fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<io::Stdout>> {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// The terminal belongs to the UI, so logs only go to a file when one is configured.
fn setup_logging(config: &CodeBrainConfig) -> Result<()> {
    if config.logging.file_path.is_empty() {
        return Ok(());
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.logging.file_path)
        .with_context(|| format!("open log file {}", config.logging.file_path))?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "codebrain_tui={level},codebrain_core={level}",
            level = config.log_level()
        )
        .into()
    });

    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(Arc::new(file));

    if config.logging.json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .init();
    } else {
        tracing_subscriber::registry().with(filter).with(layer).init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = CodeBrainConfig::load()?.with_overrides(args.api_url, args.api_prefix);
    config.validate()?;
    setup_logging(&config)?;

    let api: DynCodeBrainApi = Arc::new(HttpApiClient::new(&config.api)?);
    info!("CodeBrain TUI starting against {}", config.api.endpoint_base());

    let result = run(App::new(&config), api, &config).await;
    if let Err(e) = &result {
        eprintln!("Application error: {e}");
    }
    result
}

async fn run(mut app: App, api: DynCodeBrainApi, config: &CodeBrainConfig) -> Result<()> {
    let mut term = TerminalGuard::enter()?;

    let (tx, mut rx) = mpsc::channel::<AppEvent>(256);
    spawn_terminal_events(tx.clone());
    spawn_ticker(tx.clone(), Duration::from_millis(config.tui.tick_rate_ms));

    for pending in app.start().requests {
        spawn_request(api.clone(), pending, tx.clone());
    }

    term.terminal_mut().draw(|frame| draw(frame, &app))?;

    while let Some(event) = rx.recv().await {
        let effects = match event {
            AppEvent::Key(key) => app.handle_key(key),
            AppEvent::Api { mount, msg } => app.apply(mount, msg),
            AppEvent::Tick => {
                app.on_tick();
                Default::default()
            }
            AppEvent::Resize(_, _) => Default::default(),
        };

        for pending in effects.requests {
            spawn_request(api.clone(), pending, tx.clone());
        }

        if app.should_quit {
            break;
        }

        term.terminal_mut().draw(|frame| draw(frame, &app))?;
    }

    Ok(())
}
