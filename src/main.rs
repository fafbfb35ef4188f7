//! customer-manager binary entry point.
//!
//! Parses the CLI, sets up file logging and the async runtime, initializes
//! the terminal in raw mode, runs the TUI event loop, and restores the
//! terminal state on exit.
//!
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

mod api;
mod app;
mod form;
mod ui;

/// TUI to create, edit and delete customer records against a remote HTTP API.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Base URL of the customer API
    #[arg(
        long,
        env = "CUSTOMER_API_URL",
        default_value = "https://customer-form-api.onrender.com"
    )]
    api_url: String,

    /// Theme configuration file (created with defaults when missing)
    #[arg(long, default_value = "theme.conf")]
    theme: String,

    /// Diagnostic log file; the terminal itself belongs to the TUI
    #[arg(long, default_value = "customer-manager.log")]
    log_file: String,
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn init_logging(path: &str) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {path}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let runtime = tokio::runtime::Runtime::new().context("start async runtime")?;
    let dispatcher = app::update::Dispatcher {
        handle: runtime.handle().clone(),
        client: Arc::new(api::ApiClient::new(&cli.api_url)),
    };
    let theme = app::Theme::load_or_init(&cli.theme);

    let mut terminal = init_terminal().context("init terminal")?;

    let res = app::run(&mut terminal, &dispatcher, theme);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        eprintln!("application error: {err}");
    }
    Ok(())
}
