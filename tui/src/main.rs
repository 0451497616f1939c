//! breathe entry point
//!
//! Usage:
//!   breathe [TECHNIQUE] [-c N] [--no-audio] [--config PATH]
//!   breathe list [--json]
//!
//! Logs go to stderr, filtered by `RUST_LOG` (errors only by default). Set
//! `BREATHE_LOG_FILE` to write them to a file instead, since stderr shares
//! the screen with the visualizer.

use std::fs::OpenOptions;
use std::io::{self, IsTerminal};
use std::panic;
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::Context;
use breathe_engine::{catalog, EngineError};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use breathe_tui::cli::{self, Cli, Command, EXIT_RUNTIME};
use breathe_tui::render::TerminalRenderer;
use breathe_tui::{app, listing, App};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();

    if let Err(e) = init_logging() {
        eprintln!("breathe: {e:#}");
        return ExitCode::from(EXIT_RUNTIME);
    }

    if let Some(Command::List { json }) = args.command {
        return list(json);
    }

    let launch = match args.resolve() {
        Ok(launch) => launch,
        Err(e) => return fail(&e),
    };

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("breathe: needs an interactive terminal (TTY)");
        eprintln!();
        eprintln!("stdin or stdout is not a terminal. Run it directly in a terminal,");
        eprintln!("or use `ssh -t` when connecting remotely.");
        return ExitCode::from(EXIT_RUNTIME);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut renderer = match init_terminal() {
        Ok(renderer) => renderer,
        Err(e) => {
            restore_terminal(None);
            return fail(&e);
        }
    };

    let result = match renderer.check_size() {
        Ok(()) => {
            App::new(launch.config, launch.technique, launch.cycles)
                .run(&mut renderer)
                .await
        }
        Err(e) => Err(e),
    };

    restore_terminal(Some(&mut renderer));

    match result {
        Ok(summary) => {
            if let Some(line) = app::goodbye(summary.as_ref()) {
                println!("\n{line}\n");
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn init_logging() -> anyhow::Result<()> {
    let writer = match std::env::var_os("BREATHE_LOG_FILE") {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("cannot open log file {}", path.to_string_lossy()))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(io::stderr),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer),
        )
        .with(filter)
        .init();
    Ok(())
}

fn list(json: bool) -> ExitCode {
    if json {
        match listing::json(catalog::all()) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("breathe: {e}");
                return ExitCode::from(EXIT_RUNTIME);
            }
        }
    } else {
        print!("{}", listing::table(catalog::all()));
    }
    ExitCode::SUCCESS
}

fn fail(error: &EngineError) -> ExitCode {
    tracing::error!(error = %error, "breathe stopped");
    eprintln!("{}", cli::describe(error));
    ExitCode::from(cli::exit_code(error))
}

fn init_terminal() -> Result<TerminalRenderer<CrosstermBackend<io::Stdout>>, EngineError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;
    terminal.hide_cursor()?;
    Ok(TerminalRenderer::new(terminal))
}

fn restore_terminal(renderer: Option<&mut TerminalRenderer<CrosstermBackend<io::Stdout>>>) {
    let _ = disable_raw_mode();
    match renderer {
        Some(renderer) => {
            let terminal = renderer.terminal_mut();
            let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
            let _ = terminal.show_cursor();
        }
        None => {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}
