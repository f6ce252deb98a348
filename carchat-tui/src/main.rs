use std::{io, time::Duration};

use anyhow::{Context, Result};
use carchat::Settings;
use carchat_tui::{ui, App, KeyAction};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal chat window for carchat", long_about = None)]
struct Args {
    #[command(flatten)]
    settings: Settings,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // The terminal belongs to the UI, so logs go to a file.
    let file_appender = tracing_appender::rolling::never(".", "carchat-tui.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "carchat=info,carchat_tui=debug".into()),
        )
        .init();

    let args = Args::parse();
    let session = args
        .settings
        .chat_session()
        .context("Failed to set up the chat session")?;

    tracing::info!("Starting carchat TUI for vehicle {}", args.settings.vehicle_id);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session);
    let res = run_app(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.process_events();
        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                tracing::debug!("Key event: {:?} with modifiers: {:?}", key.code, key.modifiers);
                if app.handle_key(key) == KeyAction::Quit {
                    return Ok(());
                }
            }
        }
    }
}
