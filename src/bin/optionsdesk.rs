//! Options Analytics Terminal
//!
//! Terminal dashboard over the analytics backend: watchlist, per-ticker
//! analysis, unusual-activity scanner, paper-trading account, and AI chat.
//! A background task keeps a reconnecting WebSocket open for pushed alerts.

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use options_terminal::{logging, ui, App, DashboardConfig};

/// Config file path; overridable for local setups
const CONFIG_PATH_ENV: &str = "OPTIONSDESK_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "optionsdesk.yaml";

fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Stdout logging would corrupt the alternate screen, so the TUI only
    // logs when pointed at a file.
    if let Ok(log_path) = std::env::var("OPTIONSDESK_LOG") {
        logging::init_tracing_to_file(&log_path)?;
    }

    let config_path =
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = DashboardConfig::load(&config_path)?;

    // Create tokio runtime for fetches and the alert listener
    let runtime = tokio::runtime::Runtime::new()?;

    let mut app = App::initialize(runtime.handle().clone(), config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Stop the alert listener (cancels any pending reconnect)
    app.shutdown();

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Handle input with a short timeout so pushed data repaints promptly
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
