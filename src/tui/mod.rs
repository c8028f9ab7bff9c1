//! Terminal user interface built on ratatui

mod app;
mod booking;
mod events;
mod form;
mod keys;
mod modal;
mod styles;

use app::{App, AppConfig};
use events::EventHandler;

use crate::booking::{BookingSubmitter, Catalog, HttpBookingClient};
use crate::config::Config;
use crate::version;
use anyhow::Result;
use booking::BookingFlow;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use form::BookingForm;
use modal::ModalController;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::sync::Arc;
use tracing::{error, info};

pub type Backend = CrosstermBackend<io::Stdout>;
pub type Frame<'a> = ratatui::Frame<'a>;

/// Initialize the terminal for TUI mode
pub fn init_terminal(mouse: bool) -> Result<Terminal<Backend>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
pub fn restore_terminal(terminal: &mut Terminal<Backend>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Put the terminal back before the default hook prints the panic
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        error!("Application panicked: {}", panic_info);
        default_hook(panic_info);
    }));
}

/// Main TUI entry point
pub async fn run(config: &Config) -> Result<()> {
    let client = HttpBookingClient::from_config(config)?;
    info!(version = %version::full_version(), base_url = %client.base_url(), "Starting interactive mode");

    let catalog = Arc::new(Catalog::default());
    let modal = ModalController::new(BookingForm::new(catalog.clone()));
    let booking = BookingFlow::new(modal, BookingSubmitter::new(Arc::new(client)));

    let mut event_handler = EventHandler::new(config.tick_rate());
    let app_config = AppConfig {
        mouse_enabled: config.mouse_enabled,
        ..AppConfig::default()
    };
    let mut app = App::new(catalog, booking, app_config, event_handler.sender());

    install_panic_hook();
    let mut terminal = init_terminal(config.mouse_enabled)?;

    let result = run_app(&mut terminal, &mut app, &mut event_handler).await;

    restore_terminal(&mut terminal)?;
    info!("Application finished");
    result
}

/// Main application loop
async fn run_app(
    terminal: &mut Terminal<Backend>,
    app: &mut App,
    event_handler: &mut EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        match event_handler.next().await {
            Some(event) => {
                if app.handle_event(event).await? {
                    break; // Exit requested
                }
            }
            None => break,
        }
    }
    Ok(())
}
