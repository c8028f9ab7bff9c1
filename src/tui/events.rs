use crate::booking::BookingResult;
use crossterm::event::{Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::warn;

/// Application events
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard input event
    Key(KeyEvent),

    /// Mouse input event
    Mouse(MouseEvent),

    /// Terminal resize event
    Resize(u16, u16),

    /// Periodic tick event
    Tick,

    /// A booking request has resolved
    BookingFinished(BookingResult),
}

/// Event handler for managing input events.
///
/// Terminal input is read on a blocking task and forwarded into the same
/// channel that background work (booking requests) reports on.
pub struct EventHandler {
    /// Event receiver channel
    receiver: mpsc::UnboundedReceiver<Event>,

    /// Event sender channel
    sender: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a new event handler and start reading terminal input
    pub fn new(tick_interval: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        let input_sender = sender.clone();
        tokio::task::spawn_blocking(move || read_input(input_sender, tick_interval));

        Self { receiver, sender }
    }

    /// Get the next event
    pub async fn next(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Get a clone of the sender
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }
}

/// Forward terminal events until the receiving side goes away.
fn read_input(sender: mpsc::UnboundedSender<Event>, tick_interval: Duration) {
    loop {
        let event = match crossterm::event::poll(tick_interval) {
            Ok(true) => match crossterm::event::read() {
                Ok(event) => convert_crossterm_event(event),
                Err(e) => {
                    warn!("Failed to read terminal event: {}", e);
                    return;
                }
            },
            Ok(false) => Some(Event::Tick),
            Err(e) => {
                warn!("Failed to poll terminal events: {}", e);
                return;
            }
        };

        if let Some(event) = event {
            if sender.send(event).is_err() {
                return;
            }
        }
    }
}

/// Convert crossterm events to application events
fn convert_crossterm_event(event: CrosstermEvent) -> Option<Event> {
    match event {
        // Release and repeat reports would double every key on some platforms.
        CrosstermEvent::Key(key_event) if key_event.kind == KeyEventKind::Press => {
            Some(Event::Key(key_event))
        }
        CrosstermEvent::Mouse(mouse_event) => Some(Event::Mouse(mouse_event)),
        CrosstermEvent::Resize(width, height) => Some(Event::Resize(width, height)),
        _ => None,
    }
}
