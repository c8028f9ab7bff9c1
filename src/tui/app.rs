use crate::booking::Catalog;
use crate::tui::{
    booking::{BookingFlow, PendingBooking},
    events::Event,
    keys::KeyMap,
    modal::Prefill,
    styles::Theme,
    Frame,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Sections of the shop screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Masters,
    Services,
    About,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Masters, Section::Services, Section::About];

    pub fn title(&self) -> &'static str {
        match self {
            Section::Masters => "Masters",
            Section::Services => "Services",
            Section::About => "About",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Show help text
    pub show_help: bool,

    /// Enable mouse support
    pub mouse_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            show_help: false,
            mouse_enabled: true,
        }
    }
}

/// Main application state and controller
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,

    /// Key mappings for the application
    pub key_map: KeyMap,

    /// Current theme for styling
    pub theme: Theme,

    /// Application configuration
    pub config: AppConfig,

    catalog: Arc<Catalog>,
    section: Section,
    masters: ListState,
    services: ListState,
    booking: BookingFlow,

    /// Event sender for results of background work
    event_sender: mpsc::UnboundedSender<Event>,
}

impl App {
    /// Create a new application instance
    pub fn new(
        catalog: Arc<Catalog>,
        booking: BookingFlow,
        config: AppConfig,
        event_sender: mpsc::UnboundedSender<Event>,
    ) -> Self {
        let mut masters = ListState::default();
        masters.select((!catalog.masters.is_empty()).then_some(0));
        let mut services = ListState::default();
        services.select((!catalog.services.is_empty()).then_some(0));

        Self {
            should_quit: false,
            key_map: KeyMap::default(),
            theme: Theme::default(),
            config,
            catalog,
            section: Section::Masters,
            masters,
            services,
            booking,
            event_sender,
        }
    }

    #[cfg(test)]
    pub fn section(&self) -> Section {
        self.section
    }

    #[cfg(test)]
    pub fn booking(&self) -> &BookingFlow {
        &self.booking
    }

    /// Handle incoming events. Returns whether the app should exit.
    pub async fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Key(key_event) => self.handle_key_event(key_event),

            Event::Mouse(mouse_event) => {
                if self.config.mouse_enabled {
                    self.handle_mouse_event(mouse_event);
                }
            }

            // ratatui resizes its buffers on the next draw
            Event::Resize(width, height) => debug!(width, height, "Terminal resized"),
            Event::Tick => {}

            Event::BookingFinished(result) => {
                info!(success = result.is_success(), "Booking finished");
                self.booking.finish(result);
            }
        }

        Ok(self.should_quit)
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if self.key_map.force_quit.matches(&key) {
            self.should_quit = true;
            return;
        }

        if self.booking.is_capturing_input() {
            if let Some(pending) = self.booking.handle_key(key) {
                self.dispatch(pending);
            }
            return;
        }

        if self.config.show_help {
            // Any key closes the help overlay
            self.config.show_help = false;
            return;
        }

        let keys = &self.key_map;
        if keys.should_quit(&key) {
            self.should_quit = true;
        } else if keys.should_show_help(&key) {
            self.config.show_help = true;
        } else if keys.book.matches(&key) {
            self.booking.open(None);
        } else if keys.book_selected.matches(&key) {
            self.book_selected();
        } else if keys.next_section.matches(&key) {
            self.section = self.section.next();
        } else if keys.prev_section.matches(&key) {
            self.section = self.section.prev();
        } else if keys.up.matches(&key) {
            self.move_selection(false);
        } else if keys.down.matches(&key) {
            self.move_selection(true);
        } else if let KeyCode::Char(c @ '1'..='3') = key.code {
            self.section = Section::ALL[c as usize - '1' as usize];
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        if self.booking.is_capturing_input() {
            if let Some(pending) = self.booking.handle_mouse(mouse) {
                self.dispatch(pending);
            }
        }
    }

    /// Send a booking in the background; the result comes back as an event
    fn dispatch(&self, pending: PendingBooking) {
        let sender = self.event_sender.clone();
        tokio::spawn(async move {
            let result = pending.send().await;
            let _ = sender.send(Event::BookingFinished(result));
        });
    }

    /// Open the dialog prefilled with the highlighted master or service
    fn book_selected(&mut self) {
        let prefill = match self.section {
            Section::Masters => self
                .masters
                .selected()
                .and_then(|i| self.catalog.masters.get(i))
                .map(|m| Prefill::master(m.id.clone())),
            Section::Services => self
                .services
                .selected()
                .and_then(|i| self.catalog.services.get(i))
                .map(|s| Prefill::service(s.id.clone())),
            Section::About => None,
        };
        self.booking.open(prefill);
    }

    fn move_selection(&mut self, down: bool) {
        let (state, len) = match self.section {
            Section::Masters => (&mut self.masters, self.catalog.masters.len()),
            Section::Services => (&mut self.services, self.catalog.services.len()),
            Section::About => return,
        };
        if len == 0 {
            return;
        }
        let current = state.selected().unwrap_or(0);
        let next = if down {
            (current + 1).min(len - 1)
        } else {
            current.saturating_sub(1)
        };
        state.select(Some(next));
    }

    /// Render the application UI
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Section tabs
                Constraint::Min(1),    // Main content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        self.render_tabs(frame, chunks[0]);
        match self.section {
            Section::Masters => self.render_masters(frame, chunks[1]),
            Section::Services => self.render_services(frame, chunks[1]),
            Section::About => self.render_about(frame, chunks[1]),
        }
        self.render_status_bar(frame, chunks[2]);

        if self.config.show_help {
            self.render_help_overlay(frame);
        }

        self.booking.render(frame, area, &self.theme);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = Section::ALL
            .iter()
            .enumerate()
            .map(|(i, s)| Line::from(format!("{} {}", i + 1, s.title())))
            .collect();

        let tabs = Tabs::new(titles)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.border_style())
                    .title(" ✂ BarberTime ")
                    .title_style(self.theme.title_style()),
            )
            .select(self.section.index())
            .style(self.theme.text_style())
            .highlight_style(self.theme.selection_style());

        frame.render_widget(tabs, area);
    }

    fn render_masters(&mut self, frame: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        let items: Vec<ListItem> = self
            .catalog
            .masters
            .iter()
            .map(|m| {
                ListItem::new(vec![
                    Line::from(Span::styled(m.name.clone(), self.theme.text_style())),
                    Line::from(Span::styled(m.specialty.clone(), self.theme.dim_style())),
                ])
            })
            .collect();

        let list = List::new(items)
            .block(self.panel("Our masters"))
            .highlight_style(self.theme.selection_style())
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, columns[0], &mut self.masters);

        let detail = match self.masters.selected().and_then(|i| self.catalog.masters.get(i)) {
            Some(m) => vec![
                Line::from(Span::styled(m.name.clone(), self.theme.title_style())),
                Line::from(""),
                Line::from(format!("Specialty:  {}", m.specialty)),
                Line::from(format!("Experience: {}", m.experience)),
                Line::from(format!("Prices:     {}", m.price_range)),
                Line::from(""),
                Line::from(m.description.clone()),
                Line::from(""),
                Line::from(Span::styled("Enter to book with this master", self.theme.dim_style())),
            ],
            None => vec![Line::from("No masters listed")],
        };
        let paragraph = Paragraph::new(detail)
            .block(self.panel("Details"))
            .style(self.theme.text_style())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, columns[1]);
    }

    fn render_services(&mut self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .catalog
            .services
            .iter()
            .map(|s| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<24}", s.name), self.theme.text_style()),
                    Span::styled(format!("{:>8}", s.price), self.theme.title_style()),
                    Span::styled(format!("   {}", s.duration), self.theme.dim_style()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(self.panel("Services and prices"))
            .highlight_style(self.theme.selection_style())
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, area, &mut self.services);
    }

    fn render_about(&self, frame: &mut Frame, area: Rect) {
        let text = vec![
            Line::from(Span::styled("BarberTime", self.theme.title_style())),
            Line::from(""),
            Line::from("A barbershop for classic cuts, modern styles and proper beard care."),
            Line::from(format!(
                "{} masters, {} services.",
                self.catalog.masters.len(),
                self.catalog.services.len()
            )),
            Line::from(""),
            Line::from(Span::styled("Press b to book an appointment.", self.theme.dim_style())),
        ];
        let paragraph = Paragraph::new(text)
            .block(self.panel("About us"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn panel(&self, title: &str) -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style())
            .title(format!(" {} ", title))
    }

    /// Render the status bar
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let status_text = match self.booking.in_flight() {
            0 => "b: book • Enter: book selected • Tab: section • ?: help • q: quit".to_string(),
            1 => "Sending booking…".to_string(),
            n => format!("Sending {} bookings…", n),
        };

        let status_paragraph = Paragraph::new(status_text).style(self.theme.status_bar_style());
        frame.render_widget(status_paragraph, area);
    }

    /// Render help overlay
    fn render_help_overlay(&self, frame: &mut Frame) {
        let help_area = centered_rect(60, 60, frame.size());

        let lines: Vec<Line> = self
            .key_map
            .help_lines()
            .into_iter()
            .map(|(key, description)| {
                Line::from(vec![
                    Span::styled(format!("{:>10}  ", key), self.theme.title_style()),
                    Span::raw(description),
                ])
            })
            .collect();

        let help_block = Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .style(self.theme.help_style());

        frame.render_widget(Clear, help_area);
        frame.render_widget(Paragraph::new(lines).block(help_block), help_area);
    }
}

/// Create a centered rectangle with given percentage of the screen
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
