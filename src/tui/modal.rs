//! The booking dialog and the only owner of its visibility.

use super::form::{BookingForm, FormAction};
use crate::tui::{styles::Theme, Frame};
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Clear},
};
use tracing::{debug, info};

const DIALOG_WIDTH: u16 = 72;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    Open,
    #[default]
    Closed,
}

/// Values to put into the form when the dialog opens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prefill {
    pub master_id: Option<String>,
    pub service: Option<String>,
}

impl Prefill {
    pub fn master(id: impl Into<String>) -> Self {
        Self {
            master_id: Some(id.into()),
            service: None,
        }
    }

    pub fn service(id: impl Into<String>) -> Self {
        Self {
            master_id: None,
            service: Some(id.into()),
        }
    }
}

/// What happened to the dialog after an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    /// Input consumed (or ignored) with no change in visibility
    None,
    /// The form asked to be sent
    Submit,
    /// The dialog was closed
    Closed,
}

/// Check if a point is within an area
pub(crate) fn contains_point(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}

pub struct ModalController {
    state: ModalState,
    form: BookingForm,
    /// Dialog area from the last render; clicks outside it hit the backdrop
    dialog_area: Option<Rect>,
}

impl ModalController {
    pub fn new(form: BookingForm) -> Self {
        Self {
            state: ModalState::Closed,
            form,
            dialog_area: None,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> ModalState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ModalState::Open
    }

    /// While open, the screen behind the dialog takes no input
    pub fn background_locked(&self) -> bool {
        self.is_open()
    }

    pub fn form(&self) -> &BookingForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut BookingForm {
        &mut self.form
    }

    /// Show the dialog, applying any prefill first
    pub fn open(&mut self, prefill: Option<Prefill>) {
        if let Some(prefill) = prefill {
            if let Some(master_id) = prefill.master_id.as_deref() {
                self.form.set_master(master_id);
            }
            if let Some(service) = prefill.service.as_deref() {
                self.form.set_service(service);
            }
        }

        if !self.is_open() {
            info!("Booking dialog opened");
        }
        self.state = ModalState::Open;
    }

    /// Hide the dialog. Closing a closed dialog does nothing.
    pub fn close(&mut self) {
        if !self.is_open() {
            return;
        }
        self.state = ModalState::Closed;
        self.dialog_area = None;
        debug!("Booking dialog closed");
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ModalAction {
        if !self.is_open() {
            return ModalAction::None;
        }

        if key.code == KeyCode::Esc {
            self.close();
            return ModalAction::Closed;
        }

        let action = self.form.handle_key(key);
        self.apply(action)
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> ModalAction {
        if !self.is_open() || mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return ModalAction::None;
        }

        let Some(dialog_area) = self.dialog_area else {
            return ModalAction::None;
        };

        if !contains_point(dialog_area, mouse.column, mouse.row) {
            self.close();
            return ModalAction::Closed;
        }

        let action = self.form.handle_click(mouse.column, mouse.row);
        self.apply(action)
    }

    fn apply(&mut self, action: FormAction) -> ModalAction {
        match action {
            FormAction::None => ModalAction::None,
            FormAction::Submit => ModalAction::Submit,
            FormAction::Close => {
                self.close();
                ModalAction::Closed
            }
        }
    }

    /// Centered dialog area, clamped to what the screen offers
    pub fn dialog_area(&self, available: Rect) -> Rect {
        let width = DIALOG_WIDTH.min(available.width);
        let height = (self.form.height() + 2).min(available.height);
        let x = available.x + available.width.saturating_sub(width) / 2;
        let y = available.y + available.height.saturating_sub(height) / 2;
        Rect::new(x, y, width, height)
    }

    pub fn render(&mut self, frame: &mut Frame, available: Rect, theme: &Theme) {
        if !self.is_open() {
            return;
        }

        let area = self.dialog_area(available);
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.focused_border_style())
            .title(" Book an appointment ")
            .title_style(theme.title_style())
            .style(theme.base_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.form.render(frame, inner, theme);
        self.dialog_area = Some(area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::Catalog;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn modal() -> ModalController {
        ModalController::new(BookingForm::new(Arc::new(Catalog::default())))
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn render(modal: &mut ModalController) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let theme = Theme::default();
        terminal
            .draw(|frame| {
                let area = frame.size();
                modal.render(frame, area, &theme);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_open_applies_prefill() {
        let mut modal = modal();
        modal.open(Some(Prefill::master("3")));

        assert!(modal.is_open());
        assert!(modal.background_locked());
        assert_eq!(modal.form().fields().master_id, "3");
        assert_eq!(modal.form().fields().service, "");
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut modal = modal();
        modal.close();
        assert_eq!(modal.state(), ModalState::Closed);

        modal.open(None);
        modal.close();
        modal.close();
        assert_eq!(modal.state(), ModalState::Closed);
        assert!(!modal.background_locked());
    }

    #[test]
    fn test_escape_closes() {
        let mut modal = modal();
        modal.open(None);

        let action = modal.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));

        assert_eq!(action, ModalAction::Closed);
        assert!(!modal.is_open());
    }

    #[test]
    fn test_keys_ignored_while_closed() {
        let mut modal = modal();
        let action = modal.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        assert_eq!(action, ModalAction::None);
        assert!(modal.form().is_empty());
    }

    #[test]
    fn test_backdrop_click_closes_but_content_click_does_not() {
        let mut modal = modal();
        modal.open(None);
        let screen = render(&mut modal);
        assert!(screen.contains("Book an appointment"));

        let area = modal.dialog_area(Rect::new(0, 0, 100, 30));
        assert_eq!(modal.handle_mouse(click(area.x + 2, area.y + 2)), ModalAction::None);
        assert!(modal.is_open());

        assert_eq!(modal.handle_mouse(click(0, 0)), ModalAction::Closed);
        assert!(!modal.is_open());
    }

    #[test]
    fn test_close_button_uses_same_path() {
        let mut modal = modal();
        modal.open(None);
        modal.form_mut().set_value(crate::booking::BookingField::Name, "Max");
        modal.handle_key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));

        let action = modal.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        assert_eq!(action, ModalAction::Closed);
        assert!(!modal.is_open());
        // Closing keeps what was typed
        assert_eq!(modal.form().fields().name, "Max");
    }

    #[test]
    fn test_closed_dialog_renders_nothing() {
        let mut modal = modal();
        let screen = render(&mut modal);
        assert!(!screen.contains("Book an appointment"));
    }
}
