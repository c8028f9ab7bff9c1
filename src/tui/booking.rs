//! Booking flow: wires the dialog, the submitter and the result notice.

use super::modal::{ModalAction, ModalController, Prefill};
use crate::booking::{BookingError, BookingRequest, BookingResult, BookingSubmitter};
use crate::tui::{styles::Theme, Frame};
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Alignment, Rect},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use tracing::debug;

/// A validated request waiting to be sent.
///
/// Produced on the UI task; `send` runs wherever it is awaited so the UI
/// keeps handling input in the meantime.
pub struct PendingBooking {
    submitter: BookingSubmitter,
    request: BookingRequest,
}

impl PendingBooking {
    #[cfg(test)]
    pub fn request(&self) -> &BookingRequest {
        &self.request
    }

    pub async fn send(self) -> BookingResult {
        self.submitter.send(self.request).await
    }
}

pub struct BookingFlow {
    modal: ModalController,
    submitter: BookingSubmitter,
    /// Message waiting to be acknowledged by the user
    notice: Option<BookingResult>,
    in_flight: usize,
}

impl BookingFlow {
    pub fn new(modal: ModalController, submitter: BookingSubmitter) -> Self {
        Self {
            modal,
            submitter,
            notice: None,
            in_flight: 0,
        }
    }

    #[cfg(test)]
    pub fn modal(&self) -> &ModalController {
        &self.modal
    }

    #[cfg(test)]
    pub fn modal_mut(&mut self) -> &mut ModalController {
        &mut self.modal
    }

    #[cfg(test)]
    pub fn notice(&self) -> Option<&BookingResult> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Requests sent but not yet answered
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Whether this flow takes all input ahead of the screen behind it
    pub fn is_capturing_input(&self) -> bool {
        self.notice.is_some() || self.modal.background_locked()
    }

    pub fn open(&mut self, prefill: Option<Prefill>) {
        self.modal.open(prefill);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<PendingBooking> {
        if self.notice.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.dismiss_notice();
            }
            return None;
        }

        match self.modal.handle_key(key) {
            ModalAction::Submit => self.begin_submit(),
            ModalAction::None | ModalAction::Closed => None,
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Option<PendingBooking> {
        if self.notice.is_some() {
            if mouse.kind == MouseEventKind::Down(MouseButton::Left) {
                self.dismiss_notice();
            }
            return None;
        }

        match self.modal.handle_mouse(mouse) {
            ModalAction::Submit => self.begin_submit(),
            ModalAction::None | ModalAction::Closed => None,
        }
    }

    /// Validate the form. On failure the message is shown right away and
    /// nothing is sent.
    ///
    /// Submitting again while a request is outstanding sends another one.
    pub fn begin_submit(&mut self) -> Option<PendingBooking> {
        let fields = self.modal.form().fields();
        match self.submitter.prepare(&fields) {
            Ok(request) => {
                self.in_flight += 1;
                debug!(in_flight = self.in_flight, "booking request dispatched");
                Some(PendingBooking {
                    submitter: self.submitter.clone(),
                    request,
                })
            }
            Err(err) => {
                self.modal.form_mut().mark_invalid(&err.fields());
                self.notice = Some(BookingError::from(err).into());
                None
            }
        }
    }

    /// Apply the outcome of a sent request.
    ///
    /// Success closes the dialog and clears the form; anything else leaves
    /// both as they are so the user can correct and resend.
    pub fn finish(&mut self, result: BookingResult) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if result.is_success() {
            self.modal.close();
            self.modal.form_mut().reset();
        }
        self.notice = Some(result);
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.modal.render(frame, area, theme);
        if let Some(notice) = &self.notice {
            render_notice(frame, area, notice, theme);
        }
    }
}

fn render_notice(frame: &mut Frame, available: Rect, notice: &BookingResult, theme: &Theme) {
    let width = 50.min(available.width);
    let height = 7.min(available.height);
    let area = Rect::new(
        available.x + available.width.saturating_sub(width) / 2,
        available.y + available.height.saturating_sub(height) / 2,
        width,
        height,
    );

    let (title, style) = if notice.is_success() {
        (" Booked ", theme.success_style())
    } else {
        (" Booking failed ", theme.error_style())
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
        .title_style(style)
        .style(theme.base_style());

    let text = format!("{}\n\nEnter to continue", notice.message);
    let paragraph = Paragraph::new(text)
        .block(block)
        .style(theme.text_style())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::testing::MockEndpoint;
    use crate::booking::{BookingField, Catalog, FALLBACK_MESSAGE};
    use crate::tui::form::BookingForm;
    use crossterm::event::KeyModifiers;
    use std::sync::Arc;

    fn flow(endpoint: &Arc<MockEndpoint>) -> BookingFlow {
        let modal = ModalController::new(BookingForm::new(Arc::new(Catalog::default())));
        BookingFlow::new(modal, BookingSubmitter::new(endpoint.clone()))
    }

    fn fill_valid(flow: &mut BookingFlow) {
        flow.open(Some(Prefill::master("3")));
        let form = flow.modal_mut().form_mut();
        form.set_value(BookingField::Name, "Max Müller");
        form.set_value(BookingField::Phone, "+49 30 12345678");
        form.set_value(BookingField::Service, "haircut");
        form.set_value(BookingField::Date, "2024-05-01");
        form.set_value(BookingField::Time, "14:00");
    }

    fn ctrl_s() -> KeyEvent {
        KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)
    }

    #[tokio::test]
    async fn test_success_closes_dialog_and_clears_form() {
        let endpoint = Arc::new(MockEndpoint::replying("success", Some("Booked!")));
        let mut flow = flow(&endpoint);
        fill_valid(&mut flow);

        let pending = flow.handle_key(ctrl_s()).expect("form is valid");
        assert_eq!(pending.request().master_id, "3");
        assert_eq!(flow.in_flight(), 1);

        let result = pending.send().await;
        flow.finish(result);

        assert_eq!(endpoint.calls(), 1);
        assert!(!flow.modal().is_open());
        assert!(flow.modal().form().is_empty());
        assert_eq!(flow.notice(), Some(&BookingResult::success("Booked!")));
        assert_eq!(flow.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_rejection_keeps_dialog_and_values() {
        let endpoint = Arc::new(MockEndpoint::replying("error", Some("Slot taken")));
        let mut flow = flow(&endpoint);
        fill_valid(&mut flow);

        let pending = flow.begin_submit().unwrap();
        flow.finish(pending.send().await);

        assert!(flow.modal().is_open());
        assert_eq!(flow.modal().form().fields().name, "Max Müller");
        assert_eq!(flow.notice().map(|n| n.message.as_str()), Some("Slot taken"));
    }

    #[tokio::test]
    async fn test_network_failure_keeps_dialog_and_values() {
        let endpoint = Arc::new(MockEndpoint::failing());
        let mut flow = flow(&endpoint);
        fill_valid(&mut flow);

        let pending = flow.begin_submit().unwrap();
        flow.finish(pending.send().await);

        assert!(flow.modal().is_open());
        assert_eq!(flow.modal().form().fields().phone, "+49 30 12345678");
        assert_eq!(flow.notice(), Some(&BookingResult::failure(FALLBACK_MESSAGE)));
    }

    #[test]
    fn test_invalid_form_shows_message_without_request() {
        let endpoint = Arc::new(MockEndpoint::replying("success", None));
        let mut flow = flow(&endpoint);
        flow.open(None);
        flow.modal_mut().form_mut().set_value(BookingField::Name, "Max");

        assert!(flow.handle_key(ctrl_s()).is_none());

        assert_eq!(endpoint.calls(), 0);
        assert!(flow.modal().is_open());
        assert!(flow.modal().form().is_invalid(BookingField::Phone));
        assert!(!flow.modal().form().is_invalid(BookingField::Name));
        assert_eq!(
            flow.notice().map(|n| n.message.as_str()),
            Some("Please fill all required fields")
        );
    }

    #[test]
    fn test_unparseable_date_marks_field_without_request() {
        let endpoint = Arc::new(MockEndpoint::replying("success", None));
        let mut flow = flow(&endpoint);
        fill_valid(&mut flow);
        flow.modal_mut().form_mut().set_value(BookingField::Date, "2024-13-01");

        assert!(flow.begin_submit().is_none());

        assert_eq!(endpoint.calls(), 0);
        assert!(flow.modal().form().is_invalid(BookingField::Date));
        assert_eq!(
            flow.notice().map(|n| n.message.as_str()),
            Some("Please enter the date as YYYY-MM-DD")
        );
    }

    #[test]
    fn test_notice_swallows_escape_before_dialog() {
        let endpoint = Arc::new(MockEndpoint::replying("success", None));
        let mut flow = flow(&endpoint);
        flow.open(None);
        flow.begin_submit();
        assert!(flow.notice().is_some());

        flow.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert!(flow.notice().is_none());
        assert!(flow.modal().is_open());

        flow.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert!(!flow.modal().is_open());
        assert!(!flow.is_capturing_input());
    }

    #[tokio::test]
    async fn test_escape_while_request_outstanding() {
        let endpoint = Arc::new(MockEndpoint::replying("success", Some("Booked!")));
        let mut flow = flow(&endpoint);
        fill_valid(&mut flow);

        let pending = flow.begin_submit().unwrap();
        flow.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert!(!flow.modal().is_open());

        flow.finish(pending.send().await);
        assert!(!flow.modal().is_open());
        assert!(flow.modal().form().is_empty());
    }
}
