//! Booking form shown inside the booking dialog.

use super::modal::contains_point;
use crate::booking::{format_phone_number, is_phone_input_char, BookingField, BookingFields, Catalog};
use crate::tui::{styles::Theme, Frame};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};
use std::collections::HashSet;
use std::sync::Arc;
use unicode_width::UnicodeWidthStr;

const LABEL_WIDTH: u16 = 10;

/// Something in the form that can hold focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormItem {
    Field(BookingField),
    Submit,
    Close,
}

const ITEMS: [FormItem; 9] = [
    FormItem::Field(BookingField::Name),
    FormItem::Field(BookingField::Phone),
    FormItem::Field(BookingField::Master),
    FormItem::Field(BookingField::Service),
    FormItem::Field(BookingField::Date),
    FormItem::Field(BookingField::Time),
    FormItem::Field(BookingField::Comment),
    FormItem::Submit,
    FormItem::Close,
];

/// What the dialog should do after the form handled an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    Submit,
    Close,
}

pub struct BookingForm {
    catalog: Arc<Catalog>,
    name: String,
    phone: String,
    master: Option<usize>,
    service: Option<usize>,
    date: String,
    time: String,
    comment: String,
    focus: usize,
    /// Required fields that were blank at the last submit attempt
    invalid: HashSet<BookingField>,
    /// Screen areas from the last render, for mouse hit testing
    hit_areas: Vec<(FormItem, Rect)>,
}

impl BookingForm {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            name: String::new(),
            phone: String::new(),
            master: None,
            service: None,
            date: String::new(),
            time: String::new(),
            comment: String::new(),
            focus: 0,
            invalid: HashSet::new(),
            hit_areas: Vec::new(),
        }
    }

    /// Snapshot of the current values
    pub fn fields(&self) -> BookingFields {
        BookingFields {
            name: self.name.clone(),
            phone: self.phone.clone(),
            master_id: self
                .master
                .and_then(|i| self.catalog.masters.get(i))
                .map(|m| m.id.clone())
                .unwrap_or_default(),
            service: self
                .service
                .and_then(|i| self.catalog.services.get(i))
                .map(|s| s.id.clone())
                .unwrap_or_default(),
            date: self.date.clone(),
            time: self.time.clone(),
            comment: self.comment.clone(),
        }
    }

    /// Select a master by id. Unknown ids leave the selector empty.
    pub fn set_master(&mut self, id: &str) {
        self.master = self.catalog.master_index(id);
        self.invalid.remove(&BookingField::Master);
    }

    /// Select a service by id. Unknown ids leave the selector empty.
    pub fn set_service(&mut self, id: &str) {
        self.service = self.catalog.service_index(id);
        self.invalid.remove(&BookingField::Service);
    }

    /// Set a value directly, bypassing the input mask
    #[cfg(test)]
    pub fn set_value(&mut self, field: BookingField, value: &str) {
        match field {
            BookingField::Master => return self.set_master(value),
            BookingField::Service => return self.set_service(value),
            _ => {}
        }
        if let Some(text) = self.text_mut(field) {
            *text = value.to_string();
        }
        self.invalid.remove(&field);
    }

    pub fn focused(&self) -> FormItem {
        ITEMS[self.focus]
    }

    pub fn mark_invalid(&mut self, fields: &[BookingField]) {
        self.invalid.extend(fields.iter().copied());
    }

    pub fn is_invalid(&self, field: BookingField) -> bool {
        self.invalid.contains(&field)
    }

    /// Clear every value, highlight and the focus
    pub fn reset(&mut self) {
        *self = Self::new(self.catalog.clone());
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.fields() == BookingFields::default()
    }

    /// Rows needed to render the form
    pub fn height(&self) -> u16 {
        // seven fields, a spacer, the buttons and the hint line
        10
    }

    fn text_mut(&mut self, field: BookingField) -> Option<&mut String> {
        match field {
            BookingField::Name => Some(&mut self.name),
            BookingField::Phone => Some(&mut self.phone),
            BookingField::Date => Some(&mut self.date),
            BookingField::Time => Some(&mut self.time),
            BookingField::Comment => Some(&mut self.comment),
            BookingField::Master | BookingField::Service => None,
        }
    }

    fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % ITEMS.len();
    }

    fn focus_prev(&mut self) {
        self.focus = (self.focus + ITEMS.len() - 1) % ITEMS.len();
    }

    fn cycle_selector(&mut self, field: BookingField, forward: bool) {
        let (current, count) = match field {
            BookingField::Master => (self.master, self.catalog.masters.len()),
            BookingField::Service => (self.service, self.catalog.services.len()),
            _ => return,
        };
        if count == 0 {
            return;
        }

        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => count - 1,
            (Some(i), true) => (i + 1) % count,
            (Some(i), false) => (i + count - 1) % count,
        };

        match field {
            BookingField::Master => self.master = Some(next),
            _ => self.service = Some(next),
        }
        self.invalid.remove(&field);
    }

    fn insert_char(&mut self, field: BookingField, c: char) {
        let accepted = match field {
            BookingField::Phone => is_phone_input_char(c),
            BookingField::Date => c.is_ascii_digit() || c == '-',
            BookingField::Time => c.is_ascii_digit() || c == ':',
            _ => true,
        };
        if !accepted {
            return;
        }
        let Some(text) = self.text_mut(field) else {
            return;
        };
        text.push(c);
        if field == BookingField::Phone {
            self.phone = format_phone_number(&self.phone);
        }
        self.invalid.remove(&field);
    }

    fn delete_char(&mut self, field: BookingField) {
        let Some(text) = self.text_mut(field) else {
            return;
        };
        text.pop();
        if field == BookingField::Phone {
            self.phone = format_phone_number(&self.phone);
        }
        self.invalid.remove(&field);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        let item = self.focused();

        match key.code {
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return FormAction::Submit;
            }
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_prev(),
            KeyCode::Enter => match item {
                FormItem::Submit => return FormAction::Submit,
                FormItem::Close => return FormAction::Close,
                FormItem::Field(_) => self.focus_next(),
            },
            KeyCode::Left | KeyCode::Right => {
                if let FormItem::Field(field) = item {
                    self.cycle_selector(field, key.code == KeyCode::Right);
                }
            }
            KeyCode::Backspace => {
                if let FormItem::Field(field) = item {
                    self.delete_char(field);
                }
            }
            KeyCode::Char(c)
                if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                if let FormItem::Field(field) = item {
                    self.insert_char(field, c);
                }
            }
            _ => {}
        }

        FormAction::None
    }

    /// Focus whatever was clicked; clicking a button activates it
    pub fn handle_click(&mut self, column: u16, row: u16) -> FormAction {
        let Some(item) = self
            .hit_areas
            .iter()
            .find(|(_, area)| contains_point(*area, column, row))
            .map(|(item, _)| *item)
        else {
            return FormAction::None;
        };

        if let Some(index) = ITEMS.iter().position(|candidate| *candidate == item) {
            self.focus = index;
        }

        match item {
            FormItem::Submit => FormAction::Submit,
            FormItem::Close => FormAction::Close,
            FormItem::Field(_) => FormAction::None,
        }
    }

    fn display_value(&self, field: BookingField) -> Option<String> {
        let value = match field {
            BookingField::Master => self
                .master
                .and_then(|i| self.catalog.masters.get(i))
                .map(|m| format!("◀ {} ▶", m.name)),
            BookingField::Service => self
                .service
                .and_then(|i| self.catalog.services.get(i))
                .map(|s| format!("◀ {} ({}, {}) ▶", s.name, s.price, s.duration)),
            other => Some(self.fields().get(other).to_string()),
        };
        value.filter(|v| !v.is_empty())
    }

    fn placeholder(field: BookingField) -> &'static str {
        match field {
            BookingField::Name => "Your name",
            BookingField::Phone => "+49 30 12345678",
            BookingField::Master => "◀ choose a master ▶",
            BookingField::Service => "◀ choose a service ▶",
            BookingField::Date => "YYYY-MM-DD",
            BookingField::Time => "HH:MM",
            BookingField::Comment => "Optional",
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.hit_areas.clear();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1), // spacer
                Constraint::Length(1), // buttons
                Constraint::Min(0),
                Constraint::Length(1), // hint
            ])
            .split(area);

        for (index, item) in ITEMS.iter().enumerate() {
            if let FormItem::Field(field) = item {
                self.render_field(frame, rows[index], *field, self.focus == index, theme);
                self.hit_areas.push((*item, rows[index]));
            }
        }

        self.render_buttons(frame, rows[8], theme);

        let hint = Paragraph::new("Tab/↑↓: move • ←/→: choose • Ctrl+S: send • Esc: close")
            .style(theme.dim_style())
            .alignment(Alignment::Center);
        frame.render_widget(hint, rows[10]);
    }

    fn render_field(&self, frame: &mut Frame, row: Rect, field: BookingField, focused: bool, theme: &Theme) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(LABEL_WIDTH), Constraint::Min(1)])
            .split(row);

        let marker = if field.is_required() { "*" } else { " " };
        let label_style = if self.is_invalid(field) {
            theme.error_style()
        } else if focused {
            theme.title_style()
        } else {
            theme.text_style()
        };
        frame.render_widget(
            Paragraph::new(format!("{}{}", field.label(), marker)).style(label_style),
            columns[0],
        );

        let value = self.display_value(field);
        let mut style = match value {
            Some(_) => theme.text_style(),
            None => theme.placeholder_style(),
        };
        if focused {
            style = style.patch(theme.selection_style());
        }

        let mut spans = vec![Span::styled(
            value.clone().unwrap_or_else(|| Self::placeholder(field).to_string()),
            style,
        )];
        if self.is_invalid(field) {
            let hint = if value.is_some() { "  check format" } else { "  required" };
            spans.push(Span::styled(hint, theme.error_style()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), columns[1]);

        let is_text = !matches!(field, BookingField::Master | BookingField::Service);
        if focused && is_text {
            let width = value.as_deref().map(UnicodeWidthStr::width).unwrap_or(0) as u16;
            let x = columns[1].x + width.min(columns[1].width.saturating_sub(1));
            frame.set_cursor(x, columns[1].y);
        }
    }

    fn render_buttons(&mut self, frame: &mut Frame, row: Rect, theme: &Theme) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(LABEL_WIDTH),
                Constraint::Length(12),
                Constraint::Length(2),
                Constraint::Length(9),
                Constraint::Min(0),
            ])
            .split(row);

        for (item, label, area) in [
            (FormItem::Submit, " Book now ", columns[1]),
            (FormItem::Close, " Close ", columns[3]),
        ] {
            let button = Paragraph::new(label)
                .style(theme.button_style(self.focused() == item))
                .alignment(Alignment::Center);
            frame.render_widget(button, area);
            self.hit_areas.push((item, area));
        }
    }
}
