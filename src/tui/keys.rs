use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Key binding configuration
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub label: &'static str,
    pub description: &'static str,
}

impl KeyBinding {
    pub const fn new(
        key: KeyCode,
        modifiers: KeyModifiers,
        label: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            modifiers,
            label,
            description,
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        // Terminals disagree on whether uppercase letters carry SHIFT.
        let modifiers = event.modifiers.difference(KeyModifiers::SHIFT);
        self.key == event.code && self.modifiers.difference(KeyModifiers::SHIFT) == modifiers
    }
}

/// Application key mappings
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Quit from anywhere, even with the booking dialog open
    pub force_quit: KeyBinding,
    pub quit: KeyBinding,
    pub help: KeyBinding,
    pub book: KeyBinding,
    pub book_selected: KeyBinding,
    pub next_section: KeyBinding,
    pub prev_section: KeyBinding,
    pub up: KeyBinding,
    pub down: KeyBinding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            force_quit: KeyBinding::new(KeyCode::Char('c'), KeyModifiers::CONTROL, "Ctrl+C", "Quit"),
            quit: KeyBinding::new(KeyCode::Char('q'), KeyModifiers::NONE, "q", "Quit"),
            help: KeyBinding::new(KeyCode::Char('?'), KeyModifiers::NONE, "?", "Show/hide help"),
            book: KeyBinding::new(KeyCode::Char('b'), KeyModifiers::NONE, "b", "Book an appointment"),
            book_selected: KeyBinding::new(KeyCode::Enter, KeyModifiers::NONE, "Enter", "Book the selected master or service"),
            next_section: KeyBinding::new(KeyCode::Tab, KeyModifiers::NONE, "Tab", "Next section"),
            prev_section: KeyBinding::new(KeyCode::BackTab, KeyModifiers::NONE, "Shift+Tab", "Previous section"),
            up: KeyBinding::new(KeyCode::Up, KeyModifiers::NONE, "↑", "Previous item"),
            down: KeyBinding::new(KeyCode::Down, KeyModifiers::NONE, "↓", "Next item"),
        }
    }
}

impl KeyMap {
    fn bindings(&self) -> [&KeyBinding; 9] {
        [
            &self.book,
            &self.book_selected,
            &self.next_section,
            &self.prev_section,
            &self.up,
            &self.down,
            &self.help,
            &self.quit,
            &self.force_quit,
        ]
    }

    /// Check if the event should quit the application
    pub fn should_quit(&self, event: &KeyEvent) -> bool {
        self.quit.matches(event) || self.force_quit.matches(event)
    }

    /// Check if the event should toggle help
    pub fn should_show_help(&self, event: &KeyEvent) -> bool {
        self.help.matches(event)
            || (event.code == KeyCode::Char('g') && event.modifiers.contains(KeyModifiers::CONTROL))
    }

    /// Help lines for all key bindings
    pub fn help_lines(&self) -> Vec<(&'static str, &'static str)> {
        let mut lines: Vec<_> = self
            .bindings()
            .iter()
            .map(|binding| (binding.label, binding.description))
            .collect();
        lines.extend([
            ("1-3", "Jump to section"),
            ("Ctrl+G", "Show/hide help"),
            ("Esc", "Close the booking dialog"),
            ("Ctrl+S", "Send the booking form"),
            ("←/→", "Choose master or service in the form"),
        ]);
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uppercase_with_shift_matches() {
        let keys = KeyMap::default();
        let shifted = KeyEvent::new(KeyCode::Char('?'), KeyModifiers::SHIFT);
        assert!(keys.should_show_help(&shifted));
        assert!(keys.should_show_help(&KeyEvent::new(KeyCode::Char('g'), KeyModifiers::CONTROL)));
        assert!(!keys.should_show_help(&KeyEvent::new(KeyCode::Char('g'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_quit_bindings() {
        let keys = KeyMap::default();
        assert!(keys.should_quit(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(keys.should_quit(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!keys.should_quit(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
    }
}
