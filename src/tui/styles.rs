use ratatui::style::{Color, Modifier, Style};

/// Application theme configuration
#[derive(Debug, Clone)]
pub struct Theme {
    /// Primary colors
    pub primary: Color,

    /// Text colors
    pub text: Color,
    pub text_dim: Color,
    pub text_bright: Color,

    /// Background colors
    pub background: Color,
    pub background_alt: Color,

    /// Border colors
    pub border: Color,
    pub border_focused: Color,

    /// Status colors
    pub success: Color,
    pub error: Color,

    /// Special colors
    pub placeholder: Color,
    pub selection: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme with the shop's gold accent
    pub fn dark() -> Self {
        Self {
            primary: Color::Rgb(212, 175, 55),    // Gold

            text: Color::Rgb(236, 236, 236),
            text_dim: Color::Rgb(150, 150, 150),
            text_bright: Color::Rgb(255, 255, 255),

            background: Color::Rgb(26, 26, 26),
            background_alt: Color::Rgb(40, 40, 40),

            border: Color::Rgb(90, 90, 90),
            border_focused: Color::Rgb(212, 175, 55),

            success: Color::Rgb(46, 204, 113),
            error: Color::Rgb(231, 76, 60),

            placeholder: Color::Rgb(110, 110, 110),
            selection: Color::Rgb(70, 58, 20),
        }
    }

    /// Base style for normal elements
    pub fn base_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    /// Style for text content
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.text_dim)
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for borders
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Style for focused borders
    pub fn focused_border_style(&self) -> Style {
        Style::default()
            .fg(self.border_focused)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for selected items
    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.selection)
            .fg(self.text_bright)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for a button, highlighted when focused
    pub fn button_style(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .bg(self.primary)
                .fg(self.background)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(self.background_alt).fg(self.text)
        }
    }

    /// Style for the status bar
    pub fn status_bar_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.background_alt)
    }

    /// Style for help text
    pub fn help_style(&self) -> Style {
        Style::default()
            .fg(self.text)
            .bg(self.background)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for placeholder text
    pub fn placeholder_style(&self) -> Style {
        Style::default()
            .fg(self.placeholder)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success).add_modifier(Modifier::BOLD)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }
}
