use ratatui::style::{Color, Modifier, Style};

/// Palette for one of the two display modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub dark: bool,
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub accent: Color,
    pub error: Color,
    pub input_background: Color,
    pub highlight: Color,
    pub code: Color,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            dark: false,
            background: Color::White,
            foreground: Color::Black,
            muted: Color::DarkGray,
            accent: Color::Blue,
            error: Color::Red,
            input_background: Color::Rgb(243, 244, 246),
            highlight: Color::Rgb(229, 231, 235),
            code: Color::Magenta,
        }
    }

    pub fn dark() -> Self {
        Self {
            dark: true,
            background: Color::Rgb(31, 41, 55),
            foreground: Color::Rgb(243, 244, 246),
            muted: Color::Gray,
            accent: Color::Rgb(147, 197, 253),
            error: Color::LightRed,
            input_background: Color::Rgb(55, 65, 81),
            highlight: Color::Rgb(75, 85, 99),
            code: Color::LightMagenta,
        }
    }

    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self::dark()
        } else {
            Self::light()
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn input(&self) -> Style {
        Style::default()
            .fg(self.foreground)
            .bg(self.input_background)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .bg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Name of the syntect theme matching this palette.
    pub fn syntax_theme(&self) -> &'static str {
        if self.dark {
            "base16-ocean.dark"
        } else {
            "InspiredGitHub"
        }
    }
}
