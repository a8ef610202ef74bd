use super::HistoryLedger;

/// Presentation flags. Each field is independent except that `loading` and
/// `typing` are only ever true while an exchange is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionFlags {
    pub loading: bool,
    pub typing: bool,
    pub dark_mode: bool,
    pub show_history: bool,
    pub show_suggestions: bool,
}

/// Snapshot of everything a front-end needs to render the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub question: String,
    pub answer: String,
    pub error: Option<String>,
    pub suggestions: Vec<String>,
    pub flags: SessionFlags,
    pub history: HistoryLedger,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_answer(&self) -> bool {
        !self.answer.is_empty()
    }

    /// Reset the input-scoped fields. History and the sticky view toggles
    /// (`dark_mode`, `show_history`) survive.
    pub fn clear_input(&mut self) {
        self.question.clear();
        self.answer.clear();
        self.error = None;
        self.suggestions.clear();
        self.flags.show_suggestions = false;
    }
}
