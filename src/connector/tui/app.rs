//! TUI application state, input handling and the event loop.

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures_util::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{debug, info, warn};

use crate::application::ChatSession;
use crate::domain::SessionState;

use super::clipboard::copy_to_clipboard;
use super::view;

const TICK_RATE: Duration = Duration::from_millis(120);
const STATUS_TTL: Duration = Duration::from_secs(2);
const SCROLL_STEP: u16 = 5;

/// Front-end state that is not part of the session: cursor, scroll offsets,
/// suggestion highlight and transient status messages.
pub struct TuiApp {
    session: Arc<ChatSession>,
    /// Cursor position within the question, in chars.
    cursor: usize,
    selected_suggestion: Option<usize>,
    answer_scroll: u16,
    spinner_tick: u8,
    status: Option<(String, Instant)>,
    /// Last values seen, to notice changes made outside the input box.
    seen_question: String,
    seen_answer: String,
    seen_suggestions: Vec<String>,
    should_quit: bool,
}

impl TuiApp {
    pub fn new(session: Arc<ChatSession>) -> Self {
        Self {
            session,
            cursor: 0,
            selected_suggestion: None,
            answer_scroll: 0,
            spinner_tick: 0,
            status: None,
            seen_question: String::new(),
            seen_answer: String::new(),
            seen_suggestions: Vec::new(),
            should_quit: false,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected_suggestion(&self) -> Option<usize> {
        self.selected_suggestion
    }

    pub fn answer_scroll(&self) -> u16 {
        self.answer_scroll
    }

    pub fn spinner_tick(&self) -> u8 {
        self.spinner_tick
    }

    pub fn model_name(&self) -> &str {
        self.session.model_name()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().map(|(s, _)| s.as_str())
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Reconcile local view state with a fresh session snapshot.
    pub fn sync(&mut self, state: &SessionState) {
        if state.question != self.seen_question {
            // Local edits update `seen_question` themselves, so this is a
            // wholesale replacement (suggestion picked, input cleared).
            self.cursor = state.question.chars().count();
            self.seen_question = state.question.clone();
        }

        if state.answer != self.seen_answer {
            self.answer_scroll = 0;
            self.seen_answer = state.answer.clone();
        }

        if state.suggestions != self.seen_suggestions || !state.flags.show_suggestions {
            self.selected_suggestion = None;
            self.seen_suggestions = state.suggestions.clone();
        }
    }

    pub fn tick(&mut self) {
        self.spinner_tick = self.spinner_tick.wrapping_add(1);
        if self
            .status
            .as_ref()
            .is_some_and(|(_, at)| at.elapsed() >= STATUS_TTL)
        {
            self.status = None;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, state: &SessionState) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => self.should_quit = true,
            KeyCode::Char('t') if ctrl => self.session.toggle_dark_mode(),
            KeyCode::Char('r') if ctrl => self.session.toggle_history(),
            KeyCode::Char('x') if ctrl => self.clear(state),
            KeyCode::Char('y') if ctrl => self.copy_answer(),
            KeyCode::Esc => self.escape(state),
            KeyCode::Enter => self.submit(state),
            KeyCode::Up => self.move_selection(state, -1),
            KeyCode::Down | KeyCode::Tab => self.move_selection(state, 1),
            KeyCode::PageUp => self.answer_scroll = self.answer_scroll.saturating_sub(SCROLL_STEP),
            KeyCode::PageDown => self.answer_scroll = self.answer_scroll.saturating_add(SCROLL_STEP),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(state.question.chars().count());
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = state.question.chars().count(),
            KeyCode::Backspace => self.backspace(state),
            KeyCode::Delete => self.delete(state),
            KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                self.insert(state, c)
            }
            _ => {}
        }
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some((message.into(), Instant::now()));
    }

    fn edit(&mut self, question: String, cursor: usize) {
        self.cursor = cursor;
        self.seen_question = question.clone();
        self.session.set_question(question);
    }

    fn insert(&mut self, state: &SessionState, c: char) {
        let at = byte_index(&state.question, self.cursor);
        let mut question = state.question.clone();
        question.insert(at, c);
        self.edit(question, self.cursor + 1);
    }

    fn backspace(&mut self, state: &SessionState) {
        if self.cursor == 0 {
            return;
        }
        let start = byte_index(&state.question, self.cursor - 1);
        let end = byte_index(&state.question, self.cursor);
        let mut question = state.question.clone();
        question.replace_range(start..end, "");
        self.edit(question, self.cursor - 1);
    }

    fn delete(&mut self, state: &SessionState) {
        if self.cursor >= state.question.chars().count() {
            return;
        }
        let start = byte_index(&state.question, self.cursor);
        let end = byte_index(&state.question, self.cursor + 1);
        let mut question = state.question.clone();
        question.replace_range(start..end, "");
        self.edit(question, self.cursor);
    }

    fn move_selection(&mut self, state: &SessionState, delta: isize) {
        if !state.flags.show_suggestions || state.suggestions.is_empty() {
            self.answer_scroll = if delta < 0 {
                self.answer_scroll.saturating_sub(1)
            } else {
                self.answer_scroll.saturating_add(1)
            };
            return;
        }

        let count = state.suggestions.len() as isize;
        let next = match self.selected_suggestion {
            None if delta < 0 => count - 1,
            None => 0,
            Some(current) => (current as isize + delta).rem_euclid(count),
        };
        self.selected_suggestion = Some(next as usize);
    }

    fn escape(&mut self, state: &SessionState) {
        if self.selected_suggestion.is_some() {
            self.selected_suggestion = None;
        } else if state.flags.show_suggestions {
            self.session.dismiss_suggestions();
        } else {
            self.should_quit = true;
        }
    }

    fn submit(&mut self, state: &SessionState) {
        let picked = self
            .selected_suggestion
            .and_then(|i| state.suggestions.get(i))
            .filter(|_| state.flags.show_suggestions);

        if let Some(suggestion) = picked {
            debug!("Selected suggestion: {}", suggestion);
            self.session.select_suggestion(suggestion);
            self.selected_suggestion = None;
            return;
        }

        let session = self.session.clone();
        tokio::spawn(async move {
            if let Err(e) = session.generate_answer().await {
                debug!("Exchange ended without an answer: {}", e);
            }
        });
    }

    fn clear(&mut self, state: &SessionState) {
        if state.flags.loading {
            self.set_status("Please wait for the current answer.");
            return;
        }
        self.session.clear_input();
        self.cursor = 0;
    }

    fn copy_answer(&mut self) {
        let Some(answer) = self.session.copy_answer() else {
            self.set_status("Nothing to copy yet.");
            return;
        };

        match copy_to_clipboard(&answer) {
            Ok(()) => self.set_status("Answer copied to clipboard!"),
            Err(e) => {
                warn!("Clipboard write failed: {}", e);
                self.set_status("Could not copy the answer.");
            }
        }
    }
}

fn byte_index(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Raw mode + alternate screen for as long as the value lives.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        );
    }
}

/// Run the interactive chat screen until the user quits.
pub async fn run(session: Arc<ChatSession>) -> Result<()> {
    info!("Starting chat session with {}", session.model_name());

    let mut screen = TerminalSession::enter()?;
    let mut app = TuiApp::new(session.clone());
    let mut state_rx = session.subscribe();
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(TICK_RATE);

    loop {
        let state = state_rx.borrow_and_update().clone();
        app.sync(&state);
        screen.terminal.draw(|f| view::render(f, &app, &state))?;

        if app.should_quit() {
            break;
        }

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key, &state);
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = ticker.tick() => app.tick(),
        }
    }

    info!(
        "Chat session ended after {} exchanges",
        session.snapshot().history.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GenerateAnswerUseCase, MockAnswerGenerator, StaticSuggestionProvider};

    fn session() -> Arc<ChatSession> {
        let use_case = GenerateAnswerUseCase::new(Arc::new(MockAnswerGenerator::new()))
            .with_pacing_delay(Duration::ZERO);
        Arc::new(ChatSession::new(
            use_case,
            Arc::new(StaticSuggestionProvider::new()),
        ))
    }

    fn press(app: &mut TuiApp, session: &ChatSession, code: KeyCode) {
        press_with(app, session, code, KeyModifiers::NONE);
    }

    fn press_with(app: &mut TuiApp, session: &ChatSession, code: KeyCode, modifiers: KeyModifiers) {
        let state = session.snapshot();
        app.sync(&state);
        app.handle_key(KeyEvent::new(code, modifiers), &state);
        app.sync(&session.snapshot());
    }

    fn type_text(app: &mut TuiApp, session: &ChatSession, text: &str) {
        for c in text.chars() {
            press(app, session, KeyCode::Char(c));
        }
    }

    #[tokio::test]
    async fn typing_updates_question_and_suggestions() {
        let session = session();
        let mut app = TuiApp::new(session.clone());

        type_text(&mut app, &session, "deep");

        let state = session.snapshot();
        assert_eq!(state.question, "deep");
        assert_eq!(app.cursor(), 4);
        assert!(state.flags.show_suggestions);
        assert_eq!(state.suggestions, vec!["What is deep learning?"]);
    }

    #[tokio::test]
    async fn editing_in_the_middle_respects_cursor() {
        let session = session();
        let mut app = TuiApp::new(session.clone());

        type_text(&mut app, &session, "héllo");
        press(&mut app, &session, KeyCode::Left);
        press(&mut app, &session, KeyCode::Left);
        press(&mut app, &session, KeyCode::Backspace);
        press(&mut app, &session, KeyCode::Char('X'));
        press(&mut app, &session, KeyCode::Home);
        press(&mut app, &session, KeyCode::Delete);

        assert_eq!(session.snapshot().question, "éXlo");
        assert_eq!(app.cursor(), 0);
    }

    #[tokio::test]
    async fn enter_on_highlighted_suggestion_selects_it() {
        let session = session();
        let mut app = TuiApp::new(session.clone());

        type_text(&mut app, &session, "explain");
        press(&mut app, &session, KeyCode::Down);
        press(&mut app, &session, KeyCode::Down);
        assert_eq!(app.selected_suggestion(), Some(1));

        press(&mut app, &session, KeyCode::Enter);

        let state = session.snapshot();
        assert_eq!(state.question, "Can you explain generative AI?");
        assert!(!state.flags.show_suggestions);
        assert_eq!(app.cursor(), state.question.chars().count());
    }

    #[tokio::test]
    async fn enter_submits_question() {
        let session = session();
        let mut app = TuiApp::new(session.clone());
        let mut rx = session.subscribe();

        type_text(&mut app, &session, "What is AI?");
        press(&mut app, &session, KeyCode::Esc);
        press(&mut app, &session, KeyCode::Enter);

        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                if rx.borrow_and_update().history.len() == 1 {
                    break;
                }
                rx.changed().await.unwrap();
            }
        })
        .await
        .unwrap();

        let state = session.snapshot();
        assert!(state.answer.contains("What is AI?"));
        assert!(!state.flags.loading);
    }

    #[tokio::test]
    async fn escape_dismisses_then_quits() {
        let session = session();
        let mut app = TuiApp::new(session.clone());

        type_text(&mut app, &session, "ai");
        press(&mut app, &session, KeyCode::Esc);
        assert!(!session.snapshot().flags.show_suggestions);
        assert!(!app.should_quit());

        press(&mut app, &session, KeyCode::Esc);
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn control_keys_toggle_and_clear() {
        let session = session();
        let mut app = TuiApp::new(session.clone());

        press_with(&mut app, &session, KeyCode::Char('t'), KeyModifiers::CONTROL);
        press_with(&mut app, &session, KeyCode::Char('r'), KeyModifiers::CONTROL);
        type_text(&mut app, &session, "hello");
        press_with(&mut app, &session, KeyCode::Char('x'), KeyModifiers::CONTROL);

        let state = session.snapshot();
        assert!(state.flags.dark_mode);
        assert!(state.flags.show_history);
        assert!(state.question.is_empty());
        assert_eq!(app.cursor(), 0);
    }

    #[tokio::test]
    async fn copy_without_answer_sets_status() {
        let session = session();
        let mut app = TuiApp::new(session.clone());

        press_with(&mut app, &session, KeyCode::Char('y'), KeyModifiers::CONTROL);
        assert_eq!(app.status(), Some("Nothing to copy yet."));
    }

    #[test]
    fn byte_index_handles_multibyte() {
        assert_eq!(byte_index("héllo", 0), 0);
        assert_eq!(byte_index("héllo", 2), 3);
        assert_eq!(byte_index("héllo", 10), 6);
    }
}
