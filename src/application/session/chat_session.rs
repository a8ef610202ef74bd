use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::application::{GenerateAnswerUseCase, SuggestionProvider};
use crate::domain::{DomainError, ExchangeRecord, SessionState};

/// Controller for one chat session.
///
/// All state lives in a single [`SessionState`] published through a
/// `watch` channel: front-ends call [`ChatSession::subscribe`] and re-render
/// whenever the snapshot changes.
///
/// Every exchange is tagged with a sequence number when it starts. Starting a
/// new exchange cancels the previous one, and a completion is only applied if
/// its sequence is still the latest, so the most recently initiated exchange
/// always owns the visible answer.
pub struct ChatSession {
    use_case: GenerateAnswerUseCase,
    suggestions: Arc<dyn SuggestionProvider>,
    state: watch::Sender<SessionState>,
    sequence: AtomicU64,
    in_flight: Mutex<CancellationToken>,
}

impl ChatSession {
    pub fn new(use_case: GenerateAnswerUseCase, suggestions: Arc<dyn SuggestionProvider>) -> Self {
        let (state, _) = watch::channel(SessionState::new());
        Self {
            use_case,
            suggestions,
            state,
            sequence: AtomicU64::new(0),
            in_flight: Mutex::new(CancellationToken::new()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn model_name(&self) -> &str {
        self.use_case.model_name()
    }

    /// Replace the input buffer and recompute the suggestion list.
    pub fn set_question(&self, question: impl Into<String>) {
        let question = question.into();
        let suggestions = self.suggestions.suggest(&question);
        let visible = !question.trim().is_empty();

        self.state.send_modify(|s| {
            s.question = question;
            s.suggestions = suggestions;
            s.flags.show_suggestions = visible;
        });
    }

    /// Replace the question with a suggestion and hide the list.
    pub fn select_suggestion(&self, suggestion: &str) {
        let suggestions = self.suggestions.suggest(suggestion);

        self.state.send_modify(|s| {
            s.question = suggestion.to_string();
            s.suggestions = suggestions;
            s.flags.show_suggestions = false;
        });
    }

    pub fn dismiss_suggestions(&self) {
        self.state.send_if_modified(|s| {
            let was_visible = s.flags.show_suggestions;
            s.flags.show_suggestions = false;
            was_visible
        });
    }

    pub fn clear_input(&self) {
        self.state.send_modify(SessionState::clear_input);
    }

    pub fn toggle_dark_mode(&self) {
        self.state
            .send_modify(|s| s.flags.dark_mode = !s.flags.dark_mode);
    }

    pub fn toggle_history(&self) {
        self.state
            .send_modify(|s| s.flags.show_history = !s.flags.show_history);
    }

    /// The current answer, if there is one to copy.
    pub fn copy_answer(&self) -> Option<String> {
        let state = self.state.borrow();
        state.has_answer().then(|| state.answer.clone())
    }

    /// Run an exchange for the current input buffer.
    ///
    /// A blank question sets the error message and returns
    /// [`DomainError::EmptyInput`] without any state transition. Errors from
    /// the generator are turned into a user-visible message and returned;
    /// none of them end the session. An exchange replaced by a newer one
    /// returns [`DomainError::Superseded`] and leaves the state alone.
    pub async fn generate_answer(&self) -> Result<String, DomainError> {
        let question = self.state.borrow().question.clone();

        if let Err(err) = GenerateAnswerUseCase::validate(&question) {
            warn!("Rejected exchange: {}", err);
            self.state.send_modify(|s| s.error = Some(err.user_message()));
            return Err(err);
        }

        let (seq, cancel) = self.begin_exchange();
        let _guard = InFlightGuard {
            state: &self.state,
            sequence: &self.sequence,
            seq,
        };

        let outcome = tokio::select! {
            _ = cancel.cancelled() => Err(DomainError::Superseded),
            result = self.use_case.execute(&question) => result,
        };

        match outcome {
            Ok(answer) => {
                let applied = self.state.send_if_modified(|s| {
                    if self.sequence.load(Ordering::SeqCst) != seq {
                        return false;
                    }
                    s.answer = answer.clone();
                    s.history.push(ExchangeRecord::new(question.clone(), answer.clone()));
                    s.flags.typing = false;
                    true
                });

                if applied {
                    Ok(answer)
                } else {
                    debug!(seq, "Discarding answer from superseded exchange");
                    Err(DomainError::Superseded)
                }
            }
            Err(err) if err.is_superseded() => {
                debug!(seq, "Exchange cancelled by a newer request");
                Err(err)
            }
            Err(err) => {
                let message = err.user_message();
                let applied = self.state.send_if_modified(|s| {
                    if self.sequence.load(Ordering::SeqCst) != seq {
                        return false;
                    }
                    s.error = Some(message);
                    s.flags.typing = false;
                    true
                });

                if applied {
                    Err(err)
                } else {
                    debug!(seq, "Discarding error from superseded exchange: {}", err);
                    Err(DomainError::Superseded)
                }
            }
        }
    }

    /// Tag a new exchange, cancel whatever was in flight and enter the loading
    /// state. Runs under the channel's write lock so sequence order, token
    /// order and the published state agree.
    fn begin_exchange(&self) -> (u64, CancellationToken) {
        let mut started = (0, CancellationToken::new());

        self.state.send_modify(|s| {
            let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
            let token = CancellationToken::new();
            let previous = {
                let mut in_flight = self
                    .in_flight
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                std::mem::replace(&mut *in_flight, token.clone())
            };
            previous.cancel();

            s.error = None;
            s.answer.clear();
            s.flags.loading = true;
            s.flags.typing = true;

            started = (seq, token);
        });

        debug!(seq = started.0, "Exchange started");
        started
    }
}

/// Releases `loading`/`typing` when an exchange ends, however it ends
/// (including the future being dropped), but only if no newer exchange has
/// taken over the flags.
struct InFlightGuard<'a> {
    state: &'a watch::Sender<SessionState>,
    sequence: &'a AtomicU64,
    seq: u64,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|s| {
            if self.sequence.load(Ordering::SeqCst) != self.seq {
                return false;
            }
            let changed = s.flags.loading || s.flags.typing;
            s.flags.loading = false;
            s.flags.typing = false;
            changed
        });
    }
}
