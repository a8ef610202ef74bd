use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::application::AnswerGenerator;
use crate::domain::{DomainError, ErrorKind};

/// Offline [`AnswerGenerator`] for demos and tests.
///
/// Echoes the question back as markdown unless a fixed response is set. Per
/// call delays are consumed in order, and a failure kind can be injected and
/// cleared at runtime.
pub struct MockAnswerGenerator {
    response: Option<String>,
    failure: Mutex<Option<ErrorKind>>,
    delays: Mutex<VecDeque<Duration>>,
    calls: AtomicUsize,
    last_question: Mutex<Option<String>>,
}

impl MockAnswerGenerator {
    pub fn new() -> Self {
        Self {
            response: None,
            failure: Mutex::new(None),
            delays: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            last_question: Mutex::new(None),
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = Some(response.into());
        self
    }

    pub fn with_failure(self, kind: ErrorKind) -> Self {
        *lock(&self.failure) = Some(kind);
        self
    }

    pub fn with_delays(self, delays: Vec<Duration>) -> Self {
        *lock(&self.delays) = delays.into();
        self
    }

    pub fn clear_failure(&self) {
        *lock(&self.failure) = None;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_question(&self) -> Option<String> {
        lock(&self.last_question).clone()
    }

    fn failure_for(kind: ErrorKind) -> DomainError {
        match kind {
            ErrorKind::EmptyInput => DomainError::EmptyInput,
            ErrorKind::ServerError => DomainError::server(500, None),
            ErrorKind::NetworkError => DomainError::network("mock connection refused"),
            ErrorKind::ClientError => DomainError::client("mock malformed payload"),
            ErrorKind::Superseded => DomainError::Superseded,
            ErrorKind::Configuration => DomainError::configuration("mock configuration"),
        }
    }
}

impl Default for MockAnswerGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl AnswerGenerator for MockAnswerGenerator {
    async fn generate(&self, question: &str) -> Result<String, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *lock(&self.last_question) = Some(question.to_string());

        let delay = lock(&self.delays).pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failure = *lock(&self.failure);
        if let Some(kind) = failure {
            return Err(Self::failure_for(kind));
        }

        Ok(match &self.response {
            Some(response) => response.clone(),
            None => format!(
                "## Mock answer\n\nYou asked: **{}**\n\n- generated offline\n- no request was sent",
                question.trim()
            ),
        })
    }

    fn model_name(&self) -> &str {
        "mock-generator"
    }
}
