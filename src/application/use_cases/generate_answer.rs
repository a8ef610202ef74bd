use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use crate::application::AnswerGenerator;
use crate::domain::DomainError;

/// Pause before the outbound call so the "thinking" indicator is visible.
pub const DEFAULT_PACING_DELAY: Duration = Duration::from_millis(1000);

/// Use case for a single question → answer exchange.
pub struct GenerateAnswerUseCase {
    generator: Arc<dyn AnswerGenerator>,
    pacing_delay: Duration,
}

impl GenerateAnswerUseCase {
    pub fn new(generator: Arc<dyn AnswerGenerator>) -> Self {
        Self {
            generator,
            pacing_delay: DEFAULT_PACING_DELAY,
        }
    }

    pub fn with_pacing_delay(mut self, delay: Duration) -> Self {
        self.pacing_delay = delay;
        self
    }

    pub fn pacing_delay(&self) -> Duration {
        self.pacing_delay
    }

    pub fn model_name(&self) -> &str {
        self.generator.model_name()
    }

    /// Reject blank questions before anything touches the network.
    pub fn validate(question: &str) -> Result<(), DomainError> {
        if question.trim().is_empty() {
            return Err(DomainError::EmptyInput);
        }
        Ok(())
    }

    /// The question is forwarded exactly as typed; trimming only applies to
    /// validation.
    pub async fn execute(&self, question: &str) -> Result<String, DomainError> {
        Self::validate(question)?;

        if !self.pacing_delay.is_zero() {
            debug!("Pacing exchange for {}ms", self.pacing_delay.as_millis());
            tokio::time::sleep(self.pacing_delay).await;
        }

        info!(
            "Asking {} ({} chars)",
            self.generator.model_name(),
            question.chars().count()
        );

        let start_time = Instant::now();

        match self.generator.generate(question).await {
            Ok(answer) => {
                info!(
                    "Received answer ({} chars) in {:.2}s",
                    answer.chars().count(),
                    start_time.elapsed().as_secs_f64()
                );
                Ok(answer)
            }
            Err(e) => {
                error!("Exchange failed after {:.2}s: {}", start_time.elapsed().as_secs_f64(), e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::MockAnswerGenerator;
    use crate::domain::ErrorKind;

    fn use_case(generator: Arc<MockAnswerGenerator>) -> GenerateAnswerUseCase {
        GenerateAnswerUseCase::new(generator).with_pacing_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_blank_question_never_reaches_generator() {
        let generator = Arc::new(MockAnswerGenerator::new());
        let use_case = use_case(generator.clone());

        for blank in ["", " ", "\t\n", "   \r\n  "] {
            let err = use_case.execute(blank).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::EmptyInput);
        }

        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_question_is_sent_untrimmed() {
        let generator = Arc::new(MockAnswerGenerator::new().with_response("42"));
        let use_case = use_case(generator.clone());

        let answer = use_case.execute("  meaning of life?  ").await.unwrap();

        assert_eq!(answer, "42");
        assert_eq!(generator.calls(), 1);
        assert_eq!(
            generator.last_question().as_deref(),
            Some("  meaning of life?  ")
        );
    }

    #[tokio::test]
    async fn test_generator_errors_are_propagated() {
        let generator = Arc::new(MockAnswerGenerator::new().with_failure(ErrorKind::NetworkError));
        let use_case = use_case(generator.clone());

        let err = use_case.execute("What is AI?").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NetworkError);
        assert_eq!(generator.calls(), 1);
    }

    #[test]
    fn test_default_pacing_delay() {
        let use_case = GenerateAnswerUseCase::new(Arc::new(MockAnswerGenerator::new()));
        assert_eq!(use_case.pacing_delay(), Duration::from_millis(1000));
        assert_eq!(use_case.model_name(), "mock-generator");
    }
}
