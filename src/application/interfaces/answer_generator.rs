use async_trait::async_trait;

use crate::domain::DomainError;

/// Sends a single question to a generative model and returns its text answer.
///
/// Implementors own transport and serialization and are responsible for
/// classifying failures into `ServerError`, `NetworkError` or `ClientError`.
/// Only the question is sent; no earlier turns are included.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(&self, question: &str) -> Result<String, DomainError>;

    /// Get the model name answering the questions
    fn model_name(&self) -> &str;
}
