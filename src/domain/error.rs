use thiserror::Error;

/// Fallback shown when the server rejects a request without an explanation.
pub const SERVER_FALLBACK_MESSAGE: &str = "Unable to generate an answer.";

/// Classification of an exchange failure, independent of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    EmptyInput,
    ServerError,
    NetworkError,
    ClientError,
    Superseded,
    Configuration,
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Empty input: a question is required")]
    EmptyInput,

    #[error("Server error ({status}): {}", message.as_deref().unwrap_or(SERVER_FALLBACK_MESSAGE))]
    ServerError {
        status: u16,
        message: Option<String>,
    },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Client error: {0}")]
    ClientError(String),

    #[error("Exchange superseded by a newer request")]
    Superseded,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl DomainError {
    pub fn server(status: u16, message: Option<String>) -> Self {
        Self::ServerError { status, message }
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::NetworkError(msg.into())
    }

    pub fn client(msg: impl Into<String>) -> Self {
        Self::ClientError(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyInput => ErrorKind::EmptyInput,
            Self::ServerError { .. } => ErrorKind::ServerError,
            Self::NetworkError(_) => ErrorKind::NetworkError,
            Self::ClientError(_) => ErrorKind::ClientError,
            Self::Superseded => ErrorKind::Superseded,
            Self::Configuration(_) => ErrorKind::Configuration,
        }
    }

    /// The message shown to the user. Diagnostic detail stays in the logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyInput => "Please enter a question.".to_string(),
            Self::ServerError { message, .. } => format!(
                "Error: {}",
                message
                    .as_deref()
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or(SERVER_FALLBACK_MESSAGE)
            ),
            Self::NetworkError(_) => "Network error: Unable to connect to the server.".to_string(),
            Self::ClientError(_) => {
                "Error occurred while fetching the answer.".to_string()
            }
            Self::Superseded => String::new(),
            Self::Configuration(msg) => format!("Configuration error: {msg}"),
        }
    }

    pub fn is_empty_input(&self) -> bool {
        matches!(self, Self::EmptyInput)
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }
}
