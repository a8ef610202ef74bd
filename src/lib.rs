pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    AnswerGenerator, ChatSession, GenerateAnswerUseCase, SuggestionProvider, DEFAULT_PACING_DELAY,
};

pub use cli::Commands;

pub use connector::{
    Container, ContainerConfig, GeminiClient, GeminiConfig, MockAnswerGenerator, Router,
    StaticSuggestionProvider, DEFAULT_SUGGESTIONS,
};

pub use domain::{
    DomainError, ErrorKind, ExchangeRecord, HistoryLedger, SessionFlags, SessionState,
};
