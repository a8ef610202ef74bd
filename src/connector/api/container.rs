use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use crate::{
    AnswerGenerator, ChatSession, GeminiClient, GeminiConfig, GenerateAnswerUseCase,
    MockAnswerGenerator, StaticSuggestionProvider, SuggestionProvider, DEFAULT_PACING_DELAY,
};

pub struct ContainerConfig {
    /// Answer offline with [`MockAnswerGenerator`] instead of calling Gemini.
    pub mock: bool,
    pub pacing_delay: Duration,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            mock: false,
            pacing_delay: DEFAULT_PACING_DELAY,
        }
    }
}

pub struct Container {
    generator: Arc<dyn AnswerGenerator>,
    suggestions: Arc<dyn SuggestionProvider>,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let generator: Arc<dyn AnswerGenerator> = if config.mock {
            debug!("Using mock answer generator");
            Arc::new(MockAnswerGenerator::new())
        } else {
            let gemini = GeminiConfig::from_env()?;
            debug!("Using Gemini answer generator: {:?}", gemini);
            Arc::new(GeminiClient::new(gemini)?)
        };

        Ok(Self::with_services(
            generator,
            Arc::new(StaticSuggestionProvider::new()),
            config,
        ))
    }

    /// Wire explicit services, bypassing environment configuration.
    pub fn with_services(
        generator: Arc<dyn AnswerGenerator>,
        suggestions: Arc<dyn SuggestionProvider>,
        config: ContainerConfig,
    ) -> Self {
        Self {
            generator,
            suggestions,
            config,
        }
    }

    pub fn generate_answer_use_case(&self) -> GenerateAnswerUseCase {
        GenerateAnswerUseCase::new(self.generator.clone())
            .with_pacing_delay(self.config.pacing_delay)
    }

    pub fn suggestion_provider(&self) -> Arc<dyn SuggestionProvider> {
        self.suggestions.clone()
    }

    pub fn chat_session(&self) -> Arc<ChatSession> {
        Arc::new(ChatSession::new(
            self.generate_answer_use_case(),
            self.suggestion_provider(),
        ))
    }
}
