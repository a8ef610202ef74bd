use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::{AskController, SuggestController};

pub struct Router<'a> {
    ask_controller: AskController<'a>,
    suggest_controller: SuggestController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            ask_controller: AskController::new(container),
            suggest_controller: SuggestController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Ask { question } => self.ask_controller.ask(question).await,
            Commands::Suggest { input } => self.suggest_controller.suggest(input),
            Commands::Chat => unreachable!("Chat command is handled separately in main"),
        }
    }
}
