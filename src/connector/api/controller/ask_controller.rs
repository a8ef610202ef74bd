use std::io::IsTerminal;
use std::time::Duration;

use anyhow::{bail, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::error;

use super::super::Container;

pub struct AskController<'a> {
    container: &'a Container,
}

impl<'a> AskController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn ask(&self, question: String) -> Result<String> {
        let use_case = self.container.generate_answer_use_case();

        let spinner = Self::spinner();
        let outcome = use_case.execute(&question).await;
        spinner.finish_and_clear();

        match outcome {
            Ok(answer) => Ok(answer),
            Err(e) => {
                error!("Ask failed: {}", e);
                bail!(e.user_message())
            }
        }
    }

    /// "Thinking..." spinner on stderr; hidden when stderr is not a terminal.
    fn spinner() -> ProgressBar {
        if !std::io::stderr().is_terminal() {
            return ProgressBar::hidden();
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.blue} {msg}")
                .expect("Invalid spinner template"),
        );
        spinner.set_message("Thinking...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }
}
