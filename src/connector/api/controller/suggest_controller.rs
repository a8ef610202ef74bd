use anyhow::Result;

use super::super::Container;

pub struct SuggestController<'a> {
    container: &'a Container,
}

impl<'a> SuggestController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub fn suggest(&self, input: String) -> Result<String> {
        let suggestions = self.container.suggestion_provider().suggest(&input);
        Ok(self.format_suggestions(&suggestions))
    }

    fn format_suggestions(&self, suggestions: &[String]) -> String {
        if suggestions.is_empty() {
            return "No suggestions available.".to_string();
        }

        suggestions
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{}. {}", i + 1, s))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
