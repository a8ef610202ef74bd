use crate::application::SuggestionProvider;

/// Built-in questions offered while typing.
pub const DEFAULT_SUGGESTIONS: &[&str] = &[
    "What are the benefits of AI?",
    "How does machine learning work?",
    "Can you explain neural networks?",
    "What is deep learning?",
    "What is natural language processing?",
    "How can AI help in healthcare?",
    "What is reinforcement learning?",
    "How does AI affect society?",
    "Can you explain generative AI?",
];

/// A [`SuggestionProvider`] backed by a fixed corpus.
///
/// Matching is a case-insensitive substring test against the input as typed
/// (only the emptiness check trims). Results keep corpus order.
pub struct StaticSuggestionProvider {
    corpus: Vec<String>,
}

impl Default for StaticSuggestionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticSuggestionProvider {
    pub fn new() -> Self {
        Self::with_corpus(DEFAULT_SUGGESTIONS.iter().copied())
    }

    pub fn with_corpus<I, S>(corpus: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            corpus: corpus.into_iter().map(Into::into).collect(),
        }
    }
}

impl SuggestionProvider for StaticSuggestionProvider {
    fn suggest(&self, input: &str) -> Vec<String> {
        if input.trim().is_empty() {
            return Vec::new();
        }

        let needle = input.to_lowercase();
        self.corpus
            .iter()
            .filter(|candidate| candidate.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_yields_nothing() {
        let provider = StaticSuggestionProvider::new();
        assert!(provider.suggest("").is_empty());
        assert!(provider.suggest("   ").is_empty());
    }

    #[test]
    fn test_matching_is_case_insensitive_and_ordered() {
        let provider = StaticSuggestionProvider::with_corpus([
            "What are the benefits of AI?",
            "How does machine learning work?",
        ]);

        assert_eq!(provider.suggest("ai"), vec!["What are the benefits of AI?"]);
        assert_eq!(provider.suggest("AI"), vec!["What are the benefits of AI?"]);
    }

    #[test]
    fn test_default_corpus_learning_matches() {
        let provider = StaticSuggestionProvider::new();
        assert_eq!(
            provider.suggest("Learning"),
            vec![
                "How does machine learning work?",
                "What is deep learning?",
                "What is reinforcement learning?",
            ]
        );
    }

    #[test]
    fn test_input_is_not_trimmed_for_matching() {
        let provider = StaticSuggestionProvider::new();
        assert!(provider.suggest("deep learning ").is_empty());
        assert_eq!(provider.suggest(" deep"), vec!["What is deep learning?"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        let provider = StaticSuggestionProvider::new();
        assert!(provider.suggest("blockchain").is_empty());
    }
}
