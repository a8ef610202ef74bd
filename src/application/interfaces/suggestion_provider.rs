/// Produces candidate questions for the text currently being typed.
///
/// Returns candidates in ranked order. A blank input yields no candidates.
pub trait SuggestionProvider: Send + Sync {
    fn suggest(&self, input: &str) -> Vec<String>;
}
