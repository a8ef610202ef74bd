/// A completed question/answer pair.
///
/// Records are only created when an exchange succeeds and are never mutated
/// afterwards, so the fields are private and exposed read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeRecord {
    question: String,
    answer: String,
}

impl ExchangeRecord {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_record_creation() {
        let record = ExchangeRecord::new("What is deep learning?", "A subset of ML.");

        assert_eq!(record.question(), "What is deep learning?");
        assert_eq!(record.answer(), "A subset of ML.");
    }

    #[test]
    fn test_exchange_record_keeps_raw_question() {
        let record = ExchangeRecord::new("  padded  ", "answer");
        assert_eq!(record.question(), "  padded  ");
    }
}
