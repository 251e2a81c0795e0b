use serde::{Deserialize, Serialize};

/// A word paired with its explanatory text. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCard {
    pub word: String,
    pub meaning: String,
}

impl WordCard {
    pub fn new(word: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            meaning: meaning.into(),
        }
    }

    /// Dedup comparison: words are equal if they match case-insensitively.
    pub fn matches_word(&self, word: &str) -> bool {
        self.word.to_lowercase() == word.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_word_ignores_case() {
        let card = WordCard::new("Test", "試験");
        assert!(card.matches_word("test"));
        assert!(card.matches_word("TEST"));
        assert!(!card.matches_word("tests"));
    }
}
