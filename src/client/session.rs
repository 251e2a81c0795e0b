use crate::client::card::WordCard;
use crate::client::history::HistoryStore;
use crate::services::meaning::{Detail, MeaningProvider};

/// The flashcard UI state machine: session-scoped cards, persisted
/// history, a loading flag, the last error, and the detail-modal state.
///
/// Two collections, one invariant: neither `cards` nor `history` ever
/// holds two entries whose words match case-insensitively. Cards live for
/// the session only; history survives restarts through the store handle.
pub struct FlashcardSession<P: MeaningProvider, S: HistoryStore> {
    provider: P,
    store: S,
    cards: Vec<WordCard>,
    history: Vec<WordCard>,
    loading: bool,
    error: Option<String>,
    modal_open: bool,
    selected_word: Option<String>,
    detailed_meaning: Option<String>,
}

impl<P: MeaningProvider, S: HistoryStore> FlashcardSession<P, S> {
    /// Bootstraps the session, restoring persisted history. A store that
    /// fails to parse yields an empty history without surfacing an error.
    pub fn new(provider: P, store: S) -> Self {
        let history = store.load();
        Self {
            provider,
            store,
            cards: Vec::new(),
            history,
            loading: false,
            error: None,
            modal_open: false,
            selected_word: None,
            detailed_meaning: None,
        }
    }

    /// Brief lookup: fetches the short explanation and files it as a card.
    /// New words are appended to the history and persisted; repeat lookups
    /// (in any letter case) change nothing. The loading flag is cleared on
    /// every path, including failure.
    pub async fn lookup(&mut self, word: &str) {
        self.loading = true;
        self.error = None;

        match self.provider.generate_meaning(word, Detail::Brief).await {
            Ok(meaning) => self.file_card(word, meaning),
            Err(err) => self.error = Some(err.to_string()),
        }

        self.loading = false;
    }

    /// Opens the detail modal for a word and fetches the long explanation
    /// into `detailed_meaning`. Cards and history are untouched.
    pub async fn open_detail(&mut self, word: &str) {
        self.selected_word = Some(word.to_string());
        self.modal_open = true;
        self.loading = true;
        self.error = None;

        match self.provider.generate_meaning(word, Detail::Detailed).await {
            Ok(text) => self.detailed_meaning = Some(text),
            Err(err) => self.error = Some(err.to_string()),
        }

        self.loading = false;
    }

    /// Clears all detail-view state unconditionally, even mid-lookup.
    pub fn close_detail(&mut self) {
        self.modal_open = false;
        self.selected_word = None;
        self.detailed_meaning = None;
    }

    fn file_card(&mut self, word: &str, meaning: String) {
        if self.cards.iter().any(|c| c.matches_word(word)) {
            return;
        }

        let card = WordCard::new(word, meaning);
        self.cards.push(card.clone());

        if !self.history.iter().any(|c| c.matches_word(word)) {
            self.history.push(card);
            if let Err(err) = self.store.save(&self.history) {
                tracing::warn!(error = %err, "failed to persist word history");
                self.error = Some(err.to_string());
            }
        }
    }

    pub fn cards(&self) -> &[WordCard] {
        &self.cards
    }

    pub fn history(&self) -> &[WordCard] {
        &self.history
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn selected_word(&self) -> Option<&str> {
        self.selected_word.as_deref()
    }

    pub fn detailed_meaning(&self) -> Option<&str> {
        self.detailed_meaning.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::history::MemoryHistoryStore;
    use crate::services::meaning::{MeaningError, MockMeaningProvider};

    struct FailingProvider;

    impl MeaningProvider for FailingProvider {
        async fn generate_meaning(
            &self,
            _word: &str,
            _detail: Detail,
        ) -> Result<String, MeaningError> {
            Err(MeaningError::Upstream {
                status: 503,
                details: "overloaded".to_string(),
            })
        }
    }

    fn session() -> FlashcardSession<MockMeaningProvider, MemoryHistoryStore> {
        FlashcardSession::new(MockMeaningProvider, MemoryHistoryStore::default())
    }

    #[tokio::test]
    async fn lookup_adds_card_and_history() {
        let mut session = session();
        session.lookup("test").await;

        assert_eq!(session.cards().len(), 1);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.cards()[0].word, "test");
        assert!(!session.is_loading());
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn case_variants_dedupe_to_one_entry() {
        let mut session = session();
        session.lookup("Test").await;
        session.lookup("test").await;
        session.lookup("TEST").await;

        assert_eq!(session.cards().len(), 1);
        assert_eq!(session.history().len(), 1);
        // The first spelling wins.
        assert_eq!(session.cards()[0].word, "Test");
    }

    #[tokio::test]
    async fn lookup_persists_history_to_store() {
        let mut session = session();
        session.lookup("cat").await;
        session.lookup("dog").await;

        assert_eq!(session.store.entries().len(), 2);
    }

    #[tokio::test]
    async fn bootstrap_restores_persisted_history() {
        let store = MemoryHistoryStore::new(vec![WordCard::new("cat", "猫。")]);
        let session = FlashcardSession::new(MockMeaningProvider, store);

        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].word, "cat");
        assert!(session.cards().is_empty());
    }

    #[tokio::test]
    async fn history_word_still_gets_a_session_card() {
        let store = MemoryHistoryStore::new(vec![WordCard::new("cat", "猫。")]);
        let mut session = FlashcardSession::new(MockMeaningProvider, store);
        session.lookup("Cat").await;

        assert_eq!(session.cards().len(), 1);
        assert_eq!(session.history().len(), 1);
    }

    #[tokio::test]
    async fn reload_restores_history_from_file() {
        use crate::client::history::{FileHistoryStore, HISTORY_FILE};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(HISTORY_FILE);

        let mut session =
            FlashcardSession::new(MockMeaningProvider, FileHistoryStore::new(&path));
        session.lookup("cat").await;
        drop(session);

        let reloaded = FlashcardSession::new(MockMeaningProvider, FileHistoryStore::new(&path));
        assert_eq!(reloaded.history().len(), 1);
        assert_eq!(reloaded.history()[0].word, "cat");
    }

    #[tokio::test]
    async fn failed_lookup_sets_error_and_clears_loading() {
        let mut session =
            FlashcardSession::new(FailingProvider, MemoryHistoryStore::default());
        session.lookup("test").await;

        assert!(session.cards().is_empty());
        assert!(session.history().is_empty());
        assert!(!session.is_loading());
        assert_eq!(session.error(), Some("API Error: 503"));
    }

    #[tokio::test]
    async fn lookup_clears_previous_error() {
        let mut session = session();
        session.error = Some("stale".to_string());
        session.lookup("test").await;

        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn open_detail_fills_modal_state_only() {
        let mut session = session();
        session.open_detail("test").await;

        assert!(session.is_modal_open());
        assert_eq!(session.selected_word(), Some("test"));
        assert!(session.detailed_meaning().is_some());
        assert!(session.cards().is_empty());
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn close_detail_clears_state_even_while_loading() {
        let mut session = session();
        session.open_detail("test").await;
        session.loading = true;

        session.close_detail();

        assert!(!session.is_modal_open());
        assert!(session.selected_word().is_none());
        assert!(session.detailed_meaning().is_none());
        assert!(session.is_loading());
    }

    #[tokio::test]
    async fn failed_detail_lookup_keeps_modal_open() {
        let mut session =
            FlashcardSession::new(FailingProvider, MemoryHistoryStore::default());
        session.open_detail("test").await;

        assert!(session.is_modal_open());
        assert!(session.detailed_meaning().is_none());
        assert_eq!(session.error(), Some("API Error: 503"));
        assert!(!session.is_loading());
    }
}
