use std::time::{Instant, SystemTime};

use crate::services::gemini::GeminiClient;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    started_at_system: SystemTime,
    gemini: GeminiClient,
}

impl AppState {
    pub fn new(gemini: GeminiClient) -> Self {
        Self {
            started_at: Instant::now(),
            started_at_system: SystemTime::now(),
            gemini,
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn started_at_system(&self) -> SystemTime {
        self.started_at_system
    }

    pub fn gemini(&self) -> &GeminiClient {
        &self.gemini
    }
}
