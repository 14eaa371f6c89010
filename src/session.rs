use std::sync::Arc;

use dashmap::DashMap;

/// Session-scoped cache of per-client tokens (API keys, client versions)
/// that extractors would otherwise re-derive on every fetch. Handles are
/// cheap clones sharing one map, so an extractor and the harness observe the
/// same state.
///
/// The conformance engine resets the cache between scenarios; nothing cached
/// while one fixture is replayed may influence the next.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    tokens: Arc<DashMap<String, String>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self, client: &str) -> Option<String> {
        self.tokens.get(client).map(|entry| entry.value().clone())
    }

    pub fn store_token(&self, client: impl Into<String>, token: impl Into<String>) {
        self.tokens.insert(client.into(), token.into());
    }

    /// Drops every cached token, returning the cache to its pristine state.
    pub fn reset(&self) {
        let cached = self.tokens.len();
        if cached > 0 {
            log::info!("Resetting session cache, dropping {} token(s)", cached);
        }
        self.tokens.clear();
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
