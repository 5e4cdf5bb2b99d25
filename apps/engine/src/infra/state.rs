//! Context wiring: one bundle of collaborators per process.
//!
//! Collaborators and client-local state are explicit constructor
//! arguments (not ambient globals) so tests can swap any of them.

use std::sync::Arc;

use crate::adapters::{MemoryBackend, MemoryMediaStore};
use crate::config::GameConfig;
use crate::error::AppError;
use crate::feed::ChangeFeed;
use crate::generator::RoundGenerator;
use crate::history::{AntiRepeatStore, ScoreHistoryStore};
use crate::media::{ContentPool, MediaStore};
use crate::scores::ScoreLedger;
use crate::store::SessionStore;

/// Shared handles every role (host orchestrator, player agents,
/// session service) is constructed from.
#[derive(Clone)]
pub struct GameContext {
    store: Arc<dyn SessionStore>,
    feed: Arc<dyn ChangeFeed>,
    media: Arc<dyn MediaStore>,
    config: Arc<GameConfig>,
}

impl GameContext {
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn feed(&self) -> &Arc<dyn ChangeFeed> {
        &self.feed
    }

    pub fn media(&self) -> &Arc<dyn MediaStore> {
        &self.media
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn pool(&self) -> ContentPool {
        ContentPool::new(self.media.clone(), &self.config)
    }

    pub fn anti_repeat(&self) -> AntiRepeatStore {
        AntiRepeatStore::new(&self.config.anti_repeat_path)
    }

    pub fn score_history(&self) -> ScoreHistoryStore {
        ScoreHistoryStore::new(&self.config.score_history_path)
    }

    pub fn generator(&self) -> RoundGenerator {
        RoundGenerator::new(
            self.store.clone(),
            self.pool(),
            self.anti_repeat(),
            self.config.clone(),
        )
    }

    pub fn ledger(&self) -> ScoreLedger {
        ScoreLedger::new(self.store.clone())
    }
}

/// Builder for GameContext instances (used in both tests and main).
pub struct ContextBuilder {
    store: Option<Arc<dyn SessionStore>>,
    feed: Option<Arc<dyn ChangeFeed>>,
    media: Option<Arc<dyn MediaStore>>,
    config: GameConfig,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            feed: None,
            media: None,
            config: GameConfig::default(),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_feed(mut self, feed: Arc<dyn ChangeFeed>) -> Self {
        self.feed = Some(feed);
        self
    }

    pub fn with_media(mut self, media: Arc<dyn MediaStore>) -> Self {
        self.media = Some(media);
        self
    }

    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<GameContext, AppError> {
        let store = self
            .store
            .ok_or_else(|| AppError::config("GameContext requires a session store"))?;
        let feed = self
            .feed
            .ok_or_else(|| AppError::config("GameContext requires a change feed"))?;
        let media = self
            .media
            .ok_or_else(|| AppError::config("GameContext requires a media store"))?;
        Ok(GameContext {
            store,
            feed,
            media,
            config: Arc::new(self.config),
        })
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_context() -> ContextBuilder {
    ContextBuilder::new()
}

/// Fully in-memory context: one backend serving as both store and
/// feed, plus in-memory object storage.
pub fn build_memory_context(config: GameConfig) -> GameContext {
    let backend = Arc::new(MemoryBackend::new());
    GameContext {
        store: backend.clone(),
        feed: backend,
        media: Arc::new(MemoryMediaStore::default()),
        config: Arc::new(config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_fails_without_collaborators() {
        assert!(build_context().build().is_err());
    }

    #[test]
    fn memory_context_wires_everything() {
        let ctx = build_memory_context(GameConfig::default());
        assert_eq!(ctx.config().points_per_correct, 100);
        let _ = ctx.generator();
        let _ = ctx.ledger();
    }
}
