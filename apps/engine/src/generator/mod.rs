//! Round generator: builds the ordered round list for a session.
//!
//! Generation is attempted-idempotent: the round count is checked on
//! entry and re-checked immediately before the batch insert, and a
//! Conflict from the insert (another writer won the race) is treated as
//! success. Freshness via the anti-repeat record is best-effort;
//! producing `requested_count` rounds is mandatory.

use std::sync::Arc;

use parking_lot::Mutex;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::GameConfig;
use crate::domain::{CorrectHint, Round, SessionId};
use crate::errors::domain::{ConflictKind, DomainError};
use crate::history::AntiRepeatStore;
use crate::media::{ContentPool, PoolItem};
use crate::store::SessionStore;

pub struct RoundGenerator {
    store: Arc<dyn SessionStore>,
    pool: ContentPool,
    anti_repeat: AntiRepeatStore,
    config: Arc<GameConfig>,
    rng: Mutex<ChaCha8Rng>,
}

impl RoundGenerator {
    pub fn new(
        store: Arc<dyn SessionStore>,
        pool: ContentPool,
        anti_repeat: AntiRepeatStore,
        config: Arc<GameConfig>,
    ) -> Self {
        Self {
            store,
            pool,
            anti_repeat,
            config,
            rng: Mutex::new(ChaCha8Rng::from_os_rng()),
        }
    }

    /// Deterministic shuffle order for tests.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(ChaCha8Rng::seed_from_u64(seed));
        self
    }

    /// Generate and persist `requested_count` rounds for a session.
    ///
    /// No-op when rounds already exist. Never fails on an empty content
    /// pool: synthetic placeholder pairs stand in instead.
    pub async fn generate(
        &self,
        session_id: &SessionId,
        requested_count: u32,
    ) -> Result<(), DomainError> {
        if requested_count == 0 {
            return Err(DomainError::validation("round count must be positive"));
        }

        if self.store.count_rounds(session_id).await? > 0 {
            debug!(session = %session_id, "Rounds already generated, skipping");
            return Ok(());
        }

        let pool_items = self.pool.list_available().await?;
        let (rounds, used_names) = if pool_items.is_empty() {
            info!(session = %session_id, "Content pool empty, using placeholder pairs");
            (self.placeholder_rounds(session_id, requested_count), vec![])
        } else {
            let selected = self.select_items(pool_items, requested_count);
            let names: Vec<String> = selected.iter().map(|item| item.name.clone()).collect();
            (self.rounds_from_items(session_id, &selected), names)
        };

        // Re-check right before the insert: narrows (not eliminates) the
        // window between two concurrent generation attempts. The storage
        // adapter's (session, round_number) uniqueness turns the residual
        // race into a detectable Conflict below.
        if self.store.count_rounds(session_id).await? > 0 {
            debug!(session = %session_id, "Rounds appeared during generation, discarding ours");
            return Ok(());
        }

        match self.store.insert_rounds(rounds).await {
            Ok(()) => {}
            Err(DomainError::Conflict(ConflictKind::RoundsExist, _)) => {
                info!(session = %session_id, "Another writer generated rounds first");
                return Ok(());
            }
            Err(e) => return Err(e),
        }

        info!(session = %session_id, rounds = requested_count, "Rounds generated");

        if !used_names.is_empty() {
            if let Err(e) = self.anti_repeat.record(used_names) {
                warn!(session = %session_id, error = %e, "Failed to update anti-repeat record");
            }
        }
        Ok(())
    }

    /// Prefer items not shown today; fall back to the full pool when
    /// freshness would leave fewer than `count`; cycle with wraparound
    /// so `count` may exceed the pool size.
    fn select_items(&self, pool: Vec<PoolItem>, count: u32) -> Vec<PoolItem> {
        let shown = self.anti_repeat.shown_today();
        let mut candidates: Vec<PoolItem> = pool
            .iter()
            .filter(|item| !shown.contains(&item.name))
            .cloned()
            .collect();
        if (candidates.len() as u32) < count {
            debug!(
                fresh = candidates.len(),
                requested = count,
                "Not enough fresh items, falling back to full pool"
            );
            candidates = pool;
        }

        candidates.shuffle(&mut *self.rng.lock());

        (0..count as usize)
            .map(|i| candidates[i % candidates.len()].clone())
            .collect()
    }

    fn rounds_from_items(&self, session_id: &SessionId, items: &[PoolItem]) -> Vec<Round> {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| Round {
                id: Uuid::new_v4(),
                session_id: session_id.clone(),
                round_number: i as u32 + 1,
                real_url: item.real_url.clone(),
                ai_url: item.ai_url.clone(),
                // Legacy field; readers derive the truth from the id.
                correct_hint: Some(CorrectHint::Real),
            })
            .collect()
    }

    fn placeholder_rounds(&self, session_id: &SessionId, count: u32) -> Vec<Round> {
        let base = &self.config.placeholder_base;
        (0..count)
            .map(|i| Round {
                id: Uuid::new_v4(),
                session_id: session_id.clone(),
                round_number: i + 1,
                real_url: format!("{base}/seed/real{i}/800/600"),
                ai_url: format!("{base}/seed/ai{i}/800/600?blur=2"),
                correct_hint: Some(CorrectHint::Real),
            })
            .collect()
    }
}
