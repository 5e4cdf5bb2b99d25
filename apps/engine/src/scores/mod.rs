//! Score ledger: lost-update-free score increments.
//!
//! Every award goes through the storage collaborator's atomic
//! increment. There is deliberately no read-modify-write path here, so
//! concurrent awards (two rounds scoring the same player, or a retried
//! reveal) can never clobber each other.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::errors::domain::DomainError;
use crate::store::SessionStore;

#[derive(Clone)]
pub struct ScoreLedger {
    store: Arc<dyn SessionStore>,
}

impl ScoreLedger {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Award points to a player; returns the new score. Never
    /// decrements: zero or the u32 domain keeps scores monotone.
    pub async fn increment(&self, player_id: &Uuid, amount: u32) -> Result<u32, DomainError> {
        if amount == 0 {
            return Err(DomainError::validation("increment amount must be positive"));
        }
        let new_score = self.store.increment_score(player_id, amount).await?;
        debug!(player = %player_id, amount, new_score, "Score incremented");
        Ok(new_score)
    }
}
