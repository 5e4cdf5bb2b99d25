//! Typed contract over the storage collaborator.
//!
//! Absence is reported as `Ok(None)`, distinct from operational
//! failure, so callers can branch on "no next round => game over"
//! versus "transient failure => retry the same step". The `require_*`
//! helpers map absence to `DomainError::NotFound` where the caller
//! wants a hard error instead.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Player, Round, Session, SessionId, SessionStatus, Vote};
use crate::errors::domain::{DomainError, NotFoundKind};

/// Ordering for player listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerOrder {
    /// Join order (lobby display).
    Joined,
    /// Score descending (leaderboard snapshot).
    ScoreDesc,
}

/// CRUD over session/round/player/vote records plus the two primitives
/// the core leans on: a count-only round query (cheap "have rounds been
/// generated yet" test) and an atomic score increment.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create_session(&self, session: Session) -> Result<Session, DomainError>;
    async fn find_session(&self, id: &SessionId) -> Result<Option<Session>, DomainError>;
    async fn update_status(
        &self,
        id: &SessionId,
        status: SessionStatus,
    ) -> Result<Session, DomainError>;
    async fn update_current_round(
        &self,
        id: &SessionId,
        round_number: u32,
    ) -> Result<Session, DomainError>;

    /// Insert a generated batch. All rounds must belong to one session;
    /// a (session, round_number) uniqueness violation is a Conflict.
    async fn insert_rounds(&self, rounds: Vec<Round>) -> Result<(), DomainError>;
    async fn count_rounds(&self, session: &SessionId) -> Result<u64, DomainError>;
    async fn find_round(
        &self,
        session: &SessionId,
        round_number: u32,
    ) -> Result<Option<Round>, DomainError>;

    async fn insert_player(&self, player: Player) -> Result<Player, DomainError>;
    async fn list_players(
        &self,
        session: &SessionId,
        order: PlayerOrder,
    ) -> Result<Vec<Player>, DomainError>;

    /// A duplicate (round, player) pair is a Conflict.
    async fn insert_vote(&self, vote: Vote) -> Result<Vote, DomainError>;
    async fn list_votes(
        &self,
        session: &SessionId,
        round_id: &Uuid,
    ) -> Result<Vec<Vote>, DomainError>;

    /// Atomic increment keyed by player id; returns the new score.
    /// Implementations must not read-then-write a cached value.
    async fn increment_score(&self, player_id: &Uuid, amount: u32) -> Result<u32, DomainError>;
}

/// Find a session or fail with NotFound.
pub async fn require_session(
    store: &dyn SessionStore,
    id: &SessionId,
) -> Result<Session, DomainError> {
    store
        .find_session(id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Session, format!("session {id}")))
}

/// Find a round or fail with NotFound.
pub async fn require_round(
    store: &dyn SessionStore,
    session: &SessionId,
    round_number: u32,
) -> Result<Round, DomainError> {
    store.find_round(session, round_number).await?.ok_or_else(|| {
        DomainError::not_found(
            NotFoundKind::Round,
            format!("round {round_number} of session {session}"),
        )
    })
}
