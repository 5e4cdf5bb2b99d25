//! In-memory storage collaborator doubling as the change feed.
//!
//! Every successful write publishes a change event on an internal
//! broadcast channel; subscriptions are filtered bridges onto bounded
//! per-subscriber queues. Score increments happen under the map shard
//! lock, so they are atomic with respect to each other.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::{broadcast, mpsc};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use tracing::warn;
use uuid::Uuid;

use crate::domain::{Player, Round, Session, SessionId, SessionStatus, Vote};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::feed::{ChangeEvent, ChangeFeed, EventKind, FeedSubscription, Table, FEED_QUEUE_CAPACITY};
use crate::store::{PlayerOrder, SessionStore};

const BROADCAST_CAPACITY: usize = 256;

pub struct MemoryBackend {
    sessions: DashMap<SessionId, Session>,
    rounds: DashMap<SessionId, Vec<Round>>,
    players: DashMap<SessionId, Vec<Player>>,
    /// Player id -> owning session, for increment lookups.
    player_sessions: DashMap<Uuid, SessionId>,
    /// Round id -> votes cast in that round.
    votes: DashMap<Uuid, Vec<Vote>>,
    tx: broadcast::Sender<ChangeEvent>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            sessions: DashMap::new(),
            rounds: DashMap::new(),
            players: DashMap::new(),
            player_sessions: DashMap::new(),
            votes: DashMap::new(),
            tx,
        }
    }

    fn publish(&self, event: ChangeEvent) {
        // No subscribers is fine; the send result only reports that.
        let _ = self.tx.send(event);
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemoryBackend {
    async fn create_session(&self, session: Session) -> Result<Session, DomainError> {
        match self.sessions.entry(session.id.clone()) {
            Entry::Occupied(_) => Err(DomainError::conflict(
                ConflictKind::JoinCode,
                format!("session {} already exists", session.id),
            )),
            Entry::Vacant(slot) => {
                slot.insert(session.clone());
                Ok(session)
            }
        }
    }

    async fn find_session(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        Ok(self.sessions.get(id).map(|s| s.clone()))
    }

    async fn update_status(
        &self,
        id: &SessionId,
        status: SessionStatus,
    ) -> Result<Session, DomainError> {
        let updated = {
            let mut session = self.sessions.get_mut(id).ok_or_else(|| {
                DomainError::not_found(NotFoundKind::Session, format!("session {id}"))
            })?;
            session.status = status;
            session.clone()
        };
        self.publish(ChangeEvent::SessionUpdated(updated.clone()));
        Ok(updated)
    }

    async fn update_current_round(
        &self,
        id: &SessionId,
        round_number: u32,
    ) -> Result<Session, DomainError> {
        let updated = {
            let mut session = self.sessions.get_mut(id).ok_or_else(|| {
                DomainError::not_found(NotFoundKind::Session, format!("session {id}"))
            })?;
            session.current_round = round_number;
            session.clone()
        };
        self.publish(ChangeEvent::SessionUpdated(updated.clone()));
        Ok(updated)
    }

    async fn insert_rounds(&self, rounds: Vec<Round>) -> Result<(), DomainError> {
        let Some(first) = rounds.first() else {
            return Ok(());
        };
        let session_id = first.session_id.clone();
        if rounds.iter().any(|r| r.session_id != session_id) {
            return Err(DomainError::validation(
                "round batch spans multiple sessions",
            ));
        }

        let mut existing = self.rounds.entry(session_id.clone()).or_default();
        if !existing.is_empty() {
            return Err(DomainError::conflict(
                ConflictKind::RoundsExist,
                format!("rounds already exist for session {session_id}"),
            ));
        }
        existing.extend(rounds);
        Ok(())
    }

    async fn count_rounds(&self, session: &SessionId) -> Result<u64, DomainError> {
        Ok(self.rounds.get(session).map_or(0, |r| r.len() as u64))
    }

    async fn find_round(
        &self,
        session: &SessionId,
        round_number: u32,
    ) -> Result<Option<Round>, DomainError> {
        Ok(self.rounds.get(session).and_then(|rounds| {
            rounds
                .iter()
                .find(|r| r.round_number == round_number)
                .cloned()
        }))
    }

    async fn insert_player(&self, player: Player) -> Result<Player, DomainError> {
        self.players
            .entry(player.session_id.clone())
            .or_default()
            .push(player.clone());
        self.player_sessions
            .insert(player.id, player.session_id.clone());
        self.publish(ChangeEvent::PlayerJoined(player.clone()));
        Ok(player)
    }

    async fn list_players(
        &self,
        session: &SessionId,
        order: PlayerOrder,
    ) -> Result<Vec<Player>, DomainError> {
        let mut players = self
            .players
            .get(session)
            .map(|p| p.clone())
            .unwrap_or_default();
        if order == PlayerOrder::ScoreDesc {
            players.sort_by(|a, b| b.score.cmp(&a.score));
        }
        Ok(players)
    }

    async fn insert_vote(&self, vote: Vote) -> Result<Vote, DomainError> {
        {
            let mut round_votes = self.votes.entry(vote.round_id).or_default();
            if round_votes.iter().any(|v| v.player_id == vote.player_id) {
                return Err(DomainError::conflict(
                    ConflictKind::DuplicateVote,
                    format!(
                        "player {} already voted in round {}",
                        vote.player_id, vote.round_id
                    ),
                ));
            }
            round_votes.push(vote.clone());
        }
        self.publish(ChangeEvent::VoteCast(vote.clone()));
        Ok(vote)
    }

    async fn list_votes(
        &self,
        session: &SessionId,
        round_id: &Uuid,
    ) -> Result<Vec<Vote>, DomainError> {
        Ok(self
            .votes
            .get(round_id)
            .map(|votes| {
                votes
                    .iter()
                    .filter(|v| &v.session_id == session)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn increment_score(&self, player_id: &Uuid, amount: u32) -> Result<u32, DomainError> {
        let session_id = self
            .player_sessions
            .get(player_id)
            .map(|s| s.clone())
            .ok_or_else(|| {
                DomainError::not_found(NotFoundKind::Player, format!("player {player_id}"))
            })?;

        let updated = {
            let mut players = self.players.get_mut(&session_id).ok_or_else(|| {
                DomainError::not_found(NotFoundKind::Session, format!("session {session_id}"))
            })?;
            let player = players
                .iter_mut()
                .find(|p| &p.id == player_id)
                .ok_or_else(|| {
                    DomainError::not_found(NotFoundKind::Player, format!("player {player_id}"))
                })?;
            player.score = player.score.saturating_add(amount);
            player.clone()
        };

        self.publish(ChangeEvent::PlayerUpdated(updated.clone()));
        Ok(updated.score)
    }
}

#[async_trait]
impl ChangeFeed for MemoryBackend {
    async fn subscribe(
        &self,
        table: Table,
        kind: EventKind,
        session: &SessionId,
    ) -> Result<FeedSubscription, DomainError> {
        let (tx, rx) = mpsc::channel(FEED_QUEUE_CAPACITY);
        let mut stream = BroadcastStream::new(self.tx.subscribe());
        let session = session.clone();

        tokio::spawn(async move {
            while let Some(item) = stream.next().await {
                let event = match item {
                    Ok(event) => event,
                    Err(BroadcastStreamRecvError::Lagged(missed)) => {
                        warn!(missed, "Feed subscriber lagged, events dropped");
                        continue;
                    }
                };
                if event.table() == table
                    && event.kind() == kind
                    && event.session_id() == &session
                {
                    // Receiver dropped means the subscriber tore down.
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
            }
        });

        Ok(FeedSubscription::from_receiver(rx))
    }
}
