//! Change-notification collaborator contract.
//!
//! Consumers subscribe per (table, event kind, session) and receive an
//! ordered stream of change events through a bounded queue. Delivery is
//! at-least-once and ordered per table; cross-table ordering is not
//! guaranteed. Dropping the subscription unsubscribes.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::{Player, Session, SessionId, Vote};
use crate::errors::domain::DomainError;

/// Bounded per-subscriber queue depth.
pub const FEED_QUEUE_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Sessions,
    Players,
    Votes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Insert,
    Update,
}

/// A change to one record, fanned out to all subscribers.
#[derive(Debug, Clone)]
pub enum ChangeEvent {
    SessionUpdated(Session),
    PlayerJoined(Player),
    PlayerUpdated(Player),
    VoteCast(Vote),
}

impl ChangeEvent {
    pub fn table(&self) -> Table {
        match self {
            ChangeEvent::SessionUpdated(_) => Table::Sessions,
            ChangeEvent::PlayerJoined(_) | ChangeEvent::PlayerUpdated(_) => Table::Players,
            ChangeEvent::VoteCast(_) => Table::Votes,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            ChangeEvent::SessionUpdated(_) | ChangeEvent::PlayerUpdated(_) => EventKind::Update,
            ChangeEvent::PlayerJoined(_) | ChangeEvent::VoteCast(_) => EventKind::Insert,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        match self {
            ChangeEvent::SessionUpdated(s) => &s.id,
            ChangeEvent::PlayerJoined(p) | ChangeEvent::PlayerUpdated(p) => &p.session_id,
            ChangeEvent::VoteCast(v) => &v.session_id,
        }
    }
}

/// Handle to one live subscription. Dropping it tears the
/// subscription down on the feed side.
pub struct FeedSubscription {
    rx: mpsc::Receiver<ChangeEvent>,
}

impl FeedSubscription {
    pub fn from_receiver(rx: mpsc::Receiver<ChangeEvent>) -> Self {
        Self { rx }
    }

    /// Next matching event; `None` once the feed side has shut down.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        self.rx.recv().await
    }
}

#[async_trait]
pub trait ChangeFeed: Send + Sync {
    async fn subscribe(
        &self,
        table: Table,
        kind: EventKind,
        session: &SessionId,
    ) -> Result<FeedSubscription, DomainError>;
}
