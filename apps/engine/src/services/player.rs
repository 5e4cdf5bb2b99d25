//! Player agent: mirrors session state and casts one vote per round.
//!
//! The agent never computes or displays the correct answer; it only
//! tracks which round is active and whether its vote is in. Results
//! reach the player when the host's reveal shows up on the shared
//! display.

use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{Choice, Player, Round, Session, SessionStatus, Vote};
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind};
use crate::feed::{ChangeEvent, EventKind, FeedSubscription, Table};
use crate::infra::state::GameContext;
use crate::services::sessions;
use crate::store;

/// A meaningful change in the mirrored view.
#[derive(Debug, Clone)]
pub enum AgentChange {
    RoundChanged(Round),
    StatusChanged(SessionStatus),
}

pub struct PlayerAgent {
    ctx: GameContext,
    player: Player,
    session: Session,
    current_round: Option<Round>,
    voted: bool,
    events: FeedSubscription,
}

impl PlayerAgent {
    /// Join a session and start mirroring it: one initial direct read,
    /// then session-update feed events.
    pub async fn join(
        ctx: GameContext,
        code: &str,
        name: &str,
        emoji: Option<String>,
    ) -> Result<Self, DomainError> {
        let player = sessions::join_session(&ctx, code, name, emoji).await?;
        let session_id = player.session_id.clone();

        // Subscribe before the initial read so no update can fall
        // between them unseen.
        let events = ctx
            .feed()
            .subscribe(Table::Sessions, EventKind::Update, &session_id)
            .await?;
        let session = store::require_session(ctx.store().as_ref(), &session_id).await?;
        // A session that claims an active round must have that round;
        // its absence here is corruption, not end-of-game.
        let current_round = if session.current_round > 0 {
            Some(
                store::require_round(ctx.store().as_ref(), &session_id, session.current_round)
                    .await?,
            )
        } else {
            None
        };

        Ok(Self {
            ctx,
            player,
            session,
            current_round,
            voted: false,
            events,
        })
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn round(&self) -> Option<&Round> {
        self.current_round.as_ref()
    }

    pub fn has_voted(&self) -> bool {
        self.voted
    }

    /// Wait for the next meaningful mirrored change. A round change
    /// re-enables voting.
    pub async fn next_change(&mut self) -> Result<AgentChange, DomainError> {
        loop {
            let Some(event) = self.events.next().await else {
                return Err(DomainError::infra(
                    InfraErrorKind::FeedClosed,
                    "session feed ended",
                ));
            };
            let ChangeEvent::SessionUpdated(updated) = event else {
                continue;
            };

            let round_changed = updated.current_round != self.session.current_round;
            let status_changed = updated.status != self.session.status;
            self.session = updated;

            if round_changed && self.session.current_round > 0 {
                self.voted = false;
                self.current_round = None;
                let round = self
                    .ctx
                    .store()
                    .find_round(&self.session.id, self.session.current_round)
                    .await?;
                if let Some(round) = round {
                    debug!(
                        session = %self.session.id,
                        round = round.round_number,
                        "Mirrored round change"
                    );
                    self.current_round = Some(round.clone());
                    return Ok(AgentChange::RoundChanged(round));
                }
                continue;
            }

            if status_changed {
                return Ok(AgentChange::StatusChanged(self.session.status));
            }
        }
    }

    /// Cast this round's vote. Enabled exactly once per round: after
    /// the first success (or a duplicate conflict from the store) it is
    /// disabled until the round number changes. A transient failure
    /// leaves it enabled for a retry.
    pub async fn submit_vote(&mut self, choice: Choice) -> Result<Vote, DomainError> {
        if self.voted {
            return Err(DomainError::validation("already voted in this round"));
        }
        let Some(round) = &self.current_round else {
            return Err(DomainError::validation("no active round to vote in"));
        };

        let vote = Vote {
            id: Uuid::new_v4(),
            session_id: self.session.id.clone(),
            round_id: round.id,
            player_id: self.player.id,
            choice,
        };
        match self.ctx.store().insert_vote(vote).await {
            Ok(vote) => {
                self.voted = true;
                info!(
                    session = %self.session.id,
                    round = round.round_number,
                    player = %self.player.name,
                    choice = %choice,
                    "Vote cast"
                );
                Ok(vote)
            }
            Err(e @ DomainError::Conflict(ConflictKind::DuplicateVote, _)) => {
                // The store already has our vote (e.g. a retried insert
                // landed twice); treat the action as spent.
                self.voted = true;
                Err(e)
            }
            Err(e) => {
                if e.is_transient() {
                    debug!(
                        session = %self.session.id,
                        player = %self.player.name,
                        "Vote hit a transient fault, action left enabled for a retry"
                    );
                }
                Err(e)
            }
        }
    }
}
