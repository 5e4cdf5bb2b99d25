//! Host orchestrator: the authoritative round-lifecycle state machine.
//!
//! One `HostGame` runs per session as a single-threaded async event
//! loop driven by three sources: host commands, change-feed events
//! (votes and joins), and the round deadline timer. All coordination
//! with players happens through the store and the feed; the loop never
//! shares memory with other roles.

mod lifecycle;
mod reveal;

use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{Choice, Player, Round, Session, SessionId};
use crate::errors::domain::DomainError;
use crate::feed::{ChangeEvent, EventKind, Table};
use crate::generator::RoundGenerator;
use crate::infra::state::GameContext;
use crate::scores::ScoreLedger;
use crate::store::{self, PlayerOrder};

/// User-triggered actions on the host display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    /// Leave the lobby: mark the session playing, generate rounds
    /// (guarded, exactly once), load round 1.
    Start,
    /// Advance to the next round after a reveal.
    NextRound,
    /// Close voting now (the manual trigger in AfterRoundManual mode).
    FinishRound,
    /// Show the deferred score dialog in AfterRoundManual mode.
    ShowScores,
    Shutdown,
}

/// State pushes for whatever is rendering the host view.
#[derive(Debug, Clone)]
pub enum HostUpdate {
    RoundLoaded(Round),
    PlayersChanged(Vec<Player>),
    VotesChanged {
        cast: usize,
        known_players: usize,
    },
    Revealed {
        round_number: u32,
        correct: Choice,
        scores_visible: bool,
        leaderboard: Vec<Player>,
    },
    ScoresShown(Vec<Player>),
    Finished(Vec<Player>),
    /// A round failed to load on a transient fault; the host may retry
    /// the same advance. The round counter has not moved.
    RoundLoadFailed {
        round_number: u32,
        detail: String,
    },
}

/// Per-round progress. `Revealed` is the one-shot reveal guard: the
/// transition out of `Collecting` is checked-and-set by the event loop
/// before any scoring I/O, which resolves the race between the quorum
/// and timeout triggers firing in the same tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoundPhase {
    Idle,
    Collecting,
    Revealed { scores_shown: bool },
}

pub struct HostGame {
    ctx: GameContext,
    generator: RoundGenerator,
    ledger: ScoreLedger,
    session: Session,
    players: Vec<Player>,
    /// Votes for the active round, deduped by player (feed delivery is
    /// at-least-once).
    votes: HashMap<Uuid, Choice>,
    current: Option<Round>,
    /// Opportunistically pre-fetched round N+1.
    prefetched: Option<Round>,
    phase: RoundPhase,
    /// Active round deadline; None while no timer is armed. At most
    /// one deadline exists at a time, and loading the next round
    /// replaces it wholesale.
    deadline: Option<Instant>,
    updates: mpsc::Sender<HostUpdate>,
}

impl HostGame {
    /// Mirror the session and its current players, ready to run.
    pub async fn new(
        ctx: GameContext,
        session_id: SessionId,
        updates: mpsc::Sender<HostUpdate>,
    ) -> Result<Self, DomainError> {
        let session = store::require_session(ctx.store().as_ref(), &session_id).await?;
        let players = ctx
            .store()
            .list_players(&session_id, PlayerOrder::Joined)
            .await?;
        Ok(Self {
            generator: ctx.generator(),
            ledger: ctx.ledger(),
            ctx,
            session,
            players,
            votes: HashMap::new(),
            current: None,
            prefetched: None,
            phase: RoundPhase::Idle,
            deadline: None,
            updates,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Drive the session to completion (or shutdown).
    pub async fn run(mut self, mut commands: mpsc::Receiver<HostCommand>) -> Result<(), DomainError> {
        let mut vote_events = self
            .ctx
            .feed()
            .subscribe(Table::Votes, EventKind::Insert, &self.session.id)
            .await?;
        let mut player_events = self
            .ctx
            .feed()
            .subscribe(Table::Players, EventKind::Insert, &self.session.id)
            .await?;

        loop {
            let deadline = self.deadline;
            tokio::select! {
                cmd = commands.recv() => match cmd {
                    None | Some(HostCommand::Shutdown) => break,
                    Some(cmd) => self.handle_command(cmd).await,
                },
                Some(event) = vote_events.next() => self.on_vote_event(event).await,
                Some(event) = player_events.next() => self.on_player_event(event).await,
                _ = wait_for(deadline), if deadline.is_some() => self.on_deadline().await,
            }

            if self.is_finished() {
                break;
            }
        }
        Ok(())
    }

    async fn handle_command(&mut self, cmd: HostCommand) {
        match cmd {
            HostCommand::Start => self.start().await,
            HostCommand::NextRound => self.advance().await,
            HostCommand::FinishRound => self.reveal("manual").await,
            HostCommand::ShowScores => self.show_scores().await,
            HostCommand::Shutdown => unreachable!("handled by the loop"),
        }
    }

    async fn on_vote_event(&mut self, event: ChangeEvent) {
        let ChangeEvent::VoteCast(vote) = event else {
            return;
        };
        if self.phase != RoundPhase::Collecting {
            return;
        }
        let Some(round) = &self.current else { return };
        if vote.round_id != round.id {
            debug!(session = %self.session.id, "Ignoring vote for a different round");
            return;
        }

        self.votes.insert(vote.player_id, vote.choice);
        self.emit(HostUpdate::VotesChanged {
            cast: self.votes.len(),
            known_players: self.players.len(),
        })
        .await;

        // Quorum: every currently known player has voted.
        if !self.players.is_empty() && self.votes.len() >= self.players.len() {
            self.reveal("quorum").await;
        }
    }

    async fn on_player_event(&mut self, event: ChangeEvent) {
        let ChangeEvent::PlayerJoined(player) = event else {
            return;
        };
        if self.players.iter().any(|p| p.id == player.id) {
            return;
        }
        debug!(session = %self.session.id, player = %player.name, "Player joined");
        self.players.push(player);
        self.emit(HostUpdate::PlayersChanged(self.players.clone())).await;
    }

    async fn on_deadline(&mut self) {
        self.deadline = None;
        self.reveal("timeout").await;
    }

    fn is_finished(&self) -> bool {
        self.session.status == crate::domain::SessionStatus::Finished
    }

    async fn emit(&self, update: HostUpdate) {
        // A gone display must not stall the authoritative loop.
        if self.updates.send(update).await.is_err() {
            warn!(session = %self.session.id, "Host update receiver dropped");
        }
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => futures::future::pending().await,
    }
}
