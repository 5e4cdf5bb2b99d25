//! Session start, round loading, advancement, and finish.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::{HostGame, HostUpdate, RoundPhase};
use crate::domain::SessionStatus;
use crate::errors::domain::DomainError;
use crate::store::PlayerOrder;

impl HostGame {
    /// Leave the lobby and load round 1.
    pub(super) async fn start(&mut self) {
        if self.current.is_some() || self.is_finished() {
            warn!(session = %self.session.id, "Start ignored, game already running");
            return;
        }

        if let Err(e) = self.start_inner().await {
            warn!(session = %self.session.id, error = %e, "Failed to start game");
            self.emit(HostUpdate::RoundLoadFailed {
                round_number: 1,
                detail: e.to_string(),
            })
            .await;
        }
    }

    async fn start_inner(&mut self) -> Result<(), DomainError> {
        if self.session.status == SessionStatus::Waiting {
            self.session = self
                .ctx
                .store()
                .update_status(&self.session.id, SessionStatus::Playing)
                .await?;
        }
        info!(session = %self.session.id, "Game started");

        // Guarded internally: no-op when rounds exist, Conflict from a
        // concurrent generator treated as success.
        self.generator
            .generate(&self.session.id, self.session.settings.round_count)
            .await?;

        self.load_round(1).await
    }

    /// Advance to the next round after a reveal.
    pub(super) async fn advance(&mut self) {
        if !matches!(self.phase, RoundPhase::Revealed { .. }) {
            warn!(session = %self.session.id, "NextRound ignored, round not revealed yet");
            return;
        }
        let next = self.current.as_ref().map_or(1, |r| r.round_number + 1);
        if let Err(e) = self.load_round(next).await {
            warn!(session = %self.session.id, round = next, error = %e, "Failed to load round");
            self.emit(HostUpdate::RoundLoadFailed {
                round_number: next,
                detail: e.to_string(),
            })
            .await;
        }
    }

    /// Load round N, or finish the game when it does not exist.
    ///
    /// On a transient failure nothing is committed: the counter has not
    /// advanced and the same load may be retried.
    pub(super) async fn load_round(&mut self, round_number: u32) -> Result<(), DomainError> {
        let round = match self
            .prefetched
            .as_ref()
            .filter(|r| r.round_number == round_number)
        {
            Some(cached) => Some(cached.clone()),
            None => {
                self.ctx
                    .store()
                    .find_round(&self.session.id, round_number)
                    .await?
            }
        };

        let Some(round) = round else {
            // No next round: the game is over.
            return self.finish().await;
        };

        // Persist before committing local state so a failure leaves the
        // machine exactly where it was.
        self.session = self
            .ctx
            .store()
            .update_current_round(&self.session.id, round_number)
            .await?;

        self.votes.clear();
        self.phase = RoundPhase::Collecting;
        self.prefetched = None;
        self.deadline = Some(
            Instant::now() + Duration::from_secs(self.session.settings.time_limit_seconds.into()),
        );
        self.current = Some(round.clone());
        info!(
            session = %self.session.id,
            round = round_number,
            time_limit = self.session.settings.time_limit_seconds,
            "Round loaded"
        );
        self.emit(HostUpdate::RoundLoaded(round)).await;

        // Opportunistic pre-fetch of round N+1 so the next transition
        // has zero fetch latency. Failures are ignored.
        match self
            .ctx
            .store()
            .find_round(&self.session.id, round_number + 1)
            .await
        {
            Ok(next) => self.prefetched = next,
            Err(e) => debug!(session = %self.session.id, error = %e, "Pre-fetch failed"),
        }

        Ok(())
    }

    /// Persist the terminal state and push the final leaderboard.
    pub(super) async fn finish(&mut self) -> Result<(), DomainError> {
        if self.is_finished() {
            return Ok(());
        }

        self.session = self
            .ctx
            .store()
            .update_status(&self.session.id, SessionStatus::Finished)
            .await?;
        self.deadline = None;
        self.phase = RoundPhase::Idle;

        let leaderboard = self
            .ctx
            .store()
            .list_players(&self.session.id, PlayerOrder::ScoreDesc)
            .await?;

        // Best-effort local record; never authoritative.
        if let Err(e) = self
            .ctx
            .score_history()
            .append(&self.session.id, leaderboard.clone())
        {
            warn!(session = %self.session.id, error = %e, "Failed to append score history");
        }

        info!(session = %self.session.id, players = leaderboard.len(), "Game finished");
        self.emit(HostUpdate::Finished(leaderboard)).await;
        Ok(())
    }
}
