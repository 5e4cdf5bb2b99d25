//! Reveal: close voting, score correct votes, push the leaderboard.

use tracing::{info, warn};

use super::{HostGame, HostUpdate, RoundPhase};
use crate::domain::reveal::{correct_choice, tally_correct};
use crate::domain::RevealMode;
use crate::store::PlayerOrder;

impl HostGame {
    /// Execute the reveal for the active round, at most once.
    ///
    /// `trigger` is "quorum", "timeout", or "manual" — whichever fired
    /// first wins; the rest hit the phase guard and return.
    pub(super) async fn reveal(&mut self, trigger: &'static str) {
        // One-shot guard: check-and-set before any scoring I/O. Both
        // trigger paths run on this event loop, so flipping the phase
        // here is sufficient to serialize them.
        if self.phase != RoundPhase::Collecting {
            return;
        }
        self.phase = RoundPhase::Revealed {
            scores_shown: false,
        };
        // Abandon the countdown; the other trigger path is now inert.
        self.deadline = None;

        let Some(round) = self.current.clone() else {
            warn!(session = %self.session.id, "Reveal with no active round");
            return;
        };

        let correct = correct_choice(&round.id);
        info!(
            session = %self.session.id,
            round = round.round_number,
            trigger,
            correct = %correct,
            "Round revealed"
        );

        // Failures from here on are logged, not fatal: affected votes
        // stay unscored for this attempt and the loop keeps running.
        match self
            .ctx
            .store()
            .list_votes(&self.session.id, &round.id)
            .await
        {
            Ok(votes) => {
                let points = self.ctx.config().points_per_correct;
                for player_id in tally_correct(&round.id, &votes) {
                    if let Err(e) = self.ledger.increment(&player_id, points).await {
                        warn!(
                            session = %self.session.id,
                            player = %player_id,
                            error = %e,
                            "Score increment failed, vote left unscored"
                        );
                    }
                }
            }
            Err(e) => {
                warn!(session = %self.session.id, error = %e, "Could not fetch votes for reveal");
            }
        }

        let leaderboard = match self
            .ctx
            .store()
            .list_players(&self.session.id, PlayerOrder::ScoreDesc)
            .await
        {
            Ok(players) => players,
            Err(e) => {
                warn!(session = %self.session.id, error = %e, "Leaderboard refresh failed");
                let mut fallback = self.players.clone();
                fallback.sort_by(|a, b| b.score.cmp(&a.score));
                fallback
            }
        };

        let scores_visible = self.session.settings.reveal_mode == RevealMode::Instant;
        if scores_visible {
            self.phase = RoundPhase::Revealed { scores_shown: true };
        }
        self.emit(HostUpdate::Revealed {
            round_number: round.round_number,
            correct,
            scores_visible,
            leaderboard,
        })
        .await;
    }

    /// Show the deferred score dialog (AfterRoundManual mode).
    pub(super) async fn show_scores(&mut self) {
        if self.phase != (RoundPhase::Revealed { scores_shown: false }) {
            return;
        }
        self.phase = RoundPhase::Revealed { scores_shown: true };

        let leaderboard = match self
            .ctx
            .store()
            .list_players(&self.session.id, PlayerOrder::ScoreDesc)
            .await
        {
            Ok(players) => players,
            Err(e) => {
                warn!(session = %self.session.id, error = %e, "Leaderboard read failed");
                let mut fallback = self.players.clone();
                fallback.sort_by(|a, b| b.score.cmp(&a.score));
                fallback
            }
        };
        self.emit(HostUpdate::ScoresShown(leaderboard)).await;
    }
}
