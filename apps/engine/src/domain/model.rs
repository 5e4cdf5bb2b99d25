//! Core records: sessions, rounds, players, votes.
//!
//! These are plain data carriers; all lifecycle rules live in the
//! services layer. Ownership of mutation is strict: only the host
//! orchestrator touches `Session::status` / `Session::current_round`,
//! rounds are write-once, and a player's score moves only through the
//! score ledger's atomic increment.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Short human-typable join code identifying one session.
///
/// Always stored uppercase. Uniqueness is not verified beyond the
/// storage insert failing on collision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Session lifecycle status. Transitions are owned by the host
/// orchestrator: Waiting -> Playing -> Finished, no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Waiting,
    Playing,
    Finished,
}

/// When round results become visible on the host display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealMode {
    /// Scores show the moment voting closes.
    Instant,
    /// Voting still closes on quorum/timeout, but the score display
    /// waits for an explicit host action.
    AfterRoundManual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    pub round_count: u32,
    pub time_limit_seconds: u32,
    pub reveal_mode: RevealMode,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            round_count: 5,
            time_limit_seconds: 15,
            reveal_mode: RevealMode::Instant,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub status: SessionStatus,
    pub settings: SessionSettings,
    /// 1-based active round; 0 means the game has not started.
    pub current_round: u32,
}

/// Legacy advisory marker for which image a round considered correct.
///
/// Persisted for compatibility with older rows but never trusted: the
/// authoritative answer is derived from the round id (see
/// [`crate::domain::reveal`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectHint {
    Real,
    Ai,
}

/// One voting unit: two images, one real, one AI-generated.
///
/// Write-once by the round generator, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub id: Uuid,
    pub session_id: SessionId,
    /// 1-based, unique per session.
    pub round_number: u32,
    pub real_url: String,
    pub ai_url: String,
    pub correct_hint: Option<CorrectHint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: Uuid,
    pub session_id: SessionId,
    pub name: String,
    pub emoji: String,
    /// Non-negative and monotonically non-decreasing within a session.
    pub score: u32,
}

/// The displayed slot a player picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Choice {
    A,
    B,
}

impl std::fmt::Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Choice::A => f.write_str("A"),
            Choice::B => f.write_str("B"),
        }
    }
}

/// One player's vote in one round. Immutable once cast; at most one per
/// (round, player), enforced by the submission path and re-checked by
/// the storage adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub id: Uuid,
    pub session_id: SessionId,
    pub round_id: Uuid,
    pub player_id: Uuid,
    pub choice: Choice,
}
