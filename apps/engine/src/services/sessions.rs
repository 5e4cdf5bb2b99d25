//! Session creation and joining.

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::avatars::random_emoji;
use crate::domain::session_code::generate_code;
use crate::domain::{Player, Session, SessionId, SessionSettings, SessionStatus};
use crate::errors::domain::{ConflictKind, DomainError};
use crate::infra::state::GameContext;
use crate::store;

/// Matches what fits on the join screen.
pub const MAX_NAME_LEN: usize = 12;

/// Create a session in the lobby state with a fresh join code.
///
/// Code uniqueness is probabilistic: on the unlikely collision the
/// insert fails with a Conflict and we try a new code, a bounded
/// number of times.
pub async fn create_session(
    ctx: &GameContext,
    settings: SessionSettings,
) -> Result<Session, DomainError> {
    if settings.round_count == 0 {
        return Err(DomainError::validation("round count must be positive"));
    }
    if settings.time_limit_seconds == 0 {
        return Err(DomainError::validation("time limit must be positive"));
    }

    let attempts = ctx.config().code_attempts.max(1);
    let mut last_err = None;
    for _ in 0..attempts {
        let code = generate_code(&mut rand::rng());
        let session = Session {
            id: SessionId::new(code),
            status: SessionStatus::Waiting,
            settings: settings.clone(),
            current_round: 0,
        };
        match ctx.store().create_session(session).await {
            Ok(created) => {
                info!(session = %created.id, rounds = settings.round_count, "Session created");
                return Ok(created);
            }
            Err(e @ DomainError::Conflict(ConflictKind::JoinCode, _)) => {
                warn!("Join code collision, generating a new code");
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        DomainError::conflict(ConflictKind::JoinCode, "could not allocate a join code")
    }))
}

/// Join a session by code. NotFound means a bad code, not a crash.
pub async fn join_session(
    ctx: &GameContext,
    code: &str,
    name: &str,
    emoji: Option<String>,
) -> Result<Player, DomainError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("player name must not be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation(format!(
            "player name longer than {MAX_NAME_LEN} characters"
        )));
    }

    let session_id = SessionId::new(code);
    store::require_session(ctx.store().as_ref(), &session_id).await?;

    let emoji = emoji.unwrap_or_else(|| random_emoji(&mut rand::rng()));
    let player = Player {
        id: Uuid::new_v4(),
        session_id: session_id.clone(),
        name: name.to_string(),
        emoji,
        score: 0,
    };
    let player = ctx.store().insert_player(player).await?;
    info!(session = %session_id, player = %player.name, "Player joined");
    Ok(player)
}
