mod common;

use engine::domain::{is_valid_code, RevealMode, SessionSettings, SessionStatus};
use engine::errors::domain::DomainError;
use engine::services::sessions;

fn settings() -> SessionSettings {
    SessionSettings {
        round_count: 3,
        time_limit_seconds: 15,
        reveal_mode: RevealMode::Instant,
    }
}

#[tokio::test]
async fn created_sessions_start_in_the_lobby_with_a_valid_code() -> Result<(), DomainError> {
    let (ctx, _tmp) = common::memory_context();
    let session = sessions::create_session(&ctx, settings()).await?;

    assert!(is_valid_code(session.id.as_str()), "{}", session.id);
    assert_eq!(session.status, SessionStatus::Waiting);
    assert_eq!(session.current_round, 0);
    Ok(())
}

#[tokio::test]
async fn degenerate_settings_are_rejected() {
    let (ctx, _tmp) = common::memory_context();

    let no_rounds = SessionSettings {
        round_count: 0,
        ..settings()
    };
    let err = sessions::create_session(&ctx, no_rounds).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let no_time = SessionSettings {
        time_limit_seconds: 0,
        ..settings()
    };
    let err = sessions::create_session(&ctx, no_time).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn join_validates_and_normalizes_the_player_name() -> Result<(), DomainError> {
    let (ctx, _tmp) = common::memory_context();
    let session = sessions::create_session(&ctx, settings()).await?;
    let code = session.id.as_str();

    let err = sessions::join_session(&ctx, code, "   ", None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = sessions::join_session(&ctx, code, "thirteen-char", None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    // Twelve characters after trimming is fine, and the join code is
    // case-insensitive.
    let player = sessions::join_session(
        &ctx,
        &code.to_lowercase(),
        "  twelve-chars ",
        Some("🦊".to_string()),
    )
    .await?;
    assert_eq!(player.name, "twelve-chars");
    assert_eq!(player.emoji, "🦊");
    assert_eq!(player.session_id, session.id);

    // An omitted emoji gets one assigned.
    let other = sessions::join_session(&ctx, code, "plain", None).await?;
    assert!(!other.emoji.is_empty());
    Ok(())
}
