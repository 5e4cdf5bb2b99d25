mod common;

use std::time::Duration;

use engine::domain::{Choice, RevealMode, SessionSettings, Vote};
use engine::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use engine::services::{player::PlayerAgent, sessions};
use engine::HostCommand;
use uuid::Uuid;

const WAIT: Duration = Duration::from_secs(5);

fn settings(round_count: u32) -> SessionSettings {
    SessionSettings {
        round_count,
        time_limit_seconds: 60,
        reveal_mode: RevealMode::Instant,
    }
}

#[tokio::test]
async fn joining_an_unknown_code_is_not_found() {
    let (ctx, _tmp) = common::memory_context();
    let err = match PlayerAgent::join(ctx, "ZZZZ", "nobody", None).await {
        Ok(_) => panic!("joined a session that does not exist"),
        Err(e) => e,
    };
    assert!(matches!(
        err,
        DomainError::NotFound(NotFoundKind::Session, _)
    ));
}

/// A session that advertises an active round must actually have it;
/// joining such a corrupted session is a hard error, not a silent
/// "no round yet" state.
#[tokio::test]
async fn joining_a_session_with_a_missing_active_round_fails() -> Result<(), DomainError> {
    let (ctx, _tmp) = common::memory_context();
    let session = sessions::create_session(&ctx, settings(1)).await?;

    // Point the session at a round that was never generated.
    ctx.store().update_current_round(&session.id, 3).await?;

    let err = match PlayerAgent::join(ctx, session.id.as_str(), "unlucky", None).await {
        Ok(_) => panic!("joined a session pointing at a missing round"),
        Err(e) => e,
    };
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Round, _)));
    Ok(())
}

#[tokio::test]
async fn voting_before_the_game_starts_is_rejected() -> Result<(), DomainError> {
    let (ctx, _tmp) = common::memory_context();
    let session = sessions::create_session(&ctx, settings(1)).await?;
    let mut agent = PlayerAgent::join(ctx, session.id.as_str(), "eager", None).await?;

    let err = agent.submit_vote(Choice::A).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
    assert!(!agent.has_voted());
    Ok(())
}

/// The vote action is single-shot per round and re-enables when the
/// round changes.
#[tokio::test]
async fn vote_is_single_shot_until_the_round_changes() -> Result<(), DomainError> {
    let (ctx, _tmp) = common::memory_context();
    let session = sessions::create_session(&ctx, settings(2)).await?;
    let mut agent = PlayerAgent::join(ctx.clone(), session.id.as_str(), "solo", None).await?;

    let mut host = common::spawn_host(&ctx, &session.id).await;
    host.send(HostCommand::Start).await;

    let round = common::wait_round_change(&mut agent, WAIT).await;
    assert_eq!(round.round_number, 1);

    agent.submit_vote(Choice::A).await?;
    assert!(agent.has_voted());
    let err = agent.submit_vote(Choice::B).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    // Sole player, so the vote was also the quorum; wait for the
    // reveal, then advance.
    host.update_matching(WAIT, |u| matches!(u, engine::HostUpdate::Revealed { .. }))
        .await;
    host.send(HostCommand::NextRound).await;
    let round = common::wait_round_change(&mut agent, WAIT).await;
    assert_eq!(round.round_number, 2);
    assert!(!agent.has_voted(), "round change re-enables voting");
    agent.submit_vote(Choice::B).await?;

    host.send(HostCommand::Shutdown).await;
    host.task.await.expect("join host task")?;
    Ok(())
}

/// A duplicate detected by the store (not just the local flag) also
/// spends the action.
#[tokio::test]
async fn store_level_duplicate_spends_the_vote() -> Result<(), DomainError> {
    let (ctx, _tmp) = common::memory_context();
    let session = sessions::create_session(&ctx, settings(1)).await?;
    let mut agent = PlayerAgent::join(ctx.clone(), session.id.as_str(), "solo", None).await?;

    let mut host = common::spawn_host(&ctx, &session.id).await;
    host.send(HostCommand::Start).await;
    let round = common::wait_round_change(&mut agent, WAIT).await;

    // Another path already recorded a vote for this player and round.
    ctx.store()
        .insert_vote(Vote {
            id: Uuid::new_v4(),
            session_id: session.id.clone(),
            round_id: round.id,
            player_id: agent.player().id,
            choice: Choice::A,
        })
        .await?;

    let err = agent.submit_vote(Choice::B).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::DuplicateVote, _)
    ));
    assert!(agent.has_voted(), "duplicate conflict spends the action");

    host.send(HostCommand::Shutdown).await;
    host.task.await.expect("join host task")?;
    Ok(())
}
