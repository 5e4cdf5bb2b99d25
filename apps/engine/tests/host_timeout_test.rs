mod common;

use std::time::Duration;

use engine::domain::{correct_choice, RevealMode, SessionSettings};
use engine::services::{player::PlayerAgent, sessions};
use engine::{DomainError, HostCommand, HostUpdate};

// Generous: with the clock paused this never actually elapses, it only
// bounds a hang. The round deadline is always the earliest timer.
const WAIT: Duration = Duration::from_secs(300);

/// Rounds close on the countdown when quorum never arrives: one of two
/// players never votes, so every round reveals via timeout, the voter's
/// correct votes still score, and the game completes.
#[tokio::test(start_paused = true)]
async fn deadline_reveals_when_quorum_never_arrives() -> Result<(), DomainError> {
    let (ctx, _tmp) = common::memory_context();
    let settings = SessionSettings {
        round_count: 3,
        time_limit_seconds: 15,
        reveal_mode: RevealMode::Instant,
    };
    let session = sessions::create_session(&ctx, settings).await?;
    let mut sharp = PlayerAgent::join(ctx.clone(), session.id.as_str(), "sharp", None).await?;
    let mut ghost = PlayerAgent::join(ctx.clone(), session.id.as_str(), "ghost", None).await?;

    let mut host = common::spawn_host(&ctx, &session.id).await;
    host.send(HostCommand::Start).await;

    for expected_round in 1..=3u32 {
        let round = common::wait_round_change(&mut sharp, WAIT).await;
        assert_eq!(round.round_number, expected_round);
        common::wait_round_change(&mut ghost, WAIT).await;

        // Only one of two votes: quorum is never met, the deadline is
        // the only way out of this round.
        sharp.submit_vote(correct_choice(&round.id)).await?;

        let update = host
            .update_matching(WAIT, |u| matches!(u, HostUpdate::Revealed { .. }))
            .await;
        let HostUpdate::Revealed {
            round_number,
            leaderboard,
            ..
        } = update
        else {
            unreachable!()
        };
        assert_eq!(round_number, expected_round);
        assert_eq!(leaderboard[0].name, "sharp");
        assert_eq!(leaderboard[0].score, expected_round * 100);

        host.send(HostCommand::NextRound).await;
    }

    let update = host
        .update_matching(WAIT, |u| matches!(u, HostUpdate::Finished(_)))
        .await;
    let HostUpdate::Finished(board) = update else {
        unreachable!()
    };
    assert_eq!(board[0].score, 300);
    assert_eq!(board[1].name, "ghost");
    assert_eq!(board[1].score, 0);

    host.task.await.expect("join host task")?;
    Ok(())
}

/// A round with no votes at all still reveals on the deadline and the
/// game keeps moving.
#[tokio::test(start_paused = true)]
async fn empty_round_times_out_and_advances() -> Result<(), DomainError> {
    let (ctx, _tmp) = common::memory_context();
    let settings = SessionSettings {
        round_count: 2,
        time_limit_seconds: 10,
        reveal_mode: RevealMode::Instant,
    };
    let session = sessions::create_session(&ctx, settings).await?;
    let mut idle = PlayerAgent::join(ctx.clone(), session.id.as_str(), "idle", None).await?;

    let mut host = common::spawn_host(&ctx, &session.id).await;
    host.send(HostCommand::Start).await;
    common::wait_round_change(&mut idle, WAIT).await;

    let update = host
        .update_matching(WAIT, |u| matches!(u, HostUpdate::Revealed { .. }))
        .await;
    let HostUpdate::Revealed {
        round_number,
        leaderboard,
        ..
    } = update
    else {
        unreachable!()
    };
    assert_eq!(round_number, 1);
    assert_eq!(leaderboard[0].score, 0);

    host.send(HostCommand::NextRound).await;
    let round = common::wait_round_change(&mut idle, WAIT).await;
    assert_eq!(round.round_number, 2);

    host.send(HostCommand::Shutdown).await;
    host.task.await.expect("join host task")?;
    Ok(())
}
