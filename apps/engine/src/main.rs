//! Simulator binary: runs a full session in-process with a host loop
//! and a handful of scripted players, logging the flow to stdout.

mod telemetry;

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{info, warn};

use engine::domain::{Choice, RevealMode, SessionSettings, SessionStatus};
use engine::services::{player, sessions};
use engine::{build_memory_context, AppError, GameConfig, HostCommand, HostGame, HostUpdate};

const PLAYER_NAMES: [&str; 3] = ["ana", "bruno", "carla"];

#[tokio::main]
async fn main() -> Result<(), AppError> {
    telemetry::init_tracing();

    let ctx = build_memory_context(GameConfig::default());

    // Seed the content pool with a few pairs; payloads are irrelevant
    // to the flow.
    let pool = ctx.pool();
    for name in ["harbor.jpg", "forest.jpg", "market.jpg"] {
        pool.upload_pair(name, vec![0u8; 16], vec![0u8; 16]).await?;
    }

    let settings = SessionSettings {
        round_count: 3,
        time_limit_seconds: 5,
        reveal_mode: RevealMode::Instant,
    };
    let session = sessions::create_session(&ctx, settings).await?;
    info!(code = %session.id, "Lobby open");

    let mut agents = Vec::new();
    for name in PLAYER_NAMES {
        let agent = player::PlayerAgent::join(ctx.clone(), session.id.as_str(), name, None).await?;
        agents.push(agent);
    }

    let (cmd_tx, cmd_rx) = mpsc::channel(8);
    let (update_tx, mut update_rx) = mpsc::channel(64);
    let host = HostGame::new(ctx.clone(), session.id.clone(), update_tx).await?;
    let host_task = tokio::spawn(host.run(cmd_rx));

    for (i, mut agent) in agents.into_iter().enumerate() {
        tokio::spawn(async move {
            loop {
                match agent.next_change().await {
                    Ok(player::AgentChange::RoundChanged(round)) => {
                        // The last player sits out even rounds so the
                        // timeout path gets exercised too.
                        if i == PLAYER_NAMES.len() - 1 && round.round_number % 2 == 0 {
                            info!(player = %agent.player().name, round = round.round_number, "Sitting this one out");
                            continue;
                        }
                        tokio::time::sleep(Duration::from_millis(150 * (i as u64 + 1))).await;
                        let choice = if rand::random::<bool>() { Choice::A } else { Choice::B };
                        if let Err(e) = agent.submit_vote(choice).await {
                            warn!(player = %agent.player().name, error = %e, "Vote failed");
                        }
                    }
                    Ok(player::AgentChange::StatusChanged(SessionStatus::Finished)) => break,
                    Ok(player::AgentChange::StatusChanged(_)) => {}
                    Err(e) => {
                        warn!(player = %agent.player().name, error = %e, "Mirror lost");
                        break;
                    }
                }
            }
        });
    }

    cmd_tx
        .send(HostCommand::Start)
        .await
        .map_err(|_| AppError::config("host loop exited before start"))?;

    while let Some(update) = update_rx.recv().await {
        match update {
            HostUpdate::RoundLoaded(round) => {
                info!(round = round.round_number, "Round up");
            }
            HostUpdate::VotesChanged { cast, known_players } => {
                info!(cast, of = known_players, "Votes in");
            }
            HostUpdate::Revealed { round_number, correct, .. } => {
                info!(round = round_number, correct = %correct, "Revealed");
                tokio::time::sleep(Duration::from_millis(300)).await;
                cmd_tx.send(HostCommand::NextRound).await.ok();
            }
            HostUpdate::Finished(leaderboard) => {
                for (rank, p) in leaderboard.iter().enumerate() {
                    info!(rank = rank + 1, player = %p.name, score = p.score, "Final standing");
                }
                break;
            }
            HostUpdate::RoundLoadFailed { round_number, detail } => {
                warn!(round = round_number, detail = %detail, "Round load failed, retrying");
                cmd_tx.send(HostCommand::NextRound).await.ok();
            }
            _ => {}
        }
    }

    cmd_tx.send(HostCommand::Shutdown).await.ok();
    host_task
        .await
        .map_err(|e| AppError::config(format!("host task panicked: {e}")))??;
    Ok(())
}
