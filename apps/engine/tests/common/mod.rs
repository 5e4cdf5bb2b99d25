#![allow(dead_code)]

use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use engine::domain::{Round, SessionId};
use engine::services::player::{AgentChange, PlayerAgent};
use engine::{build_memory_context, DomainError, GameConfig, GameContext};
use engine::{HostCommand, HostGame, HostUpdate};

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    engine_test_support::test_logging::init();
}

/// Fully in-memory context whose file-backed records live in a private
/// temp dir. Keep the `TempDir` alive for the duration of the test.
pub fn memory_context() -> (GameContext, TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = GameConfig {
        anti_repeat_path: dir.path().join("shown.json"),
        score_history_path: dir.path().join("history.json"),
        ..GameConfig::default()
    };
    (build_memory_context(config), dir)
}

/// A running host loop plus its command and update channels.
pub struct HostHandle {
    pub commands: mpsc::Sender<HostCommand>,
    pub updates: mpsc::Receiver<HostUpdate>,
    pub task: JoinHandle<Result<(), DomainError>>,
}

pub async fn spawn_host(ctx: &GameContext, session_id: &SessionId) -> HostHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel(8);
    let (update_tx, update_rx) = mpsc::channel(64);
    let host = HostGame::new(ctx.clone(), session_id.clone(), update_tx)
        .await
        .expect("construct host");
    let task = tokio::spawn(host.run(cmd_rx));
    HostHandle {
        commands: cmd_tx,
        updates: update_rx,
        task,
    }
}

impl HostHandle {
    pub async fn send(&self, cmd: HostCommand) {
        self.commands.send(cmd).await.expect("host loop alive");
    }

    pub async fn next_update(&mut self, wait: Duration) -> HostUpdate {
        timeout(wait, self.updates.recv())
            .await
            .expect("timed out waiting for a host update")
            .expect("host update channel closed")
    }

    /// Skip updates until one matches the predicate.
    pub async fn update_matching(
        &mut self,
        wait: Duration,
        pred: impl Fn(&HostUpdate) -> bool,
    ) -> HostUpdate {
        let deadline = tokio::time::Instant::now() + wait;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            let update = self.next_update(remaining).await;
            if pred(&update) {
                return update;
            }
        }
    }
}

/// Drive the agent's mirror until the next round change.
pub async fn wait_round_change(agent: &mut PlayerAgent, wait: Duration) -> Round {
    timeout(wait, async {
        loop {
            match agent.next_change().await.expect("agent feed alive") {
                AgentChange::RoundChanged(round) => return round,
                AgentChange::StatusChanged(_) => {}
            }
        }
    })
    .await
    .expect("timed out waiting for a round change")
}
