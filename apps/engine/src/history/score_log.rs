//! Best-effort local score history, appended at the end of a game.
//!
//! Not authoritative: the storage collaborator keeps the real scores.
//! One record per session; re-finishing the same session is a no-op.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::domain::{Player, SessionId};
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub date: String,
    pub session: SessionId,
    pub scores: Vec<Player>,
}

#[derive(Debug, Clone)]
pub struct ScoreHistoryStore {
    path: PathBuf,
}

impl ScoreHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append a final leaderboard, skipping sessions already recorded.
    pub fn append(&self, session: &SessionId, scores: Vec<Player>) -> Result<(), AppError> {
        let mut records = self.load();
        if records.iter().any(|r| &r.session == session) {
            return Ok(());
        }

        records.push(GameRecord {
            date: OffsetDateTime::now_utc()
                .format(&Rfc3339)
                .unwrap_or_default(),
            session: session.clone(),
            scores,
        });

        let json = serde_json::to_string_pretty(&records)
            .map_err(|e| AppError::config(format!("serialize score history: {e}")))?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    pub fn load(&self) -> Vec<GameRecord> {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use uuid::Uuid;

    fn player(session: &SessionId, name: &str, score: u32) -> Player {
        Player {
            id: Uuid::new_v4(),
            session_id: session.clone(),
            name: name.to_string(),
            emoji: "🦊".to_string(),
            score,
        }
    }

    #[test]
    fn appends_once_per_session() {
        let dir = tempdir().unwrap();
        let store = ScoreHistoryStore::new(dir.path().join("history.json"));
        let session = SessionId::new("WXYZ");

        store
            .append(&session, vec![player(&session, "ana", 200)])
            .unwrap();
        store
            .append(&session, vec![player(&session, "ana", 300)])
            .unwrap();

        let records = store.load();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].scores[0].score, 200);
    }
}
