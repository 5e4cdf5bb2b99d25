//! Anti-repeat record: content shown today, keyed by calendar date.
//!
//! Used only to bias selection toward fresh content, never to prevent
//! selection outright. The set resets when the date changes.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;
use crate::history::today;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct AntiRepeatRecord {
    date: String,
    items: BTreeSet<String>,
}

/// File-backed {date, set-of-shown-item-names} record.
#[derive(Debug, Clone)]
pub struct AntiRepeatStore {
    path: PathBuf,
}

impl AntiRepeatStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Item names already shown today. Empty on a missing/corrupt file
    /// or a stale date; reading never fails the caller.
    pub fn shown_today(&self) -> BTreeSet<String> {
        let record = self.load();
        if record.date == today() {
            record.items
        } else {
            BTreeSet::new()
        }
    }

    /// Add item names to today's set, resetting the record first when
    /// the stored date is stale.
    pub fn record<I>(&self, items: I) -> Result<(), AppError>
    where
        I: IntoIterator<Item = String>,
    {
        let date = today();
        let mut record = self.load();
        if record.date != date {
            record = AntiRepeatRecord {
                date,
                items: BTreeSet::new(),
            };
        }
        record.items.extend(items);

        let json = serde_json::to_string_pretty(&record)
            .map_err(|e| AppError::config(format!("serialize anti-repeat record: {e}")))?;
        fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), items = record.items.len(), "Updated anti-repeat record");
        Ok(())
    }

    fn load(&self) -> AntiRepeatRecord {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default()
    }
}
