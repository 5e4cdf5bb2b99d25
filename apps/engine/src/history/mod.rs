//! Client-local records: the anti-repeat set and the score history.
//!
//! Both are best-effort JSON files. Neither is authoritative game
//! state; failures bias content selection or lose a convenience record,
//! never a running session.

pub mod anti_repeat;
pub mod score_log;

pub use anti_repeat::AntiRepeatStore;
pub use score_log::{GameRecord, ScoreHistoryStore};

use time::macros::format_description;
use time::OffsetDateTime;

/// Today's calendar date as `YYYY-MM-DD` (UTC).
pub(crate) fn today() -> String {
    let fmt = format_description!("[year]-[month]-[day]");
    OffsetDateTime::now_utc()
        .date()
        .format(&fmt)
        .unwrap_or_default()
}
