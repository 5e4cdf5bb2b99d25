//! Engine configuration.
//!
//! All knobs are explicit constructor state rather than ambient
//! globals, so tests can swap paths and values freely.

use std::path::PathBuf;

/// Tunables for one engine instance.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Points awarded per correct vote.
    pub points_per_correct: u32,
    /// Object-storage folder holding the real images.
    pub real_prefix: String,
    /// Object-storage folder holding the AI twins (same file names).
    pub ai_prefix: String,
    /// Base URL for synthetic placeholder images when the pool is empty.
    pub placeholder_base: String,
    /// Client-local anti-repeat record (images shown today).
    pub anti_repeat_path: PathBuf,
    /// Client-local best-effort score history.
    pub score_history_path: PathBuf,
    /// Attempts at generating a non-colliding join code.
    pub code_attempts: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        let tmp = std::env::temp_dir();
        Self {
            points_per_correct: 100,
            real_prefix: "real".to_string(),
            ai_prefix: "ai".to_string(),
            placeholder_base: "https://picsum.photos".to_string(),
            anti_repeat_path: tmp.join("real_vs_ai_shown_images.json"),
            score_history_path: tmp.join("real_vs_ai_history.json"),
            code_attempts: 3,
        }
    }
}
