//! Content pool adapter: pairs real images with their AI twins.
//!
//! No game semantics here; the pool only knows the bucket layout (real
//! images under one prefix, AI counterparts with the same file name
//! under another) and how to turn items into public URLs.

use std::sync::Arc;

use tracing::debug;

use crate::config::GameConfig;
use crate::errors::domain::DomainError;
use crate::media::{MediaItem, MediaStore};

/// One usable real/AI pair from the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolItem {
    pub name: String,
    pub real_url: String,
    pub ai_url: String,
}

#[derive(Clone)]
pub struct ContentPool {
    media: Arc<dyn MediaStore>,
    real_prefix: String,
    ai_prefix: String,
}

impl ContentPool {
    pub fn new(media: Arc<dyn MediaStore>, config: &GameConfig) -> Self {
        Self {
            media,
            real_prefix: config.real_prefix.clone(),
            ai_prefix: config.ai_prefix.clone(),
        }
    }

    /// List available pairs, skipping storage placeholders and hidden
    /// files.
    pub async fn list_available(&self) -> Result<Vec<PoolItem>, DomainError> {
        let items = self.media.list(&self.real_prefix).await?;
        let pairs: Vec<PoolItem> = items
            .iter()
            .filter(|item| is_usable(item))
            .map(|item| PoolItem {
                name: item.name.clone(),
                real_url: self
                    .media
                    .public_url(&format!("{}/{}", self.real_prefix, item.name)),
                ai_url: self
                    .media
                    .public_url(&format!("{}/{}", self.ai_prefix, item.name)),
            })
            .collect();
        debug!(available = pairs.len(), "Listed content pool");
        Ok(pairs)
    }

    /// Write a real/AI image pair into the pool under one name.
    pub async fn upload_pair(
        &self,
        name: &str,
        real_bytes: Vec<u8>,
        ai_bytes: Vec<u8>,
    ) -> Result<(), DomainError> {
        self.media
            .upload(&format!("{}/{}", self.real_prefix, name), real_bytes)
            .await?;
        self.media
            .upload(&format!("{}/{}", self.ai_prefix, name), ai_bytes)
            .await?;
        Ok(())
    }
}

fn is_usable(item: &MediaItem) -> bool {
    item.name != ".emptyFolderPlaceholder" && !item.name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_and_placeholder_entries_are_skipped() {
        let usable = MediaItem {
            name: "cat.jpg".into(),
        };
        let placeholder = MediaItem {
            name: ".emptyFolderPlaceholder".into(),
        };
        let hidden = MediaItem {
            name: ".DS_Store".into(),
        };
        assert!(is_usable(&usable));
        assert!(!is_usable(&placeholder));
        assert!(!is_usable(&hidden));
    }
}
