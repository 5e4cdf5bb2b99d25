//! Object-storage collaborator contract and the content pool adapter.

pub mod pool;

use async_trait::async_trait;

use crate::errors::domain::DomainError;

pub use pool::{ContentPool, PoolItem};

/// One entry in an object-storage listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    /// File name without the folder prefix.
    pub name: String,
}

/// Minimal surface the core needs from binary object storage.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// List items directly under a logical folder.
    async fn list(&self, prefix: &str) -> Result<Vec<MediaItem>, DomainError>;
    /// Stable public retrieval URL for an item path.
    fn public_url(&self, path: &str) -> String;
    /// Upload or overwrite an item at a given path.
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<(), DomainError>;
}
