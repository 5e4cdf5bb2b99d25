//! In-memory object storage with synthetic public URLs.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::errors::domain::DomainError;
use crate::media::{MediaItem, MediaStore};

pub struct MemoryMediaStore {
    objects: DashMap<String, Vec<u8>>,
    base_url: String,
}

impl MemoryMediaStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            objects: DashMap::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for MemoryMediaStore {
    fn default() -> Self {
        Self::new("memory://pool")
    }
}

#[async_trait]
impl MediaStore for MemoryMediaStore {
    async fn list(&self, prefix: &str) -> Result<Vec<MediaItem>, DomainError> {
        let folder = format!("{prefix}/");
        let mut names: Vec<String> = self
            .objects
            .iter()
            .filter_map(|entry| {
                let rest = entry.key().strip_prefix(&folder)?;
                // Direct children only, like a one-level folder listing.
                (!rest.contains('/')).then(|| rest.to_string())
            })
            .collect();
        names.sort();
        Ok(names.into_iter().map(|name| MediaItem { name }).collect())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<(), DomainError> {
        self.objects.insert(path.to_string(), bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn listing_returns_direct_children_sorted() {
        let media = MemoryMediaStore::default();
        media.upload("real/b.jpg", vec![1]).await.unwrap();
        media.upload("real/a.jpg", vec![2]).await.unwrap();
        media.upload("real/nested/c.jpg", vec![3]).await.unwrap();
        media.upload("ai/a.jpg", vec![4]).await.unwrap();

        let items = media.list("real").await.unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg"]);
    }

    #[tokio::test]
    async fn upload_overwrites_and_urls_are_stable() {
        let media = MemoryMediaStore::new("https://cdn.example");
        media.upload("real/a.jpg", vec![1]).await.unwrap();
        media.upload("real/a.jpg", vec![2]).await.unwrap();
        assert_eq!(media.list("real").await.unwrap().len(), 1);
        assert_eq!(
            media.public_url("real/a.jpg"),
            "https://cdn.example/real/a.jpg"
        );
    }
}
