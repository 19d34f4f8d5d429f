//! Directory listing cache scoped to one run

use super::{normalize_directory, RepoContents, RepoEntry};
use crate::error::FetchError;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// Caches directory listings keyed by normalised directory path
///
/// A directory that does not exist is cached as an empty listing.
#[derive(Default)]
pub struct ListingCache {
    listings: Mutex<HashMap<String, Vec<RepoEntry>>>,
}

impl ListingCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the listing for `directory`, asking the backend on a miss
    pub async fn listing(
        &self,
        contents: &dyn RepoContents,
        directory: &str,
    ) -> Result<Vec<RepoEntry>, FetchError> {
        let key = normalize_directory(directory);
        if let Some(hit) = self.listings.lock().await.get(&key) {
            return Ok(hit.clone());
        }

        let listing = match contents.list_directory(&key).await {
            Ok(entries) => entries,
            Err(e) if e.is_not_found() => {
                debug!(directory = %key, "directory not found, treating as empty");
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        self.listings.lock().await.insert(key, listing.clone());
        Ok(listing)
    }
}
