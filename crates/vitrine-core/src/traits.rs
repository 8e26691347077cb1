use std::future::Future;

use crate::error::AppError;
use crate::models::{MuseumCode, NormalizedArtwork};

/// Fetches a raw response body from a URL.
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Translates one museum's native API into [`NormalizedArtwork`] records.
pub trait MuseumAdapter: Send + Sync {
    fn code(&self) -> MuseumCode;

    /// Search the museum, propagating fetch and decode errors.
    ///
    /// `limit` is a flat cap; adapters expose no cursor.
    fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<NormalizedArtwork>, AppError>> + Send;

    /// Fetch one record by id (prefixed or native).
    ///
    /// Returns `None` for records without any image and for every upstream
    /// failure; callers cannot tell "not found" from a transient error here.
    fn get_details(&self, id: &str) -> impl Future<Output = Option<NormalizedArtwork>> + Send;

    /// [`search`](Self::search) with failures logged and turned into an empty list.
    fn search_lenient(
        &self,
        query: &str,
        limit: usize,
    ) -> impl Future<Output = Vec<NormalizedArtwork>> + Send {
        async move {
            match self.search(query, limit).await {
                Ok(artworks) => artworks,
                Err(e) => {
                    tracing::warn!(museum = %self.code(), query, error = %e, "Search failed");
                    Vec::new()
                }
            }
        }
    }
}

/// String key-value persistence capability behind the collection store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), AppError>;
}
