//! Mocks for the fetcher, adapter and store traits.
//!
//! Compiled for this crate's tests and, behind the `testutil` feature, for
//! sibling crates. State sits behind `Arc<Mutex<_>>` so clones handed to the
//! code under test still record into the original.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::AppError;
use crate::models::{MuseumCode, NormalizedArtwork, parse_artwork_id};
use crate::traits::{Fetcher, KeyValueStore, MuseumAdapter};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

#[derive(Clone)]
enum MockResponse {
    Body(String),
    Status(u16),
    Network,
}

/// Mock fetcher that answers by URL substring.
///
/// Routes are checked in insertion order and may be hit any number of times.
/// Unrouted URLs answer with HTTP 404.
#[derive(Clone, Default)]
pub struct MockFetcher {
    routes: Arc<Mutex<Vec<(String, MockResponse)>>>,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer URLs containing `pattern` with a 200 and `body`.
    pub fn route(self, pattern: &str, body: impl Into<String>) -> Self {
        self.push(pattern, MockResponse::Body(body.into()))
    }

    /// Answer URLs containing `pattern` with a JSON body.
    pub fn route_json(self, pattern: &str, body: serde_json::Value) -> Self {
        self.route(pattern, body.to_string())
    }

    /// Answer URLs containing `pattern` with a non-2xx status.
    pub fn route_status(self, pattern: &str, status: u16) -> Self {
        self.push(pattern, MockResponse::Status(status))
    }

    /// Fail URLs containing `pattern` as if the connection was refused.
    pub fn route_network_error(self, pattern: &str) -> Self {
        self.push(pattern, MockResponse::Network)
    }

    fn push(self, pattern: &str, response: MockResponse) -> Self {
        self.routes
            .lock()
            .unwrap()
            .push((pattern.to_string(), response));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        self.requests.lock().unwrap().push(url.to_string());
        let response = self
            .routes
            .lock()
            .unwrap()
            .iter()
            .find(|(pattern, _)| url.contains(pattern.as_str()))
            .map(|(_, response)| response.clone());

        match response {
            Some(MockResponse::Body(body)) => Ok(body),
            Some(MockResponse::Status(status)) => {
                Err(AppError::HttpError(format!("HTTP {status} for {url}")))
            }
            Some(MockResponse::Network) => Err(AppError::NetworkError(format!(
                "Connection failed: {url}"
            ))),
            None => Err(AppError::HttpError(format!("HTTP 404 for {url}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// MockAdapter
// ---------------------------------------------------------------------------

/// Mock museum adapter with canned search results and detail records.
#[derive(Clone)]
pub struct MockAdapter {
    code: MuseumCode,
    results: Arc<Mutex<Vec<NormalizedArtwork>>>,
    /// Generate `limit` results per query instead of returning `results`.
    echo: bool,
    /// First error returned by `search`; later calls fail with a generic error.
    search_error: Arc<Mutex<Option<AppError>>>,
    failing: bool,
    details: Arc<Mutex<HashMap<String, NormalizedArtwork>>>,
    searches: Arc<Mutex<Vec<(String, usize)>>>,
}

impl MockAdapter {
    pub fn new(code: MuseumCode) -> Self {
        Self {
            code,
            results: Arc::new(Mutex::new(Vec::new())),
            echo: false,
            search_error: Arc::new(Mutex::new(None)),
            failing: false,
            details: Arc::new(Mutex::new(HashMap::new())),
            searches: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_results(self, results: Vec<NormalizedArtwork>) -> Self {
        *self.results.lock().unwrap() = results;
        self
    }

    /// Every query yields `limit` artworks with ids derived from the query.
    pub fn echoing_query(mut self) -> Self {
        self.echo = true;
        self
    }

    pub fn with_search_error(mut self, error: AppError) -> Self {
        *self.search_error.lock().unwrap() = Some(error);
        self.failing = true;
        self
    }

    pub fn with_detail(self, artwork: NormalizedArtwork) -> Self {
        self.details
            .lock()
            .unwrap()
            .insert(artwork.id.clone(), artwork);
        self
    }

    /// Recorded `(query, limit)` pairs, in call order.
    pub fn searches(&self) -> Vec<(String, usize)> {
        self.searches.lock().unwrap().clone()
    }
}

impl MuseumAdapter for MockAdapter {
    fn code(&self) -> MuseumCode {
        self.code
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<NormalizedArtwork>, AppError> {
        self.searches
            .lock()
            .unwrap()
            .push((query.to_string(), limit));

        if self.failing {
            let first = self.search_error.lock().unwrap().take();
            return Err(first.unwrap_or_else(|| AppError::NetworkError("mock source down".into())));
        }

        if self.echo {
            return Ok((0..limit)
                .map(|i| make_test_artwork(&self.code.artwork_id(format!("{query}-{i}"))))
                .collect());
        }

        Ok(self.results.lock().unwrap().clone())
    }

    async fn get_details(&self, id: &str) -> Option<NormalizedArtwork> {
        self.details.lock().unwrap().get(id).cloned()
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-memory key-value store; optionally fails every write, and reads can
/// be switched to failing on any clone.
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub entries: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: bool,
    fail_reads: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a raw value, e.g. corrupt JSON.
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::default();
        store
            .entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        store
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn set_failing_reads(&self, failing: bool) {
        self.fail_reads.store(failing, Ordering::SeqCst);
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::StorageError("permission denied".into()));
        }
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        if self.fail_writes {
            return Err(AppError::StorageError("quota exceeded".into()));
        }
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        if self.fail_writes {
            return Err(AppError::StorageError("quota exceeded".into()));
        }
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Create a dummy artwork for testing. The museum is taken from the id
/// prefix when it names one.
pub fn make_test_artwork(id: &str) -> NormalizedArtwork {
    let code = parse_artwork_id(id)
        .map(|(code, _)| code)
        .unwrap_or(MuseumCode::Met);
    NormalizedArtwork {
        id: id.to_string(),
        title: "Test Artwork".to_string(),
        artist: "Test Artist".to_string(),
        date: "1889".to_string(),
        medium: "Oil on canvas".to_string(),
        dimensions: "73.7 x 92.1 cm".to_string(),
        museum: code.institution().to_string(),
        museum_code: code,
        image_url: Some("https://example.com/large.jpg".to_string()),
        thumbnail_url: Some("https://example.com/small.jpg".to_string()),
        department: None,
        artwork_type: Some("Painting".to_string()),
        place_of_origin: None,
        gallery: None,
        period: None,
        culture: None,
        credit_line: None,
        accession_number: None,
        classification: None,
        style: None,
        description: None,
        is_public_domain: None,
        subjects: Vec::new(),
        materials: Vec::new(),
        techniques: Vec::new(),
        museum_url: format!("https://example.com/{id}"),
        original_data: serde_json::Value::Null,
    }
}
