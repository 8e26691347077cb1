//! Per-host request spacing for museum APIs.
//!
//! The Met search issues one detail request per hit, so an aggregated search
//! can put dozens of requests on one host at once. Some of the public APIs
//! answer that with rate-limit errors. [`ThrottledFetcher`] queues requests
//! per host so they start at least `spacing` apart.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::Mutex;
use tokio::time::Instant;
use url::Url;

use crate::error::AppError;
use crate::traits::Fetcher;

/// How far apart requests to one host must start.
#[derive(Debug, Clone, Default)]
pub struct ThrottleConfig {
    pub spacing: Duration,
    /// Upper bound of a random extra wait, drawn per request.
    pub jitter: Duration,
}

impl ThrottleConfig {
    pub fn new(spacing: Duration) -> Self {
        Self {
            spacing,
            jitter: Duration::ZERO,
        }
    }

    pub fn with_jitter(self, jitter: Duration) -> Self {
        Self { jitter, ..self }
    }

    /// Zero spacing and zero jitter: requests pass straight through.
    pub fn is_disabled(&self) -> bool {
        self.spacing.is_zero() && self.jitter.is_zero()
    }

    fn next_gap(&self) -> Duration {
        match self.jitter.as_millis() as u64 {
            0 => self.spacing,
            max => self.spacing + Duration::from_millis(rand::thread_rng().gen_range(0..=max)),
        }
    }
}

/// [`Fetcher`] decorator that spaces requests per host.
///
/// A request books the next free start time for its host under the lock and
/// sleeps outside it, so concurrent callers line up one gap apart. Hosts
/// never wait on each other. Clones share the schedule.
#[derive(Clone)]
pub struct ThrottledFetcher<F> {
    inner: F,
    config: ThrottleConfig,
    schedule: Arc<Mutex<HashMap<String, Instant>>>,
}

impl<F: Fetcher> ThrottledFetcher<F> {
    pub fn new(inner: F, config: ThrottleConfig) -> Self {
        Self {
            inner,
            config,
            schedule: Arc::default(),
        }
    }

    /// Host (with explicit port, if any) used as the schedule key.
    fn host_of(url: &str) -> Option<String> {
        let url = Url::parse(url).ok()?;
        let host = url.host_str()?;
        Some(match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        })
    }

    /// Book a start time for `host` and wait for it.
    async fn book(&self, host: &str) {
        let gap = self.config.next_gap();
        let start_at = {
            let mut schedule = self.schedule.lock().await;
            let now = Instant::now();
            let start_at = match schedule.get(host) {
                Some(free_at) if *free_at > now => *free_at,
                _ => now,
            };
            schedule.insert(host.to_string(), start_at + gap);
            start_at
        };

        let now = Instant::now();
        if start_at > now {
            tracing::debug!(host, wait_ms = (start_at - now).as_millis() as u64, "Throttling request");
            tokio::time::sleep_until(start_at).await;
        }
    }
}

impl<F: Fetcher> Fetcher for ThrottledFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        if !self.config.is_disabled()
            && let Some(host) = Self::host_of(url)
        {
            self.book(&host).await;
        }
        self.inner.fetch(url).await
    }
}
