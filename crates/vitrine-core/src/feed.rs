//! Caller-held state for infinite browsing and superseded searches.
//!
//! The aggregator is stateless; whoever drives the UI keeps one of these per
//! view and feeds aggregator pages through it.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::models::{BrowsePage, NormalizedArtwork};

/// Accumulates browse pages, dropping artworks already shown.
#[derive(Debug, Default)]
pub struct BrowseFeed {
    next_term_index: usize,
    has_more: bool,
    seen: HashSet<String>,
    artworks: Vec<NormalizedArtwork>,
}

impl BrowseFeed {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(term_index: usize) -> Self {
        Self {
            next_term_index: term_index,
            has_more: true,
            ..Self::default()
        }
    }

    /// Term index to request next.
    pub fn next_term_index(&self) -> usize {
        self.next_term_index
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Everything accumulated so far, in arrival order.
    pub fn artworks(&self) -> &[NormalizedArtwork] {
        &self.artworks
    }

    /// Merge a page and return only the artworks not seen before.
    pub fn absorb(&mut self, page: BrowsePage) -> Vec<NormalizedArtwork> {
        self.next_term_index = page.next_term_index;
        self.has_more = page.has_more;

        let fresh: Vec<_> = page
            .artworks
            .into_iter()
            .filter(|artwork| self.seen.insert(artwork.id.clone()))
            .collect();
        self.artworks.extend(fresh.iter().cloned());

        tracing::debug!(
            new = fresh.len(),
            total = self.artworks.len(),
            next_term_index = self.next_term_index,
            "Absorbed browse page"
        );
        fresh
    }
}

/// Issues increasing generation tickets so results of a superseded search
/// can be discarded instead of overwriting newer ones.
///
/// For interactive front ends (search-as-you-type, a UI that can fire a new
/// query before the last one settles). One-shot callers such as the CLI run
/// a single search per process and have no use for it.
#[derive(Debug, Clone, Default)]
pub struct SearchGenerations {
    latest: Arc<AtomicU64>,
}

/// Handle for one issued search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

impl SearchGenerations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new search, superseding every earlier ticket.
    pub fn begin(&self) -> SearchTicket {
        SearchTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Pass results through only if no newer search has begun.
    pub fn accept<T>(&self, ticket: SearchTicket, results: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(results)
        } else {
            tracing::debug!(generation = ticket.0, "Discarding stale search results");
            None
        }
    }
}
