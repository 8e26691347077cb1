use futures::future::join_all;

use crate::error::AppError;
use crate::models::{BrowsePage, MuseumCode, NormalizedArtwork, SamplePage};
use crate::registry::AdapterRegistry;
use crate::traits::MuseumAdapter;
use crate::util::{dedupe_by_id, shuffle};

/// Broad topical queries cycled through to emulate an unbounded feed.
pub const BROWSE_TERMS: [&str; 20] = [
    "painting",
    "sculpture",
    "drawing",
    "print",
    "photograph",
    "ceramic",
    "textile",
    "modern",
    "contemporary",
    "ancient",
    "portrait",
    "landscape",
    "abstract",
    "figurative",
    "decorative",
    "bronze",
    "marble",
    "oil",
    "watercolor",
    "etching",
];

/// Number of leading browse terms used by [`Aggregator::sample_collection`].
const SAMPLE_TERM_COUNT: usize = 10;

/// Fans queries out across every registered museum and merges the results.
///
/// Generic over the adapter type so tests run against mocks without HTTP.
/// Holds no state between calls beyond the registry itself.
pub struct Aggregator<A> {
    registry: AdapterRegistry<A>,
}

impl<A: MuseumAdapter> Aggregator<A> {
    pub fn new(registry: AdapterRegistry<A>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &AdapterRegistry<A> {
        &self.registry
    }

    /// Search every museum concurrently and merge whatever succeeds.
    ///
    /// Waits for every source regardless of failures. Failed sources are
    /// logged and omitted, so total failure looks the same as no matches.
    /// The merged list is de-duplicated by id and shuffled.
    pub async fn search_all(&self, query: &str, limit_per_source: usize) -> Vec<NormalizedArtwork> {
        let outcomes = join_all(self.registry.adapters().iter().map(|adapter| async move {
            (adapter.code(), adapter.search(query, limit_per_source).await)
        }))
        .await;

        let mut merged = Vec::new();
        let mut failed: Vec<MuseumCode> = Vec::new();
        for (code, outcome) in outcomes {
            match outcome {
                Ok(mut artworks) => {
                    tracing::debug!(museum = %code, count = artworks.len(), "Source returned");
                    artworks.truncate(limit_per_source);
                    merged.extend(artworks);
                }
                Err(e) => {
                    tracing::warn!(museum = %code, error = %e, "Source search failed, omitting");
                    failed.push(code);
                }
            }
        }

        let mut merged = dedupe_by_id(merged);
        shuffle(&mut merged);

        tracing::info!(
            query,
            results = merged.len(),
            failed_sources = failed.len(),
            "Aggregated search complete"
        );
        merged
    }

    /// Fetch one artwork, routed by the id's museum prefix.
    ///
    /// An unroutable id is an error; a routable id that yields nothing is
    /// `Ok(None)`.
    pub async fn get_details(&self, id: &str) -> Result<Option<NormalizedArtwork>, AppError> {
        let adapter = self.registry.for_artwork_id(id)?;
        let artwork = adapter.get_details(id).await;
        if artwork.is_none() {
            tracing::info!(id, "Artwork not found or has no image");
        }
        Ok(artwork)
    }

    /// Search a single museum without failure isolation.
    pub async fn search_museum(
        &self,
        query: &str,
        selector: &str,
        limit: usize,
    ) -> Result<Vec<NormalizedArtwork>, AppError> {
        let adapter = self.registry.for_selector(selector)?;
        tracing::info!(museum = %adapter.code(), query, limit, "Searching single museum");
        adapter.search(query, limit).await
    }

    /// One page of the all-museum browsing feed.
    ///
    /// Each page is one aggregated search for the next broad term. The
    /// caller holds `term_index` and de-duplicates across pages.
    pub async fn browse_collection_page(&self, term_index: usize, batch_size: usize) -> BrowsePage {
        let term = browse_term(term_index);
        tracing::info!(term_index, term, batch_size, "Loading browse page");
        let artworks = self.search_all(term, batch_size).await;
        browse_page(artworks, term_index, batch_size)
    }

    /// One page of the browsing feed restricted to a single museum.
    ///
    /// A failing museum yields an empty page; an unknown selector is an error.
    pub async fn browse_museum_page(
        &self,
        term_index: usize,
        batch_size: usize,
        selector: &str,
    ) -> Result<BrowsePage, AppError> {
        let adapter = self.registry.for_selector(selector)?;
        let term = browse_term(term_index);
        tracing::info!(museum = %adapter.code(), term_index, term, batch_size, "Loading browse page");
        let mut artworks = adapter.search_lenient(term, batch_size).await;
        artworks.truncate(batch_size);
        Ok(browse_page(dedupe_by_id(artworks), term_index, batch_size))
    }

    /// A shuffled, de-duplicated sample across the first ten browse terms,
    /// sliced into 1-based pages of `limit` artworks.
    pub async fn sample_collection(&self, limit: usize, page: usize) -> SamplePage {
        let per_term = limit.div_ceil(SAMPLE_TERM_COUNT);
        let batches = join_all(
            BROWSE_TERMS[..SAMPLE_TERM_COUNT]
                .iter()
                .map(|term| self.search_all(term, per_term)),
        )
        .await;

        let mut unique = dedupe_by_id(batches.into_iter().flatten().collect());
        shuffle(&mut unique);

        let total_results = unique.len();
        let start = page.max(1).saturating_sub(1).saturating_mul(limit);
        let end = start.saturating_add(limit);
        let artworks = unique
            .into_iter()
            .skip(start)
            .take(limit)
            .collect();

        SamplePage {
            artworks,
            has_more: total_results > end,
            total_results,
        }
    }
}

/// Browse term for a page index; wraps around after the last term.
pub fn browse_term(term_index: usize) -> &'static str {
    BROWSE_TERMS[term_index % BROWSE_TERMS.len()]
}

/// More pages are assumed while unvisited terms remain or the last page
/// came back full. This is a heuristic, not a pagination guarantee.
fn browse_page(artworks: Vec<NormalizedArtwork>, term_index: usize, batch_size: usize) -> BrowsePage {
    let terms_remain = term_index < BROWSE_TERMS.len() - 1;
    let full_batch = batch_size > 0 && artworks.len() >= batch_size;
    BrowsePage {
        has_more: terms_remain || full_batch,
        next_term_index: term_index + 1,
        artworks,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::testutil::*;

    fn artworks(prefix: &str, n: usize) -> Vec<NormalizedArtwork> {
        (0..n)
            .map(|i| make_test_artwork(&format!("{prefix}-{i}")))
            .collect()
    }

    fn aggregator(adapters: Vec<MockAdapter>) -> Aggregator<MockAdapter> {
        Aggregator::new(AdapterRegistry::new(adapters).unwrap())
    }

    fn unique_ids(artworks: &[NormalizedArtwork]) -> bool {
        let ids: HashSet<_> = artworks.iter().map(|a| a.id.as_str()).collect();
        ids.len() == artworks.len()
    }

    #[tokio::test]
    async fn partial_failure_merges_surviving_sources() {
        let agg = aggregator(vec![
            MockAdapter::new(MuseumCode::Aic).with_results(artworks("aic", 2)),
            MockAdapter::new(MuseumCode::Met).with_search_error(AppError::Timeout(15)),
            MockAdapter::new(MuseumCode::Smithsonian).with_results(artworks("smithsonian", 3)),
        ]);

        let results = agg.search_all("monet", 10).await;

        assert_eq!(results.len(), 5);
        assert!(unique_ids(&results));
    }

    #[tokio::test]
    async fn total_failure_is_empty_not_error() {
        let agg = aggregator(vec![
            MockAdapter::new(MuseumCode::Aic)
                .with_search_error(AppError::NetworkError("refused".into())),
            MockAdapter::new(MuseumCode::Met).with_search_error(AppError::HttpError("HTTP 500".into())),
        ]);

        let results = agg.search_all("monet", 10).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn search_all_bounds_and_dedupes() {
        let mut overlapping = artworks("aic", 2);
        overlapping.extend(artworks("met", 1));
        let agg = aggregator(vec![
            MockAdapter::new(MuseumCode::Aic).with_results(artworks("aic", 8)),
            MockAdapter::new(MuseumCode::Met).with_results(overlapping),
        ]);

        let results = agg.search_all("vase", 3).await;

        assert!(results.len() <= 2 * 3);
        assert!(unique_ids(&results));
        // aic-0..2 from the first source, met-0 survives from the second
        assert_eq!(results.len(), 4);
    }

    #[tokio::test]
    async fn search_all_queries_every_source_with_limit() {
        let aic = MockAdapter::new(MuseumCode::Aic);
        let met = MockAdapter::new(MuseumCode::Met);
        let agg = aggregator(vec![aic.clone(), met.clone()]);

        agg.search_all("tiger", 7).await;

        assert_eq!(aic.searches(), vec![("tiger".to_string(), 7)]);
        assert_eq!(met.searches(), vec![("tiger".to_string(), 7)]);
    }

    #[tokio::test]
    async fn get_details_routes_by_prefix() {
        let agg = aggregator(vec![
            MockAdapter::new(MuseumCode::Aic),
            MockAdapter::new(MuseumCode::Met).with_detail(make_test_artwork("met-436533")),
        ]);

        let artwork = agg.get_details("met-436533").await.unwrap().unwrap();
        assert_eq!(artwork.id, "met-436533");

        let missing = agg.get_details("aic-1").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn get_details_unknown_prefix_is_contract_error() {
        let agg = aggregator(vec![MockAdapter::new(MuseumCode::Aic)]);

        let err = agg.get_details("louvre-1").await.unwrap_err();
        assert!(err.is_contract_error());
        assert!(matches!(err, AppError::UnknownArtworkId(_)));

        let err = agg.get_details("met-1").await.unwrap_err();
        assert!(matches!(err, AppError::MuseumNotRegistered(_)));
    }

    #[tokio::test]
    async fn search_museum_propagates_errors() {
        let agg = aggregator(vec![
            MockAdapter::new(MuseumCode::Aic).with_results(artworks("aic", 2)),
            MockAdapter::new(MuseumCode::Met).with_search_error(AppError::HttpError("HTTP 503".into())),
        ]);

        let results = agg
            .search_museum("cats", "Art Institute of Chicago", 20)
            .await
            .unwrap();
        assert_eq!(results.len(), 2);

        let err = agg.search_museum("cats", "met", 20).await.unwrap_err();
        assert!(matches!(err, AppError::HttpError(_)));

        let err = agg.search_museum("cats", "prado", 20).await.unwrap_err();
        assert!(matches!(err, AppError::UnknownMuseum(_)));
    }

    #[tokio::test]
    async fn consecutive_browse_pages_use_different_terms() {
        let aic = MockAdapter::new(MuseumCode::Aic).with_results(artworks("aic", 3));
        let agg = aggregator(vec![aic.clone()]);

        let first = agg.browse_collection_page(0, 50).await;
        let second = agg.browse_collection_page(1, 50).await;

        assert_eq!(first.next_term_index, 1);
        assert_eq!(second.next_term_index, 2);
        assert!(first.has_more);
        assert!(second.has_more);

        let searches = aic.searches();
        assert_eq!(searches[0], ("painting".to_string(), 50));
        assert_eq!(searches[1], ("sculpture".to_string(), 50));
    }

    #[tokio::test]
    async fn browse_has_more_after_last_term_only_when_batch_full() {
        let short = aggregator(vec![
            MockAdapter::new(MuseumCode::Aic).with_results(artworks("aic", 3)),
        ]);
        let page = short.browse_collection_page(19, 50).await;
        assert!(!page.has_more);
        assert_eq!(page.next_term_index, 20);

        let full = aggregator(vec![
            MockAdapter::new(MuseumCode::Aic).with_results(artworks("aic", 5)),
        ]);
        let page = full.browse_collection_page(19, 5).await;
        assert!(page.has_more);
    }

    #[test]
    fn browse_terms_wrap_around() {
        assert_eq!(browse_term(0), "painting");
        assert_eq!(browse_term(19), "etching");
        assert_eq!(browse_term(20), "painting");
    }

    #[tokio::test]
    async fn browse_museum_page_isolates_failure() {
        let aic = MockAdapter::new(MuseumCode::Aic).with_results(artworks("aic", 2));
        let met = MockAdapter::new(MuseumCode::Met)
            .with_search_error(AppError::NetworkError("down".into()));
        let agg = aggregator(vec![aic.clone(), met.clone()]);

        let page = agg.browse_museum_page(2, 10, "met").await.unwrap();
        assert!(page.artworks.is_empty());
        assert!(page.has_more);
        assert_eq!(met.searches(), vec![("drawing".to_string(), 10)]);
        assert!(aic.searches().is_empty());

        let err = agg.browse_museum_page(0, 10, "tate").await.unwrap_err();
        assert!(matches!(err, AppError::UnknownMuseum(_)));
    }

    #[tokio::test]
    async fn sample_collection_slices_pages() {
        let agg = aggregator(vec![
            MockAdapter::new(MuseumCode::Aic).echoing_query(),
            MockAdapter::new(MuseumCode::Met).echoing_query(),
        ]);

        // 10 terms x 2 sources x ceil(15 / 10) per source
        let first = agg.sample_collection(15, 1).await;
        assert_eq!(first.total_results, 40);
        assert_eq!(first.artworks.len(), 15);
        assert!(first.has_more);
        assert!(unique_ids(&first.artworks));

        let last = agg.sample_collection(15, 3).await;
        assert_eq!(last.artworks.len(), 10);
        assert!(!last.has_more);

        let past_end = agg.sample_collection(15, 4).await;
        assert!(past_end.artworks.is_empty());
    }
}
