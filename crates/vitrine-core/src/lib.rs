pub mod aggregator;
pub mod collection;
pub mod error;
pub mod feed;
pub mod models;
pub mod registry;
pub mod throttle;
pub mod traits;
pub mod util;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use aggregator::{Aggregator, BROWSE_TERMS};
pub use collection::CollectionStore;
pub use error::AppError;
pub use feed::{BrowseFeed, SearchGenerations};
pub use models::{CollectionEntry, MuseumCode, NormalizedArtwork};
pub use registry::AdapterRegistry;
pub use traits::{Fetcher, KeyValueStore, MuseumAdapter};
