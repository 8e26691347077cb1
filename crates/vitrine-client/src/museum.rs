use vitrine_core::error::AppError;
use vitrine_core::models::{MuseumCode, NormalizedArtwork};
use vitrine_core::registry::AdapterRegistry;
use vitrine_core::throttle::{ThrottleConfig, ThrottledFetcher};
use vitrine_core::traits::{Fetcher, MuseumAdapter};

use crate::aic::AicAdapter;
use crate::config::ClientConfig;
use crate::fetcher::ReqwestFetcher;
use crate::met::MetAdapter;
use crate::rijks::RijksAdapter;
use crate::smithsonian::SmithsonianAdapter;

/// The fetcher stack used against the live APIs.
pub type HttpFetcher = ThrottledFetcher<ReqwestFetcher>;

/// Any one of the supported museum adapters, sharing a fetcher type.
#[derive(Clone)]
pub enum Museum<F> {
    Aic(AicAdapter<F>),
    Met(MetAdapter<F>),
    Smithsonian(SmithsonianAdapter<F>),
    Rijks(RijksAdapter<F>),
}

impl<F: Fetcher> Museum<F> {
    /// Construct the adapter for `code`, taking API keys from `config`.
    pub fn for_code(code: MuseumCode, fetcher: F, config: &ClientConfig) -> Self {
        match code {
            MuseumCode::Aic => Museum::Aic(AicAdapter::new(fetcher)),
            MuseumCode::Met => Museum::Met(MetAdapter::new(fetcher)),
            MuseumCode::Smithsonian => Museum::Smithsonian(SmithsonianAdapter::new(
                fetcher,
                config.smithsonian_api_key.clone(),
            )),
            MuseumCode::Rijks => {
                Museum::Rijks(RijksAdapter::new(fetcher, config.rijks_api_key.clone()))
            }
        }
    }
}

impl<F: Fetcher> MuseumAdapter for Museum<F> {
    fn code(&self) -> MuseumCode {
        match self {
            Museum::Aic(a) => a.code(),
            Museum::Met(a) => a.code(),
            Museum::Smithsonian(a) => a.code(),
            Museum::Rijks(a) => a.code(),
        }
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<NormalizedArtwork>, AppError> {
        match self {
            Museum::Aic(a) => a.search(query, limit).await,
            Museum::Met(a) => a.search(query, limit).await,
            Museum::Smithsonian(a) => a.search(query, limit).await,
            Museum::Rijks(a) => a.search(query, limit).await,
        }
    }

    async fn get_details(&self, id: &str) -> Option<NormalizedArtwork> {
        match self {
            Museum::Aic(a) => a.get_details(id).await,
            Museum::Met(a) => a.get_details(id).await,
            Museum::Smithsonian(a) => a.get_details(id).await,
            Museum::Rijks(a) => a.get_details(id).await,
        }
    }
}

/// Build a registry of the configured museums over a shared fetcher.
pub fn registry_with<F: Fetcher>(
    fetcher: F,
    config: &ClientConfig,
) -> Result<AdapterRegistry<Museum<F>>, AppError> {
    AdapterRegistry::new(
        config
            .museums
            .iter()
            .map(|code| Museum::for_code(*code, fetcher.clone(), config)),
    )
}

/// Build the live registry: reqwest with the configured timeout, spaced per
/// museum host by the configured throttle.
pub fn build_registry(config: &ClientConfig) -> Result<AdapterRegistry<Museum<HttpFetcher>>, AppError> {
    let fetcher = ThrottledFetcher::new(
        ReqwestFetcher::with_timeout(config.timeout)?,
        ThrottleConfig::new(config.throttle),
    );
    tracing::debug!(museums = ?config.museums, "Building museum registry");
    registry_with(fetcher, config)
}
