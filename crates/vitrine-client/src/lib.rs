pub mod aic;
pub mod config;
mod decode;
pub mod fetcher;
pub mod met;
pub mod museum;
pub mod rijks;
pub mod smithsonian;

pub use aic::AicAdapter;
pub use config::ClientConfig;
pub use fetcher::ReqwestFetcher;
pub use met::MetAdapter;
pub use museum::{HttpFetcher, Museum, build_registry, registry_with};
pub use rijks::RijksAdapter;
pub use smithsonian::SmithsonianAdapter;
