//! Explicit museum-code to adapter mapping, built once at startup.

use crate::error::AppError;
use crate::models::{MuseumCode, parse_artwork_id};
use crate::traits::MuseumAdapter;

/// The set of adapters the aggregator fans out to.
///
/// Holds at most one adapter per [`MuseumCode`], in registration order.
pub struct AdapterRegistry<A> {
    adapters: Vec<A>,
}

impl<A: MuseumAdapter> AdapterRegistry<A> {
    /// Build a registry, rejecting two adapters for the same museum.
    pub fn new(adapters: impl IntoIterator<Item = A>) -> Result<Self, AppError> {
        let mut registered: Vec<A> = Vec::new();
        for adapter in adapters {
            let code = adapter.code();
            if registered.iter().any(|a| a.code() == code) {
                return Err(AppError::ConfigError(format!(
                    "Adapter for {code} registered twice"
                )));
            }
            registered.push(adapter);
        }
        Ok(Self {
            adapters: registered,
        })
    }

    pub fn adapters(&self) -> &[A] {
        &self.adapters
    }

    pub fn codes(&self) -> Vec<MuseumCode> {
        self.adapters.iter().map(|a| a.code()).collect()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Adapter for a known museum code.
    pub fn get(&self, code: MuseumCode) -> Result<&A, AppError> {
        self.adapters
            .iter()
            .find(|a| a.code() == code)
            .ok_or_else(|| AppError::MuseumNotRegistered(code.to_string()))
    }

    /// Adapter for a user-facing museum name.
    pub fn for_selector(&self, selector: &str) -> Result<&A, AppError> {
        self.get(MuseumCode::from_selector(selector)?)
    }

    /// Adapter owning an artwork id, routed by its prefix.
    pub fn for_artwork_id(&self, id: &str) -> Result<&A, AppError> {
        let (code, _) = parse_artwork_id(id)?;
        self.get(code)
    }
}
