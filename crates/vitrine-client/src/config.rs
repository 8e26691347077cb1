use std::time::Duration;

use vitrine_core::AppError;
use vitrine_core::MuseumCode;

/// Public demo key published for the Smithsonian Open Access API.
pub const SMITHSONIAN_DEMO_KEY: &str = "DEMO_KEY";
/// Public demo key published for the Rijksmuseum collection API.
pub const RIJKS_DEMO_KEY: &str = "0fiuZFh4";

/// Configuration for the museum clients.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    /// Minimum spacing between requests to one museum host.
    pub throttle: Duration,
    /// Museums to register, in fan-out order.
    pub museums: Vec<MuseumCode>,
    pub smithsonian_api_key: String,
    pub rijks_api_key: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            throttle: Duration::ZERO,
            museums: MuseumCode::ALL.to_vec(),
            smithsonian_api_key: SMITHSONIAN_DEMO_KEY.to_string(),
            rijks_api_key: RIJKS_DEMO_KEY.to_string(),
        }
    }
}

impl ClientConfig {
    /// Read configuration from environment variables.
    ///
    /// - `VITRINE_HTTP_TIMEOUT_SECS` (optional, defaults to 15)
    /// - `VITRINE_THROTTLE_MS` (optional, defaults to 0)
    /// - `VITRINE_MUSEUMS` (optional comma list, defaults to all museums)
    /// - `SMITHSONIAN_API_KEY` (optional, defaults to `DEMO_KEY`)
    /// - `RIJKS_API_KEY` (optional, defaults to the public demo key)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();

        let timeout = match lookup("VITRINE_HTTP_TIMEOUT_SECS") {
            None => defaults.timeout,
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    AppError::ConfigError(format!(
                        "Invalid VITRINE_HTTP_TIMEOUT_SECS '{raw}': must be a positive integer"
                    ))
                })?;
                if secs == 0 {
                    return Err(AppError::ConfigError(
                        "VITRINE_HTTP_TIMEOUT_SECS must be at least 1".into(),
                    ));
                }
                Duration::from_secs(secs)
            }
        };

        let throttle = match lookup("VITRINE_THROTTLE_MS") {
            None => defaults.throttle,
            Some(raw) => Duration::from_millis(raw.trim().parse().map_err(|_| {
                AppError::ConfigError(format!(
                    "Invalid VITRINE_THROTTLE_MS '{raw}': must be a non-negative integer"
                ))
            })?),
        };

        let museums = match lookup("VITRINE_MUSEUMS") {
            None => defaults.museums,
            Some(raw) => parse_museum_list(&raw)?,
        };

        Ok(Self {
            timeout,
            throttle,
            museums,
            smithsonian_api_key: lookup("SMITHSONIAN_API_KEY")
                .filter(|k| !k.trim().is_empty())
                .unwrap_or(defaults.smithsonian_api_key),
            rijks_api_key: lookup("RIJKS_API_KEY")
                .filter(|k| !k.trim().is_empty())
                .unwrap_or(defaults.rijks_api_key),
        })
    }
}

/// Parse a comma-separated list of museum selectors, dropping repeats.
pub fn parse_museum_list(raw: &str) -> Result<Vec<MuseumCode>, AppError> {
    let mut museums = Vec::new();
    for selector in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let code = MuseumCode::from_selector(selector)
            .map_err(|e| AppError::ConfigError(format!("VITRINE_MUSEUMS: {e}")))?;
        if !museums.contains(&code) {
            museums.push(code);
        }
    }
    if museums.is_empty() {
        return Err(AppError::ConfigError(
            "VITRINE_MUSEUMS must name at least one museum".into(),
        ));
    }
    Ok(museums)
}
