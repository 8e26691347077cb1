use std::path::PathBuf;

use vitrine_core::AppError;

/// Default data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = ".vitrine";

/// Configuration for the on-disk store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl StoreConfig {
    /// Read configuration from environment variables.
    ///
    /// - `VITRINE_DATA_DIR` (optional, defaults to `.vitrine`)
    pub fn from_env() -> Result<Self, AppError> {
        match std::env::var("VITRINE_DATA_DIR") {
            Err(_) => Ok(Self::default()),
            Ok(raw) if raw.trim().is_empty() => Err(AppError::ConfigError(
                "VITRINE_DATA_DIR is set but empty".into(),
            )),
            Ok(raw) => Ok(Self {
                data_dir: PathBuf::from(raw.trim()),
            }),
        }
    }
}
