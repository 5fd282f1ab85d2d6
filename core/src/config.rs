use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding [`IndexConfig::idf_precision`].
pub const IDF_PRECISION_ENV: &str = "IRTABLES_IDF_PRECISION";

/// Number of decimal digits IDF values are truncated to by default.
pub const DEFAULT_IDF_PRECISION: u32 = 3;

/// Largest supported [`IndexConfig::idf_precision`].
pub const MAX_IDF_PRECISION: u32 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Decimal digits kept when truncating IDF values.
    pub idf_precision: u32,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self { idf_precision: DEFAULT_IDF_PRECISION }
    }
}

impl IndexConfig {
    pub fn validate(&self) -> Result<()> {
        if self.idf_precision > MAX_IDF_PRECISION {
            return Err(Error::InvalidPrecision(self.idf_precision));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let config: IndexConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file; missing fields fall back to their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&text)?;
        tracing::info!(path = %path.as_ref().display(), idf_precision = config.idf_precision, "loaded index config");
        Ok(config)
    }

    /// Read overrides from the environment. Unset or unusable values keep the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(IDF_PRECISION_ENV) {
            match raw.trim().parse::<u32>() {
                Ok(p) if p <= MAX_IDF_PRECISION => config.idf_precision = p,
                _ => tracing::warn!(value = %raw, "ignoring invalid {}", IDF_PRECISION_ENV),
            }
        }
        config
    }
}
