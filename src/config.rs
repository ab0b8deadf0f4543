//! Engine configuration
//!
//! Loaded from a TOML file (JSON is accepted as well):
//!
//! ```toml
//! dialect = "dollar"
//! page_size = 10
//! ```

use crate::dialect::Dialect;
use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Maximum number of suggestions shown at once
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Configuration shared by every field of one host application
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Path dialect used for root suggestions and relative insertion
    pub dialect: Dialect,
    /// Suggestion list cap
    pub page_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::Json,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl EngineConfig {
    /// Load from a config file
    pub fn load(path: &Path) -> EngineResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse from string content, TOML first, then JSON
    pub fn parse(content: &str) -> EngineResult<Self> {
        let config: Self = match toml::from_str(content) {
            Ok(config) => config,
            Err(toml_err) => serde_json::from_str(content).map_err(|json_err| {
                EngineError::Config(format!(
                    "not valid TOML ({}) or JSON ({})",
                    toml_err.message(),
                    json_err
                ))
            })?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> EngineResult<()> {
        if self.page_size == 0 {
            return Err(EngineError::Config("page_size must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Convert to TOML string
    pub fn to_toml(&self) -> EngineResult<String> {
        toml::to_string_pretty(self).map_err(|e| EngineError::SerdeError(e.to_string()))
    }
}
