//! Suite configuration

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::schema::{InventoryVariant, SchemaName};

/// Server used when neither config nor environment names one.
pub const DEFAULT_BASE_URL: &str = "http://5.181.109.28:9090/api/v3";

/// Environment variable that overrides `base_url`.
pub const BASE_URL_ENV: &str = "PETCHECK_BASE_URL";

/// How resource ids are chosen for created pets and orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Use each scenario's literal id (e.g. `1`, `10`)
    Fixed,
    /// Draw a fresh random id per created resource
    #[default]
    Unique,
}

/// Suite configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the service, including any API prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// HTTP headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Per-request timeout in seconds (none by default)
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Id strategy for created resources
    #[serde(default)]
    pub ids: IdStrategy,

    /// Which inventory contract to enforce
    #[serde(default)]
    pub inventory: InventoryVariant,

    /// Contract overrides: schema name → JSON/YAML file
    #[serde(default)]
    pub schemas: HashMap<SchemaName, PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            headers: HashMap::new(),
            timeout_secs: None,
            ids: IdStrategy::default(),
            inventory: InventoryVariant::default(),
            schemas: HashMap::new(),
        }
    }
}

impl Config {
    /// Load config from file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e.to_string()))?;

        let mut config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?
        } else {
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?
        };

        // Override paths are relative to the config file
        if let Some(dir) = path.parent() {
            for file in config.schemas.values_mut() {
                if file.is_relative() {
                    *file = dir.join(&*file);
                }
            }
        }

        Ok(config)
    }

    /// Load from default location (.petcheck.toml)
    pub fn load_default() -> Result<Self, ConfigError> {
        let candidates = [".petcheck.toml", ".petcheck.json", "petcheck.toml"];

        for name in candidates {
            let path = Path::new(name);
            if path.exists() {
                return Self::load(path);
            }
        }

        Ok(Self::default())
    }

    /// Replace `base_url` when an override is present and non-empty.
    #[must_use]
    pub fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url;
        }
        self
    }

    /// Apply `PETCHECK_BASE_URL` from the process environment.
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_base_url_override(std::env::var(BASE_URL_ENV).ok())
    }

    /// `base_url` without a trailing slash, ready for path concatenation.
    #[must_use]
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Create example config file
    pub fn example() -> &'static str {
        r#"# petcheck configuration

# Service under test (include the API prefix)
base_url = "http://5.181.109.28:9090/api/v3"

# Per-request timeout in seconds (no timeout by default)
# timeout_secs = 10

# Id strategy for created pets/orders: "unique" (default) or "fixed"
ids = "unique"

# Inventory contract: "core" (approved, delivered) or "with_placed"
inventory = "core"

# HTTP headers sent with every request
[headers]
# api_key = "special-key"

# Replace built-in contracts with JSON/YAML JSON Schema documents
[schemas]
# pet = "schemas/pet.json"
# order = "schemas/order.yaml"
# inventory = "schemas/inventory.json"
"#
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read {0}: {1}")]
    Io(PathBuf, String),
    #[error("Parse error: {0}")]
    Parse(String),
}
