use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Default bound on a single delivery attempt. A stuck send must not starve
/// the timer that re-arms the next day.
pub const DEFAULT_DELIVERY_TIMEOUT_SECS: u64 = 30;

/// Top-level config (ecotip.toml + ECOTIP_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EcotipConfig {
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub tips: TipsConfig,
    #[serde(default)]
    pub delivery: DeliveryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Optional catalog override. Empty means the built-in tips are used.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TipsConfig {
    #[serde(default)]
    pub catalog: Vec<String>,
}

impl TipsConfig {
    /// Resolve the configured catalog, falling back to the built-in tips.
    pub fn to_catalog(&self) -> crate::error::Result<crate::tips::TipCatalog> {
        if self.catalog.is_empty() {
            Ok(crate::tips::TipCatalog::default())
        } else {
            crate::tips::TipCatalog::new(self.catalog.clone())
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    #[serde(default = "default_delivery_timeout")]
    pub timeout_secs: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_delivery_timeout(),
        }
    }
}

fn default_delivery_timeout() -> u64 {
    DEFAULT_DELIVERY_TIMEOUT_SECS
}

fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.ecotip/ecotip.db", home)
}

impl EcotipConfig {
    /// Load config from a TOML file with ECOTIP_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.ecotip/ecotip.toml
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: EcotipConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("ECOTIP_").split("_"))
            .extract()
            .map_err(|e| crate::error::EcotipError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.ecotip/ecotip.toml", home)
}
