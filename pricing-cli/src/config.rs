//! `autopricing.toml` loading.
//!
//! Values are layered: built-in defaults, then the config file, then the
//! command-line overrides. The result is validated before use.

use std::fs;
use std::path::{Path, PathBuf};

use pricing_core::ParsePolicy;
use pricing_core::store::StoreConfig;
use serde::Deserialize;
use thiserror::Error;

/// File looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "autopricing.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub store: StoreSettings,
    pub log: LogSettings,
    pub pricing: PricingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub backend: String,
    pub connection: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingSettings {
    pub strict: bool,
    pub currency_symbol: String,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub backend: Option<String>,
    pub connection: Option<String>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    pub strict: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config path. Unlike the default location it must exist.
    pub config_path: Option<PathBuf>,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreSettings {
                backend: "sqlite".to_string(),
                connection: "autopricing.db".to_string(),
            },
            log: LogSettings {
                level: "info".to_string(),
                file: None,
            },
            pricing: PricingSettings {
                strict: false,
                currency_symbol: "$".to_string(),
            },
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = match options.config_path {
            Some(path) => Some(path),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            }
        };
        if let Some(path) = path {
            config.apply_patch(read_patch(&path)?);
        }

        config.apply_overrides(options.overrides);
        config.validate()?;
        Ok(config)
    }

    /// Parses `raw` as a config file on top of the defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let patch = toml::from_str::<ConfigPatch>(raw).map_err(|source| ConfigError::ParseFile {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        let mut config = Self::default();
        config.apply_patch(patch);
        config.validate()?;
        Ok(config)
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            backend: self.store.backend.clone(),
            connection_string: self.store.connection.clone(),
        }
    }

    pub fn parse_policy(&self) -> ParsePolicy {
        if self.pricing.strict {
            ParsePolicy::Strict
        } else {
            ParsePolicy::Lenient
        }
    }

    fn apply_patch(
        &mut self,
        patch: ConfigPatch,
    ) {
        if let Some(store) = patch.store {
            if let Some(backend) = store.backend {
                self.store.backend = backend;
            }
            if let Some(connection) = store.connection {
                self.store.connection = connection;
            }
        }

        if let Some(log) = patch.log {
            if let Some(level) = log.level {
                self.log.level = level;
            }
            if let Some(file) = log.file {
                self.log.file = Some(file);
            }
        }

        if let Some(pricing) = patch.pricing {
            if let Some(strict) = pricing.strict {
                self.pricing.strict = strict;
            }
            if let Some(currency_symbol) = pricing.currency_symbol {
                self.pricing.currency_symbol = currency_symbol;
            }
        }
    }

    fn apply_overrides(
        &mut self,
        overrides: ConfigOverrides,
    ) {
        if let Some(backend) = overrides.backend {
            self.store.backend = backend;
        }
        if let Some(connection) = overrides.connection {
            self.store.connection = connection;
        }
        if let Some(level) = overrides.log_level {
            self.log.level = level;
        }
        if let Some(file) = overrides.log_file {
            self.log.file = Some(file);
        }
        if let Some(strict) = overrides.strict {
            self.pricing.strict = strict;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.backend.trim().is_empty() {
            return Err(ConfigError::Validation(
                "store.backend must not be empty".to_string(),
            ));
        }
        if self.store.connection.trim().is_empty() {
            return Err(ConfigError::Validation(
                "store.connection must not be empty".to_string(),
            ));
        }
        if self.log.level.trim().is_empty() {
            return Err(ConfigError::Validation("log.level must not be empty".to_string()));
        }
        if self.pricing.currency_symbol.is_empty() {
            return Err(ConfigError::Validation(
                "pricing.currency_symbol must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    toml::from_str::<ConfigPatch>(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigPatch {
    store: Option<StorePatch>,
    log: Option<LogPatch>,
    pricing: Option<PricingPatch>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StorePatch {
    backend: Option<String>,
    connection: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LogPatch {
    level: Option<String>,
    file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PricingPatch {
    strict: Option<bool>,
    currency_symbol: Option<String>,
}
