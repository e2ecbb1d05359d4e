//! Dashboard Configuration - pricing, units and scoring as TOML values
//!
//! Each section implements `Default` with the reference constants from
//! `defaults`, so an absent or partial config file behaves identically to
//! the built-in settings.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;
use super::validation;

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "PRODVIEW_CONFIG";

/// Environment variable overriding `server.addr`.
pub const SERVER_ADDR_ENV_VAR: &str = "PRODVIEW_SERVER_ADDR";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a dashboard deployment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Production table location
    #[serde(default)]
    pub data: DataConfig,

    /// Commodity prices used for revenue
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Source-unit to cubic-metre factors
    #[serde(default)]
    pub units: UnitConfig,

    /// Heterogeneity index scoring
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Ingestion rules
    #[serde(default)]
    pub ingest: IngestConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

impl DashboardConfig {
    /// Load configuration using the standard search order.
    ///
    /// An explicitly named file must load; the env var and local file fall
    /// back to defaults with a warning when they cannot be read.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            let config = Self::load_from_file(path)?;
            info!(path = %path.display(), "Loaded dashboard config");
            return Ok(config);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded dashboard config from {}", CONFIG_ENV_VAR);
                        return Ok(config);
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", CONFIG_ENV_VAR);
            }
        }

        let local = PathBuf::from(defaults::LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded dashboard config from ./{}", defaults::LOCAL_CONFIG_FILE);
                    return Ok(config);
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", defaults::LOCAL_CONFIG_FILE);
                }
            }
        }

        info!("No {} found, using built-in defaults", defaults::LOCAL_CONFIG_FILE);
        Ok(Self::default())
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    ///
    /// Unknown keys are logged as warnings and never fail the load.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate ranges; suspicious-but-legal values are logged, impossible
    /// values are returned as errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (errors, warnings) = validation::validate_ranges(self);
        for w in &warnings {
            warn!("{}", w);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Bind address after applying the `PRODVIEW_SERVER_ADDR` override.
    pub fn server_addr(&self) -> String {
        std::env::var(SERVER_ADDR_ENV_VAR).unwrap_or_else(|_| self.server.addr.clone())
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config validation failed:\n{}", bullet_list(.0))]
    Validation(Vec<String>),
}

fn bullet_list(errors: &[String]) -> String {
    errors.iter().map(|e| format!("  - {e}\n")).collect()
}

// ============================================================================
// Sections
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// CSV export of the all-wells production sheet.
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
}

fn default_data_path() -> PathBuf {
    PathBuf::from(defaults::DATA_PATH)
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
        }
    }
}

/// Fixed commodity prices. There is no live pricing feed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_brent")]
    pub brent_usd_per_bbl: f64,
    #[serde(default = "default_gas_price")]
    pub gas_usd_per_mcf: f64,
}

fn default_brent() -> f64 {
    defaults::BRENT_USD_PER_BBL
}

fn default_gas_price() -> f64 {
    defaults::GAS_USD_PER_MCF
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            brent_usd_per_bbl: default_brent(),
            gas_usd_per_mcf: default_gas_price(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitConfig {
    #[serde(default = "default_bbl_to_m3")]
    pub bbl_to_m3: f64,
    #[serde(default = "default_scf_to_m3")]
    pub scf_to_m3: f64,
}

fn default_bbl_to_m3() -> f64 {
    defaults::BBL_TO_M3
}

fn default_scf_to_m3() -> f64 {
    defaults::SCF_TO_M3
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            bbl_to_m3: default_bbl_to_m3(),
            scf_to_m3: default_scf_to_m3(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Drop zero-oil wells from the HI scoring set, as the snapshot table does.
    #[serde(default)]
    pub exclude_zero_oil: bool,
    #[serde(default = "default_oil_hi")]
    pub oil_hi_threshold: f64,
    #[serde(default = "default_gas_hi")]
    pub gas_hi_threshold: f64,
    #[serde(default = "default_water_hi")]
    pub water_hi_threshold: f64,
}

fn default_oil_hi() -> f64 {
    defaults::OIL_HI_THRESHOLD
}

fn default_gas_hi() -> f64 {
    defaults::GAS_HI_THRESHOLD
}

fn default_water_hi() -> f64 {
    defaults::WATER_HI_THRESHOLD
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            exclude_zero_oil: false,
            oil_hi_threshold: default_oil_hi(),
            gas_hi_threshold: default_gas_hi(),
            water_hi_threshold: default_water_hi(),
        }
    }
}

/// What to do with several rows for the same well and date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Merge into one observation by summing volumes.
    #[default]
    Sum,
    /// Fail ingestion.
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server bind address.
    ///
    /// Can be overridden by `PRODVIEW_SERVER_ADDR` or `serve --addr`.
    #[serde(default = "default_server_addr")]
    pub addr: String,
}

fn default_server_addr() -> String {
    defaults::SERVER_ADDR.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
        }
    }
}
