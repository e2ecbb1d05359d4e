//! Dashboard Configuration Module
//!
//! Pricing, unit conversion, scoring thresholds and service settings loaded
//! from TOML, replacing the constants the metrics pipeline would otherwise
//! hardcode.
//!
//! ## Loading Order
//!
//! 1. Path passed on the command line (`--config`), errors are fatal
//! 2. `PRODVIEW_CONFIG` environment variable (path to TOML file)
//! 3. `prodview.toml` in the current working directory
//! 4. Built-in defaults
//!
//! The loaded config is passed explicitly to each pipeline stage; there is
//! no global instance.

mod dashboard_config;
pub mod defaults;
pub mod validation;

pub use dashboard_config::*;
