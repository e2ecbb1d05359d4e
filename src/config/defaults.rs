//! System-wide default constants.
//!
//! Every tunable here is mirrored by a field in `DashboardConfig`; these are
//! the values used when no config file sets them.

// ============================================================================
// Units
// ============================================================================

/// Barrels to cubic metres.
pub const BBL_TO_M3: f64 = 0.159;

/// Standard cubic feet to cubic metres.
pub const SCF_TO_M3: f64 = 0.0283;

/// Standard cubic feet per MCF (thousand cubic feet), the gas pricing unit.
pub const SCF_PER_MCF: f64 = 1_000.0;

// ============================================================================
// Pricing
// ============================================================================

/// Brent crude reference price (USD per barrel).
pub const BRENT_USD_PER_BBL: f64 = 80.0;

/// Natural gas reference price (USD per MCF).
pub const GAS_USD_PER_MCF: f64 = 3.5;

// ============================================================================
// Heterogeneity scoring
// ============================================================================

/// Oil HI above which artificial lift / stimulation is recommended.
pub const OIL_HI_THRESHOLD: f64 = 0.3;

/// Gas HI above which a gas lift / compression review is recommended.
pub const GAS_HI_THRESHOLD: f64 = 0.3;

/// Water HI above which water management is recommended.
///
/// Water HI carries a +1 offset, so 2.0 means a 100% deviation from average.
pub const WATER_HI_THRESHOLD: f64 = 2.0;

// ============================================================================
// Service
// ============================================================================

/// Default HTTP bind address.
pub const SERVER_ADDR: &str = "0.0.0.0:8080";

/// Default production table location.
pub const DATA_PATH: &str = "data/all_wells.csv";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "prodview.toml";
