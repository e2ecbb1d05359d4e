//! Unit and revenue conversion.

use crate::config::defaults::SCF_PER_MCF;
use crate::config::{PricingConfig, UnitConfig};
use crate::types::Observation;

/// Converted daily volumes and revenue of one observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Converted {
    pub oil_m3: f64,
    pub gas_m3: f64,
    pub water_m3: f64,
    pub daily_revenue: f64,
}

/// Revenue from oil at the Brent price plus gas at the per-MCF price.
pub fn daily_revenue(oil_bbl: f64, gas_scf: f64, pricing: &PricingConfig) -> f64 {
    oil_bbl * pricing.brent_usd_per_bbl + (gas_scf / SCF_PER_MCF) * pricing.gas_usd_per_mcf
}

pub fn convert(obs: &Observation, units: &UnitConfig, pricing: &PricingConfig) -> Converted {
    Converted {
        oil_m3: obs.oil * units.bbl_to_m3,
        gas_m3: obs.gas * units.scf_to_m3,
        water_m3: obs.water * units.bbl_to_m3,
        daily_revenue: daily_revenue(obs.oil, obs.gas, pricing),
    }
}
