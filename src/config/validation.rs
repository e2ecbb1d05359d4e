//! Config validation: unknown-key detection with Levenshtein suggestions
//! and range checks.
//!
//! Unknown keys are found by walking the raw `toml::Value` tree before serde
//! deserialization, which silently ignores them. Warnings never break a config.

use std::collections::HashSet;

use super::DashboardConfig;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Every valid dotted key path of `DashboardConfig`.
///
/// Must be kept in step with the structs in `dashboard_config.rs`.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        "data",
        "data.path",
        "pricing",
        "pricing.brent_usd_per_bbl",
        "pricing.gas_usd_per_mcf",
        "units",
        "units.bbl_to_m3",
        "units.scf_to_m3",
        "scoring",
        "scoring.exclude_zero_oil",
        "scoring.oil_hi_threshold",
        "scoring.gas_hi_threshold",
        "scoring.water_hi_threshold",
        "ingest",
        "ingest.duplicate_policy",
        "server",
        "server.addr",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively collect all dotted key paths of a `toml::Value` tree.
///
/// `{ a = { b = 1, c = 2 } }` yields `["a", "a.b", "a.c"]`.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Closest known key within edit distance 3, ties broken alphabetically.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|k| (levenshtein(unknown, k), *k))
        .filter(|(dist, _)| *dist <= 3)
        .min()
        .map(|(_, k)| k.to_string())
}

/// Warn on every key in `raw_toml` that `DashboardConfig` does not define.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // serde reports the parse error
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Range Validation
// ============================================================================

/// Returns (errors, warnings). Errors are values no computation can use.
pub fn validate_ranges(config: &DashboardConfig) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let prices = [
        ("pricing.brent_usd_per_bbl", config.pricing.brent_usd_per_bbl),
        ("pricing.gas_usd_per_mcf", config.pricing.gas_usd_per_mcf),
    ];
    for (field, value) in prices {
        if !value.is_finite() || value < 0.0 {
            errors.push(format!("{field} = {value} must be a finite, non-negative price"));
        }
    }

    let factors = [
        ("units.bbl_to_m3", config.units.bbl_to_m3),
        ("units.scf_to_m3", config.units.scf_to_m3),
    ];
    for (field, value) in factors {
        if !value.is_finite() || value <= 0.0 {
            errors.push(format!("{field} = {value} must be > 0"));
        }
    }

    let thresholds = [
        ("scoring.oil_hi_threshold", config.scoring.oil_hi_threshold),
        ("scoring.gas_hi_threshold", config.scoring.gas_hi_threshold),
        ("scoring.water_hi_threshold", config.scoring.water_hi_threshold),
    ];
    for (field, value) in thresholds {
        if !value.is_finite() {
            errors.push(format!("{field} = {value} must be finite"));
        }
    }

    // Oil and gas HI never exceed 1.0; a higher threshold disables the rule
    for (field, value) in &thresholds[..2] {
        if *value >= 1.0 {
            warnings.push(ValidationWarning {
                field: (*field).to_string(),
                message: format!("{field} = {value} is >= 1.0, the rule can never fire"),
                suggestion: None,
            });
        }
    }

    // Water HI is offset by +1, so anything at or below 1.0 always fires
    let water = config.scoring.water_hi_threshold;
    if water.is_finite() && water < 1.0 {
        warnings.push(ValidationWarning {
            field: "scoring.water_hi_threshold".to_string(),
            message: format!(
                "scoring.water_hi_threshold = {water} is below 1.0, every flagged well gets the water action"
            ),
            suggestion: None,
        });
    }

    (errors, warnings)
}
