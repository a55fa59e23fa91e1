//! Field lookup over raw catalog records.
//!
//! The event API has changed shape over time: older releases nest every
//! parameter under `parameters` as a statistics object (`{"best": .., "median": ..}`),
//! newer ones put flat scalars on the record itself, and spellings differ
//! (`mass_1_source` vs `m1_source`). Each lookup here is a pure function that
//! answers present/absent; callers decide whether absence is fatal.

use serde_json::Value;

/// Statistics sub-keys, probed in order when a parameter is an object
const STAT_KEYS: &[&str] = &["best", "median"];

/// Legacy container holding per-event parameters
const PARAMETERS_BLOCK: &str = "parameters";

// Accepted spellings, in precedence order. The order mirrors how the API evolved; keep it.
pub const MASS_1_SOURCE: &[&str] = &["mass_1_source", "m1_source"];
pub const MASS_2_SOURCE: &[&str] = &["mass_2_source", "m2_source"];
pub const MASS_1_DETECTOR: &[&str] = &["mass_1", "m1"];
pub const MASS_2_DETECTOR: &[&str] = &["mass_2", "m2"];
pub const CHIRP_MASS: &[&str] = &["chirp_mass_source", "chirp_mass"];
pub const MASS_RATIO: &[&str] = &["mass_ratio", "q"];
pub const SNR: &[&str] = &["network_matched_filter_snr", "snr"];
pub const LUMINOSITY_DISTANCE: &[&str] = &["luminosity_distance"];
pub const CHI_EFF: &[&str] = &["chi_eff"];
pub const TOTAL_MASS_SOURCE: &[&str] = &["total_mass_source"];
pub const CHIRP_MASS_SOURCE: &[&str] = &["chirp_mass_source"];
pub const REDSHIFT: &[&str] = &["redshift"];
pub const FINAL_MASS: &[&str] = &["final_mass_source", "final_mass"];
pub const FINAL_SPIN: &[&str] = &["final_spin"];
pub const FAR: &[&str] = &["far"];
pub const P_ASTRO: &[&str] = &["p_astro"];
pub const COMMON_NAME: &[&str] = &["commonName"];
pub const CATALOG: &[&str] = &["catalog.shortName", "catalog"];
pub const VERSION: &[&str] = &["version"];
pub const GPS: &[&str] = &["GPS", "gps"];

/// Scalar carried by a field value: flat scalars as-is, statistics objects via `best`/`median`.
fn field_scalar(value: &Value) -> Option<&Value> {
    match value {
        Value::Null => None,
        Value::Object(stats) => STAT_KEYS
            .iter()
            .filter_map(|key| stats.get(*key))
            .find(|v| !v.is_null()),
        other => Some(other),
    }
}

/// The record itself, then its legacy `parameters` block when present.
fn scopes(record: &Value) -> impl Iterator<Item = &Value> {
    std::iter::once(record).chain(record.get(PARAMETERS_BLOCK))
}

/// First non-null value for any of `names`, trying spellings in order.
pub fn lookup<'a>(record: &'a Value, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| {
        scopes(record)
            .filter_map(|scope| scope.get(*name))
            .find_map(field_scalar)
    })
}

/// First hit across several spelling groups, groups tried in order.
pub fn lookup_any<'a>(record: &'a Value, strategies: &[&[&str]]) -> Option<&'a Value> {
    strategies.iter().find_map(|names| lookup(record, names))
}

/// Numeric coercion; numeric strings are accepted, non-finite values are not.
pub fn as_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

pub fn lookup_f64(record: &Value, names: &[&str]) -> Option<f64> {
    lookup(record, names).and_then(as_f64)
}

pub fn lookup_str<'a>(record: &'a Value, names: &[&str]) -> Option<&'a str> {
    lookup(record, names).and_then(Value::as_str)
}

/// Numeric field that is present and non-zero
pub fn lookup_nonzero(record: &Value, names: &[&str]) -> Option<f64> {
    lookup_f64(record, names).filter(|v| *v != 0.0)
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
