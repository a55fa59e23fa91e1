use crate::constants::{DEFAULT_SNR, GPS_EPOCH_OFFSET, UNKNOWN_CATALOG, UNKNOWN_DATE, UNKNOWN_VERSION};
use crate::pipeline::fields::{self, as_f64, lookup, lookup_any, lookup_f64, lookup_nonzero, lookup_str, round_to};
use crate::types::{CanonicalEventRecord, EventVersion, RawCatalog, RawEventRecord, SourceType};
use chrono::DateTime;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

/// Direct-mass strategies for the primary component, in precedence order
const M1_STRATEGIES: &[&[&str]] = &[fields::MASS_1_SOURCE, fields::MASS_1_DETECTOR];
/// Direct-mass strategies for the secondary component, in precedence order
const M2_STRATEGIES: &[&[&str]] = &[fields::MASS_2_SOURCE, fields::MASS_2_DETECTOR];

/// Why a raw record could not become a canonical record
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipReason {
    #[error("insufficient mass data")]
    MissingMass,
    #[error("non-numeric mass value {0}")]
    NonNumericMass(String),
}

/// Resolve every raw record; unresolvable records are dropped and reported.
/// Output keeps input order.
pub fn resolve(raw: &RawCatalog) -> Vec<CanonicalEventRecord> {
    let mut resolved = Vec::with_capacity(raw.len());
    for (event_id, record) in raw {
        match resolve_event(event_id, record) {
            Ok(event) => resolved.push(event),
            Err(reason) => {
                debug!(event_id = %event_id, "dropping record: {}", reason);
                println!("Skipping {event_id}: {reason}");
            }
        }
    }
    info!(
        "Resolved {} of {} events with complete mass data",
        resolved.len(),
        raw.len()
    );
    resolved
}

/// Normalize a single raw record.
pub fn resolve_event(
    event_id: &str,
    record: &RawEventRecord,
) -> Result<CanonicalEventRecord, SkipReason> {
    let (m1, m2) = resolve_masses(record)?;
    let source_type = SourceType::classify(m1, m2);
    let gps_time = lookup_f64(record, fields::GPS);

    let snr = lookup_nonzero(record, fields::SNR).unwrap_or(DEFAULT_SNR);

    Ok(CanonicalEventRecord {
        name: display_name(event_id, record),
        full_name: event_id.to_string(),
        m1: round_to(m1, 2),
        m2: round_to(m2, 2),
        snr: round_to(snr, 1),
        source_type,
        color: source_type.color().to_string(),
        detection_date: detection_date(gps_time),
        catalog: lookup_str(record, fields::CATALOG)
            .unwrap_or(UNKNOWN_CATALOG)
            .to_string(),
        version: event_version(record),
        gps_time,
        luminosity_distance: rounded(record, fields::LUMINOSITY_DISTANCE, 1),
        chi_eff: rounded(record, fields::CHI_EFF, 3),
        total_mass_source: rounded(record, fields::TOTAL_MASS_SOURCE, 2),
        chirp_mass_source: rounded(record, fields::CHIRP_MASS_SOURCE, 2),
        redshift: rounded(record, fields::REDSHIFT, 3),
        final_mass_source: rounded(record, fields::FINAL_MASS, 2),
        final_spin: rounded(record, fields::FINAL_SPIN, 3),
        // False-alarm rates span many decades; fixed-point rounding would zero them
        far: lookup_nonzero(record, fields::FAR),
        p_astro: rounded(record, fields::P_ASTRO, 3),
        is_primary: false,
        versions: Vec::new(),
    })
}

fn rounded(record: &RawEventRecord, names: &[&str], places: i32) -> Option<f64> {
    lookup_nonzero(record, names).map(|v| round_to(v, places))
}

/// Resolve `(m1, m2)` with `m1 >= m2`: direct source-frame, then detector-frame,
/// then, when either is still missing, the pair derived from chirp mass and mass ratio.
fn resolve_masses(record: &RawEventRecord) -> Result<(f64, f64), SkipReason> {
    let m1 = direct_mass(record, M1_STRATEGIES)?;
    let m2 = direct_mass(record, M2_STRATEGIES)?;

    let (m1, m2) = match (m1, m2) {
        (Some(m1), Some(m2)) => (m1, m2),
        // A derived pair replaces both masses so m2/m1 stays equal to the reported ratio
        _ => derived_masses(record).ok_or(SkipReason::MissingMass)?,
    };

    if m1 < m2 {
        Ok((m2, m1))
    } else {
        Ok((m1, m2))
    }
}

fn direct_mass(
    record: &RawEventRecord,
    strategies: &[&[&str]],
) -> Result<Option<f64>, SkipReason> {
    match lookup_any(record, strategies) {
        None => Ok(None),
        Some(value) => as_f64(value)
            .map(Some)
            .ok_or_else(|| SkipReason::NonNumericMass(value.to_string())),
    }
}

fn derived_masses(record: &RawEventRecord) -> Option<(f64, f64)> {
    let chirp_mass = lookup_f64(record, fields::CHIRP_MASS)?;
    let mass_ratio = lookup_f64(record, fields::MASS_RATIO)?;
    masses_from_chirp(chirp_mass, mass_ratio)
}

/// Component masses from chirp mass `Mc` and mass ratio `q = m2/m1`:
/// `m1 = Mc * (1+q)^(1/5) * q^(-3/5)`, `m2 = m1 * q`.
/// Only ratios in `(0, 1]` are accepted.
pub fn masses_from_chirp(chirp_mass: f64, mass_ratio: f64) -> Option<(f64, f64)> {
    if !(chirp_mass > 0.0 && mass_ratio > 0.0 && mass_ratio <= 1.0) {
        return None;
    }
    let q = mass_ratio;
    let m1 = chirp_mass * (1.0 + q).powf(0.2) * q.powf(-0.6);
    Some((m1, m1 * q))
}

/// UTC calendar date of a GPS timestamp, or `UNKNOWN_DATE` when it cannot be converted.
pub fn detection_date(gps_time: Option<f64>) -> String {
    gps_time
        .map(|gps| gps + GPS_EPOCH_OFFSET as f64)
        .filter(|unix| unix.is_finite())
        .and_then(|unix| DateTime::from_timestamp(unix.floor() as i64, 0))
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}

/// `commonName` when reported, otherwise the event key without its `-vN` suffix.
fn display_name(event_id: &str, record: &RawEventRecord) -> String {
    match lookup_str(record, fields::COMMON_NAME) {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => strip_version_suffix(event_id).to_string(),
    }
}

fn strip_version_suffix(event_id: &str) -> &str {
    match event_id.rsplit_once("-v") {
        Some((base, digits))
            if !base.is_empty()
                && !digits.is_empty()
                && digits.chars().all(|c| c.is_ascii_digit()) =>
        {
            base
        }
        _ => event_id,
    }
}

fn event_version(record: &RawEventRecord) -> EventVersion {
    match lookup(record, fields::VERSION) {
        Some(Value::Number(n)) => match n.as_i64() {
            Some(v) => EventVersion::Number(v),
            None => EventVersion::Text(n.to_string()),
        },
        Some(Value::String(s)) => EventVersion::Text(s.clone()),
        _ => EventVersion::Text(UNKNOWN_VERSION.to_string()),
    }
}
