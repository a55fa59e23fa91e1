use crate::constants::{BBH_COLOR, BNS_COLOR, NSBH_COLOR, NS_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Raw per-event parameter record exactly as the upstream catalog delivers it
pub type RawEventRecord = serde_json::Value;

/// Event identifier -> raw record, as found under the `events` key of the API body
pub type RawCatalog = serde_json::Map<String, RawEventRecord>;

/// Astrophysical source classification derived from component masses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceType {
    #[serde(rename = "BNS")]
    Bns,
    #[serde(rename = "NSBH")]
    Nsbh,
    #[serde(rename = "BBH")]
    Bbh,
}

impl SourceType {
    /// Classify an ordered (`m1 >= m2`) mass pair against `NS_THRESHOLD`.
    pub fn classify(m1: f64, m2: f64) -> Self {
        if m2 < NS_THRESHOLD && m1 < NS_THRESHOLD {
            SourceType::Bns
        } else if m2 < NS_THRESHOLD {
            SourceType::Nsbh
        } else {
            SourceType::Bbh
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            SourceType::Bns => BNS_COLOR,
            SourceType::Nsbh => NSBH_COLOR,
            SourceType::Bbh => BBH_COLOR,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Bns => "BNS",
            SourceType::Nsbh => "NSBH",
            SourceType::Bbh => "BBH",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog version identifier; the API reports integers, older dumps strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventVersion {
    Number(i64),
    Text(String),
}

impl fmt::Display for EventVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventVersion::Number(n) => write!(f, "{n}"),
            EventVersion::Text(s) => f.write_str(s),
        }
    }
}

/// Lightweight pointer to one catalog version of an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRef {
    pub full_name: String,
    pub catalog: String,
    pub version: EventVersion,
}

/// Normalized event record written to the output file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEventRecord {
    pub name: String,
    pub full_name: String,
    pub m1: f64,
    pub m2: f64,
    pub snr: f64,
    pub source_type: SourceType,
    pub color: String,
    pub detection_date: String,
    pub catalog: String,
    pub version: EventVersion,
    pub gps_time: Option<f64>,
    pub luminosity_distance: Option<f64>,
    pub chi_eff: Option<f64>,
    pub total_mass_source: Option<f64>,
    pub chirp_mass_source: Option<f64>,
    pub redshift: Option<f64>,
    pub final_mass_source: Option<f64>,
    pub final_spin: Option<f64>,
    pub far: Option<f64>,
    pub p_astro: Option<f64>,
    #[serde(default)]
    pub is_primary: bool,
    /// Ranked versions of this event; only populated on primary records
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<VersionRef>,
}

impl CanonicalEventRecord {
    pub fn version_ref(&self) -> VersionRef {
        VersionRef {
            full_name: self.full_name.clone(),
            catalog: self.catalog.clone(),
            version: self.version.clone(),
        }
    }
}

/// All retained catalog versions of one physical event
#[derive(Debug, Clone, PartialEq)]
pub struct EventVersionGroup {
    pub name: String,
    /// Members ranked by catalog priority, best first
    pub versions: Vec<CanonicalEventRecord>,
    pub primary: CanonicalEventRecord,
    pub version_count: usize,
}

/// Stable sort by `gps_time`, most recent first; records without a GPS time go last.
pub fn sort_most_recent_first(records: &mut [CanonicalEventRecord]) {
    records.sort_by(|a, b| match (a.gps_time, b.gps_time) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Core trait that every event catalog source implements
#[async_trait::async_trait]
pub trait EventSource: Send + Sync {
    /// Identifier used in logs and metrics
    fn source_name(&self) -> &str;

    /// Fetch the raw catalog. Failures are reported and yield an empty catalog.
    async fn fetch(&self) -> RawCatalog;
}
