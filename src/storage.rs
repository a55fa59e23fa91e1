use crate::error::Result;
use crate::types::{sort_most_recent_first, CanonicalEventRecord, EventVersionGroup, SourceType};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Per-source-type event counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCounts {
    #[serde(rename = "BBH")]
    pub bbh: usize,
    #[serde(rename = "NSBH")]
    pub nsbh: usize,
    #[serde(rename = "BNS")]
    pub bns: usize,
}

impl SourceCounts {
    pub fn tally(records: &[CanonicalEventRecord]) -> Self {
        records.iter().fold(Self::default(), |mut counts, r| {
            match r.source_type {
                SourceType::Bbh => counts.bbh += 1,
                SourceType::Nsbh => counts.nsbh += 1,
                SourceType::Bns => counts.bns += 1,
            }
            counts
        })
    }
}

/// On-disk document read by the visualization front-end
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub updated: String,
    /// Resolved records before catalog exclusion
    pub total_entries: usize,
    /// Number of primary events written under `events`
    pub event_count: usize,
    pub filtered_entries: usize,
    pub unique_events: usize,
    pub source_counts: SourceCounts,
    /// One primary record per event, most recent first
    pub events: Vec<CanonicalEventRecord>,
    /// Every retained version, most recent first
    pub all_events: Vec<CanonicalEventRecord>,
}

/// Counts reported back to the operator after a write
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSummary {
    pub total_entries: usize,
    pub filtered_entries: usize,
    pub unique_events: usize,
    pub source_counts: SourceCounts,
    pub output_path: PathBuf,
}

impl CatalogDocument {
    pub fn build(
        total_entries: usize,
        filtered: &[CanonicalEventRecord],
        groups: &BTreeMap<String, EventVersionGroup>,
    ) -> Self {
        let mut events: Vec<CanonicalEventRecord> =
            groups.values().map(|g| g.primary.clone()).collect();
        sort_most_recent_first(&mut events);

        let mut all_events = filtered.to_vec();
        sort_most_recent_first(&mut all_events);

        Self {
            updated: Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            total_entries,
            event_count: events.len(),
            filtered_entries: all_events.len(),
            unique_events: groups.len(),
            source_counts: SourceCounts::tally(&events),
            events,
            all_events,
        }
    }
}

/// Write the catalog document to `path`, creating parent directories and
/// overwriting any previous file.
#[instrument(skip(path, filtered, groups), fields(path = %path.display()))]
pub fn write_catalog(
    path: &Path,
    total_entries: usize,
    filtered: &[CanonicalEventRecord],
    groups: &BTreeMap<String, EventVersionGroup>,
) -> Result<CatalogSummary> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let document = CatalogDocument::build(total_entries, filtered, groups);
    let json_content = serde_json::to_string_pretty(&document)?;
    fs::write(path, json_content)?;

    info!(
        "Saved {} events ({} versions) to {}",
        document.unique_events,
        document.filtered_entries,
        path.display()
    );

    Ok(CatalogSummary {
        total_entries: document.total_entries,
        filtered_entries: document.filtered_entries,
        unique_events: document.unique_events,
        source_counts: document.source_counts,
        output_path: path.to_path_buf(),
    })
}
