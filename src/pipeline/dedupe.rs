use crate::constants::{catalog_priority, is_excluded_catalog};
use crate::types::{sort_most_recent_first, CanonicalEventRecord, EventVersionGroup, VersionRef};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use tracing::debug;

/// Result of reconciling overlapping catalog releases
#[derive(Debug, Clone, PartialEq)]
pub struct Deduplication {
    /// Every record that survived catalog exclusion, in input order
    pub filtered: Vec<CanonicalEventRecord>,
    /// Version groups keyed by event name
    pub groups: BTreeMap<String, EventVersionGroup>,
}

impl Deduplication {
    /// One primary record per physical event, most recent first
    pub fn primaries(&self) -> Vec<CanonicalEventRecord> {
        let mut primaries: Vec<CanonicalEventRecord> =
            self.groups.values().map(|g| g.primary.clone()).collect();
        sort_most_recent_first(&mut primaries);
        primaries
    }

    pub fn excluded_count(&self, total: usize) -> usize {
        total.saturating_sub(self.filtered.len())
    }
}

/// Drop excluded catalogs, group by event name and pick the highest-priority
/// version of each event as its primary record.
pub fn deduplicate(records: Vec<CanonicalEventRecord>) -> Deduplication {
    let total = records.len();
    let filtered: Vec<CanonicalEventRecord> = records
        .into_iter()
        .filter(|r| !is_excluded_catalog(&r.catalog))
        .collect();
    debug!(
        "Excluded {} records from superseded or low-confidence catalogs",
        total - filtered.len()
    );

    let mut by_name: BTreeMap<String, Vec<CanonicalEventRecord>> = BTreeMap::new();
    for record in &filtered {
        by_name
            .entry(record.name.clone())
            .or_default()
            .push(record.clone());
    }

    let groups = by_name
        .into_iter()
        .filter_map(|(name, mut versions)| {
            // Stable: equal priorities keep their input order
            versions.sort_by_key(|r| Reverse(catalog_priority(&r.catalog)));
            let primary = select_primary(&versions)?;
            Some((
                name.clone(),
                EventVersionGroup {
                    name,
                    version_count: versions.len(),
                    versions,
                    primary,
                },
            ))
        })
        .collect();

    Deduplication { filtered, groups }
}

/// Clone the top-ranked record, tag it primary and attach the ranked version list.
/// Version lists already carried by members are merged rather than replaced.
fn select_primary(ranked: &[CanonicalEventRecord]) -> Option<CanonicalEventRecord> {
    let mut primary = ranked.first()?.clone();

    let mut refs: Vec<VersionRef> = Vec::new();
    for record in ranked {
        let known = if record.versions.is_empty() {
            vec![record.version_ref()]
        } else {
            record.versions.clone()
        };
        for version in known {
            if !refs.iter().any(|r| r.full_name == version.full_name) {
                refs.push(version);
            }
        }
    }

    primary.is_primary = true;
    primary.versions = refs;
    Some(primary)
}
