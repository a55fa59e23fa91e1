/// Source and output constants shared across the fetcher.
/// The catalog tables at the bottom drive deduplication; adding a catalog release
/// is a data change here, not a logic change in the pipeline.

// Upstream event catalog (GWOSC event API); `jsonfull` carries flat per-version parameters
pub const GWOSC_EVENTS_URL: &str = "https://gwosc.org/eventapi/jsonfull/allevents/";
pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

// Output artifact consumed by the visualization front-end
pub const DEFAULT_OUTPUT_PATH: &str = "data/gw_events.json";
pub const DEFAULT_CONFIG_PATH: &str = "gwosc.toml";

/// Unix timestamp of the GPS epoch (1980-01-06T00:00:00Z).
pub const GPS_EPOCH_OFFSET: i64 = 315_964_800;

/// Component mass (solar masses) below which an object is treated as a neutron star.
pub const NS_THRESHOLD: f64 = 3.0;

/// SNR reported when the record carries no usable network SNR.
pub const DEFAULT_SNR: f64 = 10.0;

/// Detection date sentinel for records whose GPS time cannot be converted.
pub const UNKNOWN_DATE: &str = "Unknown";

pub const UNKNOWN_CATALOG: &str = "Unknown";
pub const UNKNOWN_VERSION: &str = "unknown";

// Presentation colors, one per source type
pub const BNS_COLOR: &str = "#3498db";
pub const NSBH_COLOR: &str = "#e67e22";
pub const BBH_COLOR: &str = "#9b59b6";

/// Catalog releases ranked for primary-record selection; higher wins.
/// Catalogs missing from this table rank at `DEFAULT_CATALOG_PRIORITY`.
pub const CATALOG_PRIORITY: &[(&str, u32)] = &[
    ("GWTC-4.0", 60),
    ("GWTC-3-confident", 50),
    ("GWTC-2.1-confident", 40),
    ("GWTC-1-confident", 30),
    ("O4_Discovery_Papers", 20),
    ("O3_Discovery_Papers", 15),
    ("O3_IMBH_marginal", 5),
];

pub const DEFAULT_CATALOG_PRIORITY: u32 = 0;

/// Superseded or low-confidence releases; their records never reach the output.
pub const EXCLUDED_CATALOGS: &[&str] = &[
    "GWTC-2",
    "GWTC-1-marginal",
    "GWTC-2.1-marginal",
    "GWTC-2.1-auxiliary",
    "GWTC-3-marginal",
    "O1_O2-Preliminary",
    "Initial_LIGO_Virgo",
];

/// Priority rank of a catalog, `DEFAULT_CATALOG_PRIORITY` when unlisted
pub fn catalog_priority(catalog: &str) -> u32 {
    CATALOG_PRIORITY
        .iter()
        .find(|(name, _)| *name == catalog)
        .map(|(_, rank)| *rank)
        .unwrap_or(DEFAULT_CATALOG_PRIORITY)
}

pub fn is_excluded_catalog(catalog: &str) -> bool {
    EXCLUDED_CATALOGS.contains(&catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_priority_lookup() {
        assert_eq!(catalog_priority("GWTC-3-confident"), 50);
        assert!(catalog_priority("GWTC-2.1-confident") > catalog_priority("GWTC-1-confident"));
        assert_eq!(catalog_priority("Some-Future-Catalog"), DEFAULT_CATALOG_PRIORITY);
    }

    #[test]
    fn test_excluded_catalogs_have_no_priority_entry() {
        for catalog in EXCLUDED_CATALOGS {
            assert!(is_excluded_catalog(catalog));
            assert!(CATALOG_PRIORITY.iter().all(|(name, _)| name != catalog));
        }
        assert!(!is_excluded_catalog("GWTC-2.1-confident"));
    }

    #[test]
    fn test_gps_epoch_offset_matches_calendar() {
        let epoch = chrono::DateTime::from_timestamp(GPS_EPOCH_OFFSET, 0).unwrap();
        assert_eq!(epoch.format("%Y-%m-%d").to_string(), "1980-01-06");
    }
}
