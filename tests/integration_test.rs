use anyhow::Result;
use gwosc_fetcher::pipeline::{Pipeline, RunOutcome};
use gwosc_fetcher::storage::CatalogDocument;
use gwosc_fetcher::types::{EventSource, RawCatalog};
use serde_json::{json, Value};
use std::fs;
use tempfile::tempdir;

/// Event source that serves a fixed response body
struct StaticSource {
    body: Value,
}

#[async_trait::async_trait]
impl EventSource for StaticSource {
    fn source_name(&self) -> &str {
        "static"
    }

    async fn fetch(&self) -> RawCatalog {
        match self.body.get("events") {
            Some(Value::Object(events)) => events.clone(),
            _ => RawCatalog::new(),
        }
    }
}

fn catalog_body() -> Value {
    json!({
        "events": {
            "GW150914-v3": {
                "commonName": "GW150914",
                "catalog.shortName": "GWTC-1-confident",
                "version": 3,
                "GPS": 1126259462.4,
                "mass_1_source": 35.6,
                "mass_2_source": 30.6,
                "network_matched_filter_snr": 24.4,
                "luminosity_distance": 440.0,
                "chi_eff": -0.01,
                "final_mass_source": 63.1,
                "p_astro": 1.0
            },
            "GW170817-v3": {
                "commonName": "GW170817",
                "catalog.shortName": "GWTC-1-confident",
                "version": 3,
                "GPS": 1187008882.4,
                "parameters": {
                    "m1_source": {"median": 1.46},
                    "m2_source": {"median": 1.27},
                    "network_matched_filter_snr": {"median": 33.0}
                }
            },
            "GW190425-v1": {
                "commonName": "GW190425",
                "catalog.shortName": "GWTC-2",
                "version": 1,
                "GPS": 1240215503.0,
                "mass_1_source": 2.0,
                "mass_2_source": 1.4
            },
            "GW190425-v2": {
                "commonName": "GW190425",
                "catalog.shortName": "GWTC-2.1-confident",
                "version": 2,
                "GPS": 1240215503.0,
                "mass_1_source": 2.09,
                "mass_2_source": 1.38
            },
            "GW200105_162426-v2": {
                "commonName": "GW200105_162426",
                "catalog.shortName": "GWTC-3-confident",
                "version": 2,
                "GPS": 1262276684.1,
                "mass_1": 9.1,
                "mass_2": 1.91
            },
            "GW200105_162426-v1": {
                "commonName": "GW200105_162426",
                "catalog.shortName": "O3_Discovery_Papers",
                "version": 1,
                "GPS": 1262276684.1,
                "mass_1_source": 8.9,
                "mass_2_source": 1.9
            },
            "GW_NO_MASS-v1": {
                "catalog.shortName": "GWTC-3-confident",
                "GPS": 1260000000.0,
                "mass_1_source": 12.0
            }
        }
    })
}

#[tokio::test]
async fn test_full_pass_writes_deduplicated_catalog() -> Result<()> {
    let dir = tempdir()?;
    let output = dir.path().join("data/gw_events.json");
    let source = StaticSource { body: catalog_body() };

    let outcome = Pipeline::run(&source, &output).await?;
    let summary = match outcome {
        RunOutcome::Written(summary) => summary,
        other => panic!("expected a written catalog, got {other:?}"),
    };
    // 7 raw, 1 dropped for missing mass, 1 excluded (GWTC-2)
    assert_eq!(summary.total_entries, 6);
    assert_eq!(summary.filtered_entries, 5);
    assert_eq!(summary.unique_events, 4);

    let document: CatalogDocument = serde_json::from_str(&fs::read_to_string(&output)?)?;
    let names: Vec<&str> = document.events.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["GW200105_162426", "GW190425", "GW170817", "GW150914"]
    );

    let nsbh = &document.events[0];
    assert_eq!(nsbh.catalog, "GWTC-3-confident");
    assert_eq!(nsbh.source_type.as_str(), "NSBH");
    assert_eq!(nsbh.versions.len(), 2);

    let gw190425 = &document.events[1];
    assert_eq!(gw190425.catalog, "GWTC-2.1-confident");
    assert!(gw190425.is_primary);
    assert!(document.all_events.iter().all(|e| e.catalog != "GWTC-2"));

    let gw150914 = &document.events[3];
    assert_eq!((gw150914.m1, gw150914.m2), (35.6, 30.6));
    assert_eq!(gw150914.color, "#9b59b6");
    assert_eq!(gw150914.detection_date, "2015-09-14");
    assert_eq!(gw150914.snr, 24.4);
    assert_eq!(gw150914.chi_eff, Some(-0.01));

    assert_eq!(document.source_counts.bbh, 1);
    assert_eq!(document.source_counts.nsbh, 1);
    assert_eq!(document.source_counts.bns, 2);

    // all_events is ordered the same way as events
    let gps: Vec<f64> = document.all_events.iter().filter_map(|e| e.gps_time).collect();
    assert!(gps.windows(2).all(|w| w[0] >= w[1]));
    Ok(())
}

#[tokio::test]
async fn test_empty_fetch_leaves_existing_output_untouched() -> Result<()> {
    let dir = tempdir()?;
    let output = dir.path().join("gw_events.json");
    fs::write(&output, "previous run")?;

    let source = StaticSource { body: json!({"error": "unavailable"}) };
    let outcome = Pipeline::run(&source, &output).await?;

    assert_eq!(outcome, RunOutcome::NoEvents);
    assert_eq!(fs::read_to_string(&output)?, "previous run");
    Ok(())
}

#[tokio::test]
async fn test_no_resolvable_events_writes_nothing() -> Result<()> {
    let dir = tempdir()?;
    let output = dir.path().join("gw_events.json");

    let source = StaticSource {
        body: json!({"events": {"GW1": {"GPS": 1.0}, "GW2": {"mass_2": 4.0}}}),
    };
    let outcome = Pipeline::run(&source, &output).await?;

    assert_eq!(outcome, RunOutcome::NoValidEvents);
    assert!(!output.exists());
    Ok(())
}

#[tokio::test]
async fn test_rerun_regenerates_file() -> Result<()> {
    let dir = tempdir()?;
    let output = dir.path().join("gw_events.json");
    let source = StaticSource { body: catalog_body() };

    Pipeline::run(&source, &output).await?;
    let first: CatalogDocument = serde_json::from_str(&fs::read_to_string(&output)?)?;
    Pipeline::run(&source, &output).await?;
    let second: CatalogDocument = serde_json::from_str(&fs::read_to_string(&output)?)?;

    assert_eq!(first.events, second.events);
    assert_eq!(first.all_events, second.all_events);
    Ok(())
}
