// Catalog pipeline: fetch -> resolve -> deduplicate -> write, one pass per run

pub mod dedupe;
pub mod fields;
pub mod resolve;

pub use dedupe::{deduplicate, Deduplication};
pub use resolve::{resolve, resolve_event, SkipReason};

use crate::error::Result;
use crate::storage::{write_catalog, CatalogSummary};
use crate::types::EventSource;
use metrics::{counter, histogram};
use std::path::Path;
use tracing::{info, instrument, warn};

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Output file regenerated
    Written(CatalogSummary),
    /// Fetch failed or returned nothing; existing output left untouched
    NoEvents,
    /// Nothing survived mass resolution; existing output left untouched
    NoValidEvents,
}

pub struct Pipeline;

impl Pipeline {
    /// Run one fetch-transform-save pass against `source`.
    /// Only a failure to write the output surfaces as an error.
    #[instrument(skip(source), fields(source_name = %source.source_name()))]
    pub async fn run(source: &dyn EventSource, output_path: &Path) -> Result<RunOutcome> {
        let source_name = source.source_name().to_string();

        // Step 1: Fetch raw events
        let t_fetch = std::time::Instant::now();
        let raw = source.fetch().await;
        histogram!("gw_fetch_duration_seconds", "source" => source_name.clone())
            .record(t_fetch.elapsed().as_secs_f64());
        counter!("gw_events_fetched_total", "source" => source_name.clone())
            .increment(raw.len() as u64);

        if raw.is_empty() {
            warn!("No events fetched");
            println!("No events fetched. Exiting.");
            return Ok(RunOutcome::NoEvents);
        }

        // Step 2: Resolve parameters
        let resolved = resolve(&raw);
        counter!("gw_events_resolved_total", "source" => source_name.clone())
            .increment(resolved.len() as u64);
        counter!("gw_events_dropped_total", "source" => source_name.clone())
            .increment((raw.len() - resolved.len()) as u64);

        if resolved.is_empty() {
            warn!("No events with valid mass data");
            println!("No events with valid mass data. Exiting.");
            return Ok(RunOutcome::NoValidEvents);
        }

        // Step 3: Reconcile catalog versions
        let total_entries = resolved.len();
        let dedup = deduplicate(resolved);
        counter!("gw_events_excluded_total", "source" => source_name)
            .increment(dedup.excluded_count(total_entries) as u64);
        info!(
            "{} records after catalog exclusion, {} unique events",
            dedup.filtered.len(),
            dedup.groups.len()
        );

        // Step 4: Persist
        let summary = write_catalog(output_path, total_entries, &dedup.filtered, &dedup.groups)?;

        println!("Processed {} unique events with complete mass data", summary.unique_events);
        println!("  - BBH: {}", summary.source_counts.bbh);
        println!("  - NSBH: {}", summary.source_counts.nsbh);
        println!("  - BNS: {}", summary.source_counts.bns);
        println!("Data saved to {}", summary.output_path.display());

        Ok(RunOutcome::Written(summary))
    }
}
