use crate::config::SourceConfig;
use crate::error::{CatalogError, Result};
use crate::types::{EventSource, RawCatalog};
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info, instrument};

const SOURCE_NAME: &str = "gwosc";

/// Client for the GWOSC event API. One GET per fetch: no retry, no paging, no auth.
pub struct GwoscClient {
    client: reqwest::Client,
    url: String,
}

impl GwoscClient {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch_catalog(&self) -> Result<RawCatalog> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }
        let body = response.bytes().await?;
        parse_catalog(&body)
    }
}

#[async_trait::async_trait]
impl EventSource for GwoscClient {
    fn source_name(&self) -> &str {
        SOURCE_NAME
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> RawCatalog {
        println!("Fetching gravitational wave events from GWOSC...");
        match self.fetch_catalog().await {
            Ok(events) => {
                info!("Found {} events in GWOSC catalog", events.len());
                println!("Found {} events in GWOSC catalog", events.len());
                events
            }
            Err(e) => {
                error!("Error fetching data from GWOSC: {}", e);
                println!("Error fetching data from GWOSC: {e}");
                RawCatalog::new()
            }
        }
    }
}

/// Extract the `events` mapping from an API response body.
/// A body without an `events` object yields an empty catalog.
pub fn parse_catalog(body: &[u8]) -> Result<RawCatalog> {
    let data: Value = serde_json::from_slice(body)?;
    let events = match data {
        Value::Object(mut root) => match root.remove("events") {
            Some(Value::Object(events)) => events,
            _ => RawCatalog::new(),
        },
        _ => RawCatalog::new(),
    };
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog_extracts_events() {
        let body = br#"{
            "events": {
                "GW150914-v3": {"commonName": "GW150914", "GPS": 1126259462.4},
                "GW170817-v3": {"commonName": "GW170817", "GPS": 1187008882.4}
            }
        }"#;
        let events = parse_catalog(body).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events["GW150914-v3"]["commonName"], "GW150914");
    }

    #[test]
    fn test_parse_catalog_without_events_key() {
        let events = parse_catalog(br#"{"status": "ok"}"#).unwrap();
        assert!(events.is_empty());
        let events = parse_catalog(br#"{"events": []}"#).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_parse_catalog_malformed_json() {
        let err = parse_catalog(b"<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, CatalogError::Json(_)));
    }

    #[tokio::test]
    async fn test_fetch_transport_failure_returns_empty() {
        // Nothing listens on the discard port locally; the connection is refused
        let config = SourceConfig {
            url: "http://127.0.0.1:9/eventapi/json/allevents/".to_string(),
            timeout_seconds: 2,
        };
        let client = GwoscClient::new(&config).unwrap();
        let events = client.fetch().await;
        assert!(events.is_empty());
    }
}
