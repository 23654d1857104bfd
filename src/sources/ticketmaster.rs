use crate::models::{Event, Source};
use crate::sources::traits::EventSource;
use crate::sources::types::SearchParams;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

const DEFAULT_BASE_URL: &str = "https://app.ticketmaster.com";

/// Ticketmaster Discovery API v2 source
pub struct TicketmasterSource {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct DiscoveryResponse {
    #[serde(rename = "_embedded")]
    embedded: Option<DiscoveryEmbedded>,
}

#[derive(Debug, Deserialize)]
struct DiscoveryEmbedded {
    #[serde(default)]
    events: Vec<TmEvent>,
}

#[derive(Debug, Deserialize)]
struct TmEvent {
    id: String,
    name: String,
    url: Option<String>,
    dates: TmDates,
    #[serde(default)]
    classifications: Vec<TmClassification>,
    #[serde(rename = "priceRanges")]
    price_ranges: Option<Vec<TmPriceRange>>,
    #[serde(rename = "_embedded")]
    embedded: Option<TmEventEmbedded>,
}

#[derive(Debug, Deserialize)]
struct TmDates {
    start: TmStart,
}

#[derive(Debug, Deserialize)]
struct TmStart {
    #[serde(rename = "localDate")]
    local_date: Option<String>,
    #[serde(rename = "localTime")]
    local_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmClassification {
    segment: Option<TmNamed>,
}

#[derive(Debug, Deserialize)]
struct TmNamed {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TmPriceRange {
    min: Option<f64>,
    max: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TmEventEmbedded {
    #[serde(default)]
    venues: Vec<TmVenue>,
}

#[derive(Debug, Deserialize)]
struct TmVenue {
    name: Option<String>,
    city: Option<TmNamed>,
    state: Option<TmState>,
}

#[derive(Debug, Deserialize)]
struct TmState {
    #[serde(rename = "stateCode")]
    state_code: Option<String>,
}

impl TicketmasterSource {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("ticket-scout/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
        })
    }

    fn convert(&self, raw: TmEvent) -> Option<Event> {
        let date = raw.dates.start.local_date?;
        let venue = raw
            .embedded
            .as_ref()
            .and_then(|e| e.venues.first())
            .and_then(|v| v.name.clone())?;
        let city = raw
            .embedded
            .as_ref()
            .and_then(|e| e.venues.first())
            .and_then(|v| v.city.as_ref())
            .map(|c| c.name.clone())
            .unwrap_or_default();
        let state = raw
            .embedded
            .as_ref()
            .and_then(|e| e.venues.first())
            .and_then(|v| v.state.as_ref())
            .and_then(|s| s.state_code.clone());

        // The matcher parses the minimum back out of this free-text form
        let price_range = raw
            .price_ranges
            .as_ref()
            .and_then(|ranges| ranges.first())
            .and_then(|range| match (range.min, range.max) {
                (Some(min), Some(max)) => Some(format!("${:.0} - ${:.0}", min, max)),
                (Some(min), None) => Some(format!("${:.0}", min)),
                _ => None,
            });

        let event_type = raw
            .classifications
            .first()
            .and_then(|c| c.segment.as_ref())
            .map(|s| s.name.clone());

        Some(Event {
            id: raw.id,
            name: raw.name,
            event_type,
            date,
            time: raw.dates.start.local_time,
            venue,
            city,
            state,
            price_range,
            min_price: None,
            max_price: None,
            url: raw.url.unwrap_or_default(),
            source: Source::Ticketmaster,
            fetched_at: Utc::now(),
        })
    }
}

#[async_trait]
impl EventSource for TicketmasterSource {
    async fn search(&self, params: &SearchParams) -> Result<Vec<Event>> {
        let url = format!("{}/discovery/v2/events.json", self.base_url);

        let mut query: Vec<(&str, String)> = vec![
            ("apikey", self.api_key.clone()),
            ("city", params.city.clone()),
            ("size", "50".to_string()),
        ];
        if let Some(keyword) = &params.keyword {
            query.push(("keyword", keyword.clone()));
        }
        if let Some(start) = &params.start_date {
            query.push(("startDateTime", format!("{start}T00:00:00Z")));
        }
        if let Some(end) = &params.end_date {
            query.push(("endDateTime", format!("{end}T23:59:59Z")));
        }

        debug!("Fetching Ticketmaster events for {}", params.city);

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .context("Failed to fetch Ticketmaster events")?;

        if !response.status().is_success() {
            warn!("Ticketmaster returned status: {}", response.status());
            anyhow::bail!("Ticketmaster request failed: {}", response.status());
        }

        let body: DiscoveryResponse = response
            .json()
            .await
            .context("Failed to decode Ticketmaster response")?;

        let raw_events = body.embedded.map(|e| e.events).unwrap_or_default();
        let total = raw_events.len();

        let events: Vec<Event> = raw_events
            .into_iter()
            .filter_map(|raw| {
                let id = raw.id.clone();
                let converted = self.convert(raw);
                if converted.is_none() {
                    warn!("Skipping Ticketmaster event {} with missing date or venue", id);
                }
                converted
            })
            .collect();

        info!(
            "Ticketmaster: {} of {} events usable for {}",
            events.len(),
            total,
            params.city
        );
        Ok(events)
    }

    fn source_name(&self) -> &'static str {
        "Ticketmaster"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "_embedded": {
            "events": [
                {
                    "id": "tm-1",
                    "name": "Orlando Magic vs Boston Celtics",
                    "url": "https://www.ticketmaster.com/event/tm-1",
                    "dates": { "start": { "localDate": "2026-05-01", "localTime": "19:00:00" } },
                    "classifications": [ { "segment": { "name": "Sports" } } ],
                    "priceRanges": [ { "min": 45.0, "max": 120.0 } ],
                    "_embedded": {
                        "venues": [
                            { "name": "Kia Center", "city": { "name": "Orlando" }, "state": { "stateCode": "FL" } }
                        ]
                    }
                },
                {
                    "id": "tm-2",
                    "name": "Event Without Venue",
                    "dates": { "start": { "localDate": "2026-05-02" } }
                }
            ]
        }
    }"#;

    #[tokio::test]
    async fn parses_events_and_skips_incomplete_ones() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/discovery/v2/events.json")
            .match_query(mockito::Matcher::UrlEncoded(
                "city".into(),
                "Orlando".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(SAMPLE)
            .create_async()
            .await;

        let source = TicketmasterSource::with_base_url("test-key", server.url()).unwrap();
        let events = source
            .search(&SearchParams::for_city("Orlando"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.id, "tm-1");
        assert_eq!(event.date, "2026-05-01");
        assert_eq!(event.venue, "Kia Center");
        assert_eq!(event.state.as_deref(), Some("FL"));
        assert_eq!(event.price_range.as_deref(), Some("$45 - $120"));
        assert_eq!(event.event_type.as_deref(), Some("Sports"));
        assert_eq!(event.source, Source::Ticketmaster);
        assert!(event.min_price.is_none());
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/discovery/v2/events.json")
            .match_query(mockito::Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let source = TicketmasterSource::with_base_url("bad-key", server.url()).unwrap();
        let result = source.search(&SearchParams::for_city("Orlando")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn empty_response_yields_no_events() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/discovery/v2/events.json")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create_async()
            .await;

        let source = TicketmasterSource::with_base_url("test-key", server.url()).unwrap();
        let events = source
            .search(&SearchParams::for_city("Nowhere"))
            .await
            .unwrap();
        assert!(events.is_empty());
    }
}
