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

const DEFAULT_BASE_URL: &str = "https://api.seatgeek.com";

/// SeatGeek events API source
pub struct SeatGeekSource {
    client: Client,
    client_id: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SgResponse {
    #[serde(default)]
    events: Vec<SgEvent>,
}

#[derive(Debug, Deserialize)]
struct SgEvent {
    id: i64,
    title: String,
    url: Option<String>,
    #[serde(rename = "type")]
    event_type: Option<String>,
    datetime_local: Option<String>,
    venue: Option<SgVenue>,
    stats: Option<SgStats>,
}

#[derive(Debug, Deserialize)]
struct SgVenue {
    name: Option<String>,
    city: Option<String>,
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SgStats {
    lowest_price: Option<f64>,
    highest_price: Option<f64>,
}

impl SeatGeekSource {
    pub fn new(client_id: impl Into<String>) -> Result<Self> {
        Self::with_base_url(client_id, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(client_id: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("ticket-scout/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            client_id: client_id.into(),
            base_url: base_url.into(),
        })
    }

    fn convert(raw: SgEvent) -> Option<Event> {
        // "2026-05-01T19:30:00" splits into the date the matcher compares on
        let datetime = raw.datetime_local?;
        let (date, time) = match datetime.split_once('T') {
            Some((date, time)) => (date.to_string(), Some(time.to_string())),
            None => (datetime, None),
        };
        let venue = raw.venue.as_ref().and_then(|v| v.name.clone())?;
        let city = raw
            .venue
            .as_ref()
            .and_then(|v| v.city.clone())
            .unwrap_or_default();
        let state = raw.venue.as_ref().and_then(|v| v.state.clone());

        let (min_price, max_price) = raw
            .stats
            .map(|s| (s.lowest_price, s.highest_price))
            .unwrap_or((None, None));

        Some(Event {
            id: raw.id.to_string(),
            name: raw.title,
            event_type: raw.event_type,
            date,
            time,
            venue,
            city,
            state,
            price_range: None,
            min_price,
            max_price,
            url: raw.url.unwrap_or_default(),
            source: Source::Seatgeek,
            fetched_at: Utc::now(),
        })
    }
}

#[async_trait]
impl EventSource for SeatGeekSource {
    async fn search(&self, params: &SearchParams) -> Result<Vec<Event>> {
        let url = format!("{}/2/events", self.base_url);

        let mut query: Vec<(&str, String)> = vec![
            ("client_id", self.client_id.clone()),
            ("venue.city", params.city.clone()),
            ("per_page", "50".to_string()),
        ];
        if let Some(keyword) = &params.keyword {
            query.push(("q", keyword.clone()));
        }
        if let Some(start) = &params.start_date {
            query.push(("datetime_local.gte", start.clone()));
        }
        if let Some(end) = &params.end_date {
            query.push(("datetime_local.lte", end.clone()));
        }

        debug!("Fetching SeatGeek events for {}", params.city);

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .context("Failed to fetch SeatGeek events")?;

        if !response.status().is_success() {
            warn!("SeatGeek returned status: {}", response.status());
            anyhow::bail!("SeatGeek request failed: {}", response.status());
        }

        let body: SgResponse = response
            .json()
            .await
            .context("Failed to decode SeatGeek response")?;

        let total = body.events.len();
        let events: Vec<Event> = body
            .events
            .into_iter()
            .filter_map(|raw| {
                let id = raw.id;
                let converted = Self::convert(raw);
                if converted.is_none() {
                    warn!("Skipping SeatGeek event {} with missing date or venue", id);
                }
                converted
            })
            .collect();

        info!(
            "SeatGeek: {} of {} events usable for {}",
            events.len(),
            total,
            params.city
        );
        Ok(events)
    }

    fn source_name(&self) -> &'static str {
        "SeatGeek"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "events": [
            {
                "id": 9001,
                "title": "Orlando Magic at Boston Celtics",
                "url": "https://seatgeek.com/e/9001",
                "type": "nba",
                "datetime_local": "2026-05-01T19:30:00",
                "venue": { "name": "Kia Center", "city": "Orlando", "state": "FL" },
                "stats": { "lowest_price": 60.0, "highest_price": 240.0 }
            },
            {
                "id": 9002,
                "title": "TBD Event",
                "datetime_local": null,
                "venue": { "name": "Somewhere" }
            }
        ]
    }"#;

    #[tokio::test]
    async fn parses_events_and_splits_datetime() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/2/events")
            .match_query(mockito::Matcher::UrlEncoded(
                "venue.city".into(),
                "Orlando".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(SAMPLE)
            .create_async()
            .await;

        let source = SeatGeekSource::with_base_url("test-client", server.url()).unwrap();
        let events = source
            .search(&SearchParams::for_city("Orlando"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.id, "9001");
        assert_eq!(event.date, "2026-05-01");
        assert_eq!(event.time.as_deref(), Some("19:30:00"));
        assert_eq!(event.venue, "Kia Center");
        assert_eq!(event.min_price, Some(60.0));
        assert_eq!(event.max_price, Some(240.0));
        assert!(event.price_range.is_none());
        assert_eq!(event.source, Source::Seatgeek);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/2/events")
            .match_query(mockito::Matcher::Any)
            .with_status(403)
            .create_async()
            .await;

        let source = SeatGeekSource::with_base_url("bad-client", server.url()).unwrap();
        assert!(source
            .search(&SearchParams::for_city("Orlando"))
            .await
            .is_err());
    }
}
