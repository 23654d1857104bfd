use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ticket platform a listing was fetched from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Ticketmaster,
    Seatgeek,
}

/// Unified event listing
///
/// Fetched fresh per search from either platform (or the backend's unified
/// search) and never persisted locally. `date` stays the wire string
/// (`YYYY-MM-DD`) because cross-platform matching compares dates by exact
/// string equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub event_type: Option<String>,
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
    pub venue: String,
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    /// Ticketmaster free-text price range, e.g. "$45 - $120"
    #[serde(default)]
    pub price_range: Option<String>,
    /// SeatGeek structured minimum listing price
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    pub url: String,
    pub source: Source,
    pub fetched_at: DateTime<Utc>,
}

impl Event {
    /// Human-readable price for listing output, whichever form the source gave us
    pub fn display_price(&self) -> String {
        if let Some(range) = &self.price_range {
            return range.clone();
        }
        match (self.min_price, self.max_price) {
            (Some(min), Some(max)) => format!("${:.0} - ${:.0}", min, max),
            (Some(min), None) => format!("from ${:.0}", min),
            _ => "price unavailable".to_string(),
        }
    }
}

/// A Ticketmaster listing paired with the SeatGeek listing for the same
/// real-world event. The Ticketmaster side is always present; the SeatGeek
/// side is optional (asymmetric join).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedEvent {
    pub ticketmaster: Event,
    pub seatgeek: Option<Event>,
    /// The cheaper platform, when both sides have a comparable minimum price
    pub best_source: Option<Source>,
    /// Absolute difference between the two minimum prices when `best_source` is set
    pub savings: Option<f64>,
}

/// Watchlist entry as returned by the backend. Price and trend fields are
/// computed server-side by the periodic price checker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistItem {
    pub id: i64,
    pub event_id: String,
    pub event_name: String,
    pub event_date: String,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub target_price: Option<f64>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub lowest_price: Option<f64>,
    #[serde(default)]
    pub price_trend: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Saved team / artist / venue used to surface matching upcoming events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: i64,
    pub favorite_type: FavoriteType,
    pub favorite_name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteType {
    Team,
    Artist,
    Venue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// One sample in an event's recorded price time series
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub recorded_at: String,
    pub min_price: f64,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub source: Option<Source>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTrend {
    /// "rising" | "falling" | "stable"
    pub direction: String,
    #[serde(default)]
    pub change_percent: Option<f64>,
    #[serde(default)]
    pub period_days: Option<u32>,
}

/// Server-computed buy advice; rendered as-is, never recomputed client-side
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// "buy_now" | "wait" | "hold"
    pub action: String,
    pub confidence: f64,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn event_with_prices(
        price_range: Option<&str>,
        min_price: Option<f64>,
        max_price: Option<f64>,
    ) -> Event {
        Event {
            id: "tm_1".to_string(),
            name: "Test Show".to_string(),
            event_type: None,
            date: "2026-05-01".to_string(),
            time: None,
            venue: "Kia Center".to_string(),
            city: "Orlando".to_string(),
            state: Some("FL".to_string()),
            price_range: price_range.map(str::to_string),
            min_price,
            max_price,
            url: "https://example.com/e/1".to_string(),
            source: Source::Ticketmaster,
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn display_price_prefers_free_text_range() {
        let event = event_with_prices(Some("$45 - $120"), Some(60.0), None);
        assert_eq!(event.display_price(), "$45 - $120");
    }

    #[test]
    fn display_price_formats_structured_prices() {
        assert_eq!(
            event_with_prices(None, Some(60.0), Some(180.0)).display_price(),
            "$60 - $180"
        );
        assert_eq!(
            event_with_prices(None, Some(60.0), None).display_price(),
            "from $60"
        );
        assert_eq!(
            event_with_prices(None, None, None).display_price(),
            "price unavailable"
        );
    }

    #[test]
    fn source_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Source::Ticketmaster).unwrap(),
            "\"ticketmaster\""
        );
        assert_eq!(
            serde_json::to_string(&Source::Seatgeek).unwrap(),
            "\"seatgeek\""
        );
    }
}
