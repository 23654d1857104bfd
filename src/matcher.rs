//! Pairs Ticketmaster and SeatGeek listings that describe the same
//! real-world event.
//!
//! The heuristic is deliberately simple and greedy: exact date-string
//! equality plus a venue-name similarity check, first qualifying candidate
//! wins. There is no scoring or disambiguation when several candidates
//! qualify, so two same-date venues sharing a first word can pair with the
//! wrong listing. That behavior is pinned by tests; changing it is a
//! conscious decision, not a drive-by fix.

use crate::models::{Event, MatchedEvent, Source};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static DOLLAR_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(\d+)").expect("valid price regex"));

/// Partition produced by [`match_events`]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// Pairs in Ticketmaster input order; every entry has a SeatGeek side
    pub matched: Vec<MatchedEvent>,
    /// Ticketmaster events with no qualifying SeatGeek candidate, input order
    pub unmatched_ticketmaster: Vec<Event>,
    /// SeatGeek events no Ticketmaster event consumed, input order
    pub unmatched_seatgeek: Vec<Event>,
}

/// Match two per-platform result lists for the same logical search.
///
/// For each Ticketmaster event in input order, the first not-yet-used
/// SeatGeek event with an exactly equal date string and a similar venue name
/// is consumed as its pair. Missing dates or venues simply never match.
pub fn match_events(tm_events: &[Event], sg_events: &[Event]) -> MatchResult {
    let mut sg_used = vec![false; sg_events.len()];
    let mut matched = Vec::new();
    let mut unmatched_ticketmaster = Vec::new();

    for tm in tm_events {
        let candidate = sg_events.iter().enumerate().find(|(i, sg)| {
            !sg_used[*i] && dates_equal(&tm.date, &sg.date) && venues_similar(&tm.venue, &sg.venue)
        });

        match candidate {
            Some((i, sg)) => {
                sg_used[i] = true;
                matched.push(pair(tm.clone(), sg.clone()));
            }
            None => unmatched_ticketmaster.push(tm.clone()),
        }
    }

    let unmatched_seatgeek = sg_events
        .iter()
        .enumerate()
        .filter(|(i, _)| !sg_used[*i])
        .map(|(_, sg)| sg.clone())
        .collect();

    MatchResult {
        matched,
        unmatched_ticketmaster,
        unmatched_seatgeek,
    }
}

/// Extract the first `$<digits>` token from a free-text price range,
/// e.g. `"$45 - $120"` yields `45.0`.
pub fn parse_min_price(price_range: &str) -> Option<f64> {
    DOLLAR_AMOUNT
        .captures(price_range)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

fn dates_equal(a: &str, b: &str) -> bool {
    !a.is_empty() && a == b
}

/// Lowercased venue names are equal, or one contains the other's first
/// whitespace-delimited token as a substring.
fn venues_similar(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a == b {
        return true;
    }
    let a_first = a.split_whitespace().next();
    let b_first = b.split_whitespace().next();
    matches!(b_first, Some(token) if a.contains(token))
        || matches!(a_first, Some(token) if b.contains(token))
}

fn pair(tm: Event, sg: Event) -> MatchedEvent {
    let tm_min = tm.price_range.as_deref().and_then(parse_min_price);
    let sg_min = sg.min_price;

    // A recommendation only exists when both sides have a price and they differ
    let (best_source, savings) = match (tm_min, sg_min) {
        (Some(t), Some(s)) if t < s => (Some(Source::Ticketmaster), Some(s - t)),
        (Some(t), Some(s)) if s < t => (Some(Source::Seatgeek), Some(t - s)),
        _ => (None, None),
    };

    MatchedEvent {
        ticketmaster: tm,
        seatgeek: Some(sg),
        best_source,
        savings,
    }
}
