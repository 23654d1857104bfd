//! One-shot watchlist price check: fetch the price-enriched watchlist and
//! mail an alert for every item at or below its target price. Scheduling is
//! external (cron); there is no loop here.

use crate::api::ApiClient;
use crate::mail::Mailer;
use crate::models::WatchlistItem;
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Items whose current price has reached the user's target
pub fn price_drop_hits(items: &[WatchlistItem]) -> Vec<&WatchlistItem> {
    items
        .iter()
        .filter(|item| match (item.target_price, item.current_price) {
            (Some(target), Some(current)) => current <= target,
            _ => false,
        })
        .collect()
}

pub async fn run_alerts(api: &ApiClient, mailer: &Mailer, recipient: &str) -> Result<usize> {
    let items = api
        .watchlist_with_prices()
        .await
        .context("Failed to fetch watchlist with prices")?;

    let hits = price_drop_hits(&items);
    info!(
        "Checked {} watchlist items, {} at or below target",
        items.len(),
        hits.len()
    );

    let mut sent = 0;
    for item in hits {
        // current_price is guaranteed by price_drop_hits
        let current = item.current_price.unwrap_or_default();
        match mailer.send_price_drop(recipient, item, current) {
            Ok(()) => sent += 1,
            Err(err) => warn!("Alert for {} not sent: {err:#}", item.event_name),
        }
    }

    Ok(sent)
}
