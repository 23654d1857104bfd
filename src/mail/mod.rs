//! Outbound alert mail over SMTP.
//!
//! Template rendering is pure; delivery is a thin credentialed transport
//! call built from `SMTP_HOST/PORT/USER/PASS`.

use crate::config::SmtpConfig;
use crate::models::WatchlistItem;
use anyhow::{Context, Result};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::info;

pub struct Mailer {
    transport: SmtpTransport,
    from: Mailbox,
}

impl Mailer {
    pub fn from_config(config: &SmtpConfig) -> Result<Self> {
        let transport = SmtpTransport::relay(&config.host)
            .context("Failed to configure SMTP relay")?
            .port(config.port)
            .credentials(Credentials::new(
                config.user.clone(),
                config.password.clone(),
            ))
            .build();

        let from = config
            .from
            .parse::<Mailbox>()
            .with_context(|| format!("Invalid from address: {}", config.from))?;

        Ok(Self { transport, from })
    }

    pub fn send_welcome(&self, to: &str, name: &str) -> Result<()> {
        self.deliver(to, "Welcome to Ticket Scout", render_welcome(name))
    }

    pub fn send_price_drop(&self, to: &str, item: &WatchlistItem, current_price: f64) -> Result<()> {
        let subject = format!("Price drop: {}", item.event_name);
        self.deliver(to, &subject, render_price_drop(item, current_price))
    }

    fn deliver(&self, to: &str, subject: &str, html: String) -> Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to
                .parse::<Mailbox>()
                .with_context(|| format!("Invalid recipient address: {to}"))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html)
            .context("Failed to build email")?;

        self.transport
            .send(&message)
            .with_context(|| format!("Failed to send \"{subject}\" to {to}"))?;

        info!("Sent \"{}\" to {}", subject, to);
        Ok(())
    }
}

pub fn render_welcome(name: &str) -> String {
    format!(
        "<html><body>\
         <h2>Welcome to Ticket Scout, {name}!</h2>\
         <p>Search events across Ticketmaster and SeatGeek, add them to your \
         watchlist with a target price, and we'll email you when prices drop.</p>\
         <p>Happy hunting,<br>The Ticket Scout team</p>\
         </body></html>"
    )
}

pub fn render_price_drop(item: &WatchlistItem, current_price: f64) -> String {
    let target_line = match item.target_price {
        Some(target) => format!("<p>Your target: <b>${target:.2}</b></p>"),
        None => String::new(),
    };
    let venue = item.venue.as_deref().unwrap_or("TBD");
    format!(
        "<html><body>\
         <h2>{name} just dropped to ${current_price:.2}</h2>\
         <p>{name} on {date} at {venue}</p>\
         {target_line}\
         <p>Prices change fast - grab your seats while this lasts.</p>\
         </body></html>",
        name = item.event_name,
        date = item.event_date,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(target_price: Option<f64>) -> WatchlistItem {
        WatchlistItem {
            id: 1,
            event_id: "tm-1".to_string(),
            event_name: "Magic vs Celtics".to_string(),
            event_date: "2026-05-01".to_string(),
            venue: Some("Kia Center".to_string()),
            city: Some("Orlando".to_string()),
            target_price,
            current_price: Some(42.0),
            lowest_price: None,
            price_trend: None,
            created_at: None,
        }
    }

    #[test]
    fn welcome_mentions_the_user() {
        let html = render_welcome("Jordan");
        assert!(html.contains("Welcome to Ticket Scout, Jordan!"));
    }

    #[test]
    fn price_drop_includes_event_and_prices() {
        let html = render_price_drop(&item(Some(50.0)), 42.0);
        assert!(html.contains("Magic vs Celtics"));
        assert!(html.contains("$42.00"));
        assert!(html.contains("$50.00"));
        assert!(html.contains("Kia Center"));
    }

    #[test]
    fn price_drop_omits_target_line_when_unset() {
        let html = render_price_drop(&item(None), 42.0);
        assert!(!html.contains("Your target"));
    }
}
