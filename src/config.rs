use anyhow::{Context, Result};
use std::env;

/// Runtime configuration sourced from the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the hosted backend API
    pub api_base_url: String,
    /// Ticketmaster Discovery API key (direct source fetch)
    pub ticketmaster_api_key: Option<String>,
    /// SeatGeek client id (direct source fetch)
    pub seatgeek_client_id: Option<String>,
    /// Key for the backend's admin surface (`x-admin-key`)
    pub admin_key: Option<String>,
    /// SMTP settings; absent when SMTP_HOST is unset
    pub smtp: Option<SmtpConfig>,
    /// Where price-drop alert mail goes; falls back to the session email
    pub alert_recipient: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub from: String,
}

const DEFAULT_API_BASE_URL: &str = "http://localhost:3001";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_FROM: &str = "alerts@ticketscout.app";

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let smtp = match env::var("SMTP_HOST") {
            Ok(host) => {
                let port = match env::var("SMTP_PORT") {
                    Ok(raw) => raw
                        .parse::<u16>()
                        .with_context(|| format!("Invalid SMTP_PORT: {raw}"))?,
                    Err(_) => DEFAULT_SMTP_PORT,
                };
                Some(SmtpConfig {
                    host,
                    port,
                    user: env::var("SMTP_USER").unwrap_or_default(),
                    password: env::var("SMTP_PASS").unwrap_or_default(),
                    from: env::var("SMTP_FROM").unwrap_or_else(|_| DEFAULT_FROM.to_string()),
                })
            }
            Err(_) => None,
        };

        Ok(Self {
            api_base_url: env::var("TICKET_SCOUT_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            ticketmaster_api_key: env::var("TICKETMASTER_API_KEY").ok(),
            seatgeek_client_id: env::var("SEATGEEK_CLIENT_ID").ok(),
            admin_key: env::var("ADMIN_API_KEY").ok(),
            smtp,
            alert_recipient: env::var("ALERT_EMAIL").ok(),
        })
    }

    /// Both platform credentials present, so `compare` can fetch directly
    pub fn has_direct_sources(&self) -> bool {
        self.ticketmaster_api_key.is_some() && self.seatgeek_client_id.is_some()
    }
}
