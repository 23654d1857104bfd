//! Typed client for the hosted ticket-scout backend.
//!
//! A mechanical request/response wrapper: every method deserializes the JSON
//! body into its documented shape and turns non-2xx responses into
//! [`ApiError::Api`] carrying the server's `error` message. Deliberately no
//! retries, backoff, or circuit breaking.

pub mod error;

pub use error::{ApiError, Result};

use crate::models::{
    AuthResponse, Event, Favorite, FavoriteType, PricePoint, PriceTrend, Recommendation, User,
    WatchlistItem,
};
use crate::sources::types::SearchParams;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub struct ApiClient {
    base_url: Url,
    token: Option<String>,
    admin_key: Option<String>,
    client: Client,
}

/// Raw per-source lists from `/api/events/compare`, input to the matcher
#[derive(Debug, Clone, Deserialize)]
pub struct CompareResponse {
    #[serde(default)]
    pub ticketmaster: Vec<Event>,
    #[serde(default)]
    pub seatgeek: Vec<Event>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddWatchlistRequest {
    pub event_id: String,
    pub event_name: String,
    pub event_date: String,
    pub venue: Option<String>,
    pub city: Option<String>,
    pub target_price: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: u64,
    pub total_watchlist_items: u64,
    pub total_subscribers: u64,
    #[serde(default)]
    pub alerts_sent_today: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DripRunResponse {
    pub emails_sent: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("ticket-scout/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url,
            token: None,
            admin_key: None,
            client,
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_admin_key(mut self, admin_key: Option<String>) -> Self {
        self.admin_key = admin_key;
        self
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        Ok(self.client.request(method, self.url(path)?))
    }

    /// Request builder for endpoints that require a logged-in user
    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let token = self.token.as_ref().ok_or(ApiError::NotAuthenticated)?;
        Ok(self.request(method, path)?.bearer_auth(token))
    }

    /// Request builder for the admin surface, keyed by `x-admin-key`
    fn admin(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let key = self.admin_key.as_ref().ok_or(ApiError::MissingAdminKey)?;
        Ok(self.request(method, path)?.header("x-admin-key", key))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Self::api_error(status, response.text().await.ok()));
        }
        Ok(response.json::<T>().await?)
    }

    /// For endpoints whose success body carries nothing we need
    async fn send_unit(&self, request: RequestBuilder) -> Result<()> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Self::api_error(status, response.text().await.ok()));
        }
        Ok(())
    }

    fn api_error(status: StatusCode, body: Option<String>) -> ApiError {
        let message = body
            .as_deref()
            .and_then(|text| serde_json::from_str::<ErrorBody>(text).ok())
            .and_then(|body| body.error)
            .unwrap_or_else(|| format!("request failed with status {status}"));
        ApiError::Api {
            status: status.as_u16(),
            message,
        }
    }

    // --- auth ---

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<AuthResponse> {
        let body = serde_json::json!({ "email": email, "password": password, "name": name });
        self.send(self.request(Method::POST, "/api/auth/register")?.json(&body))
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let body = serde_json::json!({ "email": email, "password": password });
        self.send(self.request(Method::POST, "/api/auth/login")?.json(&body))
            .await
    }

    pub async fn me(&self) -> Result<User> {
        self.send(self.authed(Method::GET, "/api/auth/me")?).await
    }

    // --- events ---

    pub async fn search_events(&self, params: &SearchParams) -> Result<Vec<Event>> {
        self.send(
            self.request(Method::GET, "/api/events/search")?
                .query(&params.query_pairs()),
        )
        .await
    }

    pub async fn compare_events(&self, params: &SearchParams) -> Result<CompareResponse> {
        self.send(
            self.request(Method::GET, "/api/events/compare")?
                .query(&params.query_pairs()),
        )
        .await
    }

    /// Unauthenticated event listing used by public pages
    pub async fn public_events(&self) -> Result<Vec<Event>> {
        self.send(self.request(Method::GET, "/api/public/events")?)
            .await
    }

    // --- watchlist ---

    pub async fn watchlist(&self) -> Result<Vec<WatchlistItem>> {
        self.send(self.authed(Method::GET, "/api/watchlist")?).await
    }

    pub async fn watchlist_with_prices(&self) -> Result<Vec<WatchlistItem>> {
        self.send(self.authed(Method::GET, "/api/watchlist/with-prices")?)
            .await
    }

    pub async fn add_to_watchlist(&self, request: &AddWatchlistRequest) -> Result<WatchlistItem> {
        self.send(self.authed(Method::POST, "/api/watchlist")?.json(request))
            .await
    }

    pub async fn remove_from_watchlist(&self, id: i64) -> Result<()> {
        self.send_unit(self.authed(Method::DELETE, &format!("/api/watchlist/{id}"))?)
            .await
    }

    // --- prices ---

    pub async fn price_history(&self, event_id: &str) -> Result<Vec<PricePoint>> {
        self.send(self.request(Method::GET, &format!("/api/prices/history/{event_id}"))?)
            .await
    }

    pub async fn price_trend(&self, event_id: &str) -> Result<PriceTrend> {
        self.send(self.request(Method::GET, &format!("/api/prices/trend/{event_id}"))?)
            .await
    }

    pub async fn recommendation(&self, event_id: &str) -> Result<Recommendation> {
        self.send(self.request(
            Method::GET,
            &format!("/api/prices/recommendation/{event_id}"),
        )?)
        .await
    }

    // --- favorites ---

    pub async fn favorites(&self) -> Result<Vec<Favorite>> {
        self.send(self.authed(Method::GET, "/api/favorites")?).await
    }

    pub async fn add_favorite(
        &self,
        favorite_type: FavoriteType,
        favorite_name: &str,
    ) -> Result<Favorite> {
        let body = serde_json::json!({
            "favoriteType": favorite_type,
            "favoriteName": favorite_name,
        });
        self.send(self.authed(Method::POST, "/api/favorites")?.json(&body))
            .await
    }

    pub async fn remove_favorite(&self, id: i64) -> Result<()> {
        self.send_unit(self.authed(Method::DELETE, &format!("/api/favorites/{id}"))?)
            .await
    }

    /// Upcoming events matching the user's saved teams/artists/venues
    pub async fn favorite_events(&self) -> Result<Vec<Event>> {
        self.send(self.authed(Method::GET, "/api/favorites/events")?)
            .await
    }

    // --- newsletter ---

    pub async fn subscribe_newsletter(&self, email: &str) -> Result<()> {
        let body = serde_json::json!({ "email": email });
        self.send_unit(
            self.request(Method::POST, "/api/newsletter/subscribe")?
                .json(&body),
        )
        .await
    }

    // --- admin ---

    pub async fn admin_stats(&self) -> Result<AdminStats> {
        self.send(self.admin(Method::GET, "/api/admin/stats")?).await
    }

    pub async fn trigger_drip(&self) -> Result<DripRunResponse> {
        self.send(self.admin(Method::POST, "/api/admin/drip/run")?)
            .await
    }
}
