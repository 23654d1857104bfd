use crate::models::Event;
use crate::sources::types::SearchParams;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for all ticket platform sources
/// This allows easy addition of new platforms (StubHub, Vivid Seats, etc) in the future
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Search the platform for events matching the given parameters
    async fn search(&self, params: &SearchParams) -> Result<Vec<Event>>;

    /// Get the name of the platform source
    fn source_name(&self) -> &'static str;
}
