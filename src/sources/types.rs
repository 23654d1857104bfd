use serde::{Deserialize, Serialize};

/// Search parameters shared by the platform sources and the backend API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    /// City to search in
    pub city: String,
    /// Optional keyword (artist, team, show name)
    pub keyword: Option<String>,
    /// Earliest event date (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Latest event date (YYYY-MM-DD)
    pub end_date: Option<String>,
}

impl SearchParams {
    pub fn for_city(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            keyword: None,
            start_date: None,
            end_date: None,
        }
    }

    /// Query-string pairs for the backend's search/compare endpoints
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("city", self.city.clone())];
        if let Some(keyword) = &self.keyword {
            pairs.push(("keyword", keyword.clone()));
        }
        if let Some(start) = &self.start_date {
            pairs.push(("startDate", start.clone()));
        }
        if let Some(end) = &self.end_date {
            pairs.push(("endDate", end.clone()));
        }
        pairs
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        Self::for_city("New York")
    }
}
