//! Static venue and city reference data with a fuzzy venue lookup:
//! exact match, then prefix match, then first-token containment.

/// Reference info for a known venue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VenueInfo {
    pub name: &'static str,
    pub city: &'static str,
    pub state: &'static str,
    pub capacity: u32,
}

pub const VENUES: &[VenueInfo] = &[
    VenueInfo { name: "Madison Square Garden", city: "New York", state: "NY", capacity: 20_789 },
    VenueInfo { name: "Barclays Center", city: "Brooklyn", state: "NY", capacity: 19_000 },
    VenueInfo { name: "Kia Center", city: "Orlando", state: "FL", capacity: 18_846 },
    VenueInfo { name: "Chase Center", city: "San Francisco", state: "CA", capacity: 18_064 },
    VenueInfo { name: "Crypto.com Arena", city: "Los Angeles", state: "CA", capacity: 20_000 },
    VenueInfo { name: "United Center", city: "Chicago", state: "IL", capacity: 23_500 },
    VenueInfo { name: "TD Garden", city: "Boston", state: "MA", capacity: 19_580 },
    VenueInfo { name: "American Airlines Center", city: "Dallas", state: "TX", capacity: 20_000 },
    VenueInfo { name: "Moody Center", city: "Austin", state: "TX", capacity: 15_000 },
    VenueInfo { name: "Climate Pledge Arena", city: "Seattle", state: "WA", capacity: 18_100 },
    VenueInfo { name: "Ball Arena", city: "Denver", state: "CO", capacity: 19_520 },
    VenueInfo { name: "State Farm Arena", city: "Atlanta", state: "GA", capacity: 18_118 },
    VenueInfo { name: "Kaseya Center", city: "Miami", state: "FL", capacity: 19_600 },
    VenueInfo { name: "Little Caesars Arena", city: "Detroit", state: "MI", capacity: 20_332 },
    VenueInfo { name: "Wells Fargo Center", city: "Philadelphia", state: "PA", capacity: 19_500 },
];

pub const CITIES: &[&str] = &[
    "New York",
    "Brooklyn",
    "Orlando",
    "San Francisco",
    "Los Angeles",
    "Chicago",
    "Boston",
    "Dallas",
    "Austin",
    "Seattle",
    "Denver",
    "Atlanta",
    "Miami",
    "Detroit",
    "Philadelphia",
];

/// Look up a venue by name with ordered fallback rules:
/// 1. exact name match (case-insensitive)
/// 2. catalog name starts with the query
/// 3. catalog name contains the query's first whitespace-delimited token
pub fn find_venue(query: &str) -> Option<&'static VenueInfo> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    if let Some(venue) = VENUES
        .iter()
        .find(|venue| venue.name.to_lowercase() == needle)
    {
        return Some(venue);
    }

    if let Some(venue) = VENUES
        .iter()
        .find(|venue| venue.name.to_lowercase().starts_with(&needle))
    {
        return Some(venue);
    }

    let first_token = needle.split_whitespace().next()?;
    VENUES
        .iter()
        .find(|venue| venue.name.to_lowercase().contains(first_token))
}

pub fn venues_in_city(city: &str) -> Vec<&'static VenueInfo> {
    let city = city.trim().to_lowercase();
    VENUES
        .iter()
        .filter(|venue| venue.city.to_lowercase() == city)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_ignores_case() {
        let venue = find_venue("kia center").unwrap();
        assert_eq!(venue.city, "Orlando");
    }

    #[test]
    fn prefix_match_beats_token_match() {
        // "madison" is a prefix of "Madison Square Garden"
        let venue = find_venue("Madison").unwrap();
        assert_eq!(venue.name, "Madison Square Garden");
    }

    #[test]
    fn first_token_fallback() {
        // No catalog name starts with "Crypto Arena", but "crypto" appears
        // in "Crypto.com Arena"
        let venue = find_venue("Crypto Arena LA").unwrap();
        assert_eq!(venue.name, "Crypto.com Arena");
    }

    #[test]
    fn unknown_venue_returns_none() {
        assert!(find_venue("Nonexistent Pavilion").is_none());
        assert!(find_venue("   ").is_none());
    }

    #[test]
    fn venues_in_city_filters_by_city() {
        let texas = venues_in_city("dallas");
        assert_eq!(texas.len(), 1);
        assert_eq!(texas[0].name, "American Airlines Center");
    }
}
