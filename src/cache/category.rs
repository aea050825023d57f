//! Cache Categories
//!
//! Named kinds of catalog data and how long each stays fresh.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;

/// Kind of catalog data being cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheCategory {
    Trending,
    Movies,
    Series,
    Genres,
    MovieDetails,
    UserData,
    Search,
    /// Anything without a more specific category
    Default,
}

impl CacheCategory {
    pub const ALL: [CacheCategory; 8] = [
        CacheCategory::Trending,
        CacheCategory::Movies,
        CacheCategory::Series,
        CacheCategory::Genres,
        CacheCategory::MovieDetails,
        CacheCategory::UserData,
        CacheCategory::Search,
        CacheCategory::Default,
    ];

    /// Freshness window for this kind of data. Genre taxonomies barely change;
    /// trending lists turn over within minutes.
    pub const fn default_ttl(self) -> Duration {
        let secs = match self {
            CacheCategory::Trending => 5 * MINUTE,
            CacheCategory::Movies | CacheCategory::Series => 30 * MINUTE,
            CacheCategory::Genres => 24 * HOUR,
            CacheCategory::MovieDetails => HOUR,
            CacheCategory::UserData => 15 * MINUTE,
            CacheCategory::Search => 10 * MINUTE,
            CacheCategory::Default => 15 * MINUTE,
        };
        Duration::from_secs(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ttls() {
        assert_eq!(CacheCategory::Trending.default_ttl(), Duration::from_secs(300));
        assert_eq!(CacheCategory::Movies.default_ttl(), Duration::from_secs(1800));
        assert_eq!(CacheCategory::Series.default_ttl(), Duration::from_secs(1800));
        assert_eq!(CacheCategory::Genres.default_ttl(), Duration::from_secs(86_400));
        assert_eq!(CacheCategory::MovieDetails.default_ttl(), Duration::from_secs(3600));
        assert_eq!(CacheCategory::UserData.default_ttl(), Duration::from_secs(900));
        assert_eq!(CacheCategory::Search.default_ttl(), Duration::from_secs(600));
        assert_eq!(CacheCategory::Default.default_ttl(), Duration::from_secs(900));
    }

    #[test]
    fn test_every_ttl_is_positive() {
        for category in CacheCategory::ALL {
            assert!(category.default_ttl() > Duration::ZERO, "{:?}", category);
        }
    }

    #[test]
    fn test_serde_names() {
        let parsed: CacheCategory = serde_json::from_str("\"movie_details\"").unwrap();
        assert_eq!(parsed, CacheCategory::MovieDetails);
        assert_eq!(serde_json::to_string(&CacheCategory::UserData).unwrap(), "\"user_data\"");
    }
}
