//! Data structures and types for iptvtui
//!
//! Contains all shared models used across the application organized by domain:
//! - **Content**: tabs, catalog items, and categories from the backend
//! - **Search**: cross-type search result sets
//! - **Session**: provider credentials and connection status

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// =============================================================================
// Content Models
// =============================================================================

/// The three content domains served by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Live,
    Vod,
    Series,
}

impl ContentType {
    /// All tabs in display order
    pub const ALL: [ContentType; 3] = [ContentType::Live, ContentType::Vod, ContentType::Series];

    /// Path segment used by the backend routes
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Live => "live",
            ContentType::Vod => "vod",
            ContentType::Series => "series",
        }
    }

    /// Human-readable tab label
    pub fn label(&self) -> &'static str {
        match self {
            ContentType::Live => "Live TV",
            ContentType::Vod => "Movies",
            ContentType::Series => "Series",
        }
    }

    /// Next tab to the right, wrapping around
    pub fn next(&self) -> ContentType {
        match self {
            ContentType::Live => ContentType::Vod,
            ContentType::Vod => ContentType::Series,
            ContentType::Series => ContentType::Live,
        }
    }

    /// Previous tab to the left, wrapping around
    pub fn prev(&self) -> ContentType {
        match self {
            ContentType::Live => ContentType::Series,
            ContentType::Vod => ContentType::Live,
            ContentType::Series => ContentType::Vod,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named grouping of content items within one tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "string_or_number")]
    pub category_id: String,
    pub category_name: String,
}

/// A catalog item: live channel, VOD movie, or series show.
///
/// Live and VOD items carry `stream_id`; series carry `series_id`. Ids are
/// per-type namespaces and may collide numerically across tabs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(default)]
    pub stream_id: Option<u64>,
    #[serde(default)]
    pub series_id: Option<u64>,
    pub name: String,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub category_id: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub stream_icon: Option<String>,
    /// Playable URL, attached by the backend for live and VOD items
    #[serde(default)]
    pub stream_url: Option<String>,
}

impl ContentItem {
    /// Unified identity within the item's own content-type collection
    pub fn id(&self) -> u64 {
        self.stream_id.or(self.series_id).unwrap_or(0)
    }

    /// Whether this item can be handed to a player directly
    pub fn is_playable(&self) -> bool {
        self.stream_url.as_deref().map(|u| !u.is_empty()).unwrap_or(false)
    }
}

impl fmt::Display for ContentItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

// =============================================================================
// Search Models
// =============================================================================

/// Cross-type search results, one slice per tab. Ephemeral: recomputed per
/// query and discarded when the query is cleared.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub live: Vec<ContentItem>,
    #[serde(default)]
    pub vod: Vec<ContentItem>,
    #[serde(default)]
    pub series: Vec<ContentItem>,
}

impl SearchResults {
    /// The result slice for one tab
    pub fn for_tab(&self, tab: ContentType) -> &[ContentItem] {
        match tab {
            ContentType::Live => &self.live,
            ContentType::Vod => &self.vod,
            ContentType::Series => &self.series,
        }
    }

    pub fn total(&self) -> usize {
        self.live.len() + self.vod.len() + self.series.len()
    }
}

// =============================================================================
// Session Models
// =============================================================================

/// Provider credentials, persisted as a single JSON blob
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    #[serde(default)]
    pub playlist_name: Option<String>,
    pub username: String,
    pub password: String,
    pub server_url: String,
}

impl Credential {
    /// Validate required fields. The store itself never validates; this is
    /// for the setup form and CLI before a credential enters the system.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.username.trim().is_empty() {
            return Err("Username is required");
        }
        if self.password.trim().is_empty() {
            return Err("Password is required");
        }
        if self.server_url.trim().is_empty() {
            return Err("Server URL is required");
        }
        if !self.server_url.starts_with("http://") && !self.server_url.starts_with("https://") {
            return Err("Server URL must start with http:// or https://");
        }
        Ok(())
    }
}

/// Connection status reported in the status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Demo,
    Error,
}

impl ConnectionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Connecting => "connecting...",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Demo => "demo mode",
            ConnectionStatus::Error => "connection error",
        }
    }

    /// Whether the retry-connection affordance should be offered
    pub fn can_retry(&self) -> bool {
        matches!(self, ConnectionStatus::Error | ConnectionStatus::Disconnected)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// =============================================================================
// Serde Helpers
// =============================================================================

// Providers are inconsistent about numeric ids: some send "5", some send 5.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
    })
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(i64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Str(s)) => Some(s),
        Some(Raw::Num(n)) => Some(n.to_string()),
        None => None,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_round() {
        for tab in ContentType::ALL {
            assert_eq!(tab.next().prev(), tab);
            assert_eq!(tab.prev().next(), tab);
        }
    }

    #[test]
    fn test_content_item_id_namespaces() {
        let live: ContentItem = serde_json::from_str(
            r#"{"stream_id": 7, "name": "News 24", "category_id": "2"}"#,
        )
        .unwrap();
        let show: ContentItem = serde_json::from_str(
            r#"{"series_id": 7, "name": "Some Show", "category_id": 2}"#,
        )
        .unwrap();

        assert_eq!(live.id(), 7);
        assert_eq!(show.id(), 7);
        assert_eq!(live.category_id.as_deref(), Some("2"));
        assert_eq!(show.category_id.as_deref(), Some("2"));
        assert!(!show.is_playable());
    }

    #[test]
    fn test_category_numeric_id() {
        let cat: Category =
            serde_json::from_str(r#"{"category_id": 12, "category_name": "Sports"}"#).unwrap();
        assert_eq!(cat.category_id, "12");
    }

    #[test]
    fn test_credential_validation() {
        let mut cred = Credential {
            playlist_name: None,
            username: "u".into(),
            password: "p".into(),
            server_url: "http://x.com".into(),
        };
        assert!(cred.validate().is_ok());

        cred.server_url = "ftp://x.com".into();
        assert!(cred.validate().is_err());

        cred.server_url = "https://x.com".into();
        cred.username = "  ".into();
        assert!(cred.validate().is_err());
    }

    #[test]
    fn test_search_results_slices() {
        let results = SearchResults {
            live: vec![ContentItem {
                stream_id: Some(1),
                name: "A".into(),
                ..Default::default()
            }],
            vod: vec![],
            series: vec![],
        };
        assert_eq!(results.for_tab(ContentType::Live).len(), 1);
        assert!(results.for_tab(ContentType::Vod).is_empty());
        assert_eq!(results.total(), 1);
    }
}
