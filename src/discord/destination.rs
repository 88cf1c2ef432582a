//! Configured notification destinations.

use std::fmt;

/// A Discord webhook to notify, optionally with a role to mention.
///
/// Destinations are configured as `<webhook url>` or `<webhook url>=<role id>`.
///
/// # Examples
///
/// ```
/// let destination = Destination::parse("https://discord.com/api/webhooks/1/abc=42").unwrap();
/// assert_eq!(destination.url, "https://discord.com/api/webhooks/1/abc");
/// assert_eq!(destination.role_id.as_deref(), Some("42"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Webhook url, also the key of the persisted listing message
    pub url: String,
    /// Role mentioned in new star messages
    pub role_id: Option<String>,
}

impl Destination {
    /// Parses a configured destination, returns `None` for blank entries.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let (url, role_id) = match raw.split_once('=') {
            Some((url, role_id)) => (url, Some(role_id.trim().to_owned())),
            None => (raw, None),
        };

        Some(Destination {
            url: url.trim().to_owned(),
            role_id: role_id.filter(|role_id| !role_id.is_empty()),
        })
    }

    /// Parses every configured destination, skipping blank entries.
    pub fn parse_all(raw: &[String]) -> Vec<Self> {
        raw.iter().filter_map(|r| Destination::parse(r)).collect()
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.role_id {
            Some(role_id) => write!(f, "{} (role {})", self.url, role_id),
            None => write!(f, "{}", self.url),
        }
    }
}
