//! HTTP client for the stars API.
//!
//! This module provides the [`StarsApiRequester`] struct for fetching the
//! currently called stars.

use std::time::Duration;

use log::{debug, info};
use mockall::automock;
use reqwest::{Client, Error, header};

use crate::stars::response_structs::{StarResponse, parse_star_records};

/// HTTP client for requesting stars from the upstream API.
///
/// # Examples
///
/// ```no_run
/// let requester = StarsApiRequester::new("https://stars.example.com/api/stars", Duration::from_secs(5));
/// let stars = requester.get_stars(1718000000000).await.unwrap();
/// println!("Stars: {:?}", stars);
/// ```
pub struct StarsApiRequester {
    /// Full url of the stars endpoint
    url: String,
    /// Timeout applied to every request
    timeout: Duration,
    /// Optional `User-Agent` header
    user_agent: Option<String>,
    /// Optional `Referer` header
    referer: Option<String>,
    /// HTTP client
    client: Client,
}

/// Trait for fetching stars.
///
/// This trait abstracts the HTTP operations for easier testing with mocks.
#[automock]
pub trait StarsRequester {
    /// Fetches every star currently known by the API.
    ///
    /// `timestamp_ms` is sent as a cache buster.
    async fn get_stars(&self, timestamp_ms: i64) -> Result<Vec<StarResponse>, Error>;
}

impl StarsApiRequester {
    /// Create a new [StarsApiRequester].
    ///
    /// # Arguments
    ///
    /// * `url` - Full url of the stars endpoint.
    /// * `timeout` - Timeout applied to every request.
    pub fn new(url: &str, timeout: Duration) -> Self {
        StarsApiRequester {
            url: url.to_string(),
            timeout,
            user_agent: None,
            referer: None,
            client: Client::new(),
        }
    }

    /// Sets the headers sent with every request. Empty values are not sent.
    pub fn with_headers(mut self, user_agent: &str, referer: &str) -> Self {
        self.user_agent = Some(user_agent.to_string()).filter(|v| !v.is_empty());
        self.referer = Some(referer.to_string()).filter(|v| !v.is_empty());
        self
    }
}

impl StarsRequester for StarsApiRequester {
    /// Request `{url}?timestamp={timestamp_ms}` to get the list of stars.
    async fn get_stars(&self, timestamp_ms: i64) -> Result<Vec<StarResponse>, Error> {
        info!("request stars");
        debug!("request {}?timestamp={}", &self.url, timestamp_ms);

        let mut request = self
            .client
            .get(&self.url)
            .query(&[("timestamp", timestamp_ms)])
            .timeout(self.timeout);

        if let Some(user_agent) = &self.user_agent {
            request = request.header(header::USER_AGENT, user_agent);
        }
        if let Some(referer) = &self.referer {
            request = request.header(header::REFERER, referer);
        }

        let records: Vec<serde_json::Value> =
            request.send().await?.error_for_status()?.json().await?;
        let stars = parse_star_records(records);

        debug!("response from {} -> {:?}", &self.url, &stars);

        Ok(stars)
    }
}
