//! Star synchronization with the stars API.
//!
//! This module provides the [`StarsSync`] struct that fetches the raw stars
//! and turns them into the active star list used by the notifier.

use log::{error, info};

use crate::stars::{
    filter::StarFilter, locations::LocationTable, requester::StarsRequester, structs::Star,
};

/// Fetches stars and applies filtering and location resolution.
///
/// It interacts with the stars API through a [StarsRequester] implementation.
///
/// # Examples
///
/// ```no_run
/// let requester = StarsApiRequester::new("http://stars.example.com", Duration::from_secs(5));
/// let filter = StarFilter::new(vec![], vec!["302".to_string()]);
/// let stars_sync = StarsSync::new(requester, filter, LocationTable::default());
/// let stars = stars_sync.fetch(1718000000).await?;
/// ```
pub struct StarsSync<R: StarsRequester> {
    /// Requester to interact with the stars API
    stars_requester: R,
    /// Allow and deny rules
    filter: StarFilter,
    /// Known star locations
    locations: LocationTable,
}

impl<R: StarsRequester> StarsSync<R> {
    /// Create a new [StarsSync].
    ///
    /// # Arguments
    ///
    /// * `stars_requester` - An implementation of the [StarsRequester] trait.
    /// * `filter` - Rules applied to every fetched star.
    /// * `locations` - Table used to resolve called locations.
    pub fn new(stars_requester: R, filter: StarFilter, locations: LocationTable) -> Self {
        StarsSync {
            stars_requester,
            filter,
            locations,
        }
    }

    /// Fetches the active stars at `now`.
    ///
    /// # Arguments
    ///
    /// * `now` - Current unix timestamp in seconds
    ///
    /// # Errors
    ///
    /// Returns the transport or decoding error when the API call fails.
    pub async fn fetch(&self, now: i64) -> Result<Vec<Star>, reqwest::Error> {
        let responses = match self.stars_requester.get_stars(now * 1000).await {
            Ok(responses) => responses,
            Err(e) => {
                error!("error while requesting stars: {}", e);
                return Err(e);
            }
        };

        let fetched = responses.len();
        let stars = self.filter.apply(responses, &self.locations, now);
        info!("fetched {} stars, {} active", fetched, stars.len());

        Ok(stars)
    }
}
