//! Filtering of raw API stars into active, mapped stars.

use log::debug;

use crate::stars::{
    locations::LocationTable,
    response_structs::StarResponse,
    structs::{Star, deplete_time},
};

/// Allow and deny rules applied to every fetched star.
///
/// A star passes when it has not depleted yet, its world is not excluded,
/// its location slot is allowed and its called location resolves to a known
/// location. An empty `allowed_locations` list rejects every star.
#[derive(Debug, Clone, Default)]
pub struct StarFilter {
    /// Worlds to ignore, compared as strings
    pub excluded_worlds: Vec<String>,
    /// Location slots to keep, compared as strings
    pub allowed_locations: Vec<String>,
}

impl StarFilter {
    /// Create a new [StarFilter].
    pub fn new(excluded_worlds: Vec<String>, allowed_locations: Vec<String>) -> Self {
        StarFilter {
            excluded_worlds,
            allowed_locations,
        }
    }

    /// Converts raw API stars into active stars.
    ///
    /// Rejected records are dropped silently, the output keeps input order.
    ///
    /// # Arguments
    ///
    /// * `responses` - Stars as returned by the API
    /// * `locations` - Table used to resolve called locations
    /// * `now` - Current unix timestamp in seconds
    pub fn apply(
        &self,
        responses: Vec<StarResponse>,
        locations: &LocationTable,
        now: i64,
    ) -> Vec<Star> {
        responses
            .into_iter()
            .filter_map(|response| self.convert(response, locations, now))
            .collect()
    }

    fn convert(&self, response: StarResponse, locations: &LocationTable, now: i64) -> Option<Star> {
        let called_at = response.called_at as i64;
        let Some(deplete_time) = deplete_time(called_at, response.tier) else {
            debug!("ignore star with out of range called_at {}", response);
            return None;
        };
        if deplete_time <= now {
            debug!("ignore depleted star {}", response);
            return None;
        }

        if self.excluded_worlds.contains(&response.world.to_string()) {
            debug!("ignore star on excluded world {}", response);
            return None;
        }

        if !self.allowed_locations.contains(&response.location.to_string()) {
            debug!("ignore star on disallowed location {}", response);
            return None;
        }

        let Some(mapped_location) = locations.resolve(&response.called_location) else {
            debug!("ignore star on unmapped location {}", response);
            return None;
        };

        Some(Star {
            location: response.location,
            called_location: response.called_location,
            mapped_location,
            tier: response.tier,
            world: response.world,
            called_at,
            min_time: response.min_time,
            max_time: response.max_time,
            deplete_time,
        })
    }
}
