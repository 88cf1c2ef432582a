//! Star tracking and API integration.
//!
//! This module fetches the currently called stars, keeps the ones that are
//! still active and mapped to a known location, and detects which of them are
//! new since the previous poll.
//!
//! # Modules
//!
//! - `requester` - HTTP client for the stars API
//! - `response_structs` - Raw API records
//! - `structs` - Active stars and their locations
//! - `locations` - Called location to coordinates lookup
//! - `filter` - Depletion, world and location slot rules
//! - `changes` - New star detection between two polls
//! - `sync` - Fetch then filter pipeline
//!
//! # Examples
//!
//! ```no_run
//! let requester = StarsApiRequester::new("https://stars.example.com/api", Duration::from_secs(5));
//! let filter = StarFilter::new(vec!["318".to_string()], vec!["302".to_string()]);
//! let stars_sync = StarsSync::new(requester, filter, LocationTable::default());
//! let stars = stars_sync.fetch(now).await?;
//! let new_stars = detect_new_stars(&stars, previous.as_deref());
//! ```

mod changes;
mod filter;
mod locations;
mod requester;
mod response_structs;
mod structs;
mod sync;

pub use crate::stars::changes::detect_new_stars;
pub use crate::stars::filter::StarFilter;
pub use crate::stars::locations::LocationTable;
#[cfg(test)]
pub use crate::stars::requester::MockStarsRequester;
pub use crate::stars::requester::{StarsApiRequester, StarsRequester};
#[cfg(test)]
pub use crate::stars::response_structs::StarResponse;
pub use crate::stars::structs::{Star, StarLocation};
pub use crate::stars::sync::StarsSync;
