//! Star notifications lifecycle.
//!
//! This module keeps every Discord destination informed about active stars:
//!
//! - [`ListingPublisher`]: one listing message per destination, edited in place
//! - [`post_new_stars`]: one temporary message per destination when new stars appear
//! - [`sweep_star_messages`]: deletion of the temporary messages once too old
//! - [`StateStore`]: persisted listing and temporary message ids
//!
//! # Example Usage
//!
//! ```no_run
//! # async fn example(stars: Vec<Star>, new_stars: Vec<Star>, now: i64) -> anyhow::Result<()> {
//! let client = DiscordWebhookClient::new();
//! let destinations = Destination::parse_all(&["https://discord.com/api/webhooks/1/abc=42".to_string()]);
//! let mut store = StateStore::load("data/db.json".to_string()).await?;
//!
//! sweep_star_messages(&client, &mut store, 50, now, DELETE_PACING).await?;
//!
//! let publisher = ListingPublisher::new(String::new(), MapThumbnailer::new(512, 512));
//! publisher.publish(&client, &mut store, &destinations, &stars).await?;
//! post_new_stars(&client, &mut store, &destinations, &new_stars, now).await?;
//! # Ok(())
//! # }
//! ```

mod listing;
mod messages;
mod new_stars;
mod state;
mod store;
mod sweeper;

pub use crate::notifications::listing::ListingPublisher;
pub use crate::notifications::new_stars::post_new_stars;
#[cfg(test)]
pub use crate::notifications::state::StarMessage;
pub use crate::notifications::store::StateStore;
pub use crate::notifications::sweeper::{DELETE_PACING, sweep_star_messages};
