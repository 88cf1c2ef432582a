//! Polling loop relaying stars to Discord.
//!
//! This module provides the [`Notifier`] which runs one cycle after another,
//! sleeping a fixed delay in between. A cycle:
//!
//! 1. deletes the new star messages that got too old
//! 2. fetches the active stars
//! 3. updates the listing when its interval elapsed, or on the first fetch
//! 4. announces the stars missing from the previous fetch, refreshing the
//!    listing first when step 3 did not
//!
//! Network failures are logged and retried on the next cycle. Only state
//! file failures stop the loop.

use std::time::Duration;

use log::{info, warn};
use tokio::time;

use crate::{
    config::Config,
    discord::{Destination, DiscordWebhookClient, WebhookClient},
    notifications::{
        DELETE_PACING, ListingPublisher, StateStore, post_new_stars, sweep_star_messages,
    },
    stars::{
        LocationTable, Star, StarFilter, StarsApiRequester, StarsRequester, StarsSync,
        detect_new_stars,
    },
    thumbnails::{MapThumbnailer, Thumbnailer},
    utils::unix_now,
};

/// Timing of the polling loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleSettings {
    /// Delay between two cycles, also the minimum delay between two fetches
    pub poll_interval: Duration,
    /// Minimum delay between two scheduled listing updates
    pub listing_update_interval: Duration,
    /// Age, in seconds, after which a new star message is deleted
    pub new_star_message_max_age: i64,
    /// Delay between two delete requests of a sweep
    pub delete_pacing: Duration,
}

/// Star notifier main loop.
///
/// Generic over its three seams so cycles can be driven with mocks.
pub struct Notifier<R: StarsRequester, W: WebhookClient, T: Thumbnailer> {
    stars_sync: StarsSync<R>,
    client: W,
    publisher: ListingPublisher<T>,
    store: StateStore,
    destinations: Vec<Destination>,
    settings: CycleSettings,
    /// Unix timestamp of the last listing update
    last_listing_update: Option<i64>,
    /// Unix timestamp of the last star fetch attempt
    last_star_check: Option<i64>,
    /// Stars of the last successful fetch, `None` until the first one
    previous_stars: Option<Vec<Star>>,
}

impl Notifier<StarsApiRequester, DiscordWebhookClient, MapThumbnailer> {
    /// Creates the notifier described by `config` and loads its state file.
    ///
    /// # Errors
    ///
    /// Returns an error when the state file exists but cannot be read or
    /// parsed.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let locations = LocationTable::default();
        for (short, long) in locations.overlapping_triggers() {
            warn!(
                "location trigger '{}' is contained in '{}', the longest one wins",
                short, long
            );
        }
        info!("{} known star locations", locations.len());

        let requester = StarsApiRequester::new(&config.stars_api_url, config.stars_api_timeout())
            .with_headers(&config.stars_api_user_agent, &config.stars_api_referer);
        if config.allowed_locations.is_empty() {
            warn!("ALLOWED_LOCATIONS is empty, every star will be ignored");
        }
        let filter = StarFilter::new(
            config.excluded_worlds.clone(),
            config.allowed_locations.clone(),
        );

        let destinations = config.destinations();
        if destinations.is_empty() {
            warn!("no Discord webhook configured, stars will only be logged");
        }
        for destination in &destinations {
            info!("notifying {}", destination);
        }

        let store = StateStore::load(config.state_path()).await?;

        Ok(Notifier::new(
            StarsSync::new(requester, filter, locations),
            DiscordWebhookClient::new(),
            ListingPublisher::new(
                config.listing_footer.clone(),
                MapThumbnailer::new(config.map_width, config.map_height),
            ),
            store,
            destinations,
            CycleSettings {
                poll_interval: config.poll_interval(),
                listing_update_interval: config.listing_update_interval(),
                new_star_message_max_age: config.new_star_message_max_age,
                delete_pacing: DELETE_PACING,
            },
        ))
    }
}

impl<R: StarsRequester, W: WebhookClient, T: Thumbnailer> Notifier<R, W, T> {
    /// Create a new [Notifier].
    pub fn new(
        stars_sync: StarsSync<R>,
        client: W,
        publisher: ListingPublisher<T>,
        store: StateStore,
        destinations: Vec<Destination>,
        settings: CycleSettings,
    ) -> Self {
        Notifier {
            stars_sync,
            client,
            publisher,
            store,
            destinations,
            settings,
            last_listing_update: None,
            last_star_check: None,
            previous_stars: None,
        }
    }

    /// Runs cycles until a state file failure.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        info!(
            "polling stars every {}s, listing updated every {}s",
            self.settings.poll_interval.as_secs(),
            self.settings.listing_update_interval.as_secs()
        );

        loop {
            self.run_cycle(unix_now()).await?;
            time::sleep(self.settings.poll_interval).await;
        }
    }

    /// Runs a single cycle at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error when the state file cannot be written.
    pub async fn run_cycle(&mut self, now: i64) -> anyhow::Result<()> {
        info!("running cycle at {}", now);

        sweep_star_messages(
            &self.client,
            &mut self.store,
            self.settings.new_star_message_max_age,
            now,
            self.settings.delete_pacing,
        )
        .await?;

        if !elapsed(self.last_star_check, now, self.settings.poll_interval) {
            return Ok(());
        }
        self.last_star_check = Some(now);

        // Failures are logged by the sync, the previous stars are kept.
        let Ok(stars) = self.stars_sync.fetch(now).await else {
            return Ok(());
        };

        let force_listing_update = self.previous_stars.is_none();
        let mut listing_updated = false;
        if force_listing_update
            || elapsed(
                self.last_listing_update,
                now,
                self.settings.listing_update_interval,
            )
        {
            if force_listing_update {
                info!("first fetch, forcing listing update");
            }
            self.update_listing(&stars, now).await?;
            listing_updated = true;
        }

        let new_stars = detect_new_stars(&stars, self.previous_stars.as_deref());
        if !new_stars.is_empty() {
            if !listing_updated {
                self.update_listing(&stars, now).await?;
            }
            post_new_stars(
                &self.client,
                &mut self.store,
                &self.destinations,
                &new_stars,
                now,
            )
            .await?;
        }

        self.previous_stars = Some(stars);
        Ok(())
    }

    /// Writes the state file.
    pub async fn save(&self) -> anyhow::Result<()> {
        self.store.save().await
    }

    async fn update_listing(&mut self, stars: &[Star], now: i64) -> anyhow::Result<()> {
        self.publisher
            .publish(&self.client, &mut self.store, &self.destinations, stars)
            .await?;
        self.last_listing_update = Some(now);
        Ok(())
    }
}

/// Whether `interval` elapsed since `last`, always true when `last` is unset.
fn elapsed(last: Option<i64>, now: i64, interval: Duration) -> bool {
    match last {
        Some(last) => now - last >= interval.as_secs() as i64,
        None => true,
    }
}
