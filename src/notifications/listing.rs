//! Star listing kept up to date on every destination.
//!
//! This module provides the [`ListingPublisher`]. Each destination owns at
//! most one listing message, edited in place on every update and posted again
//! only when Discord no longer knows it.

use log::{error, info, warn};

use crate::{
    discord::{Destination, WebhookClient, WebhookFile, WebhookMessage},
    notifications::{messages::format_listing, store::StateStore},
    stars::Star,
    thumbnails::Thumbnailer,
};

/// Builds the listing message and publishes it to destinations.
pub struct ListingPublisher<T: Thumbnailer> {
    /// Text shown under the listing, empty for none
    footer: String,
    /// Renderer of the location thumbnails
    thumbnailer: T,
}

impl<T: Thumbnailer> ListingPublisher<T> {
    /// Create a new [ListingPublisher].
    pub fn new(footer: String, thumbnailer: T) -> Self {
        ListingPublisher {
            footer,
            thumbnailer,
        }
    }

    /// Builds the listing message of `stars`, with one thumbnail per
    /// displayed location.
    ///
    /// A location whose thumbnail cannot be rendered is shown without one.
    pub fn compose(&self, stars: &[Star]) -> WebhookMessage {
        let (content, locations) = format_listing(stars, &self.footer);

        let files = locations
            .iter()
            .filter_map(|location| match self.thumbnailer.render(location) {
                Ok(data) => Some(WebhookFile {
                    name: format!("map{}.png", location),
                    data,
                }),
                Err(e) => {
                    warn!("failed to render thumbnail of {}: {:#}", location, e);
                    None
                }
            })
            .collect();

        WebhookMessage::with_files(content, files)
    }

    /// Publishes the listing of `stars` to every destination.
    ///
    /// Webhook failures are logged and only affect their own destination.
    ///
    /// # Errors
    ///
    /// Returns an error when the state file cannot be written.
    pub async fn publish<W: WebhookClient>(
        &self,
        client: &W,
        store: &mut StateStore,
        destinations: &[Destination],
        stars: &[Star],
    ) -> anyhow::Result<()> {
        let message = self.compose(stars);
        info!(
            "updating listing of {} star(s) on {} destination(s)",
            stars.len(),
            destinations.len()
        );

        for destination in destinations {
            publish_to(client, store, &destination.url, &message).await?;
        }

        Ok(())
    }
}

/// Edits the listing message of a webhook, or posts it when there is none.
async fn publish_to<W: WebhookClient>(
    client: &W,
    store: &mut StateStore,
    webhook_url: &str,
    message: &WebhookMessage,
) -> anyhow::Result<()> {
    let Some(message_id) = store.listing_message(webhook_url).map(str::to_owned) else {
        return post_listing(client, store, webhook_url, message).await;
    };

    match client.edit_message(webhook_url, &message_id, message).await {
        Ok(()) => Ok(()),
        Err(e) if e.is_not_found() => {
            warn!(
                "listing message {} is gone from {}, posting a new one",
                message_id, webhook_url
            );
            post_listing(client, store, webhook_url, message).await
        }
        Err(e) => {
            error!(
                "failed to edit listing message {} on {}: {}",
                message_id, webhook_url, e
            );
            Ok(())
        }
    }
}

async fn post_listing<W: WebhookClient>(
    client: &W,
    store: &mut StateStore,
    webhook_url: &str,
    message: &WebhookMessage,
) -> anyhow::Result<()> {
    match client.post_message(webhook_url, message).await {
        Ok(message_id) => store.set_listing_message(webhook_url, &message_id).await,
        Err(e) => {
            error!("failed to post listing to {}: {}", webhook_url, e);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        discord::{MockWebhookClient, WebhookError},
        stars::StarLocation,
        thumbnails::MockThumbnailer,
    };
    use reqwest::StatusCode;
    use tempfile::TempDir;

    const URL_A: &str = "https://discord.test/api/webhooks/1/a";
    const URL_B: &str = "https://discord.test/api/webhooks/2/b";

    fn create_test_star(x: i32) -> Star {
        Star {
            location: 302,
            called_location: format!("spot {}", x),
            mapped_location: StarLocation { x, y: 2874 },
            tier: 6,
            world: 420,
            called_at: 1_000,
            min_time: 60,
            max_time: 120,
            deplete_time: 1_000 + 6 * 420,
        }
    }

    fn create_destinations(urls: &[&str]) -> Vec<Destination> {
        urls.iter()
            .map(|url| Destination {
                url: url.to_string(),
                role_id: None,
            })
            .collect()
    }

    fn create_thumbnailer() -> MockThumbnailer {
        let mut thumbnailer = MockThumbnailer::new();
        thumbnailer
            .expect_render()
            .returning(|location| Ok(vec![location.x as u8]));
        thumbnailer
    }

    async fn create_store(dir: &TempDir) -> StateStore {
        let path = dir.path().join("db.json").to_str().unwrap().to_string();
        StateStore::load(path).await.unwrap()
    }

    #[test]
    fn test_compose_attaches_one_thumbnail_per_location() {
        let publisher = ListingPublisher::new(String::new(), create_thumbnailer());
        let stars = vec![create_test_star(1), create_test_star(2), create_test_star(1)];

        let message = publisher.compose(&stars);

        let names: Vec<&str> = message.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["map1_2874.png", "map2_2874.png"]);
        assert_eq!(message.attachments.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_compose_skips_failed_thumbnails() {
        let mut thumbnailer = MockThumbnailer::new();
        thumbnailer.expect_render().returning(|location| {
            if location.x == 1 {
                Err(anyhow::anyhow!("render failed"))
            } else {
                Ok(vec![0])
            }
        });
        let publisher = ListingPublisher::new(String::new(), thumbnailer);

        let message = publisher.compose(&[create_test_star(1), create_test_star(2)]);

        assert_eq!(message.files.len(), 1);
        assert_eq!(message.files[0].name, "map2_2874.png");
        assert!(message.content.contains("spot 1"));
    }

    #[test]
    fn test_compose_empty_listing_clears_attachments() {
        let publisher = ListingPublisher::new("footer".to_string(), MockThumbnailer::new());

        let message = publisher.compose(&[]);

        assert_eq!(message.content, "No stars at the moment :(\n\n-# footer");
        assert_eq!(message.attachments, Some(vec![]));
        assert!(!message.is_multipart());
    }

    #[tokio::test]
    async fn test_publish_posts_when_no_listing() {
        let dir = TempDir::new().unwrap();
        let mut store = create_store(&dir).await;
        let publisher = ListingPublisher::new(String::new(), create_thumbnailer());

        let mut client = MockWebhookClient::new();
        client
            .expect_post_message()
            .withf(|url, _| url == URL_A)
            .times(1)
            .returning(|_, _| Ok("100".to_string()));
        client.expect_edit_message().never();

        publisher
            .publish(
                &client,
                &mut store,
                &create_destinations(&[URL_A]),
                &[create_test_star(1)],
            )
            .await
            .unwrap();

        assert_eq!(store.listing_message(URL_A), Some("100"));
    }

    #[tokio::test]
    async fn test_publish_twice_edits_without_duplicates() {
        let dir = TempDir::new().unwrap();
        let mut store = create_store(&dir).await;
        store.set_listing_message(URL_A, "100").await.unwrap();
        let publisher = ListingPublisher::new(String::new(), create_thumbnailer());

        let mut client = MockWebhookClient::new();
        client
            .expect_edit_message()
            .withf(|url, message_id, _| url == URL_A && message_id == "100")
            .times(2)
            .returning(|_, _, _| Ok(()));
        client.expect_post_message().never();

        let destinations = create_destinations(&[URL_A]);
        let stars = vec![create_test_star(1)];
        for _ in 0..2 {
            publisher
                .publish(&client, &mut store, &destinations, &stars)
                .await
                .unwrap();
        }

        assert_eq!(store.listing_message(URL_A), Some("100"));
        assert_eq!(store.state().listing_messages.len(), 1);
    }

    #[tokio::test]
    async fn test_publish_reposts_after_not_found() {
        let dir = TempDir::new().unwrap();
        let mut store = create_store(&dir).await;
        store.set_listing_message(URL_A, "100").await.unwrap();
        let publisher = ListingPublisher::new(String::new(), create_thumbnailer());

        let mut client = MockWebhookClient::new();
        client
            .expect_edit_message()
            .times(1)
            .returning(|_, _, _| Err(WebhookError::Status(StatusCode::NOT_FOUND)));
        client
            .expect_post_message()
            .withf(|url, _| url == URL_A)
            .times(1)
            .returning(|_, _| Ok("200".to_string()));

        publisher
            .publish(
                &client,
                &mut store,
                &create_destinations(&[URL_A]),
                &[create_test_star(1)],
            )
            .await
            .unwrap();

        assert_eq!(store.listing_message(URL_A), Some("200"));
    }

    #[tokio::test]
    async fn test_publish_keeps_record_on_other_edit_error() {
        let dir = TempDir::new().unwrap();
        let mut store = create_store(&dir).await;
        store.set_listing_message(URL_A, "100").await.unwrap();
        store.set_listing_message(URL_B, "300").await.unwrap();
        let publisher = ListingPublisher::new(String::new(), create_thumbnailer());

        let mut client = MockWebhookClient::new();
        client
            .expect_edit_message()
            .withf(|url, _, _| url == URL_A)
            .times(1)
            .returning(|_, _, _| Err(WebhookError::Status(StatusCode::INTERNAL_SERVER_ERROR)));
        client
            .expect_edit_message()
            .withf(|url, _, _| url == URL_B)
            .times(1)
            .returning(|_, _, _| Ok(()));
        client.expect_post_message().never();

        publisher
            .publish(
                &client,
                &mut store,
                &create_destinations(&[URL_A, URL_B]),
                &[create_test_star(1)],
            )
            .await
            .unwrap();

        assert_eq!(store.listing_message(URL_A), Some("100"));
        assert_eq!(store.listing_message(URL_B), Some("300"));
    }

    #[tokio::test]
    async fn test_publish_post_failure_leaves_no_record() {
        let dir = TempDir::new().unwrap();
        let mut store = create_store(&dir).await;
        let publisher = ListingPublisher::new(String::new(), create_thumbnailer());

        let mut client = MockWebhookClient::new();
        client
            .expect_post_message()
            .withf(|url, _| url == URL_A)
            .times(1)
            .returning(|_, _| Err(WebhookError::MissingId));
        client
            .expect_post_message()
            .withf(|url, _| url == URL_B)
            .times(1)
            .returning(|_, _| Ok("400".to_string()));

        publisher
            .publish(
                &client,
                &mut store,
                &create_destinations(&[URL_A, URL_B]),
                &[],
            )
            .await
            .unwrap();

        assert_eq!(store.listing_message(URL_A), None);
        assert_eq!(store.listing_message(URL_B), Some("400"));
    }
}
