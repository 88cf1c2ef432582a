//! Temporary messages announcing new stars.

use log::{error, info};

use crate::{
    discord::{Destination, WebhookClient, WebhookMessage},
    notifications::{messages::format_new_stars, state::StarMessage, store::StateStore},
    stars::Star,
};

/// Posts one message listing every new star to each destination.
///
/// Each posted message is recorded so the sweeper can delete it later. A
/// destination that fails is logged and skipped.
///
/// # Arguments
///
/// * `client` - Webhook client
/// * `store` - State store recording the posted messages
/// * `destinations` - Webhooks to notify
/// * `stars` - Stars detected since the previous poll
/// * `now` - Unix timestamp, in seconds, of the dispatch
///
/// # Errors
///
/// Returns an error when the state file cannot be written.
pub async fn post_new_stars<W: WebhookClient>(
    client: &W,
    store: &mut StateStore,
    destinations: &[Destination],
    stars: &[Star],
    now: i64,
) -> anyhow::Result<()> {
    if stars.is_empty() {
        return Ok(());
    }

    for destination in destinations {
        let message = WebhookMessage::text(format_new_stars(stars, destination.role_id.as_deref()));

        match client.post_message(&destination.url, &message).await {
            Ok(message_id) => {
                info!(
                    "announced {} new star(s) to {} with message {}",
                    stars.len(),
                    destination,
                    message_id
                );
                store
                    .add_star_message(StarMessage {
                        webhook_url: destination.url.clone(),
                        message_id,
                        posted_timestamp: now,
                    })
                    .await?;
            }
            Err(e) => error!("failed to announce new stars to {}: {}", destination, e),
        }
    }

    Ok(())
}
