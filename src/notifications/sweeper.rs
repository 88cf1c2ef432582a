//! Removal of expired new star messages.

use std::time::Duration;

use log::{error, info, warn};
use tokio::time;

use crate::{discord::WebhookClient, notifications::store::StateStore};

/// Delay between two delete requests.
pub const DELETE_PACING: Duration = Duration::from_secs(1);

/// Deletes every new star message older than `max_age` seconds.
///
/// A record is forgotten once its message is deleted, already gone from
/// Discord, or rejected with an error that cannot go away (bad token, bad
/// url). Network failures, rate limits and server errors keep the record so
/// the delete is retried on the next sweep. Records are removed from the
/// state in a single write after the whole batch.
///
/// # Arguments
///
/// * `client` - Webhook client
/// * `store` - State store holding the posted messages
/// * `max_age` - Maximum age of a message, in seconds
/// * `now` - Current unix timestamp, in seconds
/// * `pacing` - Delay between two delete requests
///
/// # Errors
///
/// Returns an error when the state file cannot be written.
pub async fn sweep_star_messages<W: WebhookClient>(
    client: &W,
    store: &mut StateStore,
    max_age: i64,
    now: i64,
    pacing: Duration,
) -> anyhow::Result<()> {
    let expired = store.expired_star_messages(max_age, now);
    if expired.is_empty() {
        return Ok(());
    }

    let mut removed = Vec::with_capacity(expired.len());
    for (index, message) in expired.iter().enumerate() {
        if index > 0 && !pacing.is_zero() {
            time::sleep(pacing).await;
        }

        match client
            .delete_message(&message.webhook_url, &message.message_id)
            .await
        {
            Ok(()) => removed.push(message.clone()),
            Err(e) if e.is_not_found() => {
                warn!(
                    "new star message {} already gone from {}",
                    message.message_id, message.webhook_url
                );
                removed.push(message.clone());
            }
            Err(e) if !e.is_retryable() => {
                warn!(
                    "giving up on new star message {} from {}: {}",
                    message.message_id, message.webhook_url, e
                );
                removed.push(message.clone());
            }
            Err(e) => error!(
                "failed to delete new star message {} from {}: {}",
                message.message_id, message.webhook_url, e
            ),
        }
    }

    info!(
        "swept {} expired new star message(s), {} kept for retry",
        removed.len(),
        expired.len() - removed.len()
    );
    store.remove_star_messages(&removed).await
}
