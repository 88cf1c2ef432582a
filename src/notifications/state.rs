//! Persisted notification state.
//!
//! This module provides the serializable structures written to the state file:
//! the listing message of each webhook and the new star messages waiting to
//! be deleted.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A posted new star message, deleted once it gets too old.
///
/// Several records may exist for the same webhook, one per dispatch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarMessage {
    /// Webhook the message was posted to
    pub webhook_url: String,
    /// Discord message id
    pub message_id: String,
    /// Unix timestamp, in seconds, of the dispatch
    pub posted_timestamp: i64,
}

impl StarMessage {
    /// Age of the message at `now`, in seconds.
    pub fn age(&self, now: i64) -> i64 {
        now - self.posted_timestamp
    }

    /// Whether the message is strictly older than `max_age` seconds.
    pub fn is_expired(&self, max_age: i64, now: i64) -> bool {
        self.age(now) > max_age
    }

    /// Whether both records point at the same remote message.
    pub fn same_message(&self, other: &StarMessage) -> bool {
        self.webhook_url == other.webhook_url && self.message_id == other.message_id
    }
}

/// Whole content of the state file.
///
/// ```json
/// {
///   "listingMessages": { "https://discord.com/api/webhooks/1/abc": "1234" },
///   "newStarMessages": [
///     { "webhookUrl": "https://discord.com/api/webhooks/1/abc", "messageId": "5678", "postedTimestamp": 1718000000 }
///   ]
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedState {
    /// Webhook url to listing message id
    pub listing_messages: HashMap<String, String>,
    /// New star messages not deleted yet
    pub new_star_messages: Vec<StarMessage>,
}
