//! State persistence layer.
//!
//! This module provides the [`StateStore`], sole owner of the
//! [`PersistedState`]. Every mutation rewrites the whole state file before
//! returning.

use std::{io::ErrorKind, path::Path};

use anyhow::Context;
use log::{debug, info, warn};
use tokio::fs;

use crate::notifications::state::{PersistedState, StarMessage};

/// Loads, mutates and saves the notification state.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> anyhow::Result<()> {
/// let mut store = StateStore::load("data/db.json".to_string()).await?;
/// store.set_listing_message("https://discord.com/api/webhooks/1/abc", "1234").await?;
/// assert_eq!(store.listing_message("https://discord.com/api/webhooks/1/abc"), Some("1234"));
/// # Ok(())
/// # }
/// ```
pub struct StateStore {
    /// Path to the JSON state file.
    path: String,
    /// In memory copy of the state file.
    state: PersistedState,
}

impl StateStore {
    /// Loads the state file, or starts from an empty state.
    ///
    /// # Errors
    ///
    /// A missing or empty file yields an empty state. A file that cannot be
    /// read or parsed is an error, the notifier must not start from a state
    /// it does not understand.
    pub async fn load(path: String) -> anyhow::Result<Self> {
        let state = match fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => {
                warn!("state file {} is empty, starting with an empty state", path);
                PersistedState::default()
            }
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("failed to parse state file {}", path))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("no state file found at {}, starting with an empty state", path);
                PersistedState::default()
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read state file {}", path));
            }
        };

        info!(
            "loaded {} listing message(s) and {} new star message(s)",
            state.listing_messages.len(),
            state.new_star_messages.len()
        );

        Ok(StateStore { path, state })
    }

    /// Returns the listing message id of a webhook, if one was posted.
    pub fn listing_message(&self, webhook_url: &str) -> Option<&str> {
        self.state
            .listing_messages
            .get(webhook_url)
            .map(String::as_str)
            .filter(|message_id| !message_id.is_empty())
    }

    /// Records the listing message of a webhook and saves.
    pub async fn set_listing_message(
        &mut self,
        webhook_url: &str,
        message_id: &str,
    ) -> anyhow::Result<()> {
        self.state
            .listing_messages
            .insert(webhook_url.to_owned(), message_id.to_owned());
        self.save().await
    }

    /// Records a posted new star message and saves.
    pub async fn add_star_message(&mut self, message: StarMessage) -> anyhow::Result<()> {
        self.state.new_star_messages.push(message);
        self.save().await
    }

    /// Forgets the given new star messages and saves.
    pub async fn remove_star_messages(&mut self, messages: &[StarMessage]) -> anyhow::Result<()> {
        if messages.is_empty() {
            return Ok(());
        }

        self.state
            .new_star_messages
            .retain(|stored| !messages.iter().any(|m| m.same_message(stored)));
        self.save().await
    }

    /// Returns the new star messages older than `max_age` seconds at `now`.
    pub fn expired_star_messages(&self, max_age: i64, now: i64) -> Vec<StarMessage> {
        self.state
            .new_star_messages
            .iter()
            .filter(|message| message.is_expired(max_age, now))
            .cloned()
            .collect()
    }

    #[cfg(test)]
    pub fn state(&self) -> &PersistedState {
        &self.state
    }

    /// Writes the whole state to disk.
    ///
    /// The state is written to a temporary file first, then renamed over the
    /// state file.
    pub async fn save(&self) -> anyhow::Result<()> {
        let serialized = serde_json::to_string(&self.state).context("failed to serialize state")?;

        if let Some(parent) = Path::new(&self.path).parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }

        let temp_path = format!("{}.tmp", self.path);
        fs::write(&temp_path, &serialized)
            .await
            .with_context(|| format!("failed to write {}", temp_path))?;
        fs::rename(&temp_path, &self.path)
            .await
            .with_context(|| format!("failed to replace state file {}", self.path))?;

        debug!("persisted state {}", serialized);
        Ok(())
    }
}
