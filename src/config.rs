//! Configuration of the star notifier.
//!
//! Values are layered with [`figment`]: built-in defaults, then an optional
//! YAML file, then environment variables. Environment variables use the raw
//! upper case key names:
//!
//! ```bash
//! export STARS_API_URL="https://stars.example.com/api/stars"
//! export DISCORD_WEBHOOK_URLS="https://discord.com/api/webhooks/1/abc=1234,https://discord.com/api/webhooks/2/def"
//! export EXCLUDED_WORLDS="318,319"
//! export ALLOWED_LOCATIONS="4,5,15"
//! ```
//!
//! The same settings in a YAML file:
//!
//! ```yaml
//! stars_api_url: "https://stars.example.com/api/stars"
//! stars_api_timeout: 5
//! discord_webhook_urls:
//!   - "https://discord.com/api/webhooks/1/abc=1234"
//! excluded_worlds: [318, 319]
//! listing_footer: "Updated every minute"
//! ```

use std::{fmt, time::Duration};

use anyhow::{Context, bail};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{discord::Destination, thumbnails::MAX_THUMBNAIL_SIZE, utils::get_path};

/// Environment variables read by [`Config::load`].
const ENV_KEYS: [&str; 14] = [
    "DATABASE_DIRECTORY",
    "STARS_API_URL",
    "STARS_API_TIMEOUT",
    "STARS_API_USER_AGENT",
    "STARS_API_REFERER",
    "EXCLUDED_WORLDS",
    "ALLOWED_LOCATIONS",
    "SLEEP_TIME_SECONDS",
    "LISTING_UPDATE_INTERVAL",
    "MAP_WIDTH",
    "MAP_HEIGHT",
    "DISCORD_WEBHOOK_URLS",
    "LISTING_FOOTER",
    "NEW_STAR_MESSAGE_MAX_AGE",
];

/// Name of the state file inside the data directory.
const STATE_FILE_NAME: &str = "db.json";

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory of the state file
    pub database_directory: String,
    /// Endpoint returning the called stars
    pub stars_api_url: String,
    /// Timeout of a stars API request, in seconds
    pub stars_api_timeout: u64,
    /// `User-Agent` header of stars API requests, empty for none
    pub stars_api_user_agent: String,
    /// `Referer` header of stars API requests, empty for none
    pub stars_api_referer: String,
    /// Worlds whose stars are ignored
    #[serde(deserialize_with = "deserialize_list")]
    pub excluded_worlds: Vec<String>,
    /// Location slots to keep, empty rejects every star
    #[serde(deserialize_with = "deserialize_list")]
    pub allowed_locations: Vec<String>,
    /// Delay between two cycles, in seconds
    pub sleep_time_seconds: u64,
    /// Delay between two scheduled listing updates, in minutes
    pub listing_update_interval: u64,
    /// Thumbnail width, in pixels
    pub map_width: u32,
    /// Thumbnail height, in pixels
    pub map_height: u32,
    /// Destinations, `<webhook url>` or `<webhook url>=<role id>`
    #[serde(deserialize_with = "deserialize_list")]
    pub discord_webhook_urls: Vec<String>,
    /// Text shown under the listing
    pub listing_footer: String,
    /// Age after which a new star message is deleted, in seconds
    pub new_star_message_max_age: i64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_directory: "data".to_owned(),
            stars_api_url: String::new(),
            stars_api_timeout: 5,
            stars_api_user_agent: String::new(),
            stars_api_referer: String::new(),
            excluded_worlds: Vec::new(),
            allowed_locations: Vec::new(),
            sleep_time_seconds: 30,
            listing_update_interval: 1,
            map_width: 512,
            map_height: 512,
            discord_webhook_urls: Vec::new(),
            listing_footer: String::new(),
            new_star_message_max_age: 50,
        }
    }
}

impl Config {
    /// Loads the configuration from defaults, the optional YAML file at
    /// `path` and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the YAML file cannot be read, a value has the
    /// wrong type, or the configuration is invalid.
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file_exact(path));
        }

        let config: Config = figment
            .merge(Env::raw().only(&ENV_KEYS))
            .extract()
            .context("invalid configuration")?;
        config.validate()?;

        Ok(config)
    }

    /// Checks values that cannot be expressed by their type.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.stars_api_url.trim().is_empty() {
            bail!("STARS_API_URL is required");
        }
        if self.sleep_time_seconds == 0 {
            bail!("SLEEP_TIME_SECONDS must be greater than 0");
        }
        if self.new_star_message_max_age < 0 {
            bail!("NEW_STAR_MESSAGE_MAX_AGE must not be negative");
        }
        for (key, size) in [("MAP_WIDTH", self.map_width), ("MAP_HEIGHT", self.map_height)] {
            if !(1..=MAX_THUMBNAIL_SIZE).contains(&size) {
                bail!("{} must be between 1 and {}", key, MAX_THUMBNAIL_SIZE);
            }
        }
        Ok(())
    }

    /// Path of the JSON state file.
    pub fn state_path(&self) -> String {
        get_path(&self.database_directory, STATE_FILE_NAME)
    }

    pub fn stars_api_timeout(&self) -> Duration {
        Duration::from_secs(self.stars_api_timeout)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.sleep_time_seconds)
    }

    pub fn listing_update_interval(&self) -> Duration {
        Duration::from_secs(self.listing_update_interval * 60)
    }

    /// Configured destinations, blank entries skipped.
    pub fn destinations(&self) -> Vec<Destination> {
        Destination::parse_all(&self.discord_webhook_urls)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "api={}, data={}, poll={}s, listing={}min, max_age={}s, destinations={}, excluded_worlds={:?}, allowed_locations={:?}",
            self.stars_api_url,
            self.database_directory,
            self.sleep_time_seconds,
            self.listing_update_interval,
            self.new_star_message_max_age,
            self.discord_webhook_urls.len(),
            self.excluded_worlds,
            self.allowed_locations
        )
    }
}

/// A list value as found in the environment or a YAML file.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListValue {
    Text(String),
    Number(i64),
    Items(Vec<ListItem>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListItem {
    Text(String),
    Number(i64),
}

/// Accepts a comma separated string, a single number or a sequence.
fn deserialize_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Vec<String> = match ListValue::deserialize(deserializer)? {
        ListValue::Text(text) => text.split(',').map(str::to_owned).collect(),
        ListValue::Number(number) => vec![number.to_string()],
        ListValue::Items(items) => items
            .into_iter()
            .map(|item| match item {
                ListItem::Text(text) => text,
                ListItem::Number(number) => number.to_string(),
            })
            .collect(),
    };

    Ok(items
        .into_iter()
        .map(|item| item.trim().to_owned())
        .filter(|item| !item.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_load_defaults() {
        Jail::expect_with(|jail| {
            jail.set_env("STARS_API_URL", "https://stars.test/api");

            let config = Config::load(None).unwrap();

            assert_eq!(
                config,
                Config {
                    stars_api_url: "https://stars.test/api".to_string(),
                    ..Config::default()
                }
            );
            assert_eq!(config.poll_interval(), Duration::from_secs(30));
            assert_eq!(config.listing_update_interval(), Duration::from_secs(60));
            assert_eq!(config.stars_api_timeout(), Duration::from_secs(5));
            Ok(())
        });
    }

    #[test]
    fn test_load_from_env() {
        Jail::expect_with(|jail| {
            jail.set_env("STARS_API_URL", "https://stars.test/api");
            jail.set_env("DATABASE_DIRECTORY", "/var/lib/stars");
            jail.set_env("SLEEP_TIME_SECONDS", "10");
            jail.set_env("LISTING_UPDATE_INTERVAL", "5");
            jail.set_env("EXCLUDED_WORLDS", "318, 319,");
            jail.set_env("ALLOWED_LOCATIONS", "15");
            jail.set_env(
                "DISCORD_WEBHOOK_URLS",
                "https://discord.test/api/webhooks/1/a=42,https://discord.test/api/webhooks/2/b",
            );
            jail.set_env("LISTING_FOOTER", "Updated every 5 minutes");
            jail.set_env("NEW_STAR_MESSAGE_MAX_AGE", "120");

            let config = Config::load(None).unwrap();

            assert_eq!(config.sleep_time_seconds, 10);
            assert_eq!(config.listing_update_interval(), Duration::from_secs(300));
            assert_eq!(config.excluded_worlds, vec!["318", "319"]);
            assert_eq!(config.allowed_locations, vec!["15"]);
            assert_eq!(config.listing_footer, "Updated every 5 minutes");
            assert_eq!(config.new_star_message_max_age, 120);

            let destinations = config.destinations();
            assert_eq!(destinations.len(), 2);
            assert_eq!(destinations[0].role_id.as_deref(), Some("42"));
            assert_eq!(destinations[1].role_id, None);

            #[cfg(unix)]
            assert_eq!(config.state_path(), "/var/lib/stars/db.json");
            Ok(())
        });
    }

    #[test]
    fn test_load_yaml_file_overridden_by_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                r#"
stars_api_url: "https://from-file.test/api"
map_width: 256
excluded_worlds: [318, "319"]
discord_webhook_urls:
  - "https://discord.test/api/webhooks/1/a"
"#,
            )?;
            jail.set_env("MAP_WIDTH", "128");

            let config = Config::load(Some("config.yaml")).unwrap();

            assert_eq!(config.stars_api_url, "https://from-file.test/api");
            assert_eq!(config.map_width, 128);
            assert_eq!(config.map_height, 512);
            assert_eq!(config.excluded_worlds, vec!["318", "319"]);
            assert_eq!(config.discord_webhook_urls.len(), 1);
            Ok(())
        });
    }

    #[test]
    fn test_missing_config_file_fails() {
        Jail::expect_with(|jail| {
            jail.set_env("STARS_API_URL", "https://stars.test/api");

            assert!(Config::load(Some("missing.yaml")).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_malformed_integer_fails() {
        Jail::expect_with(|jail| {
            jail.set_env("STARS_API_URL", "https://stars.test/api");
            jail.set_env("SLEEP_TIME_SECONDS", "thirty");

            assert!(Config::load(None).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_missing_api_url_fails() {
        Jail::expect_with(|_| {
            let error = Config::load(None).unwrap_err();

            assert!(error.to_string().contains("STARS_API_URL"));
            Ok(())
        });
    }

    #[test]
    fn test_validate_rejects_zero_sleep_time() {
        let config = Config {
            stars_api_url: "https://stars.test/api".to_string(),
            sleep_time_seconds: 0,
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_map() {
        let config = Config {
            stars_api_url: "https://stars.test/api".to_string(),
            map_height: 100_000,
            ..Config::default()
        };

        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("MAP_HEIGHT"));
    }
}
