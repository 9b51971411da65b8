use std::{collections::HashMap, time::Duration};

use database::StoreLocation;
use serde::Deserialize;

use crate::error::CoreError;

/// Floor on the per-feed poll interval.
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);
const DEFAULT_REFRESH_INTERVAL_SECONDS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

/// Options recognized by the core. Deserializable from whatever carrier the
/// host application uses for configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// URL or local path of the static bundle.
    #[serde(rename = "gtfsURL")]
    pub gtfs_url: String,

    #[serde(default)]
    pub static_auth_header_key: Option<String>,
    #[serde(default)]
    pub static_auth_header_value: Option<String>,

    #[serde(default)]
    pub rt_feeds: Vec<FeedConfig>,

    /// Store path; `":memory:"` forces an ephemeral store.
    pub gtfs_data_path: String,

    #[serde(default)]
    pub env: Environment,

    #[serde(default)]
    pub verbose: bool,

    /// Pipe the bundle through an external tidier before parsing. Tidier
    /// failures are never fatal.
    #[serde(default)]
    pub enable_gtfs_tidy: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedConfig {
    pub id: String,

    #[serde(default, rename = "tripUpdatesURL")]
    pub trip_updates_url: Option<String>,
    #[serde(default, rename = "vehiclePositionsURL")]
    pub vehicle_positions_url: Option<String>,
    #[serde(default, rename = "serviceAlertsURL")]
    pub service_alerts_url: Option<String>,

    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Poll interval in seconds.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_refresh_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL_SECONDS
}

fn default_enabled() -> bool {
    true
}

impl Config {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.gtfs_url.trim().is_empty() {
            return Err(CoreError::ConfigInvalid(
                "gtfsURL must name a bundle URL or path".to_owned(),
            ));
        }
        if self.gtfs_data_path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid(
                "gtfsDataPath must name a store path or :memory:".to_owned(),
            ));
        }
        if self.static_auth_header_key.is_some()
            != self.static_auth_header_value.is_some()
        {
            return Err(CoreError::ConfigInvalid(
                "static auth header key and value must be set together".to_owned(),
            ));
        }
        for feed in &self.rt_feeds {
            if feed.id.trim().is_empty() {
                return Err(CoreError::ConfigInvalid(
                    "every realtime feed needs an id".to_owned(),
                ));
            }
        }
        Ok(())
    }

    /// Where the store lives. The test environment always runs ephemeral,
    /// whatever the configured path says.
    pub fn resolved_store_location(&self) -> StoreLocation {
        if self.env == Environment::Test {
            if self.gtfs_data_path != ":memory:" {
                log::info!(
                    "test environment forces an ephemeral store, ignoring {}",
                    self.gtfs_data_path
                );
            }
            return StoreLocation::Memory;
        }
        StoreLocation::from_path(&self.gtfs_data_path)
    }

    pub fn static_headers(&self) -> HashMap<String, String> {
        match (&self.static_auth_header_key, &self.static_auth_header_value) {
            (Some(key), Some(value)) if !key.is_empty() => {
                HashMap::from([(key.clone(), value.clone())])
            }
            _ => HashMap::new(),
        }
    }

    /// Feeds that are enabled and name at least one URL.
    pub fn active_feeds(&self) -> impl Iterator<Item = &FeedConfig> {
        self.rt_feeds.iter().filter(|feed| feed.is_active())
    }
}

impl FeedConfig {
    pub fn is_active(&self) -> bool {
        fn set(url: &Option<String>) -> bool {
            url.as_deref().is_some_and(|url| !url.is_empty())
        }
        self.enabled
            && (set(&self.trip_updates_url)
                || set(&self.vehicle_positions_url)
                || set(&self.service_alerts_url))
    }

    /// Configured interval with the one-second floor enforced.
    pub fn effective_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval).max(MIN_REFRESH_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            gtfs_url: "https://example.com/gtfs.zip".to_owned(),
            static_auth_header_key: None,
            static_auth_header_value: None,
            rt_feeds: vec![],
            gtfs_data_path: "/var/lib/transit/gtfs.db".to_owned(),
            env: Environment::Development,
            verbose: false,
            enable_gtfs_tidy: false,
        }
    }

    #[test]
    fn test_environment_forces_an_ephemeral_store() {
        let mut config = base_config();
        config.env = Environment::Test;
        assert!(config.resolved_store_location().is_ephemeral());
    }

    #[test]
    fn production_keeps_the_configured_path() {
        let config = base_config();
        assert!(!config.resolved_store_location().is_ephemeral());
    }

    #[test]
    fn mismatched_auth_header_halves_are_rejected() {
        let mut config = base_config();
        config.static_auth_header_key = Some("X-Auth".to_owned());
        assert!(matches!(
            config.validate(),
            Err(CoreError::ConfigInvalid(_))
        ));
    }

    #[test]
    fn refresh_interval_floor_is_one_second() {
        let feed = FeedConfig {
            id: "f".to_owned(),
            trip_updates_url: Some("https://example.com/tu.pb".to_owned()),
            vehicle_positions_url: None,
            service_alerts_url: None,
            headers: HashMap::new(),
            refresh_interval: 0,
            enabled: true,
        };
        assert_eq!(feed.effective_refresh_interval(), Duration::from_secs(1));
    }

    #[test]
    fn feeds_without_urls_or_disabled_are_inactive() {
        let mut feed = FeedConfig {
            id: "f".to_owned(),
            trip_updates_url: None,
            vehicle_positions_url: None,
            service_alerts_url: None,
            headers: HashMap::new(),
            refresh_interval: 30,
            enabled: true,
        };
        assert!(!feed.is_active());
        feed.vehicle_positions_url = Some("https://example.com/vp.pb".to_owned());
        assert!(feed.is_active());
        feed.enabled = false;
        assert!(!feed.is_active());
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: Config = serde_json::from_str(
            r#"{
                "gtfsURL": "https://example.com/gtfs.zip",
                "gtfsDataPath": ":memory:",
                "rtFeeds": [{"id": "raba", "vehiclePositionsURL": "https://example.com/vp.pb"}]
            }"#,
        )
        .unwrap();
        assert_eq!(config.env, Environment::Development);
        assert_eq!(config.rt_feeds[0].refresh_interval, 30);
        assert!(config.rt_feeds[0].enabled);
    }
}
