use chrono::NaiveTime;
use chrono_tz::Tz;

use super::api::DEFAULT_RATES_API_URL;

/* Config holds the settings of the bot, read from the environment.
 * A .env file is loaded into the environment first, in main.
 * The bot token is read by teloxide itself, from TELOXIDE_TOKEN.
 */

const REDIS_URL_VAR: &str = "REDIS_URL";
const RATES_API_URL_VAR: &str = "RATES_API_URL";
const BROADCAST_TIME_VAR: &str = "BROADCAST_TIME";
const BROADCAST_TIME_ZONE_VAR: &str = "BROADCAST_TIME_ZONE";

const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1/";
const DEFAULT_BROADCAST_TIME: &str = "09:00";
const DEFAULT_BROADCAST_TIME_ZONE: &str = "UTC";

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid broadcast time {0}, expected HH:MM")]
    InvalidTime(String),
    #[error("Unknown time zone {0}")]
    InvalidTimeZone(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub redis_url: String,
    pub rates_api_url: String,
    // Local time of the daily broadcast, in broadcast_time_zone.
    pub broadcast_time: NaiveTime,
    pub broadcast_time_zone: Tz,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // Reads every setting through a lookup function. Missing or blank settings fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| -> String {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let time = get(BROADCAST_TIME_VAR, DEFAULT_BROADCAST_TIME);
        let broadcast_time = NaiveTime::parse_from_str(&time, "%H:%M")
            .map_err(|_| ConfigError::InvalidTime(time.clone()))?;

        let time_zone = get(BROADCAST_TIME_ZONE_VAR, DEFAULT_BROADCAST_TIME_ZONE);
        let broadcast_time_zone = time_zone
            .parse::<Tz>()
            .map_err(|_| ConfigError::InvalidTimeZone(time_zone.clone()))?;

        Ok(Self {
            redis_url: get(REDIS_URL_VAR, DEFAULT_REDIS_URL),
            rates_api_url: get(RATES_API_URL_VAR, DEFAULT_RATES_API_URL),
            broadcast_time,
            broadcast_time_zone,
        })
    }
}
