//! Environment-driven configuration for the windwatch daemon.
//!
//! All settings come from environment variables (a `.env` file is honored
//! via dotenvy) with defaults matching the production deployment. `Config`
//! is constructed once at startup and handed by reference into each
//! component; there is no module-level singleton.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;
use thiserror::Error;
use url::Url;

/// Configuration errors raised while reading the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({message})")]
    Invalid {
        key: &'static str,
        value: String,
        message: String,
    },

    #[error("Configuration validation failed: {0}")]
    Validation(String),
}

/// A single validation finding, keyed by the offending field.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationIssue {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationIssue {
            field: field.into(),
            message: message.into(),
        });
    }

    /// A single-line summary of all errors, for log output.
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Fetch-with-retry settings for the ingestion client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Maximum number of fetch attempts per run.
    pub max_attempts: u32,

    /// Fixed delay between attempts.
    pub retry_delay: Duration,

    /// Per-request timeout.
    pub request_timeout: Duration,

    /// Fixed-rate interval between ingestion runs.
    pub interval: Duration,
}

/// Alert scheduling and scanning settings.
#[derive(Debug, Clone)]
pub struct AlertConfig {
    /// Wind speed (mph) at or above which a sample counts as high wind.
    pub wind_threshold: u32,

    /// Time-of-day boundary (HHMM) splitting today's scan from tomorrow's.
    pub cutoff_time: u32,

    /// Local wall-clock hour the daily alert job fires.
    pub hour: u32,

    /// Local wall-clock minute the daily alert job fires.
    pub minute: u32,

    /// How long after a missed occurrence the job may still fire once.
    pub misfire_grace: Duration,

    /// Serving-region timezone the daily schedule is evaluated in.
    pub timezone: Tz,
}

/// Push-notification delivery settings.
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    /// Endpoint of the external notification sender.
    pub endpoint: String,

    /// User the notification is addressed to.
    pub user_id: String,
}

/// Top-level daemon configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream forecast source URL.
    pub weather_url: String,

    /// Path of the SQLite forecast store.
    pub db_path: PathBuf,

    pub fetch: FetchConfig,
    pub alert: AlertConfig,
    pub notify: NotifyConfig,
}

const DEFAULT_WEATHER_URL: &str = "https://wttr.in/18966?format=j1";
const DEFAULT_NOTIFY_URL: &str = "https://us-central1-taskr-1428.cloudfunctions.net/sendMessage";

fn env_string(key: &'static str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw.clone(),
            message: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Read configuration from the environment, applying defaults.
    ///
    /// # Errors
    /// Returns `ConfigError` if any set variable fails to parse or the
    /// resulting configuration fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        let timezone: Tz = {
            let raw = env_string("ALERT_TIMEZONE", "America/New_York");
            raw.parse().map_err(|_| ConfigError::Invalid {
                key: "ALERT_TIMEZONE",
                value: raw,
                message: "unknown timezone".to_string(),
            })?
        };

        let config = Self {
            weather_url: env_string("WEATHER_URL", DEFAULT_WEATHER_URL),
            db_path: PathBuf::from(env_string("DB_PATH", "windwatch.db")),
            fetch: FetchConfig {
                max_attempts: env_parse("MAX_RETRIES", 5)?,
                retry_delay: Duration::from_secs(env_parse("RETRY_DELAY_SECONDS", 10)?),
                request_timeout: Duration::from_secs(env_parse("REQUEST_TIMEOUT_SECONDS", 10)?),
                interval: Duration::from_secs(env_parse("INGEST_INTERVAL_SECONDS", 3600)?),
            },
            alert: AlertConfig {
                wind_threshold: env_parse("WINDSPEED_THRESHOLD", 15)?,
                cutoff_time: env_parse("CUTOFF_TIME", 900)?,
                hour: env_parse("ALERT_HOUR", 10)?,
                minute: env_parse("ALERT_MINUTE", 0)?,
                misfire_grace: {
                    let hours: u64 = env_parse("ALERT_GRACE_HOURS", 24)?;
                    let secs = hours.checked_mul(3600).ok_or(ConfigError::Invalid {
                        key: "ALERT_GRACE_HOURS",
                        value: hours.to_string(),
                        message: "grace period too large".to_string(),
                    })?;
                    Duration::from_secs(secs)
                },
                timezone,
            },
            notify: NotifyConfig {
                endpoint: env_string("NOTIFY_URL", DEFAULT_NOTIFY_URL),
                user_id: env_string("NOTIFY_USER_ID", "493KKO1BmXca1bRUVwa0PY6HzzT2"),
            },
        };

        let result = config.validate();
        for warning in &result.warnings {
            tracing::warn!("Config warning: {}", warning);
        }
        if !result.is_valid() {
            return Err(ConfigError::Validation(result.error_summary()));
        }

        Ok(config)
    }

    /// Validate the configuration, collecting all findings rather than
    /// stopping at the first.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if Url::parse(&self.weather_url).is_err() {
            result.add_error("WEATHER_URL", "not a valid URL");
        }
        if Url::parse(&self.notify.endpoint).is_err() {
            result.add_error("NOTIFY_URL", "not a valid URL");
        }

        if self.fetch.max_attempts == 0 {
            result.add_error("MAX_RETRIES", "must be at least 1");
        }
        if self.fetch.interval < Duration::from_secs(60) {
            result.add_warning("INGEST_INTERVAL_SECONDS", "interval shorter than one minute");
        }

        if self.alert.hour > 23 {
            result.add_error("ALERT_HOUR", "must be 0-23");
        }
        if self.alert.minute > 59 {
            result.add_error("ALERT_MINUTE", "must be 0-59");
        }
        if self.alert.cutoff_time > 2359 {
            result.add_error("CUTOFF_TIME", "must be an HHMM value no greater than 2359");
        }
        if self.alert.wind_threshold == 0 {
            result.add_warning("WINDSPEED_THRESHOLD", "threshold of 0 alerts on every sample");
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            weather_url: DEFAULT_WEATHER_URL.to_string(),
            db_path: PathBuf::from("windwatch.db"),
            fetch: FetchConfig {
                max_attempts: 5,
                retry_delay: Duration::from_secs(10),
                request_timeout: Duration::from_secs(10),
                interval: Duration::from_secs(3600),
            },
            alert: AlertConfig {
                wind_threshold: 15,
                cutoff_time: 900,
                hour: 10,
                minute: 0,
                misfire_grace: Duration::from_secs(24 * 3600),
                timezone: chrono_tz::America::New_York,
            },
            notify: NotifyConfig {
                endpoint: DEFAULT_NOTIFY_URL.to_string(),
                user_id: "user-1".to_string(),
            },
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        let result = base_config().validate();
        assert!(result.is_valid(), "{}", result.error_summary());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_bad_alert_time_rejected() {
        let mut config = base_config();
        config.alert.hour = 24;
        config.alert.minute = 61;

        let result = config.validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors.len(), 2);
        assert!(result.error_summary().contains("ALERT_HOUR"));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = base_config();
        config.fetch.max_attempts = 0;
        assert!(!config.validate().is_valid());
    }

    #[test]
    fn test_zero_threshold_is_warning_only() {
        let mut config = base_config();
        config.alert.wind_threshold = 0;

        let result = config.validate();
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_overflowing_grace_hours_rejected() {
        // Parses as u64 but overflows the seconds conversion.
        std::env::set_var("ALERT_GRACE_HOURS", "9999999999999999999");
        let result = Config::from_env();
        std::env::remove_var("ALERT_GRACE_HOURS");

        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                key: "ALERT_GRACE_HOURS",
                ..
            })
        ));
    }

    #[test]
    fn test_bad_url_rejected() {
        let mut config = base_config();
        config.weather_url = "not a url".to_string();
        assert!(!config.validate().is_valid());
    }
}
