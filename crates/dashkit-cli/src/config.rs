//! Runtime configuration resolved from the environment and CLI flags.

use std::path::PathBuf;
use std::time::Duration;

use dashkit_core::http_client::DEFAULT_TIMEOUT_MS;
use dashkit_core::weather::DEFAULT_REFRESH_INTERVAL;
use tracing::warn;

use crate::cli::Cli;

const ALPHAVANTAGE_KEYS: [&str; 2] = ["DASHKIT_ALPHAVANTAGE_API_KEY", "ALPHAVANTAGE_API_KEY"];
const OMDB_KEYS: [&str; 2] = ["DASHKIT_OMDB_API_KEY", "OMDB_API_KEY"];

#[derive(Clone, PartialEq, Eq)]
pub struct DashConfig {
    pub alphavantage_api_key: Option<String>,
    pub omdb_api_key: Option<String>,
    pub data_dir: PathBuf,
    pub refresh_interval: Duration,
    pub timeout_ms: u64,
    pub offline: bool,
}

impl DashConfig {
    /// Reads the process environment, then applies flag overrides.
    pub fn resolve(cli: &Cli) -> Self {
        Self::from_lookup(|name| std::env::var(name).ok()).with_overrides(cli)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let first_set = |names: &[&str]| {
            names
                .iter()
                .filter_map(|name| lookup(name))
                .map(|value| value.trim().to_owned())
                .find(|value| !value.is_empty())
        };

        let data_dir = first_set(&["DASHKIT_DATA_DIR"])
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);
        let refresh_secs = parse_number("DASHKIT_REFRESH_SECS", first_set(&["DASHKIT_REFRESH_SECS"]))
            .filter(|secs| *secs > 0);
        let timeout_ms = parse_number("DASHKIT_TIMEOUT_MS", first_set(&["DASHKIT_TIMEOUT_MS"]))
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        let offline = first_set(&["DASHKIT_OFFLINE"]).is_some_and(|value| is_truthy(&value));

        Self {
            alphavantage_api_key: first_set(&ALPHAVANTAGE_KEYS),
            omdb_api_key: first_set(&OMDB_KEYS),
            data_dir,
            refresh_interval: refresh_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_REFRESH_INTERVAL),
            timeout_ms,
            offline,
        }
    }

    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if cli.offline {
            self.offline = true;
        }
        if let Some(dir) = &cli.data_dir {
            self.data_dir = dir.clone();
        }
        if let Some(timeout_ms) = cli.timeout_ms.filter(|ms| *ms > 0) {
            self.timeout_ms = timeout_ms;
        }
        self
    }

    /// Live stock mode needs a key and must not be forced offline.
    pub fn live_stock_key(&self) -> Option<&str> {
        if self.offline {
            return None;
        }
        self.alphavantage_api_key.as_deref()
    }
}

// Keys stay out of debug output.
impl std::fmt::Debug for DashConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashConfig")
            .field("alphavantage_api_key", &self.alphavantage_api_key.as_ref().map(|_| "***"))
            .field("omdb_api_key", &self.omdb_api_key.as_ref().map(|_| "***"))
            .field("data_dir", &self.data_dir)
            .field("refresh_interval", &self.refresh_interval)
            .field("timeout_ms", &self.timeout_ms)
            .field("offline", &self.offline)
            .finish()
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dashkit")
}

fn parse_number(name: &str, value: Option<String>) -> Option<u64> {
    let value = value?;
    match value.parse::<u64>() {
        Ok(number) => Some(number),
        Err(_) => {
            warn!(variable = name, value = %value, "ignoring non-numeric setting");
            None
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use clap::Parser;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> DashConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        DashConfig::from_lookup(|name| env.get(name).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = config_from(&[]);

        assert_eq!(config.alphavantage_api_key, None);
        assert_eq!(config.refresh_interval, Duration::from_secs(300));
        assert_eq!(config.timeout_ms, 5_000);
        assert!(!config.offline);
        assert!(config.data_dir.ends_with("dashkit"));
    }

    #[test]
    fn prefixed_key_wins_over_plain_key() {
        let config = config_from(&[
            ("ALPHAVANTAGE_API_KEY", "plain"),
            ("DASHKIT_ALPHAVANTAGE_API_KEY", "prefixed"),
        ]);
        assert_eq!(config.alphavantage_api_key.as_deref(), Some("prefixed"));
    }

    #[test]
    fn blank_key_disables_live_mode() {
        let config = config_from(&[("DASHKIT_ALPHAVANTAGE_API_KEY", "   ")]);
        assert_eq!(config.live_stock_key(), None);
    }

    #[test]
    fn offline_flag_overrides_configured_key() {
        let cli = Cli::try_parse_from(["dashkit", "--offline", "voice"]).expect("parse");
        let config = config_from(&[("DASHKIT_ALPHAVANTAGE_API_KEY", "key")]).with_overrides(&cli);
        assert_eq!(config.live_stock_key(), None);
    }

    #[test]
    fn non_numeric_settings_fall_back_to_defaults() {
        let config = config_from(&[
            ("DASHKIT_REFRESH_SECS", "soon"),
            ("DASHKIT_TIMEOUT_MS", "0"),
            ("DASHKIT_OFFLINE", "yes"),
        ]);
        assert_eq!(config.refresh_interval, Duration::from_secs(300));
        assert_eq!(config.timeout_ms, 5_000);
        assert!(config.offline);
    }

    #[test]
    fn debug_output_masks_keys() {
        let config = config_from(&[("DASHKIT_OMDB_API_KEY", "secret-key")]);
        assert!(!format!("{config:?}").contains("secret-key"));
    }
}
