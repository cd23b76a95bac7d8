use crate::tagging::{parse_utc_offset, LocalZone};
use std::{env, net::SocketAddr, path::PathBuf, time::Duration};
use thiserror::Error;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/arrivals.json";
const DEFAULT_CACHE_TTL_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("APP_UTC_OFFSET must look like +05:30 or -08:00, got {0:?}")]
    InvalidOffset(String),
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub data_path: PathBuf,
    pub cache_ttl: Duration,
    pub zone: LocalZone,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let data_path = lookup("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        let cache_ttl = lookup("ARRIVALS_CACHE_TTL_SECS")
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_CACHE_TTL_SECS));

        let zone = match lookup("APP_UTC_OFFSET").filter(|value| !value.trim().is_empty()) {
            Some(value) => LocalZone::Fixed(
                parse_utc_offset(&value).ok_or(ConfigError::InvalidOffset(value))?,
            ),
            None => LocalZone::System,
        };

        Ok(Self {
            port,
            data_path,
            cache_ttl,
            zone,
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let settings = settings(&[]).unwrap();
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.data_path, PathBuf::from("data/arrivals.json"));
        assert_eq!(settings.cache_ttl, Duration::from_secs(60));
        assert_eq!(settings.zone, LocalZone::System);
    }

    #[test]
    fn reads_overrides() {
        let settings = settings(&[
            ("PORT", "9000"),
            ("APP_DATA_PATH", "/tmp/a.json"),
            ("ARRIVALS_CACHE_TTL_SECS", "0"),
            ("APP_UTC_OFFSET", "+05:30"),
        ])
        .unwrap();
        assert_eq!(settings.listen_addr().port(), 9000);
        assert_eq!(settings.data_path, PathBuf::from("/tmp/a.json"));
        assert!(settings.cache_ttl.is_zero());
        assert_eq!(
            settings.zone,
            LocalZone::Fixed(FixedOffset::east_opt(19_800).unwrap())
        );
    }

    #[test]
    fn bad_port_falls_back_but_bad_offset_fails() {
        assert_eq!(settings(&[("PORT", "nope")]).unwrap().port, 8080);
        assert!(matches!(
            settings(&[("APP_UTC_OFFSET", "IST")]),
            Err(ConfigError::InvalidOffset(_))
        ));
    }
}
