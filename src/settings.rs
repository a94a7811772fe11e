use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Where bookings come from. Only the mock path is wired up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataMode {
    Mock,
    Production,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub log_level: String,
    pub mode: DataMode,
    pub api: ApiSettings,
    pub storage: StorageSettings,
    pub pricing: PricingSettings,
    pub realtime: RealtimeSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    pub ip: String,
    pub port: u16,
    pub num_workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub bookings_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PricingSettings {
    pub nightly_rate: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeSettings {
    pub enabled: bool,
    pub interval_secs: u64,
    pub seed: Option<u64>,
}

impl Settings {
    /// Built-in defaults, then `config/harbor.toml` if present, then
    /// `HARBOR_*` environment variables (`HARBOR_API__PORT=9000`)
    pub fn new() -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(File::with_name("config/harbor").required(false))
            .add_source(
                Environment::with_prefix("HARBOR")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("log_level", "info")?
            .set_default("mode", "mock")?
            .set_default("api.ip", "0.0.0.0")?
            .set_default("api.port", 8080)?
            .set_default("storage.bookings_path", "data/rungsted-bookings.json")?
            .set_default("pricing.nightly_rate", crate::bookings::DEFAULT_NIGHTLY_RATE)?
            .set_default("realtime.enabled", true)?
            .set_default("realtime.interval_secs", 5)
    }

    /// Switches a production request to mock data, as no production
    /// backend exists. Returns whether the mode was changed.
    pub fn fall_back_to_mock(&mut self) -> bool {
        if self.mode != DataMode::Production {
            return false;
        }
        tracing::warn!("production mode requested but no backend is wired up, using mock data");
        self.mode = DataMode::Mock;
        true
    }

    /// Settings from the defaults alone
    #[cfg(test)]
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }
}

impl ApiSettings {
    pub fn listener_address(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_a_mock_harbor() {
        let settings = Settings::defaults().unwrap();
        assert_eq!(settings.mode, DataMode::Mock);
        assert_eq!(settings.api.listener_address(), "0.0.0.0:8080");
        assert_eq!(settings.pricing.nightly_rate, 350.0);
        assert!(settings.realtime.enabled);
        assert_eq!(settings.realtime.interval_secs, 5);
        assert!(settings.realtime.seed.is_none());
        assert_eq!(
            settings.storage.bookings_path,
            PathBuf::from("data/rungsted-bookings.json")
        );
    }

    #[test]
    fn production_mode_falls_back_to_mock() {
        let mut settings = Settings::defaults().unwrap();
        assert!(!settings.fall_back_to_mock());

        settings.mode = DataMode::Production;
        assert!(settings.fall_back_to_mock());
        assert_eq!(settings.mode, DataMode::Mock);
    }
}
