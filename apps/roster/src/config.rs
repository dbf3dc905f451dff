use std::{collections::HashMap, fs, path::Path, time::Duration};

use client_core::ClientTimings;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "roster.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub server_url: String,
    pub validation_banner_ms: u64,
    pub outcome_banner_ms: u64,
    pub refresh_interval_secs: u64,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
            validation_banner_ms: 3000,
            outcome_banner_ms: 5000,
            refresh_interval_secs: 0,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn timings(&self) -> ClientTimings {
        ClientTimings {
            validation_banner: Duration::from_millis(self.validation_banner_ms),
            outcome_banner: Duration::from_millis(self.outcome_banner_ms),
        }
    }

    /// `None` when periodic refresh is switched off.
    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.refresh_interval_secs > 0).then(|| Duration::from_secs(self.refresh_interval_secs))
    }
}

pub fn load_settings(path: &Path) -> Settings {
    load_settings_from(path, |key| std::env::var(key).ok())
}

/// Defaults, then the flat `key = "value"` file at `path` if it parses, then
/// environment overrides looked up through `env`.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("server_url") {
                settings.server_url = v.clone();
            }
            if let Some(v) = file_cfg.get("validation_banner_ms") {
                set_number(&mut settings.validation_banner_ms, v);
            }
            if let Some(v) = file_cfg.get("outcome_banner_ms") {
                set_number(&mut settings.outcome_banner_ms, v);
            }
            if let Some(v) = file_cfg.get("refresh_interval_secs") {
                set_number(&mut settings.refresh_interval_secs, v);
            }
            if let Some(v) = file_cfg.get("log_filter") {
                settings.log_filter = v.clone();
            }
        }
    }

    if let Some(v) = env("ROSTER_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = env("ROSTER_REFRESH_SECS") {
        set_number(&mut settings.refresh_interval_secs, &v);
    }

    if let Some(v) = env("ROSTER_LOG") {
        settings.log_filter = v;
    }

    settings
}

fn set_number(slot: &mut u64, raw: &str) {
    if let Ok(parsed) = raw.trim().parse::<u64>() {
        *slot = parsed;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
