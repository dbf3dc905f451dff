use super::{load_settings_from, Settings};

use std::{
    collections::HashMap,
    env, fs,
    path::PathBuf,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

fn temp_config(contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("roster_config_{suffix}.toml"));
    fs::write(&path, contents).expect("write config");
    path
}

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn defaults_match_banner_durations() {
    let settings = load_settings_from(&env::temp_dir().join("missing-roster.toml"), no_env);
    assert_eq!(settings, Settings::default());

    let timings = settings.timings();
    assert_eq!(timings.validation_banner, Duration::from_secs(3));
    assert_eq!(timings.outcome_banner, Duration::from_secs(5));
    assert_eq!(settings.refresh_interval(), None);
}

#[test]
fn file_values_are_applied() {
    let path = temp_config(
        "server_url = \"http://roster.test:9000\"\noutcome_banner_ms = \"250\"\nrefresh_interval_secs = \"30\"\n",
    );
    let settings = load_settings_from(&path, no_env);
    fs::remove_file(&path).expect("cleanup");

    assert_eq!(settings.server_url, "http://roster.test:9000");
    assert_eq!(settings.outcome_banner_ms, 250);
    assert_eq!(settings.refresh_interval(), Some(Duration::from_secs(30)));
}

#[test]
fn unparsable_numbers_keep_defaults() {
    let path = temp_config("validation_banner_ms = \"soon\"\n");
    let env = HashMap::from([("ROSTER_REFRESH_SECS", "never")]);
    let settings = load_settings_from(&path, |key| env.get(key).map(|v| v.to_string()));
    fs::remove_file(&path).expect("cleanup");

    assert_eq!(settings.validation_banner_ms, 3000);
    assert_eq!(settings.refresh_interval_secs, 0);
}

#[test]
fn env_overrides_file() {
    let path = temp_config("server_url = \"http://from-file:1\"\n");
    let env = HashMap::from([
        ("ROSTER_SERVER_URL", "http://plain-env:2"),
        ("APP__SERVER_URL", "http://app-env:3"),
        ("ROSTER_LOG", "debug"),
    ]);
    let settings = load_settings_from(&path, |key| env.get(key).map(|v| v.to_string()));
    fs::remove_file(&path).expect("cleanup");

    assert_eq!(settings.server_url, "http://app-env:3");
    assert_eq!(settings.log_filter, "debug");
}
