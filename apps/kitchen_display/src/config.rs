use std::{fs, path::PathBuf, str::FromStr, time::Duration};

use client_core::Locale;
use serde::Deserialize;
use shared::domain::Filter;
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "kitchen.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub server_url: String,
    pub filter: Filter,
    pub locale: Locale,
    pub reload_interval_secs: u64,
    pub confirmation_timeout_secs: u64,
    pub reconnect_delay_secs: u64,
    pub html_out: Option<PathBuf>,
    pub assume_yes: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            filter: Filter::All,
            locale: Locale::ZhTw,
            reload_interval_secs: 30,
            confirmation_timeout_secs: 5,
            reconnect_delay_secs: 3,
            html_out: None,
            assume_yes: false,
        }
    }
}

impl Settings {
    pub fn reload_interval(&self) -> Duration {
        Duration::from_secs(self.reload_interval_secs.max(1))
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs.max(1))
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs.max(1))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    server_url: Option<String>,
    filter: Option<String>,
    locale: Option<String>,
    reload_interval_secs: Option<u64>,
    confirmation_timeout_secs: Option<u64>,
    reconnect_delay_secs: Option<u64>,
    html_out: Option<PathBuf>,
    assume_yes: Option<bool>,
}

pub fn load_settings(path: Option<PathBuf>) -> Settings {
    let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let mut settings = Settings::default();

    match fs::read_to_string(&path) {
        Ok(raw) => apply_file(&mut settings, &raw),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => warn!(path = %path.display(), error = %err, "config: cannot read settings file"),
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());

    settings
}

fn apply_file(settings: &mut Settings, raw: &str) {
    let file_cfg = match toml::from_str::<FileSettings>(raw) {
        Ok(file_cfg) => file_cfg,
        Err(err) => {
            warn!(error = %err, "config: ignoring malformed settings file");
            return;
        }
    };

    if let Some(v) = file_cfg.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg.filter {
        set_parsed(&mut settings.filter, "filter", &v);
    }
    if let Some(v) = file_cfg.locale {
        set_parsed(&mut settings.locale, "locale", &v);
    }
    if let Some(v) = file_cfg.reload_interval_secs {
        settings.reload_interval_secs = v;
    }
    if let Some(v) = file_cfg.confirmation_timeout_secs {
        settings.confirmation_timeout_secs = v;
    }
    if let Some(v) = file_cfg.reconnect_delay_secs {
        settings.reconnect_delay_secs = v;
    }
    if file_cfg.html_out.is_some() {
        settings.html_out = file_cfg.html_out;
    }
    if let Some(v) = file_cfg.assume_yes {
        settings.assume_yes = v;
    }
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("KITCHEN_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = var("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = var("APP__FILTER") {
        set_parsed(&mut settings.filter, "APP__FILTER", &v);
    }
    if let Some(v) = var("APP__LOCALE") {
        set_parsed(&mut settings.locale, "APP__LOCALE", &v);
    }

    if let Some(v) = var("APP__RELOAD_INTERVAL_SECS") {
        set_parsed(&mut settings.reload_interval_secs, "APP__RELOAD_INTERVAL_SECS", &v);
    }
    if let Some(v) = var("APP__CONFIRMATION_TIMEOUT_SECS") {
        set_parsed(
            &mut settings.confirmation_timeout_secs,
            "APP__CONFIRMATION_TIMEOUT_SECS",
            &v,
        );
    }
    if let Some(v) = var("APP__RECONNECT_DELAY_SECS") {
        set_parsed(&mut settings.reconnect_delay_secs, "APP__RECONNECT_DELAY_SECS", &v);
    }

    if let Some(v) = var("APP__HTML_OUT") {
        settings.html_out = Some(PathBuf::from(v));
    }
}

fn set_parsed<T: FromStr>(slot: &mut T, key: &str, raw: &str)
where
    T::Err: std::fmt::Display,
{
    match raw.parse::<T>() {
        Ok(value) => *slot = value,
        Err(err) => warn!(key, value = raw, error = %err, "config: ignoring invalid value"),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
