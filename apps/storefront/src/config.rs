use std::{fs, time::Duration};

use anyhow::{bail, Context};
use serde::Deserialize;
use storefront_core::FallbackPolicy;
use tracing::warn;
use url::Url;

pub const SETTINGS_FILE: &str = "storefront.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub catalog_url: String,
    pub catalog_limit: Option<u32>,
    pub request_timeout_seconds: u64,
    pub fallback_policy: FallbackPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_url: "https://fakestoreapi.com/products".into(),
            catalog_limit: Some(10),
            request_timeout_seconds: 10,
            fallback_policy: FallbackPolicy::UseBundled,
        }
    }
}

impl Settings {
    pub fn catalog_endpoint(&self) -> anyhow::Result<Url> {
        let url = Url::parse(&self.catalog_url)
            .with_context(|| format!("invalid catalog url '{}'", self.catalog_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("catalog url '{}' must use http or https", self.catalog_url);
        }
        Ok(url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    catalog_url: Option<String>,
    catalog_limit: Option<u32>,
    request_timeout_seconds: Option<u64>,
    fallback_policy: Option<String>,
}

pub fn parse_fallback_policy(raw: &str) -> Option<FallbackPolicy> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "bundled" | "fallback" | "use_bundled" => Some(FallbackPolicy::UseBundled),
        "surface" | "fail" => Some(FallbackPolicy::Surface),
        _ => None,
    }
}

pub fn load_settings() -> Settings {
    let file = fs::read_to_string(SETTINGS_FILE).ok();
    load_settings_from(file.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file, then environment variables.
pub fn load_settings_from(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        match toml::from_str::<FileSettings>(raw) {
            Ok(file_cfg) => apply_file_settings(&mut settings, file_cfg),
            Err(err) => warn!(file = SETTINGS_FILE, error = %err, "ignoring unreadable settings file"),
        }
    }

    if let Some(v) = env("STOREFRONT_CATALOG_URL") {
        settings.catalog_url = v;
    }
    if let Some(v) = env("APP__CATALOG_URL") {
        settings.catalog_url = v;
    }

    if let Some(v) = env("APP__CATALOG_LIMIT") {
        match v.trim() {
            "" | "none" => settings.catalog_limit = None,
            raw => match raw.parse::<u32>() {
                Ok(parsed) => settings.catalog_limit = Some(parsed),
                Err(_) => warn!(value = %v, "ignoring invalid APP__CATALOG_LIMIT"),
            },
        }
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECONDS") {
        match v.trim().parse::<u64>() {
            Ok(parsed) if parsed > 0 => settings.request_timeout_seconds = parsed,
            _ => warn!(value = %v, "ignoring invalid APP__REQUEST_TIMEOUT_SECONDS"),
        }
    }

    if let Some(v) = env("APP__FALLBACK_POLICY") {
        match parse_fallback_policy(&v) {
            Some(policy) => settings.fallback_policy = policy,
            None => warn!(value = %v, "ignoring invalid APP__FALLBACK_POLICY"),
        }
    }

    settings
}

fn apply_file_settings(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.catalog_url {
        settings.catalog_url = v;
    }
    if let Some(v) = file_cfg.catalog_limit {
        settings.catalog_limit = (v > 0).then_some(v);
    }
    if let Some(v) = file_cfg.request_timeout_seconds.filter(|v| *v > 0) {
        settings.request_timeout_seconds = v;
    }
    if let Some(v) = file_cfg.fallback_policy.as_deref() {
        match parse_fallback_policy(v) {
            Some(policy) => settings.fallback_policy = policy,
            None => warn!(value = v, "ignoring invalid fallback_policy in settings file"),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
