//! Build-time defaults with run-time environment overrides.
//!
//! Each setting is read from the same variable twice: once by `option_env!`
//! when the binary is compiled, and once from the process environment at start-up.
//! The run-time value wins.

use serde::{Deserialize, Serialize};

use crate::i18n::Language;

pub const ENV_API_URL: &str = "MOBILIS_API_URL";
pub const ENV_USERS_PATH: &str = "MOBILIS_USERS_PATH";
pub const ENV_USER_BACKEND: &str = "MOBILIS_USER_BACKEND";
pub const ENV_LANG: &str = "MOBILIS_LANG";
pub const ENV_TIMEOUT: &str = "MOBILIS_TIMEOUT_SECS";

const DEFAULT_API_URL: &str = "http://localhost:8000/api";
const DEFAULT_USERS_PATH: &str = "/users";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Which implementation backs the user-management page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserBackend {
    Http,
    Mock,
}

impl UserBackend {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "http" | "api" => Some(UserBackend::Http),
            "mock" | "memory" => Some(UserBackend::Mock),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL every endpoint is appended to, without trailing slash.
    pub api_base_url: String,
    /// Collection path of the user service (`/users` or `/admin/users`).
    pub users_path: String,
    pub user_backend: UserBackend,
    pub default_language: Language,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.into(),
            users_path: DEFAULT_USERS_PATH.into(),
            user_backend: UserBackend::Http,
            default_language: Language::Fr,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    /// Compiled-in defaults overridden by the process environment.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok().or_else(|| build_time(key)))
    }

    /// Resolve a configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            match normalize_base_url(&url) {
                Some(url) => cfg.api_base_url = url,
                None => tracing::warn!(value = %url, "Ignoring invalid {ENV_API_URL}"),
            }
        }
        if let Some(path) = lookup(ENV_USERS_PATH) {
            cfg.users_path = normalize_path(&path);
        }
        if let Some(raw) = lookup(ENV_USER_BACKEND) {
            match UserBackend::parse(&raw) {
                Some(backend) => cfg.user_backend = backend,
                None => tracing::warn!(value = %raw, "Ignoring unknown {ENV_USER_BACKEND}"),
            }
        }
        if let Some(raw) = lookup(ENV_LANG) {
            match Language::from_tag(&raw) {
                Some(lang) => cfg.default_language = lang,
                None => tracing::warn!(value = %raw, "Ignoring unknown {ENV_LANG}"),
            }
        }
        if let Some(raw) = lookup(ENV_TIMEOUT) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if (1..=300).contains(&secs) => cfg.request_timeout_secs = secs,
                _ => tracing::warn!(value = %raw, "Ignoring invalid {ENV_TIMEOUT}"),
            }
        }
        cfg
    }
}

fn build_time(key: &str) -> Option<String> {
    let value = match key {
        ENV_API_URL => option_env!("MOBILIS_API_URL"),
        ENV_USERS_PATH => option_env!("MOBILIS_USERS_PATH"),
        ENV_USER_BACKEND => option_env!("MOBILIS_USER_BACKEND"),
        ENV_LANG => option_env!("MOBILIS_LANG"),
        ENV_TIMEOUT => option_env!("MOBILIS_TIMEOUT_SECS"),
        _ => None,
    };
    value.map(str::to_string)
}

fn normalize_base_url(raw: &str) -> Option<String> {
    let url = raw.trim().trim_end_matches('/');
    if url.starts_with("http://") || url.starts_with("https://") {
        Some(url.to_string())
    } else {
        None
    }
}

fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let cfg = AppConfig::from_lookup(|_| None);
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.default_language, Language::Fr);
        assert_eq!(cfg.users_path, "/users");
    }

    #[test]
    fn test_overrides_are_normalized() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            (ENV_API_URL, "https://api.example.com/"),
            (ENV_USERS_PATH, "admin/users/"),
            (ENV_USER_BACKEND, "Mock"),
            (ENV_LANG, "en"),
            (ENV_TIMEOUT, "30"),
        ]));
        assert_eq!(cfg.api_base_url, "https://api.example.com");
        assert_eq!(cfg.users_path, "/admin/users");
        assert_eq!(cfg.user_backend, UserBackend::Mock);
        assert_eq!(cfg.default_language, Language::En);
        assert_eq!(cfg.request_timeout_secs, 30);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            (ENV_API_URL, "ftp://nope"),
            (ENV_USER_BACKEND, "carrier-pigeon"),
            (ENV_LANG, "xx"),
            (ENV_TIMEOUT, "0"),
        ]));
        assert_eq!(cfg, AppConfig::default());
    }
}
