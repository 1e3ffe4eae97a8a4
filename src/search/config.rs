//! Search backend configuration parsed from environment variables.

/// Overrides the platform default search host.
pub const SEARCH_HOST_VAR: &str = "RECIPES_SEARCH_HOST";
pub const SEARCH_TIMEOUT_VAR: &str = "RECIPES_SEARCH_TIMEOUT_SECS";
pub const SEARCH_CONNECT_TIMEOUT_VAR: &str = "RECIPES_SEARCH_CONNECT_TIMEOUT_SECS";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Android emulators reach the host machine through this address.
const ANDROID_EMULATOR_HOST: &str = "http://10.0.2.2:9200";
const LOCAL_HOST: &str = "http://localhost:9200";

/// The platform the app is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Android,
    Ios,
    Other,
}

impl Platform {
    /// Returns the platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            Platform::Android
        } else if cfg!(target_os = "ios") {
            Platform::Ios
        } else {
            Platform::Other
        }
    }

    /// Returns the search host used when no override is configured.
    pub fn default_host(self) -> &'static str {
        match self {
            Platform::Android => ANDROID_EMULATOR_HOST,
            Platform::Ios | Platform::Other => LOCAL_HOST,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for SearchTimeouts {
    fn default() -> Self {
        SearchTimeouts {
            request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Base URL of the search backend, without a trailing slash
    pub host: String,
    pub timeouts: SearchTimeouts,
}

impl SearchConfig {
    /// Creates a config for `host` with default timeouts.
    pub fn new(host: impl Into<String>) -> Self {
        SearchConfig {
            host: host.into().trim_end_matches('/').to_string(),
            timeouts: SearchTimeouts::default(),
        }
    }

    /// Build search config from environment variables.
    ///
    /// Optional:
    /// - `RECIPES_SEARCH_HOST`: platform default when absent or empty
    /// - `RECIPES_SEARCH_TIMEOUT_SECS`: default 10
    /// - `RECIPES_SEARCH_CONNECT_TIMEOUT_SECS`: default 5
    pub fn from_env(platform: Platform) -> Self {
        Self::from_lookup(platform, |key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(platform: Platform, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup(SEARCH_HOST_VAR)
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| platform.default_host().to_string());

        let parse_secs = |key: &str, default: u64| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };
        let timeouts = SearchTimeouts {
            request_secs: parse_secs(SEARCH_TIMEOUT_VAR, DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_secs(SEARCH_CONNECT_TIMEOUT_VAR, DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        SearchConfig {
            timeouts,
            ..Self::new(host)
        }
    }

    /// Returns the URL of the recipes search endpoint.
    pub fn search_url(&self) -> String {
        format!("{}/recipes/_search", self.host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_platform_defaults() {
        let android = SearchConfig::from_lookup(Platform::Android, lookup_from(&[]));
        assert_eq!(android.host, "http://10.0.2.2:9200");

        let ios = SearchConfig::from_lookup(Platform::Ios, lookup_from(&[]));
        assert_eq!(ios.host, "http://localhost:9200");

        let other = SearchConfig::from_lookup(Platform::Other, lookup_from(&[]));
        assert_eq!(other.host, "http://localhost:9200");
        assert_eq!(other.timeouts, SearchTimeouts::default());
    }

    #[test]
    fn test_host_override() {
        let cfg = SearchConfig::from_lookup(
            Platform::Android,
            lookup_from(&[(SEARCH_HOST_VAR, "http://custom-host:9200/")]),
        );
        assert_eq!(cfg.host, "http://custom-host:9200");
        assert_eq!(cfg.search_url(), "http://custom-host:9200/recipes/_search");
    }

    #[test]
    fn test_empty_override_falls_back() {
        let cfg =
            SearchConfig::from_lookup(Platform::Ios, lookup_from(&[(SEARCH_HOST_VAR, "  ")]));
        assert_eq!(cfg.host, "http://localhost:9200");
    }

    #[test]
    fn test_timeouts() {
        let cfg = SearchConfig::from_lookup(
            Platform::Other,
            lookup_from(&[
                (SEARCH_TIMEOUT_VAR, "42"),
                (SEARCH_CONNECT_TIMEOUT_VAR, "not-a-number"),
            ]),
        );
        assert_eq!(
            cfg.timeouts,
            SearchTimeouts {
                request_secs: 42,
                connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS
            }
        );
    }
}
