//! Service configuration types for Palaver.
//!
//! `ServiceConfig` represents the top-level `config.toml` that controls
//! the content denylist, validation limits, and the search working-set cap.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Palaver service.
///
/// Loaded from `~/.palaver/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Substrings considered inappropriate; matched case-insensitively
    /// inside message content and masked with `*`.
    #[serde(default = "default_denylist")]
    pub denylist: Vec<String>,

    /// Field length limits enforced by the validators.
    #[serde(default)]
    pub limits: ValidationLimits,

    /// Upper bound on messages scanned per search request (most recent
    /// first). Search is a bounded scan, not an index.
    #[serde(default = "default_search_scan_limit")]
    pub search_scan_limit: i64,
}

fn default_denylist() -> Vec<String> {
    ["badword1", "badword2", "inappropriate", "offensive"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_search_scan_limit() -> i64 {
    1000
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            denylist: default_denylist(),
            limits: ValidationLimits::default(),
            search_scan_limit: default_search_scan_limit(),
        }
    }
}

/// Maximum lengths for validated message fields.
///
/// Lengths are counted in characters, not bytes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ValidationLimits {
    #[serde(default = "default_id_length")]
    pub max_message_id_length: usize,

    #[serde(default = "default_id_length")]
    pub max_session_id_length: usize,

    #[serde(default = "default_content_length")]
    pub max_content_length: usize,
}

fn default_id_length() -> usize {
    100
}

fn default_content_length() -> usize {
    5000
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_message_id_length: default_id_length(),
            max_session_id_length: default_id_length(),
            max_content_length: default_content_length(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_config_default_values() {
        let config = ServiceConfig::default();
        assert_eq!(config.denylist.len(), 4);
        assert!(config.denylist.contains(&"badword1".to_string()));
        assert_eq!(config.limits.max_content_length, 5000);
        assert_eq!(config.search_scan_limit, 1000);
    }

    #[test]
    fn test_service_config_deserialize_empty_uses_defaults() {
        let config: ServiceConfig = toml::from_str("").unwrap();
        assert_eq!(config.denylist.len(), 4);
        assert_eq!(config.limits.max_message_id_length, 100);
        assert_eq!(config.search_scan_limit, 1000);
    }

    #[test]
    fn test_service_config_deserialize_with_values() {
        let toml_str = r#"
denylist = ["spoiler", "classified"]
search_scan_limit = 250

[limits]
max_content_length = 2000
"#;
        let config: ServiceConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.denylist, vec!["spoiler", "classified"]);
        assert_eq!(config.search_scan_limit, 250);
        assert_eq!(config.limits.max_content_length, 2000);
        // Unspecified limit fields keep their defaults.
        assert_eq!(config.limits.max_message_id_length, 100);
    }

    #[test]
    fn test_service_config_serde_roundtrip() {
        let config = ServiceConfig {
            denylist: vec!["x".to_string()],
            limits: ValidationLimits {
                max_message_id_length: 50,
                max_session_id_length: 50,
                max_content_length: 1000,
            },
            search_scan_limit: 10,
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ServiceConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.denylist, vec!["x"]);
        assert_eq!(parsed.limits.max_content_length, 1000);
        assert_eq!(parsed.search_scan_limit, 10);
    }
}
