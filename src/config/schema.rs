//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::method_override::{AllowedMethods, DEFAULT_HEADER};

/// Root configuration for the demo server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Method override settings (the `[override]` table).
    #[serde(rename = "override")]
    pub method_override: OverrideConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Where to look for the override and which requests qualify.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OverrideConfig {
    /// Header name (`X-` prefix) or query key.
    pub source: String,

    /// Transport methods eligible for override: a list, `"any"` or `"default"`.
    pub methods: AllowedMethods,

    /// Extra method tokens accepted as override targets.
    pub extension_methods: Vec<String>,
}

impl Default for OverrideConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_HEADER.to_string(),
            methods: AllowedMethods::Default,
            extension_methods: Vec::new(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "debug".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.method_override, OverrideConfig::default());
        assert_eq!(config.timeouts.request_secs, 30);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_override_table() {
        let config: ServerConfig = toml::from_str(
            r#"
            [override]
            source = "_method"
            methods = ["POST", "PATCH"]
            extension_methods = ["FROBNICATE"]
            "#,
        )
        .unwrap();

        assert_eq!(config.method_override.source, "_method");
        assert_eq!(
            config.method_override.methods,
            AllowedMethods::only(["POST", "PATCH"])
        );
        assert_eq!(config.method_override.extension_methods, vec!["FROBNICATE"]);
    }
}
