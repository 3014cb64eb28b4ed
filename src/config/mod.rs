//! Configuration management for the resource access core

use anyhow::{Context, Result};
use std::env;

/// Default ACL group whose members may manage resource access rules.
pub const DEFAULT_AUTHORIZED_ACL_GROUP: &str = "customer_admin_acl";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Rule management authorization settings
    pub resource_access: ResourceAccessConfig,
    /// Logging and metrics settings
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceAccessConfig {
    /// ACL group a non-admin caller must belong to. `None` disables the
    /// group requirement, leaving only the topology role check.
    pub authorized_acl_group: Option<String>,
}

impl Default for ResourceAccessConfig {
    fn default() -> Self {
        Self {
            authorized_acl_group: Some(DEFAULT_AUTHORIZED_ACL_GROUP.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// "text" or "json"
    pub log_format: String,
    pub metrics_enabled: bool,
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
            metrics_enabled: false,
            service_name: "resource-access-core".to_string(),
        }
    }
}

fn parse_bool(key: &str, value: Option<String>, default: bool) -> Result<bool> {
    match value {
        None => Ok(default),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(anyhow::anyhow!("expected a boolean, got '{}'", other))
                .with_context(|| format!("Invalid {}", key)),
        },
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let authorized_acl_group = match lookup("RESOURCE_ACCESS_AUTHORIZED_ACL_GROUP") {
            None => Some(DEFAULT_AUTHORIZED_ACL_GROUP.to_string()),
            Some(value) if value.trim().is_empty() => None,
            Some(value) => Some(value.trim().to_string()),
        };

        let log_format = lookup("LOG_FORMAT").unwrap_or_else(|| "text".to_string());
        if log_format != "text" && log_format != "json" {
            anyhow::bail!("Invalid LOG_FORMAT '{}': expected 'text' or 'json'", log_format);
        }

        Ok(Self {
            resource_access: ResourceAccessConfig {
                authorized_acl_group,
            },
            telemetry: TelemetryConfig {
                log_format,
                metrics_enabled: parse_bool(
                    "METRICS_ENABLED",
                    lookup("METRICS_ENABLED"),
                    false,
                )?,
                service_name: lookup("SERVICE_NAME")
                    .unwrap_or_else(|| "resource-access-core".to_string()),
            },
        })
    }
}
