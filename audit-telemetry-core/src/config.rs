use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default)]
    pub enable_tracing: bool,

    #[serde(default = "default_service_name")]
    pub service_name: String,

    #[serde(default = "default_service_version")]
    pub service_version: String,

    #[serde(default = "default_deployment_env")]
    pub deployment_env: String,

    #[serde(default = "default_browserless_ws")]
    pub browserless_ws: String,

    #[serde(default = "default_otlp_endpoint")]
    pub otlp_endpoint: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enable_tracing: false,
            service_name: default_service_name(),
            service_version: default_service_version(),
            deployment_env: default_deployment_env(),
            browserless_ws: default_browserless_ws(),
            otlp_endpoint: default_otlp_endpoint(),
        }
    }
}

impl TelemetryConfig {
    /// Defaults overridden by `ENABLE_TRACING`, `SERVICE_NAME`,
    /// `SERVICE_VERSION`, `DEPLOYMENT_ENV`, `BROWSERLESS_WS` and
    /// `OTLP_ENDPOINT`.
    pub fn load() -> crate::error::Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::Config::try_from(&TelemetryConfig::default())?)
            .add_source(config::Environment::default());

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}

fn default_service_name() -> String { "seo-audit-backend".to_string() }
fn default_service_version() -> String { env!("CARGO_PKG_VERSION").to_string() }
fn default_deployment_env() -> String { "development".to_string() }
fn default_browserless_ws() -> String { "unknown".to_string() }
fn default_otlp_endpoint() -> String { "http://localhost:4317".to_string() }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TelemetryConfig::default();

        assert!(!config.enable_tracing);
        assert_eq!(config.service_name, "seo-audit-backend");
        assert_eq!(config.service_version, "2.1.0");
        assert_eq!(config.deployment_env, "development");
        assert_eq!(config.browserless_ws, "unknown");
        assert_eq!(config.otlp_endpoint, "http://localhost:4317");
    }

    #[test]
    fn test_load_without_overrides() {
        let config = TelemetryConfig::load().expect("load should fall through to defaults");
        assert_eq!(config.service_name, "seo-audit-backend");
    }
}
