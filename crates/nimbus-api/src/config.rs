//! Target configuration
//!
//! Each orchestrator request carries an opaque target-configuration
//! document selecting the provider endpoint, region, and credentials for
//! that call. Parsing is lenient: an absent or malformed document yields
//! the defaults, and the API token falls back to the environment.

use crate::error::{ApiError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_ENDPOINT: &str = "https://api.nimbuscloud.io/v1";

const TOKEN_ENV_VAR: &str = "NIMBUS_API_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProviderConfig {
    /// Provider region requests are scoped to.
    pub region: String,

    /// Base URL of the provider API.
    pub endpoint: String,

    /// Bearer token; when unset, `NIMBUS_API_TOKEN` is consulted.
    pub api_token: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            region: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_token: None,
        }
    }
}

impl ProviderConfig {
    /// Parses the opaque target configuration supplied with a request.
    pub fn from_target_config(target_config: &Value) -> Self {
        if target_config.is_null() {
            return Self::default();
        }
        serde_json::from_value(target_config.clone()).unwrap_or_default()
    }

    /// Resolves the API token, falling back to the environment.
    pub fn token(&self) -> Result<String> {
        if let Some(token) = &self.api_token {
            return Ok(token.clone());
        }
        std::env::var(TOKEN_ENV_VAR).map_err(|_| ApiError::MissingToken)
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_target_config_document() {
        let cfg = ProviderConfig::from_target_config(&json!({
            "Region": "aurora-west-2",
            "Endpoint": "https://staging.nimbuscloud.io/v1",
            "ApiToken": "tok-123"
        }));

        assert_eq!(cfg.region, "aurora-west-2");
        assert_eq!(cfg.endpoint, "https://staging.nimbuscloud.io/v1");
        assert_eq!(cfg.api_token.as_deref(), Some("tok-123"));
    }

    #[test]
    fn null_and_partial_documents_fall_back_to_defaults() {
        let cfg = ProviderConfig::from_target_config(&Value::Null);
        assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);

        let cfg = ProviderConfig::from_target_config(&json!({"Region": "aurora-east-1"}));
        assert_eq!(cfg.region, "aurora-east-1");
        assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
    }
}
