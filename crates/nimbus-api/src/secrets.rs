//! Nimbus secrets API client

use crate::config::ProviderConfig;
use crate::error::Result;
use crate::wire::Transport;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Live secret material. The control plane never returns this; it has to
/// be fetched from the secrets service explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretValue {
    #[serde(default)]
    pub secret_string: Option<String>,

    /// Base64-encoded binary payload, for secrets without a string form.
    #[serde(default)]
    pub secret_binary: Option<String>,
}

#[async_trait]
pub trait SecretsApi: Send + Sync {
    async fn get_secret_value(&self, secret_id: &str) -> Result<SecretValue>;
}

/// HTTP implementation over the provider endpoint.
pub struct HttpSecretsApi {
    transport: Transport,
}

impl HttpSecretsApi {
    pub fn new(cfg: &ProviderConfig) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(cfg)?,
        })
    }
}

#[async_trait]
impl SecretsApi for HttpSecretsApi {
    async fn get_secret_value(&self, secret_id: &str) -> Result<SecretValue> {
        self.transport
            .get_json("/secrets/value", &[("secret_id", secret_id.to_string())])
            .await
    }
}
