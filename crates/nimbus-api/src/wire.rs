//! Shared wire plumbing for the provider HTTP clients
//!
//! Every Nimbus service wraps responses in the same envelope:
//! `{ "success": bool, "result": ..., "errors": [{code, message}] }`.

use crate::config::ProviderConfig;
use crate::error::{ApiError, Result};
use crate::retry::{RetryPolicy, with_retry};
use serde::Deserialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    success: bool,
    result: Option<T>,
    #[serde(default)]
    errors: Vec<EnvelopeError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EnvelopeError {
    code: String,
    message: String,
}

impl<T> Envelope<T> {
    fn failure(errors: Vec<EnvelopeError>) -> ApiError {
        match errors.into_iter().next() {
            Some(err) => ApiError::Provider {
                code: err.code,
                message: err.message,
            },
            None => ApiError::InvalidResponse(
                "provider reported failure without an error".to_string(),
            ),
        }
    }

    pub(crate) fn into_result(self) -> Result<T> {
        if !self.success {
            return Err(Self::failure(self.errors));
        }
        self.result
            .ok_or_else(|| ApiError::InvalidResponse("missing result".to_string()))
    }

    pub(crate) fn into_unit(self) -> Result<()> {
        if !self.success {
            return Err(Self::failure(self.errors));
        }
        Ok(())
    }
}

/// Authenticated HTTP transport shared by the service clients.
pub(crate) struct Transport {
    client: reqwest::Client,
    base: String,
    token: String,
    region: String,
    retry: RetryPolicy,
}

impl Transport {
    pub(crate) fn new(cfg: &ProviderConfig) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            base: cfg.endpoint.trim_end_matches('/').to_string(),
            token: cfg.token()?,
            region: cfg.region.clone(),
            retry: RetryPolicy::default(),
        })
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.url(path);
        let client = &self.client;
        let token = self.token.as_str();
        let region = self.region.as_str();
        with_retry(&self.retry, move || {
            let request = client
                .get(&url)
                .bearer_auth(token)
                .header("x-nimbus-region", region)
                .query(query);
            async move {
                let response = request.send().await?;
                let envelope: Envelope<T> = response.json().await?;
                envelope.into_result()
            }
        })
        .await
    }

    pub(crate) async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.url(path);
        let client = &self.client;
        let token = self.token.as_str();
        let region = self.region.as_str();
        with_retry(&self.retry, move || {
            let request = client
                .post(&url)
                .bearer_auth(token)
                .header("x-nimbus-region", region)
                .json(body);
            async move {
                let response = request.send().await?;
                let envelope: Envelope<T> = response.json().await?;
                envelope.into_result()
            }
        })
        .await
    }

    pub(crate) async fn post_unit<B: serde::Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let url = self.url(path);
        let client = &self.client;
        let token = self.token.as_str();
        let region = self.region.as_str();
        with_retry(&self.retry, move || {
            let request = client
                .post(&url)
                .bearer_auth(token)
                .header("x-nimbus-region", region)
                .json(body);
            async move {
                let response = request.send().await?;
                let envelope: Envelope<serde_json::Value> = response.json().await?;
                envelope.into_unit()
            }
        })
        .await
    }
}
