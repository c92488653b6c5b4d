//! HTTP inference service adapter.
//!
//! Posts `{"input_url": ...}` to the configured endpoint and treats the
//! response body as the artifact.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use std::time::Duration;

use crate::artifact::domain::Artifact;
use crate::compute::ports::{Compute, ComputeError};

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    input_url: &'a str,
}

/// Compute step served by a remote inference endpoint.
#[derive(Debug, Clone)]
pub struct HttpCompute {
    client: Client,
    endpoint: String,
}

impl HttpCompute {
    /// Creates a client for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`ComputeError::Transport`] when the HTTP client cannot be
    /// built.
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ComputeError> {
        let mut builder = Client::builder().user_agent(concat!("gantry/", env!("CARGO_PKG_VERSION")));
        if let Some(limit) = timeout {
            builder = builder.timeout(limit);
        }
        let client = builder.build().map_err(ComputeError::transport)?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl Compute for HttpCompute {
    async fn compute(&self, input_locator: &str) -> Result<Artifact, ComputeError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&InferenceRequest {
                input_url: input_locator,
            })
            .send()
            .await
            .map_err(ComputeError::transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ComputeError::Failed(format!(
                "inference endpoint returned {status}"
            )));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map_or_else(|| Artifact::DEFAULT_CONTENT_TYPE.to_owned(), str::to_owned);
        let body = response.bytes().await.map_err(ComputeError::transport)?;
        if body.is_empty() {
            return Err(ComputeError::InvalidOutput(
                "inference endpoint returned an empty body".to_owned(),
            ));
        }

        Ok(Artifact::new(body.to_vec()).with_content_type(content_type))
    }
}
