//! HTTP object store adapter.
//!
//! Objects are uploaded with a single `PUT {upload_url}/{object_name}`, the
//! request shape accepted by S3-compatible stores and the Google Cloud
//! Storage XML API. Locators are built from a separate public base URL.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

use crate::artifact::{
    domain::{Artifact, Locator, ObjectName},
    ports::{ArtifactStore, ArtifactStoreError, ArtifactStoreResult},
};

/// Connection settings for [`HttpArtifactStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpArtifactStoreSettings {
    /// Base URL objects are uploaded to.
    pub upload_url: String,
    /// Base URL objects are retrieved from.
    pub public_base_url: String,
    /// Bearer token sent with each upload.
    pub bearer_token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Object store reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpArtifactStore {
    client: Client,
    settings: HttpArtifactStoreSettings,
}

impl HttpArtifactStore {
    /// Creates a store client.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactStoreError::Backend`] when the HTTP client cannot be
    /// built.
    pub fn new(settings: HttpArtifactStoreSettings) -> ArtifactStoreResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("gantry/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.timeout)
            .build()
            .map_err(ArtifactStoreError::backend)?;
        Ok(Self { client, settings })
    }

    fn upload_url(&self, object_name: &ObjectName) -> String {
        let base = self.settings.upload_url.trim_end_matches('/');
        format!("{base}/{object_name}")
    }
}

#[async_trait]
impl ArtifactStore for HttpArtifactStore {
    async fn put(
        &self,
        object_name: &ObjectName,
        artifact: &Artifact,
    ) -> ArtifactStoreResult<Locator> {
        let mut request = self
            .client
            .put(self.upload_url(object_name))
            .header(CONTENT_TYPE, artifact.content_type())
            .body(artifact.bytes().to_vec());
        if let Some(token) = &self.settings.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(ArtifactStoreError::backend)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ArtifactStoreError::Rejected {
                object_name: object_name.clone(),
                status: status.as_u16(),
            });
        }
        Ok(Locator::new(&self.settings.public_base_url, object_name))
    }
}
