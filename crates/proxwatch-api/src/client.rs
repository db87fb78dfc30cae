//! HTTP client for the cluster monitoring backend.
//!
//! One generic request path with typed per-endpoint wrappers. The client is
//! cheap to clone and safe to use from overlapping requests; every call is a
//! fresh round trip (no caching, no retries at this layer).

use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;
use crate::types::{
    Cluster, ClusterDisks, ClusterList, ClusterStatus, ErrorBody, RegisterClusterRequest,
};

/// Client for the proxwatch backend REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given base URL (scheme + host + port, no
    /// trailing slash required). The timeout applies per request.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// List all registered clusters.
    pub async fn list_clusters(&self) -> Result<ClusterList, ApiError> {
        self.get_json("/api/v1/clusters").await
    }

    /// Register a new cluster endpoint.
    pub async fn register_cluster(
        &self,
        request: &RegisterClusterRequest,
    ) -> Result<Cluster, ApiError> {
        let response = self
            .send(Method::POST, "/api/v1/clusters", Some(request))
            .await?;
        Ok(response.json().await?)
    }

    /// Fetch a single cluster by id.
    pub async fn cluster(&self, id: &str) -> Result<Cluster, ApiError> {
        self.get_json(&format!("/api/v1/clusters/{id}")).await
    }

    /// Delete a registered cluster. Success is signaled by the absence of
    /// an error; the backend returns no body.
    pub async fn delete_cluster(&self, id: &str) -> Result<(), ApiError> {
        self.send(Method::DELETE, &format!("/api/v1/clusters/{id}"), None::<&()>)
            .await?;
        Ok(())
    }

    /// Fetch the disk inventory of every node in a cluster.
    pub async fn cluster_disks(&self, id: &str) -> Result<ClusterDisks, ApiError> {
        self.get_json(&format!("/api/v1/clusters/{id}/disks")).await
    }

    /// Fetch live node health and resource counts. This is the endpoint
    /// the polling controller tracks.
    pub async fn cluster_status(&self, id: &str) -> Result<ClusterStatus, ApiError> {
        self.get_json(&format!("/api/v1/clusters/{id}/status")).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(Method::GET, path, None::<&()>).await?;
        Ok(response.json().await?)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let request_id = Uuid::new_v4();
        debug!(%request_id, %method, %url, "api request");

        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let bytes = response.bytes().await.unwrap_or_default();
            let err = error_from_response(status.as_u16(), &bytes);
            debug!(%request_id, status = status.as_u16(), "api request failed");
            return Err(err);
        }

        Ok(response)
    }
}

/// Map a non-success response to a typed error: decode the backend's error
/// envelope when possible, fall back to a bare status error otherwise.
fn error_from_response(status: u16, body: &[u8]) -> ApiError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(envelope) => ApiError::from_envelope(status, envelope),
        Err(_) => ApiError::from_status(status),
    }
}
