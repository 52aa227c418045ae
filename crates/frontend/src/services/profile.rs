//! Profile validation against the auth service

use async_trait::async_trait;
use portal_auth_core::{Error, ProfileClient, ProfileResponse, Result};

/// `reqwest` client for the token validation endpoint
#[derive(Clone, Default)]
pub struct HttpProfileClient {
    client: reqwest::Client,
}

impl HttpProfileClient {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait(?Send)]
impl ProfileClient for HttpProfileClient {
    async fn validate(&self, endpoint: &str, token: &str) -> Result<ProfileResponse> {
        let response = self
            .client
            .post(endpoint)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| Error::transport(format!("Failed to reach auth service: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::transport(format!(
                "Profile validation failed with status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::transport(format!("Failed to parse profile response: {e}")))
    }
}
