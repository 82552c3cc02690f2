use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::application::services::identity::{IdentityProvider, OauthIdentity};
use crate::domain::errors::{DomainError, DomainResult};

/// Client for the provider's userinfo endpoint. The bearer access token goes
/// out as a query parameter; the response carries at least `email`,
/// `verified_email` and `name`.
pub struct GoogleUserinfoClient {
    http: Client,
    userinfo_url: String,
}

impl GoogleUserinfoClient {
    pub fn new(userinfo_url: String, timeout: Duration) -> Arc<dyn IdentityProvider> {
        Arc::new(Self {
            http: Client::builder()
                .user_agent("pantry-service/oauth")
                .timeout(timeout)
                .build()
                .expect("failed to build oauth client"),
            userinfo_url,
        }) as Arc<dyn IdentityProvider>
    }
}

#[async_trait]
impl IdentityProvider for GoogleUserinfoClient {
    async fn fetch_identity(&self, access_token: &str) -> DomainResult<OauthIdentity> {
        let response = self
            .http
            .get(&self.userinfo_url)
            .query(&[("access_token", access_token)])
            .send()
            .await
            .map_err(|err| DomainError::Internal(format!("userinfo request failed: {err}")))?;

        if !response.status().is_success() {
            return Err(DomainError::Internal(format!(
                "userinfo endpoint returned {}",
                response.status()
            )));
        }

        response
            .json::<OauthIdentity>()
            .await
            .map_err(|err| DomainError::Internal(format!("malformed userinfo body: {err}")))
    }
}
