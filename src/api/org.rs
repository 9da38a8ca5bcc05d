//! Organization registration adapter
//!
//! Creates a new organization against the registration API and submits the
//! email verification code for it.

use super::client::decode;
use crate::model::{OrganizationRequest, OrganizationResponse};
use crate::{Result, SetupError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Remote "create organization" and "verify organization" calls.
#[async_trait]
pub trait OrganizationCreator: Send + Sync {
    async fn create_new_org(
        &self,
        api_base_url: &str,
        request: &OrganizationRequest,
    ) -> Result<OrganizationResponse>;

    async fn verify_new_org(
        &self,
        api_base_url: &str,
        identifier: &str,
        code: &str,
    ) -> Result<OrganizationResponse>;
}

pub struct RestOrganizationCreator {
    http: Client,
}

impl RestOrganizationCreator {
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("okta-setup/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }
}

fn registration_url(api_base_url: &str) -> String {
    format!("{}/api/v1/registration", api_base_url.trim_end_matches('/'))
}

/// Whether a verify response status means "wrong passcode, ask again".
///
/// Only authentication-shaped rejections qualify; a 400 means the request
/// itself was malformed and retrying the same request cannot succeed.
fn is_invalid_code_status(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

#[async_trait]
impl OrganizationCreator for RestOrganizationCreator {
    async fn create_new_org(
        &self,
        api_base_url: &str,
        request: &OrganizationRequest,
    ) -> Result<OrganizationResponse> {
        let url = registration_url(api_base_url);
        tracing::debug!(%url, "Creating organization");
        let response = self.http.post(&url).json(request).send().await?;
        decode(response).await
    }

    async fn verify_new_org(
        &self,
        api_base_url: &str,
        identifier: &str,
        code: &str,
    ) -> Result<OrganizationResponse> {
        let url = format!("{}/{}/verify", registration_url(api_base_url), identifier);
        tracing::debug!(%url, "Verifying organization");
        let response = self
            .http
            .post(&url)
            .json(&json!({ "code": code }))
            .send()
            .await?;

        // A rejected passcode comes back as an auth error; the orchestrator
        // retries it, so keep the signal distinct from other rejections.
        if is_invalid_code_status(response.status()) {
            return Err(SetupError::InvalidCode);
        }

        decode(response).await
    }
}
