//! Org-scoped HTTP client
//!
//! Wraps reqwest with the verified organization's base URL and SSWS token
//! auth. Shared by the OIDC application and authorization-server adapters.

use crate::{Result, SetupError};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Per-request timeout for management API calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given org URL and API token.
    pub fn new(org_url: &str, api_token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("SSWS {}", api_token))
                .map_err(|_| SetupError::Config("API token is not a valid header value".into()))?,
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("okta-setup/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: org_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a JSON body and decode a JSON response.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "POST");
        let response = self.http.post(&url).json(body).send().await?;
        decode(response).await
    }
}

/// Decode a response, turning non-success statuses into a remote rejection
/// carrying the server's error summary.
pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SetupError::Rest {
            status: status.as_u16(),
            message: error_summary(&body),
        });
    }
    Ok(response.json().await?)
}

/// Pull the human-readable summary out of an API error body, falling back to
/// the raw text.
fn error_summary(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("errorSummary")?.as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_summary_extracts_api_message() {
        let body = r#"{"errorCode":"E0000001","errorSummary":"Api validation failed"}"#;
        assert_eq!(error_summary(body), "Api validation failed");
    }

    #[test]
    fn test_error_summary_falls_back_to_raw_text() {
        assert_eq!(error_summary("gateway timeout\n"), "gateway timeout");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("https://dev-1.okta.com/", "00token").unwrap();
        assert_eq!(client.base_url(), "https://dev-1.okta.com");
    }

    #[test]
    fn test_invalid_token_rejected() {
        let err = ApiClient::new("https://dev-1.okta.com", "bad\ntoken").unwrap_err();
        assert!(matches!(err, SetupError::Config(_)));
    }
}
