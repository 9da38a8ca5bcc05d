//! Data model for organization registration
//!
//! Request/response types exchanged with the registration API, plus the
//! interactive question capability that supplies user answers on demand.

pub mod questions;

pub use questions::{InteractiveQuestions, PredefinedQuestions, RegistrationQuestions};

use serde::{Deserialize, Serialize};

/// User-supplied fields needed to create a new organization.
///
/// Immutable once submitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub organization: String,
}

/// Result of organization creation.
///
/// Two validity phases: *pending* right after creation (only `identifier` is
/// meaningful) and *verified* after the email challenge succeeds (`org_url`
/// and `api_token` populated, exactly once). Not mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationResponse {
    /// Opaque handle used to verify the pending organization
    #[serde(alias = "id")]
    pub identifier: String,

    #[serde(default)]
    pub org_url: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub api_token: Option<String>,

    #[serde(default)]
    pub update_password_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_camel_case() {
        let request = OrganizationRequest {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            organization: "Acme".to_string(),
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"firstName\":\"Jane\""));
        assert!(json.contains("\"organization\":\"Acme\""));
    }

    #[test]
    fn test_pending_response_has_identifier_only() {
        let json = r#"{"identifier": "org_123"}"#;
        let response: OrganizationResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.identifier, "org_123");
        assert!(response.org_url.is_none());
        assert!(response.api_token.is_none());
    }

    #[test]
    fn test_verified_response_has_credentials() {
        let json = r#"{
            "identifier": "org_123",
            "orgUrl": "https://dev-1.okta.com",
            "apiToken": "00token",
            "updatePasswordUrl": "https://dev-1.okta.com/reset"
        }"#;
        let response: OrganizationResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.org_url.as_deref(), Some("https://dev-1.okta.com"));
        assert_eq!(response.api_token.as_deref(), Some("00token"));
    }
}
