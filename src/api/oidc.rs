//! OIDC application provisioning adapter
//!
//! One creation call per application variant (web, native, browser, service),
//! all taking the same name and redirect URIs and returning the new client's
//! credentials.

use super::client::ApiClient;
use crate::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

/// Credentials of a freshly created OIDC client.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    /// Absent for public clients (native, browser)
    pub client_secret: Option<String>,
}

#[async_trait]
pub trait OidcAppCreator: Send + Sync {
    async fn create_oidc_app(
        &self,
        client: &ApiClient,
        name: &str,
        redirect_uris: &[String],
    ) -> Result<ClientCredentials>;

    async fn create_oidc_native_app(
        &self,
        client: &ApiClient,
        name: &str,
        redirect_uris: &[String],
    ) -> Result<ClientCredentials>;

    async fn create_oidc_spa_app(
        &self,
        client: &ApiClient,
        name: &str,
        redirect_uris: &[String],
    ) -> Result<ClientCredentials>;

    async fn create_oidc_service_app(
        &self,
        client: &ApiClient,
        name: &str,
        redirect_uris: &[String],
    ) -> Result<ClientCredentials>;
}

pub struct RestOidcAppCreator;

#[derive(Debug, Deserialize)]
struct AppResponse {
    credentials: AppCredentials,
}

#[derive(Debug, Deserialize)]
struct AppCredentials {
    #[serde(rename = "oauthClient")]
    oauth_client: OauthClientCredentials,
}

#[derive(Debug, Deserialize)]
struct OauthClientCredentials {
    client_id: String,
    #[serde(default)]
    client_secret: Option<String>,
}

fn app_payload(
    name: &str,
    redirect_uris: &[String],
    application_type: &str,
    grant_types: &[&str],
    response_types: &[&str],
    auth_method: &str,
) -> Value {
    json!({
        "name": "oidc_client",
        "label": name,
        "signOnMode": "OPENID_CONNECT",
        "credentials": {
            "oauthClient": {
                "token_endpoint_auth_method": auth_method
            }
        },
        "settings": {
            "oauthClient": {
                "redirect_uris": redirect_uris,
                "response_types": response_types,
                "grant_types": grant_types,
                "application_type": application_type
            }
        }
    })
}

impl RestOidcAppCreator {
    async fn create(&self, client: &ApiClient, payload: Value) -> Result<ClientCredentials> {
        let response: AppResponse = client.post("/api/v1/apps", &payload).await?;
        Ok(ClientCredentials {
            client_id: response.credentials.oauth_client.client_id,
            client_secret: response.credentials.oauth_client.client_secret,
        })
    }
}

#[async_trait]
impl OidcAppCreator for RestOidcAppCreator {
    async fn create_oidc_app(
        &self,
        client: &ApiClient,
        name: &str,
        redirect_uris: &[String],
    ) -> Result<ClientCredentials> {
        let payload = app_payload(
            name,
            redirect_uris,
            "web",
            &["authorization_code", "refresh_token"],
            &["code"],
            "client_secret_basic",
        );
        self.create(client, payload).await
    }

    async fn create_oidc_native_app(
        &self,
        client: &ApiClient,
        name: &str,
        redirect_uris: &[String],
    ) -> Result<ClientCredentials> {
        let payload = app_payload(
            name,
            redirect_uris,
            "native",
            &["authorization_code", "refresh_token"],
            &["code"],
            "none",
        );
        self.create(client, payload).await
    }

    async fn create_oidc_spa_app(
        &self,
        client: &ApiClient,
        name: &str,
        redirect_uris: &[String],
    ) -> Result<ClientCredentials> {
        let payload = app_payload(
            name,
            redirect_uris,
            "browser",
            &["authorization_code"],
            &["code"],
            "none",
        );
        self.create(client, payload).await
    }

    async fn create_oidc_service_app(
        &self,
        client: &ApiClient,
        name: &str,
        redirect_uris: &[String],
    ) -> Result<ClientCredentials> {
        let payload = app_payload(
            name,
            redirect_uris,
            "service",
            &["client_credentials"],
            &["token"],
            "client_secret_basic",
        );
        self.create(client, payload).await
    }
}
