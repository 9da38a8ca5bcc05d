//! Authorization server claim provisioning
//!
//! Adds a group claim to the org's authorization server so issued tokens
//! carry group membership.

use super::client::ApiClient;
use crate::Result;
use async_trait::async_trait;
use serde_json::json;

#[async_trait]
pub trait AuthorizationServerService: Send + Sync {
    async fn create_group_claim(
        &self,
        client: &ApiClient,
        claim_name: &str,
        authorization_server_id: &str,
    ) -> Result<()>;
}

pub struct RestAuthorizationServerService;

#[async_trait]
impl AuthorizationServerService for RestAuthorizationServerService {
    async fn create_group_claim(
        &self,
        client: &ApiClient,
        claim_name: &str,
        authorization_server_id: &str,
    ) -> Result<()> {
        let path = format!(
            "/api/v1/authorizationServers/{}/claims",
            authorization_server_id
        );
        let payload = json!({
            "name": claim_name,
            "status": "ACTIVE",
            "claimType": "RESOURCE",
            "valueType": "GROUPS",
            "groupFilterType": "REGEX",
            "value": ".*"
        });

        let _: serde_json::Value = client.post(&path, &payload).await?;
        Ok(())
    }
}
