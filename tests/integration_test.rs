//! Integration tests for okta-setup
//!
//! These tests drive the full provisioning flow against scripted
//! collaborators: register, verify, persist credentials, then provision an
//! OIDC application into a project configuration file.

use async_trait::async_trait;
use okta_setup::api::{
    ApiClient, AuthorizationServerService, ClientCredentials, OidcAppCreator, OrganizationCreator,
};
use okta_setup::config::find_application_config;
use okta_setup::model::{OrganizationRequest, OrganizationResponse, PredefinedQuestions};
use okta_setup::sdk::{
    ClientConfiguration, DefaultSdkConfigurationService, SdkConfigurationService,
};
use std::path::Path;
use okta_setup::setup::{ApplicationType, DefaultSetupService, SetupService};
use okta_setup::{Result, SetupError};
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Registration API double: one pending org, one valid code.
struct FakeRegistrationApi {
    valid_code: String,
    verify_calls: Arc<AtomicUsize>,
}

impl FakeRegistrationApi {
    fn new(valid_code: &str) -> Self {
        Self {
            valid_code: valid_code.to_string(),
            verify_calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl OrganizationCreator for FakeRegistrationApi {
    async fn create_new_org(
        &self,
        _api_base_url: &str,
        request: &OrganizationRequest,
    ) -> Result<OrganizationResponse> {
        assert_eq!(request.organization, "Acme");
        Ok(OrganizationResponse {
            identifier: "org_123".to_string(),
            ..Default::default()
        })
    }

    async fn verify_new_org(
        &self,
        _api_base_url: &str,
        identifier: &str,
        code: &str,
    ) -> Result<OrganizationResponse> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(identifier, "org_123");
        if code != self.valid_code {
            return Err(SetupError::InvalidCode);
        }
        Ok(OrganizationResponse {
            identifier: "org_123".to_string(),
            org_url: Some("https://dev-42.okta.com".to_string()),
            email: Some("a@x.com".to_string()),
            api_token: Some("00apitoken".to_string()),
            update_password_url: None,
        })
    }
}

struct FakeAppApi;

#[async_trait]
impl OidcAppCreator for FakeAppApi {
    async fn create_oidc_app(
        &self,
        _client: &ApiClient,
        name: &str,
        redirect_uris: &[String],
    ) -> Result<ClientCredentials> {
        assert_eq!(name, "demo-app");
        assert_eq!(redirect_uris, ["http://localhost:8080/callback"]);
        Ok(ClientCredentials {
            client_id: "0oaNewApp".to_string(),
            client_secret: Some("s3cret".to_string()),
        })
    }

    async fn create_oidc_native_app(
        &self,
        client: &ApiClient,
        name: &str,
        redirect_uris: &[String],
    ) -> Result<ClientCredentials> {
        self.create_oidc_app(client, name, redirect_uris).await
    }

    async fn create_oidc_spa_app(
        &self,
        client: &ApiClient,
        name: &str,
        redirect_uris: &[String],
    ) -> Result<ClientCredentials> {
        self.create_oidc_app(client, name, redirect_uris).await
    }

    async fn create_oidc_service_app(
        &self,
        client: &ApiClient,
        name: &str,
        redirect_uris: &[String],
    ) -> Result<ClientCredentials> {
        self.create_oidc_app(client, name, redirect_uris).await
    }
}

struct RecordingClaimApi {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl AuthorizationServerService for RecordingClaimApi {
    async fn create_group_claim(
        &self,
        _client: &ApiClient,
        claim_name: &str,
        authorization_server_id: &str,
    ) -> Result<()> {
        assert_eq!(claim_name, "groups");
        assert_eq!(authorization_server_id, "default");
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// SDK configuration double that answers every load with the same verified
/// org, so tests never depend on the real home directory.
struct VerifiedOrgConfiguration;

impl SdkConfigurationService for VerifiedOrgConfiguration {
    fn load_unvalidated_configuration(&self, _file: &Path) -> Result<ClientConfiguration> {
        Ok(ClientConfiguration {
            base_url: Some("https://dev-42.okta.com".to_string()),
            token: Some("00apitoken".to_string()),
        })
    }

    fn write_okta_yaml(&self, org_url: &str, api_token: &str, file: &Path) -> Result<()> {
        DefaultSdkConfigurationService.write_okta_yaml(org_url, api_token, file)
    }
}

#[tokio::test]
async fn fresh_project_register_and_verify() {
    let home = TempDir::new().unwrap();
    let okta_config = home.path().join(".okta/okta.yaml");

    let service = DefaultSetupService::with_collaborators(
        Box::new(DefaultSdkConfigurationService),
        Box::new(FakeRegistrationApi::new("000000")),
        Box::new(FakeAppApi),
        Box::new(RecordingClaimApi {
            calls: Arc::new(AtomicUsize::new(0)),
        }),
        None,
        "https://start.example.test/".to_string(),
    );
    let questions = PredefinedQuestions::new(
        false,
        OrganizationRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "a@x.com".to_string(),
            organization: "Acme".to_string(),
        },
        ["000000".to_string()],
    );

    // No existing configuration: creation proceeds without any overwrite
    // authorization and without creating a backup
    let pending = service
        .create_okta_org(&questions, &okta_config, false)
        .await
        .unwrap();
    assert_eq!(pending.identifier, "org_123");
    assert!(pending.api_token.is_none());

    let verified = service
        .verify_okta_org(&pending.identifier, &questions, &okta_config)
        .await
        .unwrap();
    assert_eq!(verified.org_url.as_deref(), Some("https://dev-42.okta.com"));

    // Credentials are durably written in the canonical YAML shape
    let written = fs::read_to_string(&okta_config).unwrap();
    assert!(written.contains("orgUrl: https://dev-42.okta.com"));
    assert!(written.contains("token: 00apitoken"));

    // Nothing existed to back up
    let backups = fs::read_dir(okta_config.parent().unwrap())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("okta.yaml."))
        .count();
    assert_eq!(backups, 0);
}

#[tokio::test]
async fn invalid_codes_are_retried_until_accepted() {
    let home = TempDir::new().unwrap();
    let okta_config = home.path().join(".okta/okta.yaml");

    let api = FakeRegistrationApi::new("000000");
    let verify_calls = api.verify_calls.clone();
    let service = DefaultSetupService::with_collaborators(
        Box::new(DefaultSdkConfigurationService),
        Box::new(api),
        Box::new(FakeAppApi),
        Box::new(RecordingClaimApi {
            calls: Arc::new(AtomicUsize::new(0)),
        }),
        None,
        "https://start.example.test/".to_string(),
    );

    let questions = PredefinedQuestions::new(
        false,
        OrganizationRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "a@x.com".to_string(),
            organization: "Acme".to_string(),
        },
        [
            "111111".to_string(),
            "222222".to_string(),
            "000000".to_string(),
        ],
    );

    let verified = service
        .verify_okta_org("org_123", &questions, &okta_config)
        .await
        .unwrap();

    assert_eq!(verify_calls.load(Ordering::SeqCst), 3);
    assert_eq!(verified.api_token.as_deref(), Some("00apitoken"));
}

#[tokio::test]
async fn oidc_app_provisioning_merges_into_project_properties() {
    let project = TempDir::new().unwrap();
    let resources = project.path().join("src/main/resources");
    fs::create_dir_all(&resources).unwrap();
    fs::write(resources.join("application.properties"), "server.port=8080\n").unwrap();

    let claim_calls = Arc::new(AtomicUsize::new(0));
    let service = DefaultSetupService::with_collaborators(
        Box::new(VerifiedOrgConfiguration),
        Box::new(FakeRegistrationApi::new("000000")),
        Box::new(FakeAppApi),
        Box::new(RecordingClaimApi {
            calls: claim_calls.clone(),
        }),
        None,
        "https://start.example.test/".to_string(),
    );
    let mut source = find_application_config(project.path(), None).unwrap();

    service
        .create_oidc_application(
            source.as_mut(),
            &project.path().join("okta.yaml"),
            "demo-app",
            "https://dev-42.okta.com",
            Some("groups"),
            None,
            "default",
            false,
            ApplicationType::Web,
            &["http://localhost:8080/callback".to_string()],
        )
        .await
        .unwrap();

    assert_eq!(claim_calls.load(Ordering::SeqCst), 1);

    let written = fs::read_to_string(resources.join("application.properties")).unwrap();
    assert!(written.contains("server.port=8080"));
    assert!(written.contains("okta.oauth2.issuer=https://dev-42.okta.com/oauth2/default"));
    assert!(written.contains("okta.oauth2.client-id=0oaNewApp"));
    assert!(written.contains("okta.oauth2.client-secret=s3cret"));
}
