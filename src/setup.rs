//! Setup orchestration
//!
//! Drives the end-to-end provisioning sequence: existing-config check,
//! backup, organization creation, email verification, credential persistence,
//! and OIDC application provisioning. Owns the overwrite/backup policy, the
//! verification retry loop, the property-key naming scheme, and the
//! idempotency gate that skips re-provisioning an existing application.
//!
//! This module never touches raw files directly; it talks to the
//! PropertySource abstraction and the remote collaborator traits only.

use crate::api::{
    ApiClient, AuthorizationServerService, OidcAppCreator, OrganizationCreator,
    RestAuthorizationServerService, RestOidcAppCreator, RestOrganizationCreator,
};
use crate::config::PropertySource;
use crate::model::{OrganizationResponse, RegistrationQuestions};
use crate::progress::{self, ProgressBar};
use crate::sdk::{DefaultSdkConfigurationService, SdkConfigurationService};
use crate::{Result, SetupError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Registration API used to create new organizations. Can be overridden with
/// the OKTA_CLI_BASE_URL environment variable.
pub const DEFAULT_API_BASE_URL: &str = "https://start.okta.dev/";

/// Environment variable overriding [`DEFAULT_API_BASE_URL`].
pub const API_BASE_URL_ENV: &str = "OKTA_CLI_BASE_URL";

/// The four supported OIDC application variants.
///
/// Deliberately a closed enum: adding a variant must show up as a
/// compile-time change at every dispatch site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationType {
    Web,
    Native,
    Browser,
    Service,
}

impl FromStr for ApplicationType {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "web" => Ok(ApplicationType::Web),
            "native" => Ok(ApplicationType::Native),
            "browser" | "spa" => Ok(ApplicationType::Browser),
            "service" => Ok(ApplicationType::Service),
            other => Err(SetupError::Config(format!(
                "Unsupported Application Type: {}",
                other
            ))),
        }
    }
}

/// End-to-end provisioning operations.
#[async_trait]
pub trait SetupService {
    /// Create a new organization, guarding any existing configuration behind
    /// an explicit overwrite authorization and a timestamped backup.
    async fn create_okta_org(
        &self,
        questions: &dyn RegistrationQuestions,
        okta_props_file: &Path,
        interactive: bool,
    ) -> Result<OrganizationResponse>;

    /// Submit email verification codes until one is accepted, then persist
    /// the verified credentials to `okta_props_file`.
    async fn verify_okta_org(
        &self,
        identifier: &str,
        questions: &dyn RegistrationQuestions,
        okta_props_file: &Path,
    ) -> Result<OrganizationResponse>;

    /// Provision an OIDC application and merge its identifiers into the
    /// project configuration, unless a live client id is already configured.
    /// Credentials for the management API come from `okta_props_file`, the
    /// same store the register step wrote.
    #[allow(clippy::too_many_arguments)]
    async fn create_oidc_application(
        &self,
        property_source: &mut dyn PropertySource,
        okta_props_file: &Path,
        oidc_app_name: &str,
        org_url: &str,
        group_claim_name: Option<&str>,
        issuer_uri: Option<&str>,
        authorization_server_id: &str,
        interactive: bool,
        app_type: ApplicationType,
        redirect_uris: &[String],
    ) -> Result<()>;
}

/// Picks the status-reporting backend for a run; `true` means interactive.
pub type ProgressFactory = Box<dyn Fn(bool) -> Box<dyn ProgressBar> + Send + Sync>;

pub struct DefaultSetupService {
    sdk_configuration_service: Box<dyn SdkConfigurationService>,
    organization_creator: Box<dyn OrganizationCreator>,
    oidc_app_creator: Box<dyn OidcAppCreator>,
    authorization_server_service: Box<dyn AuthorizationServerService>,
    spring_property_key: Option<String>,
    api_base_url: String,
    progress_factory: ProgressFactory,
}

impl DefaultSetupService {
    /// Build the service with its production collaborators. The registration
    /// API base URL is resolved exactly once here, from the environment or
    /// the default.
    pub fn new(spring_property_key: Option<String>) -> Result<Self> {
        let api_base_url = std::env::var(API_BASE_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        Ok(Self::with_collaborators(
            Box::new(DefaultSdkConfigurationService),
            Box::new(RestOrganizationCreator::new()?),
            Box::new(RestOidcAppCreator),
            Box::new(RestAuthorizationServerService),
            spring_property_key,
            api_base_url,
        ))
    }

    /// Full constructor, used by tests to substitute collaborators.
    pub fn with_collaborators(
        sdk_configuration_service: Box<dyn SdkConfigurationService>,
        organization_creator: Box<dyn OrganizationCreator>,
        oidc_app_creator: Box<dyn OidcAppCreator>,
        authorization_server_service: Box<dyn AuthorizationServerService>,
        spring_property_key: Option<String>,
        api_base_url: String,
    ) -> Self {
        Self {
            sdk_configuration_service,
            organization_creator,
            oidc_app_creator,
            authorization_server_service,
            spring_property_key,
            api_base_url,
            progress_factory: Box::new(progress::create),
        }
    }

    /// Replace the status-reporting backend, so callers can observe the
    /// messages a run emits.
    pub fn with_progress_factory(mut self, progress_factory: ProgressFactory) -> Self {
        self.progress_factory = progress_factory;
        self
    }

    fn issuer_uri_property_name(&self) -> String {
        match &self.spring_property_key {
            Some(id) => format!("spring.security.oauth2.client.provider.{}.issuer-uri", id),
            None => "okta.oauth2.issuer".to_string(),
        }
    }

    fn client_id_property_name(&self) -> String {
        match &self.spring_property_key {
            Some(id) => format!(
                "spring.security.oauth2.client.registration.{}.client-id",
                id
            ),
            None => "okta.oauth2.client-id".to_string(),
        }
    }

    fn client_secret_property_name(&self) -> String {
        match &self.spring_property_key {
            Some(id) => format!(
                "spring.security.oauth2.client.registration.{}.client-secret",
                id
            ),
            None => "okta.oauth2.client-secret".to_string(),
        }
    }
}

/// Backup file name for `file` at the given instant:
/// `<original name>.<UTC timestamp, yyyyMMddTHHmm>`, alongside the original.
/// Minute resolution means a rerun within the same minute overwrites its own
/// prior backup, never the source.
pub fn backup_path(file: &Path, at: DateTime<Utc>) -> PathBuf {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let backup_name = format!("{}.{}", name, at.format("%Y%m%dT%H%M"));
    match file.parent() {
        Some(parent) => parent.join(backup_name),
        None => PathBuf::from(backup_name),
    }
}

/// Whether a configured client id looks like a real, live value rather than
/// an unset field or an unreplaced `{placeholder}`.
pub fn is_valid_client_id(client_id: Option<&str>) -> bool {
    match client_id {
        Some(id) => {
            let trimmed = id.trim();
            !trimmed.is_empty()
                && !trimmed.contains(char::is_whitespace)
                && !trimmed.contains('{')
                && !trimmed.contains('}')
        }
        None => false,
    }
}

#[async_trait]
impl SetupService for DefaultSetupService {
    async fn create_okta_org(
        &self,
        questions: &dyn RegistrationQuestions,
        okta_props_file: &Path,
        interactive: bool,
    ) -> Result<OrganizationResponse> {
        let client_configuration = self
            .sdk_configuration_service
            .load_unvalidated_configuration(okta_props_file)?;

        let progress = (self.progress_factory)(interactive);

        if let Some(base_url) = client_configuration
            .base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
        {
            progress.info(&format!(
                "An existing Okta Organization ({}) was found in {}",
                base_url,
                okta_props_file.display()
            ));

            if !questions.overwrite_config()? {
                return Err(SetupError::UserCanceled);
            }
        }

        if okta_props_file.exists() {
            let backup = backup_path(okta_props_file, Utc::now());
            fs::copy(okta_props_file, &backup)?;
            progress.info(&format!("Configuration file backed up: {}", backup.display()));
        }

        // Resolve the request (potentially prompting for input) before
        // starting status output, so prompts never race with it
        let organization_request = questions.organization_request()?;
        progress.start("Creating new Okta Organization, this may take a minute:");

        match self
            .organization_creator
            .create_new_org(&self.api_base_url, &organization_request)
            .await
        {
            Ok(new_org) => {
                if let Some(org_url) = &new_org.org_url {
                    progress.info(&format!("OrgUrl: {}", org_url));
                }
                progress.info("An email has been sent to you with a verification code.");
                Ok(new_org)
            }
            Err(SetupError::Rest { .. }) => Err(SetupError::Config(
                "Failed to create Okta Organization. You can register manually by going to \
                 https://developer.okta.com/signup"
                    .to_string(),
            )),
            Err(e) => Err(e),
        }
    }

    async fn verify_okta_org(
        &self,
        identifier: &str,
        questions: &dyn RegistrationQuestions,
        okta_props_file: &Path,
    ) -> Result<OrganizationResponse> {
        let progress = (self.progress_factory)(true);
        progress.info("Check your email");

        // No attempt cap or timeout: the loop trusts the interactive actor
        // to eventually supply a valid code or abort the run externally
        let response = loop {
            let code = questions.verification_code()?;
            match self
                .organization_creator
                .verify_new_org(&self.api_base_url, identifier, &code)
                .await
            {
                Ok(response) => break response,
                Err(e) if e.is_retryable() => {
                    progress.info("Invalid Passcode, try again.");
                }
                Err(e) => return Err(e),
            }
        };

        let org_url = response.org_url.clone().ok_or_else(|| {
            SetupError::Config("Registration response is missing orgUrl".to_string())
        })?;
        let api_token = response.api_token.clone().ok_or_else(|| {
            SetupError::Config("Registration response is missing apiToken".to_string())
        })?;

        // Single point where the verified token reaches durable storage. If
        // this fails the organization still exists remotely; say so before
        // surfacing the error.
        if let Err(e) =
            self.sdk_configuration_service
                .write_okta_yaml(&org_url, &api_token, okta_props_file)
        {
            progress.info(&format!(
                "Your organization was created at {} but its credentials could not be written to {}.",
                org_url,
                okta_props_file.display()
            ));
            return Err(e);
        }

        progress.info("New Okta Account created!");
        progress.info(&format!("Your Okta Domain: {}", org_url));
        if let Some(url) = &response.update_password_url {
            progress.info(&format!("To set your password open this link:\n{}", url));
        }

        Ok(response)
    }

    #[allow(clippy::too_many_arguments)]
    async fn create_oidc_application(
        &self,
        property_source: &mut dyn PropertySource,
        okta_props_file: &Path,
        oidc_app_name: &str,
        org_url: &str,
        group_claim_name: Option<&str>,
        issuer_uri: Option<&str>,
        authorization_server_id: &str,
        interactive: bool,
        app_type: ApplicationType,
        redirect_uris: &[String],
    ) -> Result<()> {
        let existing_client_id = property_source.get(&self.client_id_property_name());

        let progress = (self.progress_factory)(interactive);

        if is_valid_client_id(existing_client_id.as_deref()) {
            progress.info(&format!(
                "Existing OIDC application detected for clientId: {}, skipping new application creation\n",
                existing_client_id.unwrap_or_default()
            ));
            return Ok(());
        }

        progress.start("Configuring a new OIDC Application, almost done:");

        let configuration = self
            .sdk_configuration_service
            .load_unvalidated_configuration(okta_props_file)?;
        let base_url = configuration
            .base_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                SetupError::Config(
                    "No Okta org URL configured; create and verify an organization first"
                        .to_string(),
                )
            })?;
        let token = configuration
            .token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                SetupError::Config(
                    "No Okta API token configured; create and verify an organization first"
                        .to_string(),
                )
            })?;
        let client = ApiClient::new(&base_url, &token)?;

        let credentials = match app_type {
            ApplicationType::Web => {
                self.oidc_app_creator
                    .create_oidc_app(&client, oidc_app_name, redirect_uris)
                    .await?
            }
            ApplicationType::Native => {
                self.oidc_app_creator
                    .create_oidc_native_app(&client, oidc_app_name, redirect_uris)
                    .await?
            }
            ApplicationType::Browser => {
                self.oidc_app_creator
                    .create_oidc_spa_app(&client, oidc_app_name, redirect_uris)
                    .await?
            }
            ApplicationType::Service => {
                self.oidc_app_creator
                    .create_oidc_service_app(&client, oidc_app_name, redirect_uris)
                    .await?
            }
        };

        let issuer = match issuer_uri.filter(|uri| !uri.trim().is_empty()) {
            Some(uri) => uri.to_string(),
            None => format!(
                "{}/oauth2/{}",
                org_url.trim_end_matches('/'),
                authorization_server_id
            ),
        };

        let mut entries = BTreeMap::new();
        entries.insert(self.issuer_uri_property_name(), issuer);
        entries.insert(
            self.client_id_property_name(),
            credentials.client_id.clone(),
        );
        entries.insert(
            self.client_secret_property_name(),
            credentials.client_secret.clone().unwrap_or_default(),
        );
        property_source.merge(entries)?;

        progress.info(&format!(
            "Created OIDC application, client-id: {}",
            credentials.client_id
        ));

        if let Some(claim_name) = group_claim_name.filter(|name| !name.trim().is_empty()) {
            progress.info(&format!(
                "Creating Authorization Server claim '{}':",
                claim_name
            ));
            if let Err(e) = self
                .authorization_server_service
                .create_group_claim(&client, claim_name, authorization_server_id)
                .await
            {
                // The application itself stays provisioned; only the claim is
                // missing. Report the partial result, then surface the error.
                progress.info(&format!(
                    "The OIDC application was created, but the '{}' claim could not be provisioned.",
                    claim_name
                ));
                return Err(e);
            }
        }

        Ok(())
    }
}
