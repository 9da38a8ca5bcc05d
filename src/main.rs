//! okta-setup - Okta organization bootstrap
//!
//! Main entry point for the okta-setup CLI.

use clap::{Parser, Subcommand};
use okta_setup::config::find_application_config;
use okta_setup::model::InteractiveQuestions;
use okta_setup::sdk::{
    default_okta_config_path, DefaultSdkConfigurationService, SdkConfigurationService,
};
use okta_setup::setup::{ApplicationType, DefaultSetupService, SetupService};
use okta_setup::{Result, SetupError};
use std::path::PathBuf;
use std::process;

/// okta-setup - register an Okta organization and wire a project to it
#[derive(Parser, Debug)]
#[command(name = "okta-setup")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the Okta credential file (default: ~/.okta/okta.yaml)
    #[arg(long)]
    okta_config: Option<PathBuf>,

    /// Disable interactive prompts and progress display
    #[arg(long)]
    batch: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register a new Okta organization and store its credentials
    Register {
        /// First name (prompted for when omitted)
        #[arg(long)]
        first_name: Option<String>,

        /// Last name (prompted for when omitted)
        #[arg(long)]
        last_name: Option<String>,

        /// Email address the verification code is sent to
        #[arg(long)]
        email: Option<String>,

        /// Company / organization name
        #[arg(long)]
        company: Option<String>,
    },

    /// Provision an OIDC application and merge its settings into the project config
    App {
        /// Project root containing the application configuration
        #[arg(long, default_value = ".")]
        project_root: PathBuf,

        /// Explicit configuration file (.yml, .properties, or .env)
        #[arg(long)]
        config_file: Option<PathBuf>,

        /// Application label
        #[arg(long, default_value = "My OIDC App")]
        name: String,

        /// Login redirect URIs (repeatable)
        #[arg(long = "redirect-uri")]
        redirect_uris: Vec<String>,

        /// Application type: web, native, browser, or service
        #[arg(long = "type", default_value = "web")]
        app_type: String,

        /// Create a group claim with this name on the authorization server
        #[arg(long)]
        group_claim: Option<String>,

        /// Issuer URI override (derived from the org URL when omitted)
        #[arg(long)]
        issuer: Option<String>,

        /// Authorization server id used for the derived issuer
        #[arg(long, default_value = "default")]
        authorization_server_id: String,

        /// Write Spring Security property names keyed by this registration id
        #[arg(long)]
        spring_property_key: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = okta_setup::logging::init() {
        eprintln!("Warning: {}", e);
    }

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let okta_config = cli
        .okta_config
        .clone()
        .unwrap_or_else(default_okta_config_path);
    let interactive = !cli.batch;

    match cli.command {
        Commands::Register {
            first_name,
            last_name,
            email,
            company,
        } => {
            let service = DefaultSetupService::new(None)?;
            let questions = InteractiveQuestions {
                first_name,
                last_name,
                email,
                organization: company,
            };

            let response = service
                .create_okta_org(&questions, &okta_config, interactive)
                .await?;
            service
                .verify_okta_org(&response.identifier, &questions, &okta_config)
                .await?;
            Ok(())
        }

        Commands::App {
            project_root,
            config_file,
            name,
            redirect_uris,
            app_type,
            group_claim,
            issuer,
            authorization_server_id,
            spring_property_key,
        } => {
            let app_type: ApplicationType = app_type.parse()?;
            let service = DefaultSetupService::new(spring_property_key)?;

            // The verified org this app is provisioned against
            let configuration =
                DefaultSdkConfigurationService.load_unvalidated_configuration(&okta_config)?;
            let org_url = configuration
                .base_url
                .filter(|url| !url.trim().is_empty())
                .ok_or_else(|| {
                    SetupError::Config(format!(
                        "No Okta org URL found in {}; run `okta-setup register` first",
                        okta_config.display()
                    ))
                })?;

            let mut property_source =
                find_application_config(&project_root, config_file.as_deref())?;

            service
                .create_oidc_application(
                    property_source.as_mut(),
                    &okta_config,
                    &name,
                    &org_url,
                    group_claim.as_deref(),
                    issuer.as_deref(),
                    &authorization_server_id,
                    interactive,
                    app_type,
                    &redirect_uris,
                )
                .await
        }
    }
}
