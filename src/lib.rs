//! okta-setup - Okta organization bootstrap for local projects
//!
//! Creates a new Okta organization, verifies it by email challenge, persists
//! the resulting credentials, and optionally provisions an OIDC client
//! application whose identifiers are merged into the project configuration.
//!
//! # Architecture
//!
//! - **setup**: The provisioning orchestrator (state machine, retry loop,
//!   backup/overwrite policy, property-key naming)
//! - **config**: PropertySource abstraction over YAML, Java-properties, and
//!   dotenv files, plus config-type resolution
//! - **api**: REST collaborators (registration, OIDC apps, authz claims)
//! - **model**: Request/response types and the registration question capability
//! - **sdk**: The `~/.okta/okta.yaml` credential store
//! - **progress**: Interactive vs. logging-only status display

// Core modules
pub mod config;
pub mod error;
pub mod model;
pub mod setup;

// Components
pub mod api;
pub mod logging;
pub mod progress;
pub mod sdk;

// Re-exports
pub use error::{Result, SetupError};
