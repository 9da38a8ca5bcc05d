//! Remote API collaborators
//!
//! Thin REST adapters behind narrow traits: the registration service that
//! creates and verifies organizations, and the org-scoped services that
//! provision OIDC applications and authorization-server claims. The
//! orchestrator depends only on the traits, so all of these are swap-in-able.

pub mod authz;
pub mod client;
pub mod oidc;
pub mod org;

pub use authz::{AuthorizationServerService, RestAuthorizationServerService};
pub use client::ApiClient;
pub use oidc::{ClientCredentials, OidcAppCreator, RestOidcAppCreator};
pub use org::{OrganizationCreator, RestOrganizationCreator};
