//! Registration question capability
//!
//! Some answers (the verification code in particular) cannot be collected up
//! front, so this is a boundary capability rather than a passive struct: the
//! orchestrator asks for each answer at the point it is needed.

use super::OrganizationRequest;
use crate::{Result, SetupError};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Answers needed while registering and verifying an organization.
pub trait RegistrationQuestions: Send + Sync {
    /// Whether an existing configuration may be overwritten.
    fn overwrite_config(&self) -> Result<bool>;

    /// Resolve the organization request, prompting for missing fields.
    fn organization_request(&self) -> Result<OrganizationRequest>;

    /// Supply the next one-time email verification code.
    fn verification_code(&self) -> Result<String>;
}

/// Prompt-backed answers for interactive runs.
///
/// Fields supplied up front (e.g. from CLI flags) are used as-is; only the
/// missing ones are prompted for.
#[derive(Default)]
pub struct InteractiveQuestions {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub organization: Option<String>,
}

impl InteractiveQuestions {
    fn answer(preset: &Option<String>, prompt: &str) -> Result<String> {
        if let Some(value) = preset {
            return Ok(value.clone());
        }
        Input::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .interact_text()
            .map_err(prompt_error)
    }
}

impl RegistrationQuestions for InteractiveQuestions {
    fn overwrite_config(&self) -> Result<bool> {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Overwrite configuration file?")
            .default(false)
            .interact()
            .map_err(prompt_error)
    }

    fn organization_request(&self) -> Result<OrganizationRequest> {
        Ok(OrganizationRequest {
            first_name: Self::answer(&self.first_name, "First name")?,
            last_name: Self::answer(&self.last_name, "Last name")?,
            email: Self::answer(&self.email, "Email address")?,
            organization: Self::answer(&self.organization, "Company")?,
        })
    }

    fn verification_code(&self) -> Result<String> {
        Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Verification code")
            .interact_text()
            .map_err(prompt_error)
    }
}

fn prompt_error(e: dialoguer::Error) -> SetupError {
    SetupError::Other(format!("Failed to read input: {}", e))
}

/// Scripted answers for non-interactive runs and tests.
pub struct PredefinedQuestions {
    pub overwrite: bool,
    pub request: OrganizationRequest,
    codes: Mutex<VecDeque<String>>,
}

impl PredefinedQuestions {
    pub fn new(
        overwrite: bool,
        request: OrganizationRequest,
        codes: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            overwrite,
            request,
            codes: Mutex::new(codes.into_iter().collect()),
        }
    }
}

impl RegistrationQuestions for PredefinedQuestions {
    fn overwrite_config(&self) -> Result<bool> {
        Ok(self.overwrite)
    }

    fn organization_request(&self) -> Result<OrganizationRequest> {
        Ok(self.request.clone())
    }

    fn verification_code(&self) -> Result<String> {
        self.codes
            .lock()
            .expect("verification code queue poisoned")
            .pop_front()
            .ok_or_else(|| SetupError::Other("No more scripted verification codes".to_string()))
    }
}
