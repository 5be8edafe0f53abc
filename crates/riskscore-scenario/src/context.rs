// crates/riskscore-scenario/src/context.rs
// ============================================================================
// Module: Scenario Context
// Description: Mutable state threaded through the scenario steps.
// Purpose: Make step-to-step data flow explicit and checked.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Each step writes the identifiers later steps need. Fields start unset; a
//! step that reads an unset field fails with [`ScenarioError::MissingState`]
//! instead of sending a request with a placeholder id.

use crate::error::ScenarioError;
use crate::ids::CompanyId;
use crate::ids::EcosystemId;
use crate::ids::FindingId;
use crate::ids::NotificationId;

/// State shared by the steps of a single scenario run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioContext {
    /// Ecosystem created by the create-ecosystem step.
    pub ecosystem_id: Option<EcosystemId>,
    /// Generated name of that ecosystem.
    pub ecosystem_name: Option<String>,
    /// Company created by the create-company step.
    pub company_id: Option<CompanyId>,
    /// Domain requested for that company.
    pub company_domain: Option<String>,
    /// Last scan status observed by the poll.
    pub scan_status: Option<String>,
    /// Notification picked from the findings notifications.
    pub notification_id: Option<NotificationId>,
    /// Finding picked from that notification.
    pub finding_id: Option<FindingId>,
    /// Module display name of the picked finding.
    pub module_name: Option<String>,
    /// Finding id returned by the detail endpoint.
    pub detail_finding_id: Option<FindingId>,
    /// Status written by the update step.
    pub applied_status: Option<String>,
    /// Whether the company has been deleted.
    pub company_deleted: bool,
    /// Whether the ecosystem has been deleted.
    pub ecosystem_deleted: bool,
}

impl ScenarioContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the created ecosystem id.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::MissingState`] before the ecosystem exists.
    pub fn require_ecosystem_id(&self) -> Result<EcosystemId, ScenarioError> {
        self.ecosystem_id.ok_or(ScenarioError::MissingState { field: "ecosystem_id" })
    }

    /// Returns the created company id.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::MissingState`] before the company exists.
    pub fn require_company_id(&self) -> Result<CompanyId, ScenarioError> {
        self.company_id.ok_or(ScenarioError::MissingState { field: "company_id" })
    }

    /// Returns the selected notification id.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::MissingState`] before a notification was picked.
    pub fn require_notification_id(&self) -> Result<NotificationId, ScenarioError> {
        self.notification_id.ok_or(ScenarioError::MissingState { field: "notification_id" })
    }

    /// Returns the selected finding id.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::MissingState`] before a finding was picked.
    pub fn require_finding_id(&self) -> Result<FindingId, ScenarioError> {
        self.finding_id.ok_or(ScenarioError::MissingState { field: "finding_id" })
    }

    /// Returns the module name of the selected finding.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::MissingState`] before a finding was picked.
    pub fn require_module_name(&self) -> Result<&str, ScenarioError> {
        self.module_name.as_deref().ok_or(ScenarioError::MissingState { field: "module_name" })
    }

    /// Returns the finding id reported by the detail endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::MissingState`] before the detail was fetched.
    pub fn require_detail_finding_id(&self) -> Result<FindingId, ScenarioError> {
        self.detail_finding_id.ok_or(ScenarioError::MissingState { field: "detail_finding_id" })
    }

    /// Returns true when the company exists and has not been deleted.
    #[must_use]
    pub const fn has_live_company(&self) -> bool {
        self.company_id.is_some() && !self.company_deleted
    }

    /// Returns true when the ecosystem exists and has not been deleted.
    #[must_use]
    pub const fn has_live_ecosystem(&self) -> bool {
        self.ecosystem_id.is_some() && !self.ecosystem_deleted
    }
}
