// crates/riskscore-scenario/src/steps.rs
// ============================================================================
// Module: Scenario Steps
// Description: One operation per scenario step over the vendor API.
// Purpose: Issue each step's request and assert on the response.
// Dependencies: riskscore-client, rand, tracing
// ============================================================================

//! ## Overview
//! [`ScenarioSteps`] owns the authenticated client and exposes one async
//! method per step. Steps read and write a caller-owned [`ScenarioContext`];
//! none of them keeps hidden state between calls.
//! Invariants:
//! - Every request after authentication carries the bearer header.
//! - A non-success status or an undecodable body fails the step with the
//!   response status and body attached.
//! - Only [`ScenarioSteps::verify_scan_status`] repeats a request.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use riskscore_client::ApiRequest;
use riskscore_client::ApiResponse;
use riskscore_client::AuthToken;
use riskscore_client::AuthenticatedClient;
use riskscore_client::ClientCredentials;
use riskscore_client::StatusCode;
use serde::de::DeserializeOwned;

use crate::context::ScenarioContext;
use crate::endpoints;
use crate::error::ScenarioError;
use crate::ids::CompanyId;
use crate::models::CompanyLogEntry;
use crate::models::CompanyRecord;
use crate::models::EcosystemRecord;
use crate::models::FindingDetail;
use crate::models::FindingStatusUpdate;
use crate::models::FindingSummary;
use crate::models::NewCompany;
use crate::models::NewEcosystem;
use crate::models::Notification;
use crate::poll::PollOutcome;
use crate::poll::PollPolicy;
use crate::poll::poll_until;
use crate::rules::DEFAULT_ECOSYSTEM_PREFIX;
use crate::rules::DEFAULT_PAGE_SIZE;
use crate::rules::DEFAULT_STATUS_COMMENT;
use crate::rules::ECOSYSTEM_NOT_FOUND_MESSAGE;
use crate::rules::FINDINGS_NOTIFICATION_TYPE;
use crate::rules::LOG_DATE_RANGE_LAST_WEEK;
use crate::rules::generate_ecosystem_name;
use crate::rules::is_status_change_entry;
use crate::rules::next_finding_status;
use crate::rules::normalize_module_name;

// ============================================================================
// SECTION: Step Names
// ============================================================================

/// Scenario steps in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepName {
    /// Exchange client credentials for a token.
    Authenticate,
    /// Create a uniquely named ecosystem.
    CreateEcosystem,
    /// Read the ecosystem back by id.
    VerifyEcosystemCreated,
    /// Create a company inside the ecosystem.
    CreateCompany,
    /// Poll the company until the expected scan status appears.
    VerifyScanStatus,
    /// List findings notifications for the company and pick one.
    GetNotifications,
    /// Confirm a notification was selected from a matching set.
    VerifyNotificationsMatch,
    /// List the findings of the selected notification and pick one.
    GetFindings,
    /// Confirm a finding was selected.
    VerifyFindingsNotEmpty,
    /// Fetch the selected finding through its module endpoint.
    GetFindingDetail,
    /// Compare the detail id with the selected id.
    VerifyFindingIdMatch,
    /// Toggle the selected finding's status.
    UpdateFindingStatus,
    /// Find the audit-log entry for the status change.
    VerifyStatusChangeLogged,
    /// Delete the company.
    DeleteCompany,
    /// Confirm the company left the ecosystem.
    VerifyCompanyRemoved,
    /// Delete the ecosystem.
    DeleteEcosystem,
    /// Confirm the ecosystem is gone.
    VerifyEcosystemGone,
}

impl StepName {
    /// Every step in the only valid execution order.
    pub const ALL: [Self; 17] = [
        Self::Authenticate,
        Self::CreateEcosystem,
        Self::VerifyEcosystemCreated,
        Self::CreateCompany,
        Self::VerifyScanStatus,
        Self::GetNotifications,
        Self::VerifyNotificationsMatch,
        Self::GetFindings,
        Self::VerifyFindingsNotEmpty,
        Self::GetFindingDetail,
        Self::VerifyFindingIdMatch,
        Self::UpdateFindingStatus,
        Self::VerifyStatusChangeLogged,
        Self::DeleteCompany,
        Self::VerifyCompanyRemoved,
        Self::DeleteEcosystem,
        Self::VerifyEcosystemGone,
    ];

    /// Returns the scenario phrase for the step.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authenticate => "Authenticate to the risk score API",
            Self::CreateEcosystem => "Create a new ecosystem",
            Self::VerifyEcosystemCreated => "Verified that ecosystem is created",
            Self::CreateCompany => "Create a new company with domain",
            Self::VerifyScanStatus => "Verified that scan status",
            Self::GetNotifications => "Get notifications for company",
            Self::VerifyNotificationsMatch => {
                "All notifications should match the company id and name"
            }
            Self::GetFindings => "Get findings for a random notification",
            Self::VerifyFindingsNotEmpty => "Findings should not be empty",
            Self::GetFindingDetail => "Get finding detail for selected finding",
            Self::VerifyFindingIdMatch => "Verify that finding id is match with response",
            Self::UpdateFindingStatus => "Update selected finding status",
            Self::VerifyStatusChangeLogged => "Verify that finding status update action is logged",
            Self::DeleteCompany => "Delete the created company",
            Self::VerifyCompanyRemoved => "Verify that the company is deleted from created ecosystem",
            Self::DeleteEcosystem => "Delete the created ecosystem",
            Self::VerifyEcosystemGone => "The ecosystem should no longer exist",
        }
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Tunables shared by the steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSettings {
    /// Prefix of generated ecosystem names.
    pub ecosystem_prefix: String,
    /// Comment attached to finding status updates.
    pub status_comment: String,
    /// Scan-status poll cadence.
    pub poll: PollPolicy,
    /// Page size for notification and finding listings.
    pub page_size: u32,
}

impl Default for StepSettings {
    fn default() -> Self {
        Self {
            ecosystem_prefix: DEFAULT_ECOSYSTEM_PREFIX.to_string(),
            status_comment: DEFAULT_STATUS_COMMENT.to_string(),
            poll: PollPolicy::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

// ============================================================================
// SECTION: Steps
// ============================================================================

/// Step operations bound to one authenticated client.
pub struct ScenarioSteps {
    /// Vendor client; authenticated by [`ScenarioSteps::authenticate`].
    client: AuthenticatedClient,
    /// Step tunables.
    settings: StepSettings,
}

impl ScenarioSteps {
    /// Creates steps over an existing client.
    #[must_use]
    pub const fn new(client: AuthenticatedClient, settings: StepSettings) -> Self {
        Self {
            client,
            settings,
        }
    }

    /// Returns the step settings.
    #[must_use]
    pub const fn settings(&self) -> &StepSettings {
        &self.settings
    }

    /// Returns the underlying client.
    #[must_use]
    pub const fn client(&self) -> &AuthenticatedClient {
        &self.client
    }

    /// Authenticates the client.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Client`] when the token exchange fails.
    pub async fn authenticate(
        &mut self,
        credentials: &ClientCredentials,
    ) -> Result<&AuthToken, ScenarioError> {
        Ok(self.client.authenticate(credentials).await?)
    }

    /// Creates an ecosystem with a generated unique name.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError`] when the request fails or returns no id.
    pub async fn create_ecosystem(&self, ctx: &mut ScenarioContext) -> Result<(), ScenarioError> {
        let step = StepName::CreateEcosystem;
        let name = generate_ecosystem_name(&self.settings.ecosystem_prefix);
        let request =
            ApiRequest::post(endpoints::ECOSYSTEMS_PATH).json(&NewEcosystem { name: name.clone() })?;
        let response = self.send(step, request).await?;
        expect_success(step, &response, "ecosystem creation failed")?;
        let record: EcosystemRecord = decode(step, &response)?;
        tracing::info!(ecosystem_id = %record.ecosystem_id, ecosystem_name = %name, "ecosystem created");
        ctx.ecosystem_id = Some(record.ecosystem_id);
        ctx.ecosystem_name = Some(name);
        ctx.ecosystem_deleted = false;
        Ok(())
    }

    /// Reads the created ecosystem back and compares ids.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError`] when retrieval fails or the id differs.
    pub async fn verify_ecosystem_created(
        &self,
        ctx: &ScenarioContext,
    ) -> Result<(), ScenarioError> {
        let step = StepName::VerifyEcosystemCreated;
        let ecosystem_id = ctx.require_ecosystem_id()?;
        let response = self.send(step, ApiRequest::get(endpoints::ecosystem(ecosystem_id))).await?;
        expect_success(step, &response, "ecosystem retrieval failed")?;
        let record: EcosystemRecord = decode(step, &response)?;
        if record.ecosystem_id != ecosystem_id {
            return Err(ScenarioError::response(
                step.as_str(),
                format!(
                    "returned ecosystem id {} does not match created id {ecosystem_id}",
                    record.ecosystem_id
                ),
                &response,
            ));
        }
        Ok(())
    }

    /// Creates a continuous-annual company for `domain` in the ecosystem.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError`] when creation fails or the stored domain
    /// differs from the requested one.
    pub async fn create_company(
        &self,
        ctx: &mut ScenarioContext,
        domain: &str,
    ) -> Result<(), ScenarioError> {
        let step = StepName::CreateCompany;
        let ecosystem_id = ctx.require_ecosystem_id()?;
        let body = NewCompany::continuous_annual(domain, ecosystem_id);
        let request = ApiRequest::post(endpoints::COMPANIES_PATH).json(&body)?;
        let response = self.send(step, request).await?;
        expect_success(step, &response, "company creation failed")?;
        let record: CompanyRecord = decode(step, &response)?;
        ctx.company_id = Some(record.company_id);
        ctx.company_domain = Some(domain.to_string());
        ctx.company_deleted = false;
        tracing::info!(company_id = %record.company_id, domain, "company created");
        if record.main_domain_value.as_deref() != Some(domain) {
            return Err(ScenarioError::response(
                step.as_str(),
                format!(
                    "returned domain `{}` does not match requested domain `{domain}`",
                    record.main_domain_value.as_deref().unwrap_or("<missing>")
                ),
                &response,
            ));
        }
        Ok(())
    }

    /// Polls the company until its scan status equals `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::PollExhausted`] when the status never matches,
    /// or the first request failure without retrying it.
    pub async fn verify_scan_status(
        &self,
        ctx: &mut ScenarioContext,
        expected: &str,
    ) -> Result<(), ScenarioError> {
        let company_id = ctx.require_company_id()?;
        let outcome = poll_until(
            self.settings.poll,
            |attempt| self.fetch_scan_status(company_id, attempt),
            |status: &Option<String>| status.as_deref() == Some(expected),
        )
        .await?;
        match outcome {
            PollOutcome::Satisfied {
                value, ..
            } => {
                ctx.scan_status = value;
                Ok(())
            }
            PollOutcome::Exhausted {
                last,
                attempts,
            } => {
                ctx.scan_status.clone_from(&last);
                Err(ScenarioError::PollExhausted {
                    expected: expected.to_string(),
                    last_seen: last,
                    attempts,
                })
            }
        }
    }

    /// Lists findings notifications for the company and picks one at random.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError`] when the listing fails, no findings
    /// notification exists, or any entry belongs to another company.
    pub async fn get_notifications<R>(
        &self,
        ctx: &mut ScenarioContext,
        expected_company_name: &str,
        rng: &mut R,
    ) -> Result<(), ScenarioError>
    where
        R: Rng + ?Sized,
    {
        let step = StepName::GetNotifications;
        let company_id = ctx.require_company_id()?;
        let request = ApiRequest::get(endpoints::NOTIFICATIONS_PATH)
            .query("page_number", 1)
            .query("page_size", self.settings.page_size)
            .query("companyId", company_id);
        let response = self.send(step, request).await?;
        expect_success(step, &response, "notification listing failed")?;
        let notifications: Vec<Notification> = decode(step, &response)?;
        if notifications.is_empty() {
            return Err(ScenarioError::response(
                step.as_str(),
                "no notifications returned",
                &response,
            ));
        }
        let findings: Vec<&Notification> = notifications
            .iter()
            .filter(|notification| {
                notification.notification_type.as_deref() == Some(FINDINGS_NOTIFICATION_TYPE)
            })
            .collect();
        if findings.is_empty() {
            return Err(ScenarioError::response(
                step.as_str(),
                format!("no `{FINDINGS_NOTIFICATION_TYPE}` notifications found"),
                &response,
            ));
        }
        for notification in &findings {
            check_notification_owner(step, notification, company_id, expected_company_name)?;
        }
        let picked = findings.choose(rng).ok_or_else(|| {
            ScenarioError::assertion(step.as_str(), "no notification available to select")
        })?;
        tracing::info!(
            notification_id = %picked.notification_id,
            candidates = findings.len(),
            "notification selected"
        );
        ctx.notification_id = Some(picked.notification_id);
        Ok(())
    }

    /// Confirms a notification was selected by [`Self::get_notifications`].
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::MissingState`] when none was selected.
    pub fn verify_notifications_match(&self, ctx: &ScenarioContext) -> Result<(), ScenarioError> {
        ctx.require_company_id()?;
        ctx.require_notification_id().map(|_| ())
    }

    /// Lists the selected notification's findings and picks one at random.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError`] when the listing fails or is empty.
    pub async fn get_findings<R>(
        &self,
        ctx: &mut ScenarioContext,
        rng: &mut R,
    ) -> Result<(), ScenarioError>
    where
        R: Rng + ?Sized,
    {
        let step = StepName::GetFindings;
        let notification_id = ctx.require_notification_id()?;
        let request = ApiRequest::get(endpoints::notification_findings(notification_id))
            .query("page_number", 1)
            .query("page_size", self.settings.page_size);
        let response = self.send(step, request).await?;
        expect_success(step, &response, "finding listing failed")?;
        let findings: Vec<FindingSummary> = decode(step, &response)?;
        let picked = findings.choose(rng).ok_or_else(|| {
            ScenarioError::response(step.as_str(), "no findings returned", &response)
        })?;
        tracing::info!(
            finding_id = %picked.finding_id,
            module = %picked.module,
            candidates = findings.len(),
            "finding selected"
        );
        ctx.finding_id = Some(picked.finding_id);
        ctx.module_name = Some(picked.module.clone());
        Ok(())
    }

    /// Confirms a finding was selected by [`Self::get_findings`].
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::MissingState`] when none was selected.
    pub fn verify_findings_not_empty(&self, ctx: &ScenarioContext) -> Result<(), ScenarioError> {
        ctx.require_finding_id()?;
        ctx.require_module_name().map(|_| ())
    }

    /// Fetches the selected finding through its module endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError`] when the request fails or returns no id.
    pub async fn get_finding_detail(&self, ctx: &mut ScenarioContext) -> Result<(), ScenarioError> {
        let step = StepName::GetFindingDetail;
        let (response, detail) = self.fetch_finding_detail(step, ctx).await?;
        tracing::debug!(status = response.status().as_u16(), "finding detail fetched");
        ctx.detail_finding_id = Some(detail.finding_id);
        Ok(())
    }

    /// Compares the detail id with the selected finding id.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Assertion`] when the ids differ.
    pub fn verify_finding_id_match(&self, ctx: &ScenarioContext) -> Result<(), ScenarioError> {
        let selected = ctx.require_finding_id()?;
        let returned = ctx.require_detail_finding_id()?;
        if selected == returned {
            Ok(())
        } else {
            Err(ScenarioError::assertion(
                StepName::VerifyFindingIdMatch.as_str(),
                format!("finding detail returned id {returned}, expected {selected}"),
            ))
        }
    }

    /// Moves the selected finding to its next status.
    ///
    /// Remediated findings become `Acknowledged`; all others `Remediated`.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError`] when the detail read or the patch fails.
    pub async fn update_finding_status(
        &self,
        ctx: &mut ScenarioContext,
    ) -> Result<(), ScenarioError> {
        let step = StepName::UpdateFindingStatus;
        let company_id = ctx.require_company_id()?;
        let finding_id = ctx.require_finding_id()?;
        let (detail_response, detail) = self.fetch_finding_detail(step, ctx).await?;
        let current = detail.status.ok_or_else(|| {
            ScenarioError::response(step.as_str(), "finding detail has no Status", &detail_response)
        })?;
        let target = next_finding_status(&current);
        tracing::info!(%finding_id, current_status = %current, target_status = target, "updating finding status");
        let body = FindingStatusUpdate {
            status: target.to_string(),
            comment: self.settings.status_comment.clone(),
        };
        let request = ApiRequest::patch(endpoints::finding(company_id, finding_id)).json(&body)?;
        let response = self.send(step, request).await?;
        expect_success(step, &response, &format!("status update to `{target}` failed"))?;
        ctx.applied_status = Some(target.to_string());
        Ok(())
    }

    /// Searches last week's company log for the status change entry.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError`] when the log is empty or has no matching entry.
    pub async fn verify_status_change_logged(
        &self,
        ctx: &ScenarioContext,
    ) -> Result<(), ScenarioError> {
        let step = StepName::VerifyStatusChangeLogged;
        let company_id = ctx.require_company_id()?;
        let finding_id = ctx.require_finding_id()?;
        let request = ApiRequest::get(endpoints::COMPANY_LOG_PATH)
            .query("id", company_id)
            .query("date_range", LOG_DATE_RANGE_LAST_WEEK)
            .query("query", finding_id);
        let response = self.send(step, request).await?;
        expect_success(step, &response, "company log retrieval failed")?;
        let entries: Vec<CompanyLogEntry> = decode(step, &response)?;
        if entries.is_empty() {
            return Err(ScenarioError::response(
                step.as_str(),
                "no logs found for the company",
                &response,
            ));
        }
        if entries.iter().any(|entry| is_status_change_entry(entry, finding_id)) {
            tracing::info!(%finding_id, "status change log entry found");
            Ok(())
        } else {
            Err(ScenarioError::response(
                step.as_str(),
                format!("no matching log entry found for finding {finding_id}"),
                &response,
            ))
        }
    }

    /// Deletes the company from the ecosystem.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError`] when the delete request fails.
    pub async fn delete_company(&self, ctx: &mut ScenarioContext) -> Result<(), ScenarioError> {
        let step = StepName::DeleteCompany;
        let company_id = ctx.require_company_id()?;
        let ecosystem_id = ctx.require_ecosystem_id()?;
        let request =
            ApiRequest::delete(endpoints::company(company_id)).query("EcosystemId", ecosystem_id);
        let response = self.send(step, request).await?;
        expect_success(step, &response, "company delete request failed")?;
        ctx.company_deleted = true;
        tracing::info!(%company_id, %ecosystem_id, "company deleted");
        Ok(())
    }

    /// Confirms the company no longer lists the ecosystem.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError`] when retrieval fails or the link remains.
    pub async fn verify_company_removed(&self, ctx: &ScenarioContext) -> Result<(), ScenarioError> {
        let step = StepName::VerifyCompanyRemoved;
        let company_id = ctx.require_company_id()?;
        let ecosystem_id = ctx.require_ecosystem_id()?;
        let response = self.send(step, ApiRequest::get(endpoints::company(company_id))).await?;
        expect_success(step, &response, "failed to get company details")?;
        let record: CompanyRecord = decode(step, &response)?;
        let Some(memberships) = record.ecosystems else {
            return Err(ScenarioError::response(
                step.as_str(),
                "company record has no Ecosystems array",
                &response,
            ));
        };
        let still_linked =
            memberships.iter().any(|membership| membership.ecosystem_id == ecosystem_id);
        if still_linked {
            return Err(ScenarioError::response(
                step.as_str(),
                format!("company is still linked to ecosystem {ecosystem_id}"),
                &response,
            ));
        }
        Ok(())
    }

    /// Deletes the ecosystem.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError`] when the delete request fails.
    pub async fn delete_ecosystem(&self, ctx: &mut ScenarioContext) -> Result<(), ScenarioError> {
        let step = StepName::DeleteEcosystem;
        let ecosystem_id = ctx.require_ecosystem_id()?;
        let response = self.send(step, ApiRequest::delete(endpoints::ecosystem(ecosystem_id))).await?;
        expect_success(step, &response, "ecosystem delete request failed")?;
        ctx.ecosystem_deleted = true;
        tracing::info!(%ecosystem_id, "ecosystem deleted");
        Ok(())
    }

    /// Confirms the ecosystem lookup now answers 404 "Ecosystem not found".
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Assertion`] when the ecosystem is still served.
    pub async fn verify_ecosystem_gone(&self, ctx: &ScenarioContext) -> Result<(), ScenarioError> {
        let step = StepName::VerifyEcosystemGone;
        let ecosystem_id = ctx.require_ecosystem_id()?;
        let response = self.send(step, ApiRequest::get(endpoints::ecosystem(ecosystem_id))).await?;
        if response.status() != StatusCode::NOT_FOUND {
            return Err(ScenarioError::response(
                step.as_str(),
                "expected http status 404 for a deleted ecosystem",
                &response,
            ));
        }
        if !response.body().contains(ECOSYSTEM_NOT_FOUND_MESSAGE) {
            return Err(ScenarioError::response(
                step.as_str(),
                format!("404 body does not mention `{ECOSYSTEM_NOT_FOUND_MESSAGE}`"),
                &response,
            ));
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Internal requests
    // ------------------------------------------------------------------------

    /// Sends an authorized request on behalf of `step`.
    async fn send(&self, step: StepName, request: ApiRequest) -> Result<ApiResponse, ScenarioError> {
        tracing::debug!(
            step = step.as_str(),
            method = %request.method(),
            path = request.path(),
            "sending vendor request"
        );
        let response = self.client.send_authorized(request).await?;
        tracing::debug!(
            step = step.as_str(),
            status = response.status().as_u16(),
            "vendor response received"
        );
        Ok(response)
    }

    /// Reads the company's current scan status.
    async fn fetch_scan_status(
        &self,
        company_id: CompanyId,
        attempt: u32,
    ) -> Result<Option<String>, ScenarioError> {
        let step = StepName::VerifyScanStatus;
        let response = self.send(step, ApiRequest::get(endpoints::company(company_id))).await?;
        expect_success(step, &response, "company retrieval failed while polling scan status")?;
        let record: CompanyRecord = decode(step, &response)?;
        tracing::info!(
            attempt,
            scan_status = record.scan_status.as_deref().unwrap_or("<none>"),
            "scan status polled"
        );
        Ok(record.scan_status)
    }

    /// Fetches the selected finding's detail under its normalized module.
    async fn fetch_finding_detail(
        &self,
        step: StepName,
        ctx: &ScenarioContext,
    ) -> Result<(ApiResponse, FindingDetail), ScenarioError> {
        let company_id = ctx.require_company_id()?;
        let finding_id = ctx.require_finding_id()?;
        let module = normalize_module_name(ctx.require_module_name()?);
        tracing::debug!(module = %module, "normalized finding module");
        let path = endpoints::finding_detail(company_id, &module, finding_id);
        let response = self.send(step, ApiRequest::get(path)).await?;
        expect_success(step, &response, "finding detail retrieval failed")?;
        let detail: FindingDetail = decode(step, &response)?;
        Ok((response, detail))
    }
}

// ============================================================================
// SECTION: Assertions
// ============================================================================

/// Fails the step unless the response is 2xx.
fn expect_success(
    step: StepName,
    response: &ApiResponse,
    message: &str,
) -> Result<(), ScenarioError> {
    if response.is_success() {
        Ok(())
    } else {
        Err(ScenarioError::response(step.as_str(), message, response))
    }
}

/// Decodes the response body, reporting failures as step assertions.
fn decode<T: DeserializeOwned>(step: StepName, response: &ApiResponse) -> Result<T, ScenarioError> {
    response
        .json()
        .map_err(|err| ScenarioError::response(step.as_str(), err.to_string(), response))
}

/// Checks that a notification belongs to the created company.
fn check_notification_owner(
    step: StepName,
    notification: &Notification,
    company_id: CompanyId,
    expected_company_name: &str,
) -> Result<(), ScenarioError> {
    if notification.company_id != Some(company_id) {
        return Err(ScenarioError::assertion(
            step.as_str(),
            format!(
                "notification {} belongs to company {}, expected {company_id}",
                notification.notification_id,
                notification.company_id.map_or_else(|| "<missing>".to_string(), |id| id.to_string())
            ),
        ));
    }
    let name = notification.company.as_deref().unwrap_or_default();
    if name.to_lowercase() != expected_company_name.to_lowercase() {
        return Err(ScenarioError::assertion(
            step.as_str(),
            format!(
                "notification {} names company `{name}`, expected `{expected_company_name}`",
                notification.notification_id
            ),
        ));
    }
    Ok(())
}
