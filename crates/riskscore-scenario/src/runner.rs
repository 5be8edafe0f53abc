// crates/riskscore-scenario/src/runner.rs
// ============================================================================
// Module: Scenario Runner
// Description: Executes every scenario step in order and records a report.
// Purpose: Provide the single entry point used by the CLI and system tests.
// Dependencies: riskscore-client, rand, tokio (time), tracing
// ============================================================================

//! ## Overview
//! [`ScenarioRunner::run`] drives [`StepName::ALL`] in order. Each step runs
//! inside its own tracing span and produces one [`StepRecord`]. The first
//! failure stops the run; remaining steps are recorded as skipped.
//! Invariants:
//! - Steps never run out of order and never run twice.
//! - Cleanup after a failure is best-effort: its errors are logged and
//!   recorded, and the original step error is the one returned.

use rand::Rng;
use riskscore_client::AuthenticatedClient;
use riskscore_client::ClientCredentials;
use tokio::time::Instant;
use tracing::Instrument;

use crate::context::ScenarioContext;
use crate::error::ScenarioError;
use crate::report::ScenarioReport;
use crate::report::StepRecord;
use crate::steps::ScenarioSteps;
use crate::steps::StepName;
use crate::steps::StepSettings;

// ============================================================================
// SECTION: Plan
// ============================================================================

/// Default company domain.
pub const DEFAULT_DOMAIN: &str = "example.com";
/// Default scan status the poll waits for.
pub const DEFAULT_EXPECTED_SCAN_STATUS: &str = "Extended Rescan Results Ready";

/// Literal inputs of a scenario run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioPlan {
    /// Domain of the created company.
    pub domain: String,
    /// Company name notifications must carry (case-insensitive).
    pub company_name: String,
    /// Scan status the poll waits for.
    pub expected_scan_status: String,
}

impl ScenarioPlan {
    /// Creates a plan whose expected company name equals the domain.
    #[must_use]
    pub fn new(domain: impl Into<String>) -> Self {
        let domain = domain.into();
        Self {
            company_name: domain.clone(),
            domain,
            expected_scan_status: DEFAULT_EXPECTED_SCAN_STATUS.to_string(),
        }
    }

    /// Overrides the expected company name.
    #[must_use]
    pub fn with_company_name(mut self, company_name: impl Into<String>) -> Self {
        self.company_name = company_name.into();
        self
    }

    /// Overrides the expected scan status.
    #[must_use]
    pub fn with_expected_scan_status(mut self, status: impl Into<String>) -> Self {
        self.expected_scan_status = status.into();
        self
    }
}

impl Default for ScenarioPlan {
    fn default() -> Self {
        Self::new(DEFAULT_DOMAIN)
    }
}

// ============================================================================
// SECTION: Run Result
// ============================================================================

/// Result of a full scenario run.
#[derive(Debug)]
pub struct ScenarioRun {
    /// Context as left by the last executed step and cleanup.
    pub context: ScenarioContext,
    /// Per-step report.
    pub report: ScenarioReport,
    /// Error of the failing step, if any.
    pub error: Option<ScenarioError>,
}

impl ScenarioRun {
    /// Returns true when every step passed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Converts the run into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the failing step's [`ScenarioError`].
    pub fn into_result(self) -> Result<ScenarioReport, ScenarioError> {
        match self.error {
            None => Ok(self.report),
            Some(error) => Err(error),
        }
    }
}

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Runs the full scenario with one client.
pub struct ScenarioRunner {
    /// Step operations.
    steps: ScenarioSteps,
    /// Credentials for the authenticate step.
    credentials: ClientCredentials,
    /// Whether to delete created resources after a failure.
    cleanup_on_failure: bool,
}

impl ScenarioRunner {
    /// Creates a runner; cleanup on failure is enabled.
    #[must_use]
    pub const fn new(
        client: AuthenticatedClient,
        credentials: ClientCredentials,
        settings: StepSettings,
    ) -> Self {
        Self {
            steps: ScenarioSteps::new(client, settings),
            credentials,
            cleanup_on_failure: true,
        }
    }

    /// Enables or disables cleanup after a failed step.
    #[must_use]
    pub const fn with_cleanup_on_failure(mut self, enabled: bool) -> Self {
        self.cleanup_on_failure = enabled;
        self
    }

    /// Returns the step operations.
    #[must_use]
    pub const fn steps(&self) -> &ScenarioSteps {
        &self.steps
    }

    /// Runs every step in order.
    pub async fn run<R>(&mut self, plan: &ScenarioPlan, rng: &mut R) -> ScenarioRun
    where
        R: Rng + ?Sized,
    {
        let mut context = ScenarioContext::new();
        let mut report = ScenarioReport::new();
        let mut error = None;
        tracing::info!(domain = %plan.domain, steps = StepName::ALL.len(), "scenario started");
        for step in StepName::ALL {
            if error.is_some() {
                report.push(StepRecord::skipped(step));
                continue;
            }
            let span = tracing::info_span!("scenario_step", step = step.as_str());
            let started = Instant::now();
            let result = self.run_step(step, plan, &mut context, rng).instrument(span).await;
            let elapsed = started.elapsed();
            match result {
                Ok(()) => {
                    tracing::info!(step = step.as_str(), elapsed_ms = elapsed_ms(elapsed), "step passed");
                    report.push(StepRecord::passed(step, elapsed));
                }
                Err(err) => {
                    tracing::error!(step = step.as_str(), error = %err, "step failed");
                    report.push(StepRecord::failed(step, elapsed, err.to_string()));
                    error = Some(err);
                }
            }
        }
        report.ecosystem_name.clone_from(&context.ecosystem_name);
        if error.is_some() && self.cleanup_on_failure {
            self.cleanup(&mut context, &mut report).await;
        }
        tracing::info!(summary = %report.summary_line(), "scenario finished");
        ScenarioRun {
            context,
            report,
            error,
        }
    }

    /// Dispatches a single step.
    async fn run_step<R>(
        &mut self,
        step: StepName,
        plan: &ScenarioPlan,
        ctx: &mut ScenarioContext,
        rng: &mut R,
    ) -> Result<(), ScenarioError>
    where
        R: Rng + ?Sized,
    {
        let steps = &mut self.steps;
        match step {
            StepName::Authenticate => steps.authenticate(&self.credentials).await.map(|_| ()),
            StepName::CreateEcosystem => steps.create_ecosystem(ctx).await,
            StepName::VerifyEcosystemCreated => steps.verify_ecosystem_created(ctx).await,
            StepName::CreateCompany => steps.create_company(ctx, &plan.domain).await,
            StepName::VerifyScanStatus => {
                steps.verify_scan_status(ctx, &plan.expected_scan_status).await
            }
            StepName::GetNotifications => {
                steps.get_notifications(ctx, &plan.company_name, rng).await
            }
            StepName::VerifyNotificationsMatch => steps.verify_notifications_match(ctx),
            StepName::GetFindings => steps.get_findings(ctx, rng).await,
            StepName::VerifyFindingsNotEmpty => steps.verify_findings_not_empty(ctx),
            StepName::GetFindingDetail => steps.get_finding_detail(ctx).await,
            StepName::VerifyFindingIdMatch => steps.verify_finding_id_match(ctx),
            StepName::UpdateFindingStatus => steps.update_finding_status(ctx).await,
            StepName::VerifyStatusChangeLogged => steps.verify_status_change_logged(ctx).await,
            StepName::DeleteCompany => steps.delete_company(ctx).await,
            StepName::VerifyCompanyRemoved => steps.verify_company_removed(ctx).await,
            StepName::DeleteEcosystem => steps.delete_ecosystem(ctx).await,
            StepName::VerifyEcosystemGone => steps.verify_ecosystem_gone(ctx).await,
        }
    }

    /// Deletes whatever the failed run left behind, company first.
    async fn cleanup(&self, ctx: &mut ScenarioContext, report: &mut ScenarioReport) {
        if ctx.has_live_company() && ctx.ecosystem_id.is_some() {
            let started = Instant::now();
            match self.steps.delete_company(ctx).await {
                Ok(()) => report.push_cleanup(StepRecord::passed(StepName::DeleteCompany, started.elapsed())),
                Err(err) => {
                    tracing::warn!(error = %err, "cleanup: company delete failed");
                    report.push_cleanup(StepRecord::failed(
                        StepName::DeleteCompany,
                        started.elapsed(),
                        err.to_string(),
                    ));
                }
            }
        }
        if ctx.has_live_ecosystem() {
            let started = Instant::now();
            match self.steps.delete_ecosystem(ctx).await {
                Ok(()) => report.push_cleanup(StepRecord::passed(StepName::DeleteEcosystem, started.elapsed())),
                Err(err) => {
                    tracing::warn!(error = %err, "cleanup: ecosystem delete failed");
                    report.push_cleanup(StepRecord::failed(
                        StepName::DeleteEcosystem,
                        started.elapsed(),
                        err.to_string(),
                    ));
                }
            }
        }
    }
}

/// Converts a duration to whole milliseconds for logging.
fn elapsed_ms(elapsed: std::time::Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
