// crates/riskscore-scenario/src/lib.rs
// ============================================================================
// Module: Risk Score Scenario Library
// Description: Ordered end-to-end scenario over the vendor lifecycle API.
// Purpose: Drive ecosystem, company, finding, and audit-log checks in order.
// Dependencies: riskscore-client, rand, serde, tokio, tracing, uuid
// ============================================================================

//! ## Overview
//! The scenario creates an ecosystem and a company, waits for the company scan
//! to finish, inspects notifications and findings, toggles one finding's
//! status, confirms the audit log recorded it, and removes what it created.
//! [`ScenarioSteps`] exposes each step individually; [`ScenarioRunner`] runs
//! them in the only valid order and produces a [`ScenarioReport`].
//! Invariants:
//! - Steps share state only through an explicit [`ScenarioContext`].
//! - Reading context state that no earlier step wrote fails fast.
//! - The scan-status poll is the only retried call, and only on value mismatch.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod context;
pub mod endpoints;
pub mod error;
pub mod ids;
pub mod models;
pub mod poll;
pub mod report;
pub mod rules;
pub mod runner;
pub mod steps;

#[cfg(test)]
mod test_support;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use context::ScenarioContext;
pub use error::ScenarioError;
pub use ids::CompanyId;
pub use ids::EcosystemId;
pub use ids::FindingId;
pub use ids::NotificationId;
pub use poll::PollOutcome;
pub use poll::PollPolicy;
pub use report::ReportStatus;
pub use report::ScenarioReport;
pub use report::StepOutcome;
pub use report::StepRecord;
pub use rules::generate_ecosystem_name;
pub use rules::next_finding_status;
pub use rules::normalize_module_name;
pub use runner::ScenarioPlan;
pub use runner::ScenarioRun;
pub use runner::ScenarioRunner;
pub use steps::ScenarioSteps;
pub use steps::StepName;
pub use steps::StepSettings;
