// crates/riskscore-scenario/src/endpoints.rs
// ============================================================================
// Module: Vendor Endpoints
// Description: Path builders for the vendor endpoints the scenario calls.
// Purpose: Keep URL shapes in one place.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Vendor paths, relative to the configured base URL.

use crate::ids::CompanyId;
use crate::ids::EcosystemId;
use crate::ids::FindingId;
use crate::ids::NotificationId;

/// Ecosystem collection path.
pub const ECOSYSTEMS_PATH: &str = "/api/v2/ecosystems";
/// Company collection path.
pub const COMPANIES_PATH: &str = "/api/v2/companies";
/// Notification collection path.
pub const NOTIFICATIONS_PATH: &str = "/api/v2/notifications";
/// Company activity log path.
pub const COMPANY_LOG_PATH: &str = "/api/v2/log/company";

/// Path of a single ecosystem.
#[must_use]
pub fn ecosystem(id: EcosystemId) -> String {
    format!("{ECOSYSTEMS_PATH}/{id}")
}

/// Path of a single company.
#[must_use]
pub fn company(id: CompanyId) -> String {
    format!("{COMPANIES_PATH}/{id}")
}

/// Path of the findings listed under a notification.
#[must_use]
pub fn notification_findings(id: NotificationId) -> String {
    format!("{NOTIFICATIONS_PATH}/{id}/findings")
}

/// Path of a finding detail under its normalized module name.
#[must_use]
pub fn finding_detail(company_id: CompanyId, module: &str, finding_id: FindingId) -> String {
    format!("{COMPANIES_PATH}/{company_id}/findings/{module}/{finding_id}")
}

/// Path used to patch a finding's status.
#[must_use]
pub fn finding(company_id: CompanyId, finding_id: FindingId) -> String {
    format!("{COMPANIES_PATH}/{company_id}/findings/{finding_id}")
}
