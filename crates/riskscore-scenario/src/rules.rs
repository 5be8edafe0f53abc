// crates/riskscore-scenario/src/rules.rs
// ============================================================================
// Module: Scenario Rules
// Description: Pure decision rules and vendor literals used by the steps.
// Purpose: Keep naming, normalization, status toggling, and log matching testable.
// Dependencies: uuid
// ============================================================================

//! ## Overview
//! Everything in this module is deterministic except
//! [`generate_ecosystem_name`], which draws a v4 UUID so that parallel runs
//! never collide on ecosystem names.
//!
//! The audit-log match requires the finding id to appear verbatim inside a
//! free-text description. That is the vendor's only link between the entry
//! and the finding, so a change in description wording breaks the check.

use uuid::Uuid;

use crate::ids::FindingId;
use crate::models::CompanyLogEntry;

// ============================================================================
// SECTION: Vendor Literals
// ============================================================================

/// License type requested for new companies.
pub const LICENSE_TYPE_CONTINUOUS_ANNUAL: &str = "ContinuousAnnual";
/// Notification type that carries findings.
pub const FINDINGS_NOTIFICATION_TYPE: &str = "findings";
/// Finding status set when the finding is not already remediated.
pub const STATUS_REMEDIATED: &str = "Remediated";
/// Finding status set when the finding is already remediated.
pub const STATUS_ACKNOWLEDGED: &str = "Acknowledged";
/// Log type recorded for finding status changes.
pub const LOG_TYPE_FINDING_STATUS_CHANGED: &str = "Finding Status Changed";
/// Insert user recorded for changes made through the API.
pub const LOG_INSERT_USER_API: &str = "API";
/// Date range filter used when searching the company log.
pub const LOG_DATE_RANGE_LAST_WEEK: &str = "LastWeek";
/// Body fragment returned when an ecosystem no longer exists.
pub const ECOSYSTEM_NOT_FOUND_MESSAGE: &str = "Ecosystem not found";

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default prefix of generated ecosystem names.
pub const DEFAULT_ECOSYSTEM_PREFIX: &str = "TestEco";
/// Default comment attached to finding status changes.
pub const DEFAULT_STATUS_COMMENT: &str = "RiskScoreE2EAutomation";
/// Default page size for notification and finding listings.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

// ============================================================================
// SECTION: Rules
// ============================================================================

/// Generates a collision-free ecosystem name: `<prefix>_<uuid v4>`.
#[must_use]
pub fn generate_ecosystem_name(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4())
}

/// Normalizes a module display name into its endpoint path segment.
///
/// Lower-cases, then keeps only letters and decimal digits:
/// `"Open Ports"` becomes `"openports"`. Numeric symbols such as `²` or `Ⅻ`
/// are dropped.
#[must_use]
pub fn normalize_module_name(module: &str) -> String {
    module.chars().flat_map(char::to_lowercase).filter(|ch| is_letter_or_digit(*ch)).collect()
}

/// Letters exclude letter-numbers (`Nl`); digits are ASCII decimal only.
fn is_letter_or_digit(ch: char) -> bool {
    ch.is_ascii_digit() || (ch.is_alphabetic() && !ch.is_numeric())
}

/// Returns the status a finding should be moved to.
///
/// Already-remediated findings (case-insensitive) go to `Acknowledged` so the
/// update is never a no-op; everything else goes to `Remediated`.
#[must_use]
pub fn next_finding_status(current: &str) -> &'static str {
    if current.eq_ignore_ascii_case(STATUS_REMEDIATED) {
        STATUS_ACKNOWLEDGED
    } else {
        STATUS_REMEDIATED
    }
}

/// Returns true when a log entry records an API status change of `finding_id`.
#[must_use]
pub fn is_status_change_entry(entry: &CompanyLogEntry, finding_id: FindingId) -> bool {
    let needle = finding_id.to_string();
    entry.log_type.as_deref() == Some(LOG_TYPE_FINDING_STATUS_CHANGED)
        && entry.insert_user.as_deref() == Some(LOG_INSERT_USER_API)
        && entry.description.as_deref().is_some_and(|description| description.contains(&needle))
}
