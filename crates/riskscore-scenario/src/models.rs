// crates/riskscore-scenario/src/models.rs
// ============================================================================
// Module: Vendor Payloads
// Description: Request and response bodies for the endpoints the scenario uses.
// Purpose: Decode only the fields the scenario asserts on.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The vendor speaks PascalCase JSON. Unknown fields are ignored. Fields that
//! only some steps need are optional so that a missing value surfaces as a
//! step assertion rather than a decode failure on an unrelated record.

use serde::Deserialize;
use serde::Serialize;

use crate::ids::CompanyId;
use crate::ids::EcosystemId;
use crate::ids::FindingId;
use crate::ids::NotificationId;
use crate::rules::LICENSE_TYPE_CONTINUOUS_ANNUAL;

// ============================================================================
// SECTION: Ecosystems
// ============================================================================

/// Body of `POST /api/v2/ecosystems`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewEcosystem {
    /// Unique ecosystem name.
    pub name: String,
}

/// Ecosystem record returned by create and get.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EcosystemRecord {
    /// Ecosystem id.
    pub ecosystem_id: EcosystemId,
}

// ============================================================================
// SECTION: Companies
// ============================================================================

/// Body of `POST /api/v2/companies`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewCompany {
    /// Primary domain of the company.
    pub main_domain_value: String,
    /// Ecosystem the company joins.
    pub ecosystem_id: EcosystemId,
    /// License type label.
    pub license_type: String,
    /// Whether the company is a subsidiary.
    pub is_subsidiary: bool,
    /// Whether the company is a cloud provider.
    pub is_cloud_provider: bool,
}

impl NewCompany {
    /// Builds a continuous-annual, non-subsidiary, non-cloud company request.
    #[must_use]
    pub fn continuous_annual(domain: impl Into<String>, ecosystem_id: EcosystemId) -> Self {
        Self {
            main_domain_value: domain.into(),
            ecosystem_id,
            license_type: LICENSE_TYPE_CONTINUOUS_ANNUAL.to_string(),
            is_subsidiary: false,
            is_cloud_provider: false,
        }
    }
}

/// Company record returned by create and get.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompanyRecord {
    /// Company id.
    pub company_id: CompanyId,
    /// Primary domain as stored by the vendor.
    #[serde(default)]
    pub main_domain_value: Option<String>,
    /// Scan progress label.
    #[serde(default)]
    pub scan_status: Option<String>,
    /// Ecosystems the company belongs to.
    #[serde(default)]
    pub ecosystems: Option<Vec<EcosystemMembership>>,
}

/// Entry of a company's `Ecosystems` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EcosystemMembership {
    /// Ecosystem id.
    pub ecosystem_id: EcosystemId,
}

// ============================================================================
// SECTION: Notifications And Findings
// ============================================================================

/// Notification list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Notification {
    /// Notification id.
    pub notification_id: NotificationId,
    /// Notification type label (for example `findings`). Untyped entries are skipped.
    #[serde(default)]
    pub notification_type: Option<String>,
    /// Company the notification refers to.
    #[serde(default)]
    pub company_id: Option<CompanyId>,
    /// Company display name.
    #[serde(default)]
    pub company: Option<String>,
}

/// Finding list entry under a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FindingSummary {
    /// Finding id.
    pub finding_id: FindingId,
    /// Module (risk category) display name.
    pub module: String,
}

/// Finding detail returned by the per-module endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FindingDetail {
    /// Finding id.
    pub finding_id: FindingId,
    /// Current finding status.
    #[serde(default)]
    pub status: Option<String>,
}

/// Body of `PATCH /api/v2/companies/{cid}/findings/{fid}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FindingStatusUpdate {
    /// Target status.
    pub status: String,
    /// Audit comment attached to the change.
    pub comment: String,
}

// ============================================================================
// SECTION: Audit Log
// ============================================================================

/// Company activity log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompanyLogEntry {
    /// Log type label.
    #[serde(default)]
    pub log_type: Option<String>,
    /// User that produced the entry.
    #[serde(default)]
    pub insert_user: Option<String>,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
}
