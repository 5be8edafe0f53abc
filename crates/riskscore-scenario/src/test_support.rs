// crates/riskscore-scenario/src/test_support.rs
// ============================================================================
// Module: Scenario Test Support
// Description: Scripted vendor transport and fixtures for step tests.
// Purpose: Drive steps without a network while recording every request.
// Dependencies: riskscore-client, serde_json
// ============================================================================

//! ## Overview
//! [`ScriptedVendor`] answers by `(method, path)`. Each route holds a queue of
//! responses; the last one repeats once the others are used, which models
//! both polling sequences and stable reads.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    clippy::missing_docs_in_private_items,
    reason = "Test-only output and panic-based assertions are permitted."
)]
#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use riskscore_client::ApiRequest;
use riskscore_client::ApiResponse;
use riskscore_client::AuthenticatedClient;
use riskscore_client::ClientCredentials;
use riskscore_client::ClientError;
use riskscore_client::HeaderMap;
use riskscore_client::Method;
use riskscore_client::StatusCode;
use riskscore_client::TOKEN_PATH;
use riskscore_client::VendorTransport;
use serde_json::Value;
use serde_json::json;

use crate::context::ScenarioContext;
use crate::ids::CompanyId;
use crate::ids::EcosystemId;
use crate::ids::FindingId;
use crate::ids::NotificationId;
use crate::poll::PollPolicy;
use crate::runner::DEFAULT_EXPECTED_SCAN_STATUS;
use crate::steps::ScenarioSteps;
use crate::steps::StepSettings;

// ============================================================================
// SECTION: Fixture Ids
// ============================================================================

pub const ECOSYSTEM_ID: EcosystemId = EcosystemId::new(101);
pub const COMPANY_ID: CompanyId = CompanyId::new(202);
pub const NOTIFICATION_ID: NotificationId = NotificationId::new(303);
pub const FINDING_ID: FindingId = FindingId::new(40_404);
pub const DOMAIN: &str = "example.com";
pub const MODULE: &str = "Open Ports";

// ============================================================================
// SECTION: Scripted Vendor
// ============================================================================

type RouteKey = (String, String);

#[derive(Default)]
pub struct ScriptedVendor {
    routes: Mutex<HashMap<RouteKey, VecDeque<(StatusCode, String)>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedVendor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, method: Method, path: &str, status: StatusCode, body: &Value) {
        self.on_text(method, path, status, &body.to_string());
    }

    pub fn on_text(&self, method: Method, path: &str, status: StatusCode, body: &str) {
        self.routes
            .lock()
            .unwrap()
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back((status, body.to_string()));
    }

    /// Drops any scripted responses for the route, then scripts `body`.
    pub fn replace(&self, method: Method, path: &str, status: StatusCode, body: &Value) {
        self.replace_text(method, path, status, &body.to_string());
    }

    pub fn replace_text(&self, method: Method, path: &str, status: StatusCode, body: &str) {
        self.routes.lock().unwrap().remove(&(method.to_string(), path.to_string()));
        self.on_text(method, path, status, body);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: &Method, path: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.method() == method && request.path() == path)
            .collect()
    }
}

#[async_trait]
impl VendorTransport for ScriptedVendor {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let key = (request.method().to_string(), request.path().to_string());
        self.requests.lock().unwrap().push(request);
        let mut routes = self.routes.lock().unwrap();
        let queue = routes
            .get_mut(&key)
            .ok_or_else(|| ClientError::Transport(format!("no scripted route {} {}", key.0, key.1)))?;
        let (status, body) = if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap()
        };
        Ok(ApiResponse::new(status, HeaderMap::new(), body))
    }
}

// ============================================================================
// SECTION: Fixtures
// ============================================================================

pub fn credentials() -> ClientCredentials {
    ClientCredentials::new("test-client", "test-secret")
}

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

pub fn fast_settings() -> StepSettings {
    StepSettings {
        poll: PollPolicy::new(std::time::Duration::from_secs(10), 3),
        ..StepSettings::default()
    }
}

pub fn script_token(vendor: &ScriptedVendor) {
    vendor.on(
        Method::POST,
        TOKEN_PATH,
        StatusCode::OK,
        &json!({ "access_token": "token-abc", "token_type": "Bearer", "expires_in": 3600 }),
    );
}

/// Returns steps over `vendor` that have already authenticated.
pub async fn authenticated_steps(vendor: &Arc<ScriptedVendor>, settings: StepSettings) -> ScenarioSteps {
    script_token(vendor);
    let transport: Arc<dyn VendorTransport> = vendor.clone();
    let mut steps = ScenarioSteps::new(AuthenticatedClient::with_transport(transport), settings);
    steps.authenticate(&credentials()).await.unwrap();
    steps
}

/// Context as left after the company was created.
pub fn context_with_company() -> ScenarioContext {
    ScenarioContext {
        ecosystem_id: Some(ECOSYSTEM_ID),
        ecosystem_name: Some("TestEco_fixture".to_string()),
        company_id: Some(COMPANY_ID),
        company_domain: Some(DOMAIN.to_string()),
        ..ScenarioContext::default()
    }
}

/// Context as left after a finding was selected.
pub fn context_with_finding() -> ScenarioContext {
    ScenarioContext {
        notification_id: Some(NOTIFICATION_ID),
        finding_id: Some(FINDING_ID),
        module_name: Some(MODULE.to_string()),
        ..context_with_company()
    }
}

pub fn company_body(scan_status: &str, ecosystems: &[EcosystemId]) -> Value {
    let memberships: Vec<Value> =
        ecosystems.iter().map(|id| json!({ "EcosystemId": id.get() })).collect();
    json!({
        "CompanyId": COMPANY_ID.get(),
        "MainDomainValue": DOMAIN,
        "ScanStatus": scan_status,
        "Ecosystems": memberships,
    })
}

pub fn finding_detail_body(status: &str) -> Value {
    json!({ "FindingId": FINDING_ID.get(), "Status": status, "Module": MODULE })
}

/// Scripts every route of a passing scenario.
pub fn script_happy_path(vendor: &ScriptedVendor) {
    script_token(vendor);
    let ecosystem = format!("/api/v2/ecosystems/{ECOSYSTEM_ID}");
    let company = format!("/api/v2/companies/{COMPANY_ID}");
    let detail = format!("/api/v2/companies/{COMPANY_ID}/findings/openports/{FINDING_ID}");
    vendor.on(
        Method::POST,
        "/api/v2/ecosystems",
        StatusCode::OK,
        &json!({ "EcosystemId": ECOSYSTEM_ID.get() }),
    );
    vendor.on(Method::GET, &ecosystem, StatusCode::OK, &json!({ "EcosystemId": ECOSYSTEM_ID.get() }));
    vendor.on(
        Method::GET,
        &ecosystem,
        StatusCode::NOT_FOUND,
        &json!({ "Message": "Ecosystem not found" }),
    );
    vendor.on(Method::POST, "/api/v2/companies", StatusCode::OK, &company_body("Pending", &[ECOSYSTEM_ID]));
    vendor.on(Method::GET, &company, StatusCode::OK, &company_body("Pending", &[ECOSYSTEM_ID]));
    vendor.on(
        Method::GET,
        &company,
        StatusCode::OK,
        &company_body(DEFAULT_EXPECTED_SCAN_STATUS, &[ECOSYSTEM_ID]),
    );
    vendor.on(Method::GET, &company, StatusCode::OK, &company_body(DEFAULT_EXPECTED_SCAN_STATUS, &[]));
    vendor.on(
        Method::GET,
        "/api/v2/notifications",
        StatusCode::OK,
        &json!([
            {
                "NotificationId": NOTIFICATION_ID.get(),
                "NotificationType": "findings",
                "CompanyId": COMPANY_ID.get(),
                "Company": "Example.com",
            },
            {
                "NotificationId": 999,
                "NotificationType": "rating",
                "CompanyId": 1,
                "Company": "someone-else.com",
            },
        ]),
    );
    vendor.on(
        Method::GET,
        &format!("/api/v2/notifications/{NOTIFICATION_ID}/findings"),
        StatusCode::OK,
        &json!([{ "FindingId": FINDING_ID.get(), "Module": MODULE }]),
    );
    vendor.on(Method::GET, &detail, StatusCode::OK, &finding_detail_body("Open"));
    vendor.on(
        Method::PATCH,
        &format!("/api/v2/companies/{COMPANY_ID}/findings/{FINDING_ID}"),
        StatusCode::OK,
        &json!({}),
    );
    vendor.on(
        Method::GET,
        "/api/v2/log/company",
        StatusCode::OK,
        &json!([
            { "LogType": "Company Created", "InsertUser": "API", "Description": "created" },
            {
                "LogType": "Finding Status Changed",
                "InsertUser": "API",
                "Description": format!("Finding {FINDING_ID} status changed to Remediated"),
            },
        ]),
    );
    vendor.on(Method::DELETE, &company, StatusCode::OK, &json!({}));
    vendor.on(Method::DELETE, &ecosystem, StatusCode::OK, &json!({}));
}
