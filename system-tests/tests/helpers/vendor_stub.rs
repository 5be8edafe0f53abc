// system-tests/tests/helpers/vendor_stub.rs
// ============================================================================
// Module: Vendor Stub
// Description: In-process HTTP stand-in for the risk score vendor API.
// Purpose: Run the full scenario over real HTTP without vendor credentials.
// Dependencies: axum, riskscore-scenario, serde_json, tokio
// ============================================================================

//! ## Overview
//! The stub serves every endpoint the scenario touches with in-memory state:
//! ecosystems, companies, one findings notification per company, findings,
//! and a company audit log. Behavior switches on [`VendorStubOptions`] let
//! suites break one vendor guarantee at a time.
//!
//! Invariants:
//! - Every non-token route requires `Authorization: Bearer` with the issued token.
//! - Scan status reads `Pending` until the configured number of polls passed.
//! - Unknown ecosystems answer 404 with an `Ecosystem not found` message.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::net::TcpListener as StdTcpListener;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;

use axum::Form;
use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::Request;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::middleware::from_fn_with_state;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use riskscore_scenario::normalize_module_name;
use serde::Deserialize;
use serde_json::Value;
use serde_json::json;
use tokio::runtime::Builder;
use tokio::sync::oneshot;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Client id the stub accepts.
pub const STUB_CLIENT_ID: &str = "stub-client";
/// Client secret the stub accepts.
pub const STUB_CLIENT_SECRET: &str = "stub-secret";
/// Bearer token the stub issues.
const STUB_ACCESS_TOKEN: &str = "stub-access-token";
/// Module of every seeded finding.
pub const STUB_FINDING_MODULE: &str = "Open Ports";
/// Status of freshly seeded findings.
pub const STUB_INITIAL_FINDING_STATUS: &str = "Open";
/// Scan status reported before the company is ready.
const PENDING_SCAN_STATUS: &str = "Pending";

// ============================================================================
// SECTION: Options
// ============================================================================

/// Behavior switches for the stub.
#[derive(Debug, Clone)]
pub struct VendorStubOptions {
    /// Company reads answering `Pending` before `ready_status` is reported.
    pub polls_until_ready: u32,
    /// Scan status reported once the company is ready.
    pub ready_status: String,
    /// Seed a findings notification for each new company.
    pub seed_notifications: bool,
    /// Write a status-change entry to the company log on finding updates.
    pub log_status_changes: bool,
    /// Remove the ecosystem link when a company is deleted.
    pub unlink_on_delete: bool,
    /// Echo the company domain upper-cased on creation.
    pub mangle_domain: bool,
}

impl Default for VendorStubOptions {
    fn default() -> Self {
        Self {
            polls_until_ready: 2,
            ready_status: "Extended Rescan Results Ready".to_string(),
            seed_notifications: true,
            log_status_changes: true,
            unlink_on_delete: true,
            mangle_domain: false,
        }
    }
}

// ============================================================================
// SECTION: State
// ============================================================================

/// Request line recorded by the stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: String,
    /// Request path without the query.
    pub path: String,
    /// Raw query string, if any.
    pub query: Option<String>,
}

#[derive(Debug, Clone)]
struct StubCompany {
    domain: String,
    ecosystems: Vec<u64>,
    polls: u32,
}

#[derive(Debug, Clone)]
struct StubFinding {
    company_id: u64,
    module: String,
    status: String,
}

#[derive(Debug, Clone)]
struct StubNotification {
    company_id: u64,
    findings: Vec<u64>,
}

#[derive(Debug, Default)]
struct VendorData {
    next_id: u64,
    ecosystems: BTreeMap<u64, String>,
    companies: BTreeMap<u64, StubCompany>,
    notifications: BTreeMap<u64, StubNotification>,
    findings: BTreeMap<u64, StubFinding>,
    logs: BTreeMap<u64, Vec<Value>>,
}

impl VendorData {
    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        1_000 + self.next_id
    }
}

#[derive(Clone)]
struct StubState {
    options: Arc<VendorStubOptions>,
    data: Arc<Mutex<VendorData>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

// ============================================================================
// SECTION: Handle
// ============================================================================

/// Handle for the running stub; shuts the server down on drop.
pub struct VendorStubHandle {
    base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<thread::JoinHandle<()>>,
    data: Arc<Mutex<VendorData>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl VendorStubHandle {
    /// Returns the stub base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().map_or_else(|_| Vec::new(), |entries| entries.clone())
    }

    /// Returns requests matching `method` and `path`.
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.method == method && request.path == path)
            .collect()
    }

    /// Returns the number of ecosystems that still exist.
    pub fn ecosystem_count(&self) -> usize {
        self.data.lock().map_or(0, |data| data.ecosystems.len())
    }

    /// Returns ids of companies still linked to an ecosystem.
    pub fn linked_companies(&self) -> Vec<u64> {
        self.data.lock().map_or_else(
            |_| Vec::new(),
            |data| {
                data.companies
                    .iter()
                    .filter(|(_, company)| !company.ecosystems.is_empty())
                    .map(|(id, _)| *id)
                    .collect()
            },
        )
    }

    /// Returns the current status of every finding.
    pub fn finding_statuses(&self) -> Vec<String> {
        self.data.lock().map_or_else(
            |_| Vec::new(),
            |data| data.findings.values().map(|finding| finding.status.clone()).collect(),
        )
    }
}

impl Drop for VendorStubHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// Spawns the stub with default behavior.
pub fn spawn_vendor_stub() -> Result<VendorStubHandle, String> {
    spawn_vendor_stub_with(VendorStubOptions::default())
}

/// Spawns the stub on an ephemeral port with the given behavior.
pub fn spawn_vendor_stub_with(options: VendorStubOptions) -> Result<VendorStubHandle, String> {
    let listener = StdTcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("vendor stub bind failed: {err}"))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("vendor stub listener nonblocking failed: {err}"))?;
    let addr =
        listener.local_addr().map_err(|err| format!("vendor stub local addr failed: {err}"))?;
    let base_url = format!("http://{addr}");

    let state = StubState {
        options: Arc::new(options),
        data: Arc::new(Mutex::new(VendorData::default())),
        requests: Arc::new(Mutex::new(Vec::new())),
    };
    let data = Arc::clone(&state.data);
    let requests = Arc::clone(&state.requests);
    let app = router(state);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = thread::spawn(move || {
        let Ok(runtime) = Builder::new_current_thread().enable_all().build() else {
            return;
        };
        runtime.block_on(async move {
            let Ok(listener) = tokio::net::TcpListener::from_std(listener) else {
                return;
            };
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = server.await;
        });
    });
    Ok(VendorStubHandle {
        base_url,
        shutdown: Some(shutdown_tx),
        join: Some(join),
        data,
        requests,
    })
}

fn router(state: StubState) -> Router {
    Router::new()
        .route("/api/v2/oauth/token", post(issue_token))
        .route("/api/v2/ecosystems", post(create_ecosystem))
        .route("/api/v2/ecosystems/{id}", get(get_ecosystem).delete(delete_ecosystem))
        .route("/api/v2/companies", post(create_company))
        .route("/api/v2/companies/{id}", get(get_company).delete(delete_company))
        .route("/api/v2/companies/{id}/findings/{key}", patch(update_finding))
        .route("/api/v2/companies/{id}/findings/{key}/{finding}", get(get_finding_detail))
        .route("/api/v2/notifications", get(list_notifications))
        .route("/api/v2/notifications/{id}/findings", get(list_findings))
        .route("/api/v2/log/company", get(company_log))
        .layer(from_fn_with_state(state.clone(), guard))
        .with_state(state)
}

// ============================================================================
// SECTION: Middleware
// ============================================================================

/// Records the request line and enforces the bearer token.
async fn guard(State(state): State<StubState>, request: Request, next: Next) -> Response {
    let recorded = RecordedRequest {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        query: request.uri().query().map(ToString::to_string),
    };
    let is_token_route = recorded.path == "/api/v2/oauth/token";
    if let Ok(mut requests) = state.requests.lock() {
        requests.push(recorded);
    }
    if !is_token_route && !has_bearer(request.headers()) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "Message": "Unauthorized" })))
            .into_response();
    }
    next.run(request).await
}

fn has_bearer(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {STUB_ACCESS_TOKEN}"))
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

#[derive(Debug, Deserialize)]
struct TokenForm {
    grant_type: String,
    client_id: String,
    client_secret: String,
}

async fn issue_token(Form(form): Form<TokenForm>) -> Response {
    if form.grant_type != "client_credentials"
        || form.client_id != STUB_CLIENT_ID
        || form.client_secret != STUB_CLIENT_SECRET
    {
        return (StatusCode::UNAUTHORIZED, "invalid_client").into_response();
    }
    Json(json!({
        "access_token": STUB_ACCESS_TOKEN,
        "token_type": "Bearer",
        "expires_in": 3600,
    }))
    .into_response()
}

async fn create_ecosystem(State(state): State<StubState>, Json(body): Json<Value>) -> Response {
    let Some(name) = body.get("Name").and_then(Value::as_str).map(ToString::to_string) else {
        return bad_request("Name is required");
    };
    with_data(&state, |data| {
        let id = data.allocate();
        data.ecosystems.insert(id, name.clone());
        Json(json!({ "EcosystemId": id, "Name": name })).into_response()
    })
}

async fn get_ecosystem(State(state): State<StubState>, Path(id): Path<u64>) -> Response {
    with_data(&state, |data| match data.ecosystems.get(&id) {
        Some(name) => Json(json!({ "EcosystemId": id, "Name": name })).into_response(),
        None => ecosystem_not_found(),
    })
}

async fn delete_ecosystem(State(state): State<StubState>, Path(id): Path<u64>) -> Response {
    with_data(&state, |data| match data.ecosystems.remove(&id) {
        Some(_) => Json(json!({})).into_response(),
        None => ecosystem_not_found(),
    })
}

async fn create_company(State(state): State<StubState>, Json(body): Json<Value>) -> Response {
    let Some(domain) = body.get("MainDomainValue").and_then(Value::as_str) else {
        return bad_request("MainDomainValue is required");
    };
    let Some(ecosystem_id) = body.get("EcosystemId").and_then(Value::as_u64) else {
        return bad_request("EcosystemId is required");
    };
    let domain = if state.options.mangle_domain { domain.to_uppercase() } else { domain.to_string() };
    let seed_notifications = state.options.seed_notifications;
    with_data(&state, |data| {
        if !data.ecosystems.contains_key(&ecosystem_id) {
            return ecosystem_not_found();
        }
        let company_id = data.allocate();
        data.companies.insert(
            company_id,
            StubCompany {
                domain: domain.clone(),
                ecosystems: vec![ecosystem_id],
                polls: 0,
            },
        );
        data.logs.insert(
            company_id,
            vec![json!({
                "LogType": "Company Created",
                "InsertUser": "API",
                "Description": format!("Company {domain} created"),
            })],
        );
        if seed_notifications {
            let finding_id = data.allocate();
            data.findings.insert(
                finding_id,
                StubFinding {
                    company_id,
                    module: STUB_FINDING_MODULE.to_string(),
                    status: STUB_INITIAL_FINDING_STATUS.to_string(),
                },
            );
            let notification_id = data.allocate();
            data.notifications.insert(
                notification_id,
                StubNotification {
                    company_id,
                    findings: vec![finding_id],
                },
            );
        }
        Json(company_json(company_id, &domain, PENDING_SCAN_STATUS, &[ecosystem_id]))
            .into_response()
    })
}

async fn get_company(State(state): State<StubState>, Path(id): Path<u64>) -> Response {
    let options = Arc::clone(&state.options);
    with_data(&state, |data| {
        let Some(company) = data.companies.get_mut(&id) else {
            return not_found("Company not found");
        };
        company.polls = company.polls.saturating_add(1);
        let status = if company.polls > options.polls_until_ready {
            options.ready_status.as_str()
        } else {
            PENDING_SCAN_STATUS
        };
        Json(company_json(id, &company.domain, status, &company.ecosystems)).into_response()
    })
}

async fn delete_company(
    State(state): State<StubState>,
    Path(id): Path<u64>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let Some(ecosystem_id) = query.get("EcosystemId").and_then(|raw| raw.parse::<u64>().ok())
    else {
        return bad_request("EcosystemId query parameter is required");
    };
    let unlink = state.options.unlink_on_delete;
    with_data(&state, |data| {
        let Some(company) = data.companies.get_mut(&id) else {
            return not_found("Company not found");
        };
        if unlink {
            company.ecosystems.retain(|linked| *linked != ecosystem_id);
        }
        Json(json!({})).into_response()
    })
}

async fn list_notifications(
    State(state): State<StubState>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let company_filter = query.get("companyId").and_then(|raw| raw.parse::<u64>().ok());
    let page_size =
        query.get("page_size").and_then(|raw| raw.parse::<usize>().ok()).unwrap_or(10);
    with_data(&state, |data| {
        let mut listed = Vec::new();
        for (notification_id, notification) in &data.notifications {
            if company_filter.is_some_and(|company_id| company_id != notification.company_id) {
                continue;
            }
            let company =
                data.companies.get(&notification.company_id).map(|company| company.domain.clone());
            listed.push(json!({
                "NotificationId": notification_id,
                "NotificationType": "findings",
                "CompanyId": notification.company_id,
                "Company": company,
            }));
            listed.push(json!({
                "NotificationId": notification_id + 500_000,
                "NotificationType": "rating",
                "CompanyId": notification.company_id,
                "Company": company,
            }));
        }
        listed.truncate(page_size);
        Json(Value::Array(listed)).into_response()
    })
}

async fn list_findings(State(state): State<StubState>, Path(id): Path<u64>) -> Response {
    with_data(&state, |data| {
        let Some(notification) = data.notifications.get(&id) else {
            return not_found("Notification not found");
        };
        let listed: Vec<Value> = notification
            .findings
            .iter()
            .filter_map(|finding_id| {
                data.findings.get(finding_id).map(|finding| {
                    json!({ "FindingId": finding_id, "Module": finding.module })
                })
            })
            .collect();
        Json(Value::Array(listed)).into_response()
    })
}

async fn get_finding_detail(
    State(state): State<StubState>,
    Path((company_id, module, finding_id)): Path<(u64, String, u64)>,
) -> Response {
    with_data(&state, |data| match data.findings.get(&finding_id) {
        Some(finding)
            if finding.company_id == company_id
                && normalize_module_name(&finding.module) == module =>
        {
            Json(json!({
                "FindingId": finding_id,
                "Status": finding.status,
                "Module": finding.module,
            }))
            .into_response()
        }
        _ => not_found("Finding not found"),
    })
}

async fn update_finding(
    State(state): State<StubState>,
    Path((company_id, finding_id)): Path<(u64, u64)>,
    Json(body): Json<Value>,
) -> Response {
    let Some(status) = body.get("Status").and_then(Value::as_str).map(ToString::to_string) else {
        return bad_request("Status is required");
    };
    let log_changes = state.options.log_status_changes;
    with_data(&state, |data| {
        let Some(finding) = data.findings.get_mut(&finding_id) else {
            return not_found("Finding not found");
        };
        if finding.company_id != company_id {
            return not_found("Finding not found");
        }
        let previous = std::mem::replace(&mut finding.status, status.clone());
        if log_changes {
            data.logs.entry(company_id).or_default().push(json!({
                "LogType": "Finding Status Changed",
                "InsertUser": "API",
                "Description": format!("Finding {finding_id} status changed from {previous} to {status}"),
            }));
        }
        Json(json!({})).into_response()
    })
}

async fn company_log(
    State(state): State<StubState>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let Some(company_id) = query.get("id").and_then(|raw| raw.parse::<u64>().ok()) else {
        return bad_request("id query parameter is required");
    };
    let needle = query.get("query").cloned().unwrap_or_default();
    with_data(&state, |data| {
        let entries: Vec<Value> = data
            .logs
            .get(&company_id)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|entry| {
                        entry
                            .get("Description")
                            .and_then(Value::as_str)
                            .is_some_and(|text| text.contains(&needle))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Json(Value::Array(entries)).into_response()
    })
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn with_data(state: &StubState, apply: impl FnOnce(&mut VendorData) -> Response) -> Response {
    match state.data.lock() {
        Ok(mut data) => apply(&mut data),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "stub state poisoned").into_response(),
    }
}

fn company_json(company_id: u64, domain: &str, scan_status: &str, ecosystems: &[u64]) -> Value {
    let memberships: Vec<Value> =
        ecosystems.iter().map(|id| json!({ "EcosystemId": id })).collect();
    json!({
        "CompanyId": company_id,
        "MainDomainValue": domain,
        "ScanStatus": scan_status,
        "Ecosystems": memberships,
    })
}

fn ecosystem_not_found() -> Response {
    not_found("Ecosystem not found")
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "Message": message }))).into_response()
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "Message": message }))).into_response()
}
