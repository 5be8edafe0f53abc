// system-tests/tests/helpers/runs.rs
// ============================================================================
// Module: Scenario Run Helpers
// Description: Builds scenario runners pointed at the vendor stub.
// Purpose: Keep client construction and fast poll settings in one place.
// Dependencies: riskscore-client, riskscore-scenario, rand
// ============================================================================

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use riskscore_client::AuthenticatedClient;
use riskscore_client::ClientCredentials;
use riskscore_client::ClientSettings;
use riskscore_scenario::PollPolicy;
use riskscore_scenario::ScenarioPlan;
use riskscore_scenario::ScenarioRun;
use riskscore_scenario::ScenarioRunner;
use riskscore_scenario::StepSettings;

use super::timeouts::resolve_timeout;
use super::vendor_stub::STUB_CLIENT_ID;
use super::vendor_stub::STUB_CLIENT_SECRET;
use super::vendor_stub::VendorStubHandle;

/// Domain the stub suites register.
pub const STUB_DOMAIN: &str = "stub-vendor.example";
/// Seed used for notification and finding selection.
pub const SELECTION_SEED: u64 = 11;

/// Credentials the stub accepts.
pub fn stub_credentials() -> ClientCredentials {
    ClientCredentials::new(STUB_CLIENT_ID, STUB_CLIENT_SECRET)
}

/// Step settings with a short poll interval.
pub fn fast_settings(max_attempts: u32) -> StepSettings {
    StepSettings {
        poll: PollPolicy::new(Duration::from_millis(20), max_attempts),
        ..StepSettings::default()
    }
}

/// Builds an HTTP client for `base_url`.
pub fn http_client(base_url: &str) -> Result<AuthenticatedClient, String> {
    let timeout = resolve_timeout(Duration::from_secs(10))?;
    let settings = ClientSettings::new(base_url, timeout).map_err(|err| err.to_string())?;
    AuthenticatedClient::new(&settings).map_err(|err| err.to_string())
}

/// Builds a runner against the stub.
pub fn stub_runner(
    stub: &VendorStubHandle,
    credentials: ClientCredentials,
    settings: StepSettings,
) -> Result<ScenarioRunner, String> {
    Ok(ScenarioRunner::new(http_client(stub.base_url())?, credentials, settings))
}

/// Runs the whole scenario against the stub with default credentials.
pub async fn run_against_stub(stub: &VendorStubHandle, max_attempts: u32) -> Result<ScenarioRun, String> {
    let mut runner = stub_runner(stub, stub_credentials(), fast_settings(max_attempts))?;
    let mut rng = StdRng::seed_from_u64(SELECTION_SEED);
    Ok(runner.run(&ScenarioPlan::new(STUB_DOMAIN), &mut rng).await)
}
