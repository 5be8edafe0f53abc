// system-tests/src/config/env.rs
// ============================================================================
// Module: System Test Environment
// Description: Environment switches read by the system-test helpers.
// Purpose: Parse run root, timeout floor, and live-suite settings once.
// Dependencies: riskscore-config
// ============================================================================

//! ## Overview
//! Values are read through [`riskscore_config::env::read_env_nonempty`], so
//! invalid UTF-8 and blank values fail closed the same way credentials do.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use riskscore_config::env::read_env_nonempty;

// ============================================================================
// SECTION: Environment Keys
// ============================================================================

/// Directory that receives per-test artifacts.
pub const RUN_ROOT_ENV: &str = "RISKSCORE_SYSTEM_TEST_RUN_ROOT";
/// Minimum HTTP timeout in whole seconds.
pub const TIMEOUT_ENV: &str = "RISKSCORE_SYSTEM_TEST_TIMEOUT_SEC";
/// Enables the live vendor suite.
pub const LIVE_ENV: &str = "RISKSCORE_SYSTEM_TEST_LIVE";
/// Vendor base URL for the live suite.
pub const BASE_URL_ENV: &str = "RISKSCORE_SYSTEM_TEST_BASE_URL";

/// Every variable [`SystemTestConfig::load`] reads.
const ALL_KEYS: [&str; 4] = [RUN_ROOT_ENV, TIMEOUT_ENV, LIVE_ENV, BASE_URL_ENV];

// ============================================================================
// SECTION: Config
// ============================================================================

/// Settings shared by the system-test helpers and suites.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SystemTestConfig {
    /// Artifact root override.
    pub run_root: Option<PathBuf>,
    /// Timeout floor applied to stub and vendor clients.
    pub timeout: Option<Duration>,
    /// Whether the live vendor suite runs.
    pub live: bool,
    /// Vendor base URL override for the live suite.
    pub live_base_url: Option<String>,
}

impl SystemTestConfig {
    /// Loads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a message naming the variable that is blank, not UTF-8, or
    /// fails to parse.
    pub fn load() -> Result<Self, String> {
        let mut present = BTreeMap::new();
        for name in ALL_KEYS {
            if let Some(value) = read_env_nonempty(name).map_err(|err| err.to_string())? {
                present.insert(name, value);
            }
        }
        Self::from_lookup(|name| present.get(name).cloned())
    }

    /// Parses settings from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns a message naming the variable that is blank or fails to parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| match lookup(name) {
            Some(raw) if raw.trim().is_empty() => Err(format!("{name} must not be empty")),
            other => Ok(other),
        };
        let timeout = value(TIMEOUT_ENV)?.map(|raw| parse_seconds(&raw)).transpose()?;
        let live = value(LIVE_ENV)?.map_or(Ok(false), |raw| parse_switch(&raw))?;
        Ok(Self {
            run_root: value(RUN_ROOT_ENV)?.map(PathBuf::from),
            timeout,
            live,
            live_base_url: value(BASE_URL_ENV)?,
        })
    }
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses a positive whole number of seconds.
fn parse_seconds(raw: &str) -> Result<Duration, String> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(format!("{TIMEOUT_ENV} must be greater than zero")),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(_) => Err(format!("{TIMEOUT_ENV} must be a whole number of seconds")),
    }
}

/// Parses `1`/`0`/`true`/`false`, ignoring case.
fn parse_switch(raw: &str) -> Result<bool, String> {
    let trimmed = raw.trim();
    if trimmed == "1" || trimmed.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if trimmed == "0" || trimmed.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(format!("{LIVE_ENV} must be 1, 0, true, or false"))
    }
}
