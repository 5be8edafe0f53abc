// crates/riskscore-config/src/config.rs
// ============================================================================
// Module: Risk Score Configuration
// Description: Configuration loading and validation for the scenario runner.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: riskscore-client, riskscore-scenario, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with a size limit. Missing files
//! are an error only when a path was requested explicitly; otherwise defaults
//! apply. Invalid values fail closed.
//! Invariants:
//! - A validated config always yields valid [`ClientSettings`].
//! - Timeouts are non-zero and bounded; poll attempts are non-zero.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use riskscore_client::ClientSettings;
use riskscore_client::DEFAULT_BASE_URL;
use riskscore_scenario::PollPolicy;
use riskscore_scenario::ScenarioPlan;
use riskscore_scenario::StepSettings;
use riskscore_scenario::poll::DEFAULT_POLL_ATTEMPTS;
use riskscore_scenario::poll::DEFAULT_POLL_INTERVAL;
use riskscore_scenario::rules::DEFAULT_ECOSYSTEM_PREFIX;
use riskscore_scenario::rules::DEFAULT_PAGE_SIZE;
use riskscore_scenario::rules::DEFAULT_STATUS_COMMENT;
use riskscore_scenario::runner::DEFAULT_DOMAIN;
use riskscore_scenario::runner::DEFAULT_EXPECTED_SCAN_STATUS;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::env::CONFIG_ENV_VAR;
use crate::env::read_env_nonempty;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "riskscore.toml";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Default per-request timeout in milliseconds.
const DEFAULT_TIMEOUT_MS: u64 = 10_000;
/// Upper bound for the per-request timeout in milliseconds.
pub const MAX_TIMEOUT_MS: u64 = 5 * 60 * 1000;
/// Default log filter directive.
const DEFAULT_LOG_LEVEL: &str = "info";

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskScoreConfig {
    /// Vendor API connection settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Scenario inputs and tunables.
    #[serde(default)]
    pub scenario: ScenarioConfig,
    /// Logging output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[api]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Vendor base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ApiConfig {
    /// Validates the API section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a bad URL or timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::Invalid("api.timeout_ms must be greater than zero".to_string()));
        }
        if self.timeout_ms > MAX_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "api.timeout_ms must be at most {MAX_TIMEOUT_MS}"
            )));
        }
        self.client_settings().map(|_| ())
    }

    /// Builds client settings from this section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the URL is rejected by the client.
    pub fn client_settings(&self) -> Result<ClientSettings, ConfigError> {
        ClientSettings::new(self.base_url.trim(), Duration::from_millis(self.timeout_ms))
            .map_err(|err| ConfigError::Invalid(format!("api.base_url: {err}")))
    }
}

/// `[scenario]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Company domain to create.
    #[serde(default = "default_domain")]
    pub domain: String,
    /// Expected company name on notifications; defaults to the domain.
    #[serde(default)]
    pub company_name: Option<String>,
    /// Scan status the poll waits for.
    #[serde(default = "default_expected_scan_status")]
    pub expected_scan_status: String,
    /// Prefix of generated ecosystem names.
    #[serde(default = "default_ecosystem_prefix")]
    pub ecosystem_prefix: String,
    /// Comment attached to the finding status change.
    #[serde(default = "default_status_comment")]
    pub status_comment: String,
    /// Page size for notification and finding listings.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Delete created resources when a step fails.
    #[serde(default = "default_cleanup_on_failure")]
    pub cleanup_on_failure: bool,
    /// Scan-status poll cadence.
    #[serde(default)]
    pub poll: PollConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            company_name: None,
            expected_scan_status: default_expected_scan_status(),
            ecosystem_prefix: default_ecosystem_prefix(),
            status_comment: default_status_comment(),
            page_size: default_page_size(),
            cleanup_on_failure: default_cleanup_on_failure(),
            poll: PollConfig::default(),
        }
    }
}

impl ScenarioConfig {
    /// Validates the scenario section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for empty strings or zero limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty("scenario.domain", &self.domain)?;
        if let Some(name) = &self.company_name {
            require_non_empty("scenario.company_name", name)?;
        }
        require_non_empty("scenario.expected_scan_status", &self.expected_scan_status)?;
        require_non_empty("scenario.ecosystem_prefix", &self.ecosystem_prefix)?;
        require_non_empty("scenario.status_comment", &self.status_comment)?;
        if self.page_size == 0 {
            return Err(ConfigError::Invalid(
                "scenario.page_size must be greater than zero".to_string(),
            ));
        }
        self.poll.validate()
    }

    /// Builds the scenario plan.
    #[must_use]
    pub fn plan(&self) -> ScenarioPlan {
        let plan = ScenarioPlan::new(self.domain.trim())
            .with_expected_scan_status(self.expected_scan_status.clone());
        match &self.company_name {
            Some(name) => plan.with_company_name(name.trim()),
            None => plan,
        }
    }

    /// Builds the step settings.
    #[must_use]
    pub fn step_settings(&self) -> StepSettings {
        StepSettings {
            ecosystem_prefix: self.ecosystem_prefix.clone(),
            status_comment: self.status_comment.clone(),
            poll: self.poll.policy(),
            page_size: self.page_size,
        }
    }
}

/// `[scenario.poll]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Delay between attempts in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub interval_ms: u64,
    /// Maximum number of attempts.
    #[serde(default = "default_poll_attempts")]
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_poll_interval_ms(),
            max_attempts: default_poll_attempts(),
        }
    }
}

impl PollConfig {
    /// Validates the poll section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `max_attempts` is zero or the
    /// interval exceeds the timeout bound.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "scenario.poll.max_attempts must be greater than zero".to_string(),
            ));
        }
        if self.interval_ms > MAX_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "scenario.poll.interval_ms must be at most {MAX_TIMEOUT_MS}"
            )));
        }
        Ok(())
    }

    /// Converts the section into a poll policy.
    #[must_use]
    pub fn policy(&self) -> PollPolicy {
        PollPolicy::new(Duration::from_millis(self.interval_ms), self.max_attempts)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingConfig {
    /// Validates the logging section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the level is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty("logging.level", &self.level)
    }
}

impl RiskScoreConfig {
    /// Loads configuration using the default resolution rules.
    ///
    /// Resolution order: explicit `path`, then `RISKSCORE_CONFIG`, then
    /// `riskscore.toml` in the working directory. Only the last may be absent,
    /// in which case defaults are used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, required) = resolve_path(path)?;
        let bytes = match fs::read(&resolved) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(err) => {
                return Err(ConfigError::Io(format!("{}: {err}", resolved.display())));
            }
        };
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()?;
        self.scenario.validate()?;
        self.logging.validate()
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// Missing or malformed environment variable.
    #[error("config env error: {0}")]
    Env(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path and whether it must exist.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Some(env_path) = read_env_nonempty(CONFIG_ENV_VAR)? {
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Rejects empty or whitespace-only strings.
fn require_non_empty(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    Ok(())
}

/// Default vendor base URL.
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Default request timeout.
const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Default company domain.
fn default_domain() -> String {
    DEFAULT_DOMAIN.to_string()
}

/// Default expected scan status.
fn default_expected_scan_status() -> String {
    DEFAULT_EXPECTED_SCAN_STATUS.to_string()
}

/// Default ecosystem name prefix.
fn default_ecosystem_prefix() -> String {
    DEFAULT_ECOSYSTEM_PREFIX.to_string()
}

/// Default status comment marker.
fn default_status_comment() -> String {
    DEFAULT_STATUS_COMMENT.to_string()
}

/// Default listing page size.
const fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Cleanup after failure is on unless disabled.
const fn default_cleanup_on_failure() -> bool {
    true
}

/// Default poll interval.
fn default_poll_interval_ms() -> u64 {
    u64::try_from(DEFAULT_POLL_INTERVAL.as_millis()).unwrap_or(u64::MAX)
}

/// Default poll attempts.
const fn default_poll_attempts() -> u32 {
    DEFAULT_POLL_ATTEMPTS
}

/// Default log level.
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
