// crates/riskscore-config/src/lib.rs
// ============================================================================
// Module: Risk Score Config Library
// Description: Configuration model for the end-to-end runner.
// Purpose: Load, validate, and translate runner settings.
// Dependencies: riskscore-client, riskscore-scenario, serde, toml
// ============================================================================

//! ## Overview
//! The runner is configured from a TOML file plus environment credentials.
//! Every field has a default, so an absent file section behaves like the
//! vendor defaults. Credentials are never read from the file.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod env;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::ApiConfig;
pub use config::ConfigError;
pub use config::LogFormat;
pub use config::LoggingConfig;
pub use config::PollConfig;
pub use config::RiskScoreConfig;
pub use config::ScenarioConfig;
pub use env::CLIENT_ID_ENV;
pub use env::CLIENT_SECRET_ENV;
pub use env::CONFIG_ENV_VAR;
pub use env::credentials_from_env;
pub use env::credentials_from_lookup;
