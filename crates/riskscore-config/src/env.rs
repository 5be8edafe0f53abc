// crates/riskscore-config/src/env.rs
// ============================================================================
// Module: Environment Inputs
// Description: Strict environment parsing for credentials and config paths.
// Purpose: Keep secrets out of config files and fail closed on bad values.
// Dependencies: riskscore-client
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 or blank values fail closed.

use riskscore_client::ClientCredentials;

use crate::config::ConfigError;

// ============================================================================
// SECTION: Environment Keys
// ============================================================================

/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "RISKSCORE_CONFIG";
/// Environment variable holding the OAuth client id.
pub const CLIENT_ID_ENV: &str = "RISKSCORE_CLIENT_ID";
/// Environment variable holding the OAuth client secret.
pub const CLIENT_SECRET_ENV: &str = "RISKSCORE_CLIENT_SECRET";

// ============================================================================
// SECTION: Credentials
// ============================================================================

/// Reads client credentials from the process environment.
///
/// # Errors
///
/// Returns [`ConfigError::Env`] when either variable is missing, blank, or
/// not valid UTF-8.
pub fn credentials_from_env() -> Result<ClientCredentials, ConfigError> {
    let client_id = read_env_nonempty(CLIENT_ID_ENV)?;
    let client_secret = read_env_nonempty(CLIENT_SECRET_ENV)?;
    credentials_from_lookup(|name| match name {
        CLIENT_ID_ENV => client_id.clone(),
        CLIENT_SECRET_ENV => client_secret.clone(),
        _ => None,
    })
}

/// Builds client credentials from an arbitrary variable lookup.
///
/// # Errors
///
/// Returns [`ConfigError::Env`] when a variable is missing or blank.
pub fn credentials_from_lookup<F>(lookup: F) -> Result<ClientCredentials, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let client_id = required(CLIENT_ID_ENV, lookup(CLIENT_ID_ENV))?;
    let client_secret = required(CLIENT_SECRET_ENV, lookup(CLIENT_SECRET_ENV))?;
    Ok(ClientCredentials::new(client_id.trim(), client_secret.trim()))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns [`ConfigError::Env`] when the variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, ConfigError> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string()
            .map(Some)
            .map_err(|_| ConfigError::Env(format!("{name} must be valid UTF-8")))
    })
}

/// Reads an environment variable and rejects blank values.
///
/// # Errors
///
/// Returns [`ConfigError::Env`] when the variable is set but blank.
pub fn read_env_nonempty(name: &str) -> Result<Option<String>, ConfigError> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => {
            Err(ConfigError::Env(format!("{name} must not be empty")))
        }
        other => Ok(other),
    }
}

/// Requires a present, non-blank value.
fn required(name: &str, value: Option<String>) -> Result<String, ConfigError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        Some(_) => Err(ConfigError::Env(format!("{name} must not be empty"))),
        None => Err(ConfigError::Env(format!("{name} must be set"))),
    }
}
