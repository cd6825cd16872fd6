//! Utility functions for working with environment variables.

use std::path::PathBuf;

use crate::{CONFIG_FILENAME, DEFAULT_JUDGEKIT_HOME};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Environment variable for the judgekit home directory
pub const JUDGEKIT_HOME_ENV_VAR: &str = "JUDGEKIT_HOME";

/// Environment variable naming a hosted provider (`rapidapi`, `sulu`)
pub const JUDGEKIT_PROVIDER_ENV_VAR: &str = "JUDGEKIT_PROVIDER";

/// Environment variable for the provider API key
pub const JUDGEKIT_API_KEY_ENV_VAR: &str = "JUDGEKIT_API_KEY";

/// Environment variable for the base URL of a self-hosted judge
pub const JUDGEKIT_BASE_URL_ENV_VAR: &str = "JUDGEKIT_BASE_URL";

/// Environment variable for the credential style of a self-hosted judge
pub const JUDGEKIT_AUTH_STYLE_ENV_VAR: &str = "JUDGEKIT_AUTH_STYLE";

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Returns the path to the judgekit home directory.
/// If the JUDGEKIT_HOME environment variable is set, returns that path.
/// Otherwise, returns the default judgekit home path.
pub fn get_judgekit_home_path() -> PathBuf {
    if let Ok(judgekit_home) = std::env::var(JUDGEKIT_HOME_ENV_VAR) {
        PathBuf::from(judgekit_home)
    } else {
        DEFAULT_JUDGEKIT_HOME.to_owned()
    }
}

/// Returns the path to the provider configuration file inside the judgekit home directory.
pub fn get_config_path() -> PathBuf {
    get_judgekit_home_path().join(CONFIG_FILENAME)
}

/// Reads an environment variable, treating unset and blank values alike.
pub fn get_non_empty_var(name: &str) -> Option<String> {
    non_empty(std::env::var(name).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
