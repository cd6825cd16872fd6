//! Provider configuration records.
//!
//! A [`ProviderConfig`] either names a hosted judge with a built-in base URL or points at an
//! arbitrary deployment with an explicit [`AuthStyle`]. [`ProviderSettings`] carries the HTTP
//! knobs shared by every provider.

use std::{fmt, str::FromStr, time::Duration};

use getset::Getters;
use judgekit_utils::{
    env, DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT, JUDGEKIT_API_KEY_ENV_VAR,
    JUDGEKIT_AUTH_STYLE_ENV_VAR, JUDGEKIT_BASE_URL_ENV_VAR, JUDGEKIT_PROVIDER_ENV_VAR,
};
use serde::{Deserialize, Serialize};

use crate::{JudgekitError, JudgekitResult};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Base URL of the Judge0 CE deployment on RapidAPI.
pub const RAPIDAPI_BASE_URL: &str = "https://judge0-ce.p.rapidapi.com";

/// Value of the RapidAPI host header for the Judge0 CE deployment.
pub const RAPIDAPI_HOST: &str = "judge0-ce.p.rapidapi.com";

/// Base URL of the Judge0 CE deployment hosted by Sulu.
pub const SULU_BASE_URL: &str = "https://judge0-ce.p.sulu.sh";

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Which judge to talk to and how to authenticate with it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, deny_unknown_fields)]
pub enum ProviderConfig {
    /// A hosted judge with a built-in base URL.
    Named {
        /// Provider name, one of the [`ProviderKind`] names
        provider: String,

        /// API key, if the provider needs one
        #[serde(default, skip_serializing_if = "Option::is_none")]
        api_key: Option<String>,
    },

    /// Any Judge0-compatible deployment.
    Custom {
        /// Base URL of the deployment
        base_url: String,

        /// API key, if the deployment needs one
        #[serde(default, skip_serializing_if = "Option::is_none")]
        api_key: Option<String>,

        /// How the API key is attached to requests
        #[serde(default)]
        auth_style: AuthStyle,
    },
}

/// The hosted judges with built-in base URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Judge0 CE through the RapidAPI marketplace
    RapidApi,

    /// Judge0 CE hosted by Sulu
    Sulu,
}

/// How credentials are attached to requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthStyle {
    /// A key header plus a host header, as marketplace gateways expect
    HeaderPair,

    /// A single `Authorization: Bearer` header
    #[default]
    Bearer,
}

/// HTTP settings shared by every provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[getset(get = "pub with_prefix")]
pub struct ProviderSettings {
    /// Upper bound for a single request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    user_agent: String,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ProviderConfig {
    /// Creates a configuration for a hosted judge.
    pub fn named(provider: impl Into<String>, api_key: Option<String>) -> Self {
        ProviderConfig::Named {
            provider: provider.into(),
            api_key,
        }
    }

    /// Creates a configuration for an arbitrary deployment.
    pub fn custom(base_url: impl Into<String>, api_key: Option<String>, auth_style: AuthStyle) -> Self {
        ProviderConfig::Custom {
            base_url: base_url.into(),
            api_key,
            auth_style,
        }
    }

    /// Reads a configuration from the environment.
    ///
    /// `JUDGEKIT_BASE_URL` selects a custom deployment and takes precedence over
    /// `JUDGEKIT_PROVIDER`. Returns `None` when neither is set.
    pub fn from_env() -> JudgekitResult<Option<Self>> {
        Self::from_lookup(env::get_non_empty_var)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> JudgekitResult<Option<Self>> {
        let api_key = lookup(JUDGEKIT_API_KEY_ENV_VAR);

        if let Some(base_url) = lookup(JUDGEKIT_BASE_URL_ENV_VAR) {
            let auth_style = match lookup(JUDGEKIT_AUTH_STYLE_ENV_VAR) {
                Some(style) => style.parse()?,
                None => AuthStyle::default(),
            };
            return Ok(Some(Self::custom(base_url, api_key, auth_style)));
        }

        Ok(lookup(JUDGEKIT_PROVIDER_ENV_VAR).map(|provider| Self::named(provider, api_key)))
    }

    /// The configured API key, if any.
    pub fn api_key(&self) -> Option<&str> {
        match self {
            ProviderConfig::Named { api_key, .. } | ProviderConfig::Custom { api_key, .. } => {
                api_key.as_deref()
            }
        }
    }
}

impl ProviderKind {
    /// The canonical name used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::RapidApi => "rapidapi",
            ProviderKind::Sulu => "sulu",
        }
    }

    /// The built-in base URL.
    pub fn base_url(&self) -> &'static str {
        match self {
            ProviderKind::RapidApi => RAPIDAPI_BASE_URL,
            ProviderKind::Sulu => SULU_BASE_URL,
        }
    }
}

impl ProviderSettings {
    /// Creates settings with the given request timeout and user agent.
    ///
    /// The timeout is truncated to whole seconds and must be at least one second.
    pub fn new(request_timeout: Duration, user_agent: impl Into<String>) -> JudgekitResult<Self> {
        let settings = Self {
            request_timeout_secs: request_timeout.as_secs(),
            user_agent: user_agent.into(),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Checks settings that came from a file or another unchecked source.
    pub fn validate(&self) -> JudgekitResult<()> {
        if self.request_timeout_secs == 0 {
            return Err(JudgekitError::Configuration(
                "request timeout must be at least one second".to_string(),
            ));
        }
        Ok(())
    }

    /// The request timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_secs()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn mask(key: Option<&str>) -> String {
    match key {
        None => "none".to_string(),
        Some(key) => {
            let chars: Vec<char> = key.chars().collect();
            if chars.len() <= 4 {
                "****".to_string()
            } else {
                let tail: String = chars[chars.len() - 4..].iter().collect();
                format!("****{}", tail)
            }
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Default for ProviderSettings {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT).expect("default provider settings are valid")
    }
}

impl FromStr for ProviderKind {
    type Err = JudgekitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rapidapi" => Ok(ProviderKind::RapidApi),
            "sulu" => Ok(ProviderKind::Sulu),
            other => Err(JudgekitError::Configuration(format!(
                "unknown provider: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AuthStyle {
    type Err = JudgekitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "header-pair" => Ok(AuthStyle::HeaderPair),
            "bearer" => Ok(AuthStyle::Bearer),
            other => Err(JudgekitError::Configuration(format!(
                "unknown auth style: {}. Valid styles: header-pair, bearer",
                other
            ))),
        }
    }
}

impl fmt::Display for AuthStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthStyle::HeaderPair => write!(f, "header-pair"),
            AuthStyle::Bearer => write!(f, "bearer"),
        }
    }
}

// API keys never show up in logs or debug output.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderConfig::Named { provider, api_key } => f
                .debug_struct("Named")
                .field("provider", provider)
                .field("api_key", &mask(api_key.as_deref()))
                .finish(),
            ProviderConfig::Custom {
                base_url,
                api_key,
                auth_style,
            } => f
                .debug_struct("Custom")
                .field("base_url", base_url)
                .field("api_key", &mask(api_key.as_deref()))
                .field("auth_style", auth_style)
                .finish(),
        }
    }
}

impl fmt::Display for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderConfig::Named { provider, api_key } => {
                write!(f, "provider={} api_key={}", provider, mask(api_key.as_deref()))
            }
            ProviderConfig::Custom {
                base_url,
                api_key,
                auth_style,
            } => write!(
                f,
                "base_url={} auth_style={} api_key={}",
                base_url,
                auth_style,
                mask(api_key.as_deref())
            ),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
