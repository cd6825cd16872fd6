//! Builds providers from configuration records.

use std::sync::Arc;

use crate::{
    config::{AuthStyle, ProviderConfig, ProviderKind, ProviderSettings},
    provider::{http::parse_base_url, Credentials, HttpProvider, SubmissionProvider},
    JudgekitError, JudgekitResult,
};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Creates the provider a configuration describes.
///
/// The mapping is pure: nothing is cached and no request is made. Callers keep the returned
/// provider for as long as the configuration stays the same.
///
/// ## Errors
///
/// Returns [`JudgekitError::Configuration`] when:
/// * the provider name is not one of the [`ProviderKind`] names
/// * a provider that needs an API key has none
/// * a custom base URL is empty or not an http(s) URL
pub fn create_provider(
    config: &ProviderConfig,
    settings: &ProviderSettings,
) -> JudgekitResult<Arc<dyn SubmissionProvider>> {
    let provider = match config {
        ProviderConfig::Named { provider, api_key } => {
            let kind: ProviderKind = provider.parse()?;
            let api_key = non_empty(api_key.as_deref());
            match kind {
                ProviderKind::RapidApi => {
                    let key = require_key(kind.as_str(), api_key)?;
                    HttpProvider::rapidapi(key, settings)?
                }
                ProviderKind::Sulu => HttpProvider::sulu(api_key, settings)?,
            }
        }
        ProviderConfig::Custom {
            base_url,
            api_key,
            auth_style,
        } => {
            let url = parse_base_url(base_url)?;
            let host = url.host_str().unwrap_or_default().to_string();
            let api_key = non_empty(api_key.as_deref());

            let credentials = match (auth_style, api_key) {
                (AuthStyle::HeaderPair, key) => Credentials::HeaderPair {
                    key: require_key(&host, key)?.to_string(),
                    host: host.clone(),
                },
                (AuthStyle::Bearer, Some(key)) => Credentials::Bearer(key.to_string()),
                (AuthStyle::Bearer, None) => Credentials::Anonymous,
            };

            HttpProvider::new(host, url.as_str(), credentials, settings)?
        }
    };

    tracing::info!("using judge {} at {}", provider.name(), provider.base_url());
    Ok(Arc::new(provider))
}

fn non_empty(key: Option<&str>) -> Option<&str> {
    key.map(str::trim).filter(|k| !k.is_empty())
}

fn require_key<'a>(provider: &str, key: Option<&'a str>) -> JudgekitResult<&'a str> {
    key.ok_or_else(|| {
        JudgekitError::Configuration(format!("{} requires an api key", provider))
    })
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn create(config: ProviderConfig) -> JudgekitResult<Arc<dyn SubmissionProvider>> {
        create_provider(&config, &ProviderSettings::default())
    }

    #[test]
    fn test_named_providers() {
        let provider = create(ProviderConfig::named("rapidapi", Some("k".to_string()))).unwrap();
        assert_eq!(provider.name(), "rapidapi");

        let provider = create(ProviderConfig::named("sulu", None)).unwrap();
        assert_eq!(provider.name(), "sulu");
    }

    #[test]
    fn test_unknown_provider_is_configuration_error() {
        let err = create(ProviderConfig::named("codeforces", None)).err().unwrap();
        assert!(matches!(err, JudgekitError::Configuration(_)));
        assert!(err.to_string().contains("unknown provider: codeforces"));
    }

    #[test]
    fn test_rapidapi_requires_key() {
        assert!(create(ProviderConfig::named("rapidapi", None)).is_err());
        assert!(create(ProviderConfig::named("rapidapi", Some("  ".to_string()))).is_err());
    }

    #[test]
    fn test_custom_providers() {
        let provider = create(ProviderConfig::custom(
            "http://judge.internal:2358/",
            None,
            AuthStyle::Bearer,
        ))
        .unwrap();
        assert_eq!(provider.name(), "judge.internal");

        assert!(create(ProviderConfig::custom(
            "https://judge0.example.com",
            None,
            AuthStyle::HeaderPair
        ))
        .is_err());

        assert!(create(ProviderConfig::custom(
            "https://judge0.example.com",
            Some("k".to_string()),
            AuthStyle::HeaderPair
        ))
        .is_ok());

        assert!(create(ProviderConfig::custom("", None, AuthStyle::Bearer)).is_err());
    }
}
