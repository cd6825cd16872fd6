//! Judge0-compatible HTTP provider.
//!
//! Every hosted or self-hosted deployment speaks the same REST surface:
//! - `POST {base}/submissions` creates a submission
//! - `GET {base}/submissions/{token}` reports on it
//! - `GET {base}/languages` and `GET {base}/statuses` list reference data
//!
//! Deployments differ only in base URL and in the headers that carry credentials, which is
//! what [`Credentials`] captures.

use std::fmt;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, RequestBuilder, Url,
};
use serde::de::DeserializeOwned;

use crate::{
    config::{ProviderKind, ProviderSettings, RAPIDAPI_HOST},
    payload::{Language, Status, Submission, SubmissionResult},
    provider::SubmissionProvider,
    JudgekitError, JudgekitResult,
};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Fields requested when fetching a submission.
pub const SUBMISSION_FIELDS: &str = "stdout,stderr,status,compile_output,message,time,memory,exit_code";

/// Header carrying the marketplace API key.
pub const RAPIDAPI_KEY_HEADER: &str = "x-rapidapi-key";

/// Header naming the marketplace API being called.
pub const RAPIDAPI_HOST_HEADER: &str = "x-rapidapi-host";

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// How a provider authenticates its requests.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// No credentials are sent.
    Anonymous,

    /// A key header plus a host header.
    HeaderPair {
        /// The API key
        key: String,

        /// The host the gateway routes to
        host: String,
    },

    /// An `Authorization: Bearer` header.
    Bearer(String),
}

/// A provider talking to a Judge0-compatible deployment over HTTP.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    name: String,
    base_url: Url,
    credentials: Credentials,
    client: Client,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Credentials {
    /// Builds the headers attached to every request.
    pub fn headers(&self) -> JudgekitResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        match self {
            Credentials::Anonymous => {}
            Credentials::HeaderPair { key, host } => {
                headers.insert(
                    HeaderName::from_static(RAPIDAPI_KEY_HEADER),
                    header_value(key)?,
                );
                headers.insert(
                    HeaderName::from_static(RAPIDAPI_HOST_HEADER),
                    header_value(host)?,
                );
            }
            Credentials::Bearer(token) => {
                headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", token))?);
            }
        }
        Ok(headers)
    }
}

impl HttpProvider {
    /// Creates a provider for the deployment at `base_url`.
    pub fn new(
        name: impl Into<String>,
        base_url: &str,
        credentials: Credentials,
        settings: &ProviderSettings,
    ) -> JudgekitResult<Self> {
        settings.validate()?;
        let base_url = parse_base_url(base_url)?;

        let mut headers = credentials.headers()?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(settings.get_user_agent().as_str())
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| {
                JudgekitError::Configuration(format!("failed to build http client: {}", e))
            })?;

        Ok(Self {
            name: name.into(),
            base_url,
            credentials,
            client,
        })
    }

    /// Creates a provider for Judge0 CE on the RapidAPI marketplace.
    pub fn rapidapi(api_key: &str, settings: &ProviderSettings) -> JudgekitResult<Self> {
        Self::new(
            "rapidapi",
            ProviderKind::RapidApi.base_url(),
            Credentials::HeaderPair {
                key: api_key.to_string(),
                host: RAPIDAPI_HOST.to_string(),
            },
            settings,
        )
    }

    /// Creates a provider for Judge0 CE hosted by Sulu. Without a key the judge is used
    /// anonymously.
    pub fn sulu(api_key: Option<&str>, settings: &ProviderSettings) -> JudgekitResult<Self> {
        let credentials = match api_key {
            Some(key) => Credentials::Bearer(key.to_string()),
            None => Credentials::Anonymous,
        };
        Self::new("sulu", ProviderKind::Sulu.base_url(), credentials, settings)
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The credentials attached to requests.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send<T: DeserializeOwned>(
        &self,
        action: &str,
        request: RequestBuilder,
    ) -> JudgekitResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| JudgekitError::provider(action, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JudgekitError::provider(
                action,
                format!("{} responded with {}: {}", self.name, status, body.trim()),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| JudgekitError::provider(action, e))
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Parses and checks a base URL. Trailing slashes are dropped.
pub(crate) fn parse_base_url(base_url: &str) -> JudgekitResult<Url> {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(JudgekitError::Configuration(
            "base url must not be empty".to_string(),
        ));
    }

    let url = Url::parse(trimmed).map_err(|e| {
        JudgekitError::Configuration(format!("invalid base url {}: {}", trimmed, e))
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(JudgekitError::Configuration(format!(
            "base url must be an http or https url: {}",
            trimmed
        )));
    }

    Ok(url)
}

fn header_value(value: &str) -> JudgekitResult<HeaderValue> {
    let mut value = HeaderValue::from_str(value).map_err(|_| {
        JudgekitError::Configuration("credentials contain invalid header characters".to_string())
    })?;
    value.set_sensitive(true);
    Ok(value)
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

#[async_trait]
impl SubmissionProvider for HttpProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn create_submission(&self, submission: &Submission) -> JudgekitResult<SubmissionResult> {
        tracing::debug!(
            "creating submission on {} for language {}",
            self.name,
            submission.language_id
        );

        let request = self
            .client
            .post(self.endpoint(&["submissions"]))
            .json(submission);
        let result: SubmissionResult = self.send("create submission", request).await?;

        tracing::debug!("{} accepted submission {}", self.name, result.token);
        Ok(result)
    }

    async fn get_submission(&self, token: &str, wait: bool) -> JudgekitResult<SubmissionResult> {
        let base64_encoded = if wait { "false" } else { "true" };
        let request = self
            .client
            .get(self.endpoint(&["submissions", token]))
            .query(&[("fields", SUBMISSION_FIELDS), ("base64_encoded", base64_encoded)]);

        let mut result: SubmissionResult = self.send("get submission", request).await?;
        if !wait {
            result
                .decode_base64_fields()
                .map_err(|e| JudgekitError::provider("get submission", e))?;
        }
        if result.token.is_empty() {
            result.token = token.to_string();
        }

        Ok(result)
    }

    async fn get_languages(&self) -> JudgekitResult<Vec<Language>> {
        let request = self.client.get(self.endpoint(&["languages"]));
        self.send("get languages", request).await
    }

    async fn get_statuses(&self) -> JudgekitResult<Vec<Status>> {
        let request = self.client.get(self.endpoint(&["statuses"]));
        self.send("get statuses", request).await
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Anonymous => write!(f, "Anonymous"),
            Credentials::HeaderPair { host, .. } => f
                .debug_struct("HeaderPair")
                .field("key", &"****")
                .field("host", host)
                .finish(),
            Credentials::Bearer(_) => write!(f, "Bearer(****)"),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::State,
        http::{Method, StatusCode, Uri},
        response::{IntoResponse, Response},
        Json, Router,
    };
    use serde_json::{json, Value};

    use super::*;

    /// A request as seen by the fake judge.
    #[derive(Debug, Clone)]
    struct Recorded {
        method: Method,
        path: String,
        query: Option<String>,
        headers: HeaderMap,
        body: String,
    }

    #[derive(Clone, Default)]
    struct Recorder {
        requests: Arc<Mutex<Vec<Recorded>>>,
    }

    impl Recorder {
        fn requests(&self) -> Vec<Recorded> {
            self.requests.lock().unwrap().clone()
        }
    }

    async fn fake_judge(
        State(recorder): State<Recorder>,
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: String,
    ) -> Response {
        let path = uri.path().trim_start_matches("/judge0").to_string();
        recorder.requests.lock().unwrap().push(Recorded {
            method: method.clone(),
            path: path.clone(),
            query: uri.query().map(str::to_string),
            headers,
            body: body.clone(),
        });

        let base64 = uri.query().is_some_and(|q| q.contains("base64_encoded=true"));
        let stdout = if base64 { "MQo=" } else { "1\n" };
        match (method, path.as_str()) {
            (Method::POST, "/submissions") if body.contains("boom") => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "error": "bad language" })))
                    .into_response()
            }
            (Method::POST, "/submissions") => {
                (StatusCode::CREATED, Json(json!({ "token": "tok-1" }))).into_response()
            }
            (Method::GET, "/submissions/tok-1") => Json(json!({
                "stdout": stdout,
                "stderr": null,
                "status": { "id": 3, "description": "Accepted" },
                "compile_output": null,
                "message": null,
                "time": "0.010",
                "memory": 3100,
                "exit_code": 0
            }))
            .into_response(),
            (Method::GET, "/submissions/tok-garbled") => {
                (StatusCode::OK, "not json").into_response()
            }
            (Method::GET, "/languages") => Json(json!([
                { "id": 71, "name": "Python (3.8.1)" },
                { "id": 73, "name": "Rust (1.40.0)", "is_archived": false }
            ]))
            .into_response(),
            (Method::GET, "/statuses") => Json(json!([
                { "id": 1, "description": "In Queue" },
                { "id": 3, "description": "Accepted" }
            ]))
            .into_response(),
            _ => StatusCode::NOT_FOUND.into_response(),
        }
    }

    async fn spawn_fake_judge() -> (String, Recorder) {
        let recorder = Recorder::default();
        let app = Router::new()
            .fallback(fake_judge)
            .with_state(recorder.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), recorder)
    }

    fn bearer(base_url: &str) -> HttpProvider {
        HttpProvider::new(
            "test",
            base_url,
            Credentials::Bearer("secret".to_string()),
            &ProviderSettings::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_then_get_returns_issued_token() {
        let (base_url, recorder) = spawn_fake_judge().await;
        let provider = bearer(&base_url);

        let submission = Submission::compose("print(1)", 71, None, None);
        let created = provider.create_submission(&submission).await.unwrap();
        assert_eq!(created.token, "tok-1");

        let fetched = provider.get_submission(&created.token, true).await.unwrap();
        assert_eq!(fetched.token, "tok-1");
        assert_eq!(fetched.status_id(), Some(3));
        assert_eq!(fetched.stdout.as_deref(), Some("1\n"));

        let requests = recorder.requests();
        assert_eq!(requests.len(), 2);

        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[1].method, Method::GET);
        assert_eq!(requests[1].path, "/submissions/tok-1");

        let body: Value = serde_json::from_str(&requests[0].body).unwrap();
        assert_eq!(
            body,
            json!({ "source_code": "print(1)", "language_id": 71, "stdin": "" })
        );
        assert_eq!(requests[0].headers["content-type"], "application/json");
        assert_eq!(requests[0].headers["authorization"], "Bearer secret");

        let query = requests[1].query.clone().unwrap();
        assert!(query.contains("fields=stdout%2Cstderr%2Cstatus%2Ccompile_output%2Cmessage%2Ctime%2Cmemory%2Cexit_code"));
        assert!(query.contains("base64_encoded=false"));
    }

    #[tokio::test]
    async fn test_get_submission_without_wait_decodes_base64() {
        let (base_url, recorder) = spawn_fake_judge().await;
        let provider = bearer(&base_url);

        let fetched = provider.get_submission("tok-1", false).await.unwrap();
        assert_eq!(fetched.stdout.as_deref(), Some("1\n"));
        assert!(recorder.requests()[0]
            .query
            .as_deref()
            .unwrap()
            .contains("base64_encoded=true"));
    }

    #[tokio::test]
    async fn test_create_failure_is_provider_error() {
        let (base_url, _recorder) = spawn_fake_judge().await;
        let provider = bearer(&base_url);

        let submission = Submission::compose("boom", 999, None, None);
        let err = provider.create_submission(&submission).await.unwrap_err();
        assert!(matches!(err, JudgekitError::Provider(_)));
        assert_eq!(err.to_string(), "Failed to create submission");
    }

    #[tokio::test]
    async fn test_malformed_body_is_provider_error() {
        let (base_url, _recorder) = spawn_fake_judge().await;
        let provider = bearer(&base_url);

        let err = provider.get_submission("tok-garbled", true).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to get submission");
    }

    #[tokio::test]
    async fn test_reference_data_and_base_path() {
        let (base_url, recorder) = spawn_fake_judge().await;
        let provider = bearer(&format!("{}/judge0/", base_url));

        let languages = provider.get_languages().await.unwrap();
        assert_eq!(languages.len(), 2);
        assert_eq!(languages[1].is_archived, Some(false));

        let statuses = provider.get_statuses().await.unwrap();
        assert_eq!(statuses[1].description, "Accepted");

        assert!(provider.test_connection().await);
        assert_eq!(recorder.requests()[0].path, "/languages");
    }

    #[tokio::test]
    async fn test_header_pair_credentials_are_sent() {
        let (base_url, recorder) = spawn_fake_judge().await;
        let provider = HttpProvider::new(
            "gateway",
            &base_url,
            Credentials::HeaderPair {
                key: "market-key".to_string(),
                host: "judge0-ce.p.rapidapi.com".to_string(),
            },
            &ProviderSettings::default(),
        )
        .unwrap();

        provider.get_languages().await.unwrap();

        let headers = &recorder.requests()[0].headers;
        assert_eq!(headers[RAPIDAPI_KEY_HEADER], "market-key");
        assert_eq!(headers[RAPIDAPI_HOST_HEADER], "judge0-ce.p.rapidapi.com");
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_anonymous_sends_no_credentials() {
        let (base_url, recorder) = spawn_fake_judge().await;
        let provider = HttpProvider::new(
            "anon",
            &base_url,
            Credentials::Anonymous,
            &ProviderSettings::default(),
        )
        .unwrap();

        provider.get_statuses().await.unwrap();

        let headers = &recorder.requests()[0].headers;
        assert!(headers.get(AUTHORIZATION).is_none());
        assert!(headers.get(RAPIDAPI_KEY_HEADER).is_none());
        assert!(headers["user-agent"].to_str().unwrap().starts_with("judgekit/"));
    }

    #[tokio::test]
    async fn test_connection_fails_on_unknown_route() {
        let (base_url, _recorder) = spawn_fake_judge().await;
        let provider = bearer(&format!("{}/elsewhere", base_url));

        assert!(!provider.test_connection().await);
    }

    #[test]
    fn test_named_constructors() {
        let settings = ProviderSettings::default();

        let rapidapi = HttpProvider::rapidapi("key", &settings).unwrap();
        assert_eq!(rapidapi.base_url().as_str(), "https://judge0-ce.p.rapidapi.com/");
        assert_eq!(
            rapidapi.credentials(),
            &Credentials::HeaderPair {
                key: "key".to_string(),
                host: RAPIDAPI_HOST.to_string()
            }
        );

        let sulu = HttpProvider::sulu(None, &settings).unwrap();
        assert_eq!(sulu.credentials(), &Credentials::Anonymous);
        assert!(sulu.credentials().headers().unwrap().is_empty());

        let sulu = HttpProvider::sulu(Some("tok"), &settings).unwrap();
        assert_eq!(sulu.base_url().as_str(), "https://judge0-ce.p.sulu.sh/");
        assert_eq!(
            sulu.credentials().headers().unwrap()[AUTHORIZATION],
            "Bearer tok"
        );
    }

    #[test]
    fn test_zero_timeout_is_configuration_error() {
        let settings: ProviderSettings = toml::from_str("request_timeout_secs = 0").unwrap();

        let err = HttpProvider::sulu(None, &settings).unwrap_err();
        assert!(matches!(err, JudgekitError::Configuration(_)));
    }

    #[test]
    fn test_parse_base_url() {
        assert_eq!(
            parse_base_url("http://judge:2358///").unwrap().as_str(),
            "http://judge:2358/"
        );
        assert!(parse_base_url("   ").is_err());
        assert!(parse_base_url("judge.internal").is_err());
        assert!(parse_base_url("ftp://judge.internal").is_err());
    }

    #[test]
    fn test_invalid_key_is_configuration_error() {
        let err = Credentials::Bearer("bad\nkey".to_string()).headers().unwrap_err();
        assert!(matches!(err, JudgekitError::Configuration(_)));
    }

    #[test]
    fn test_credentials_debug_hides_keys() {
        let credentials = Credentials::Bearer("top-secret".to_string());
        assert!(!format!("{:?}", credentials).contains("top-secret"));
    }
}
