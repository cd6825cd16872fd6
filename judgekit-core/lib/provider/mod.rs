//! Submission providers.
//!
//! A provider is a judging backend reachable over HTTP. Every backend supports the same
//! operations; they differ in base URL and in how credentials travel with a request.
//!
//! The module provides:
//! - The [`SubmissionProvider`] trait every backend implements
//! - [`HttpProvider`], the Judge0-compatible HTTP implementation
//! - [`create_provider`], which builds a provider from a [`ProviderConfig`](crate::config::ProviderConfig)

mod factory;
mod http;

#[cfg(test)]
pub(crate) mod scripted;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{
    orchestrator::{self, PollPolicy},
    payload::{Language, Status, Submission, SubmissionOptions, SubmissionResult},
    JudgekitResult,
};

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use factory::*;
pub use http::*;

//--------------------------------------------------------------------------------------------------
// Traits
//--------------------------------------------------------------------------------------------------

/// A judging backend that accepts submissions and reports on them.
#[async_trait]
pub trait SubmissionProvider: Send + Sync {
    /// A short name for the backend, used in logs.
    fn name(&self) -> &str;

    /// Sends a submission to the judge and returns as soon as the judge has accepted it.
    ///
    /// The returned result carries at least the token; its status is usually "In Queue".
    /// Failures are not retried.
    async fn create_submission(&self, submission: &Submission) -> JudgekitResult<SubmissionResult>;

    /// Fetches the current state of a submission.
    ///
    /// `wait` does not block: it selects whether the judge sends text fields as plain text
    /// (`true`) or base64-encoded for local decoding (`false`).
    async fn get_submission(&self, token: &str, wait: bool) -> JudgekitResult<SubmissionResult>;

    /// Lists the languages the judge supports.
    async fn get_languages(&self) -> JudgekitResult<Vec<Language>>;

    /// Lists the statuses the judge reports.
    async fn get_statuses(&self) -> JudgekitResult<Vec<Status>>;

    /// Checks that the judge is reachable and accepts the configured credentials.
    async fn test_connection(&self) -> bool {
        match self.get_languages().await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("connection test against {} failed: {}", self.name(), e);
                false
            }
        }
    }

    /// Submits code and polls until the judge reports a finished status.
    ///
    /// Uses the default [`PollPolicy`] and cannot be cancelled; use [`orchestrator::execute`]
    /// directly for either.
    async fn execute_code(
        &self,
        source_code: &str,
        language_id: u32,
        input: Option<&str>,
        options: Option<SubmissionOptions>,
    ) -> JudgekitResult<SubmissionResult> {
        let submission = Submission::compose(source_code, language_id, input, options);
        orchestrator::execute(
            self,
            &submission,
            &PollPolicy::default(),
            &CancellationToken::new(),
        )
        .await
    }
}
