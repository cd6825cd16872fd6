//! The submission lifecycle: create once, then poll until the judge is done.
//!
//! ```text
//! Created ──► Polling(1..=max_attempts) ──► Completed
//!                 │                    ├──► TimedOut   (attempts exhausted)
//!                 │                    └──► Cancelled  (token cancelled)
//!                 └──────────────────────► Failed     (create or poll errored)
//! ```
//!
//! Each polling attempt makes exactly one `get_submission` call. A non-terminal answer is
//! followed by exactly one fixed-interval sleep, unless it was the last attempt. There is no
//! backoff and no jitter. Errors end the loop at once; they are never retried here.

use std::time::Duration;

use judgekit_utils::{DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL};
use tokio_util::sync::CancellationToken;

use crate::{
    payload::{Submission, SubmissionResult},
    provider::SubmissionProvider,
    JudgekitError, JudgekitResult,
};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Message carried by the error raised when the polling budget runs out.
pub const TIMEOUT_MESSAGE: &str = "Submission timed out";

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// How often and how long a pending submission is polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Time between two polls
    pub interval: Duration,

    /// Maximum number of polls
    pub max_attempts: u32,
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Creates `submission` on `provider` and polls it until the judge reports a terminal status.
///
/// ## Errors
///
/// * Any error from `create_submission` or `get_submission`, propagated unchanged
/// * [`JudgekitError::Timeout`] when `policy.max_attempts` polls all came back pending
/// * [`JudgekitError::Cancelled`] when `cancel` fires before a poll or during a sleep
pub async fn execute<P>(
    provider: &P,
    submission: &Submission,
    policy: &PollPolicy,
    cancel: &CancellationToken,
) -> JudgekitResult<SubmissionResult>
where
    P: SubmissionProvider + ?Sized,
{
    if cancel.is_cancelled() {
        return Err(JudgekitError::Cancelled);
    }

    let created = provider.create_submission(submission).await?;
    let token = created.token;
    if token.is_empty() {
        return Err(JudgekitError::provider(
            "create submission",
            format!("{} returned no token", provider.name()),
        ));
    }
    tracing::debug!("submission {} created on {}", token, provider.name());

    for attempt in 1..=policy.max_attempts {
        if cancel.is_cancelled() {
            tracing::info!("submission {} cancelled before poll {}", token, attempt);
            return Err(JudgekitError::Cancelled);
        }

        let result = provider.get_submission(&token, true).await?;
        if result.is_terminal() {
            tracing::debug!(
                "submission {} finished with status {:?} after {} poll(s)",
                token,
                result.status_id(),
                attempt
            );
            return Ok(result);
        }

        tracing::trace!(
            "submission {} pending (status {:?}), poll {}/{}",
            token,
            result.status_id(),
            attempt,
            policy.max_attempts
        );

        if attempt < policy.max_attempts {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!("submission {} cancelled while waiting", token);
                    return Err(JudgekitError::Cancelled);
                }
                _ = tokio::time::sleep(policy.interval) => {}
            }
        }
    }

    tracing::warn!(
        "submission {} still pending after {} polls",
        token,
        policy.max_attempts
    );
    Err(JudgekitError::Timeout(TIMEOUT_MESSAGE.to_string()))
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
