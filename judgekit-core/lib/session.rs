//! The execution session: the state of "the current run" for an interactive host.
//!
//! A host (an editor, the CLI) owns one [`ExecutionSession`] for its lifetime. The session holds
//! the active provider, the user's custom stdin, whether a run is in flight, and the outcome of
//! the last run. It never returns errors to the host: every failure ends up in [`error`].
//!
//! Only one run may be in flight at a time. A second [`execute_code`] call made while the first
//! is still running is rejected with [`RunOutcome::Rejected`] and leaves the session untouched.
//!
//! [`error`]: ExecutionSession::error
//! [`execute_code`]: ExecutionSession::execute_code

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio_util::sync::CancellationToken;

use crate::{
    config::{ProviderConfig, ProviderSettings},
    language::LanguageResolver,
    orchestrator::{self, PollPolicy},
    payload::{Submission, SubmissionOptions, SubmissionResult},
    provider::{create_provider, SubmissionProvider},
    status, JudgekitResult,
};

//--------------------------------------------------------------------------------------------------
// Traits
//--------------------------------------------------------------------------------------------------

/// The editor surface a session reads code from.
pub trait SourceBuffer: Send + Sync {
    /// The current program text.
    fn code(&self) -> String;

    /// The short name of the chosen language.
    fn language(&self) -> String;
}

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A fixed piece of code and its language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSnapshot {
    /// Program text
    pub code: String,

    /// Language short name
    pub language: String,
}

/// How an [`ExecutionSession::execute_code`] call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The judge finished the submission. The result may still carry a classified error.
    Completed,

    /// The run did not produce a result; see [`ExecutionSession::error`].
    Failed,

    /// Another run was in flight; nothing changed.
    Rejected,
}

/// A point-in-time copy of the session's observable state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    /// Whether a run is in flight
    pub busy: bool,

    /// The last result the judge reported
    pub result: Option<SubmissionResult>,

    /// The last error: a run failure, or the classified failure of the last result
    pub error: Option<String>,

    /// Text used as stdin for the next run
    pub custom_input: String,
}

/// Holds the active provider and the state of the current run.
pub struct ExecutionSession {
    provider: RwLock<Option<ProviderSlot>>,
    languages: Arc<dyn LanguageResolver>,
    policy: PollPolicy,
    state: Mutex<SessionState>,
}

struct ProviderSlot {
    provider: Arc<dyn SubmissionProvider>,
    connected: bool,
}

#[derive(Default)]
struct SessionState {
    busy: bool,
    run: RunState,
    custom_input: String,
    cancel: Option<CancellationToken>,
}

/// Either nothing, a result (with its classified error, if any) or a failure. Never two at once.
#[derive(Default)]
enum RunState {
    #[default]
    Idle,
    Finished {
        result: SubmissionResult,
        outcome_error: Option<&'static str>,
    },
    Failed(String),
}

/// Clears the busy flag when a run ends, including when its future is dropped.
struct BusyGuard<'a> {
    session: &'a ExecutionSession,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl SourceSnapshot {
    /// Creates a snapshot.
    pub fn new(code: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
        }
    }
}

impl ExecutionSession {
    /// Creates a session without a provider.
    pub fn new(languages: Arc<dyn LanguageResolver>) -> Self {
        Self {
            provider: RwLock::new(None),
            languages,
            policy: PollPolicy::default(),
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Replaces the poll policy used by future runs.
    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Builds the provider a configuration describes and makes it the active one.
    ///
    /// The new provider counts as not connected until [`validate_connection`](Self::validate_connection)
    /// succeeds. Runs already in flight keep using the provider they started with.
    pub fn install_provider(
        &self,
        config: &ProviderConfig,
        settings: &ProviderSettings,
    ) -> JudgekitResult<()> {
        let provider = create_provider(config, settings)?;
        self.set_provider(provider, false);
        Ok(())
    }

    /// Makes `provider` the active one.
    pub fn set_provider(&self, provider: Arc<dyn SubmissionProvider>, connected: bool) {
        tracing::debug!("switching active provider to {}", provider.name());
        *self.provider_slot() = Some(ProviderSlot {
            provider,
            connected,
        });
    }

    /// Drops the active provider.
    pub fn clear_provider(&self) {
        *self.provider_slot() = None;
    }

    /// The active provider, if any.
    pub fn provider(&self) -> Option<Arc<dyn SubmissionProvider>> {
        self.provider_read().as_ref().map(|slot| slot.provider.clone())
    }

    /// Whether the active provider passed its connection test.
    pub fn is_connected(&self) -> bool {
        self.provider_read()
            .as_ref()
            .is_some_and(|slot| slot.connected)
    }

    /// Tests the active provider's connection and records the outcome.
    ///
    /// If the provider is replaced while the test runs, the outcome is discarded.
    pub async fn validate_connection(&self) -> bool {
        let Some(provider) = self.provider() else {
            return false;
        };

        let connected = provider.test_connection().await;

        if let Some(slot) = self.provider_slot().as_mut() {
            if Arc::ptr_eq(&slot.provider, &provider) {
                slot.connected = connected;
            }
        }

        connected
    }

    /// Whether [`execute_code`](Self::execute_code) would reach the judge for `buffer`.
    pub fn can_execute(&self, buffer: &dyn SourceBuffer) -> bool {
        self.prepare(buffer.code(), &buffer.language()).is_ok()
    }

    /// Runs the buffer's code on the active provider with the session's custom stdin.
    pub async fn execute_code(&self, buffer: &dyn SourceBuffer) -> RunOutcome {
        self.execute_code_with(buffer, None).await
    }

    /// Like [`execute_code`](Self::execute_code), with submission overrides such as limits or
    /// an expected output.
    pub async fn execute_code_with(
        &self,
        buffer: &dyn SourceBuffer,
        options: Option<SubmissionOptions>,
    ) -> RunOutcome {
        // The buffer belongs to the host and may call back into the session
        let code = buffer.code();
        let language = buffer.language();

        let (provider, submission, cancel) = {
            let mut state = self.state();
            if state.busy {
                tracing::warn!("a run is already in flight, rejecting new run");
                return RunOutcome::Rejected;
            }

            let (provider, language_id, code) = match self.prepare(code, &language) {
                Ok(prepared) => prepared,
                Err(reason) => {
                    tracing::debug!("not executing: {}", reason);
                    state.run = RunState::Failed(reason);
                    return RunOutcome::Failed;
                }
            };

            let input = (!state.custom_input.is_empty()).then_some(state.custom_input.as_str());
            let submission = Submission::compose(code, language_id, input, options);

            let cancel = CancellationToken::new();
            state.busy = true;
            state.run = RunState::Idle;
            state.cancel = Some(cancel.clone());

            (provider, submission, cancel)
        };

        let _guard = BusyGuard { session: self };
        tracing::info!(
            "executing language {} on {}",
            submission.language_id,
            provider.name()
        );

        let outcome =
            orchestrator::execute(provider.as_ref(), &submission, &self.policy, &cancel).await;

        let mut state = self.state();
        match outcome {
            Ok(result) => {
                let outcome_error = result.status_id().and_then(status::outcome_error);
                if let Some(message) = outcome_error {
                    tracing::info!("submission {} finished with {}", result.token, message);
                }
                state.run = RunState::Finished {
                    result,
                    outcome_error,
                };
                RunOutcome::Completed
            }
            Err(e) => {
                tracing::info!("run failed: {}", e);
                state.run = RunState::Failed(e.to_string());
                RunOutcome::Failed
            }
        }
    }

    /// Cancels the run in flight. Returns false when nothing was running.
    pub fn cancel(&self) -> bool {
        match self.state().cancel.as_ref() {
            Some(cancel) => {
                cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Forgets the last result and error. The busy flag and custom stdin are kept.
    pub fn clear_result(&self) {
        self.state().run = RunState::Idle;
    }

    /// Replaces the custom stdin used by the next run.
    pub fn set_custom_input(&self, input: impl Into<String>) {
        self.state().custom_input = input.into();
    }

    /// The custom stdin used by the next run.
    pub fn custom_input(&self) -> String {
        self.state().custom_input.clone()
    }

    /// Whether a run is in flight.
    pub fn is_busy(&self) -> bool {
        self.state().busy
    }

    /// The last result the judge reported.
    pub fn result(&self) -> Option<SubmissionResult> {
        match &self.state().run {
            RunState::Finished { result, .. } => Some(result.clone()),
            _ => None,
        }
    }

    /// The last error: why the last run failed, or the classified failure of its result.
    pub fn error(&self) -> Option<String> {
        match &self.state().run {
            RunState::Idle => None,
            RunState::Finished { outcome_error, .. } => outcome_error.map(str::to_string),
            RunState::Failed(message) => Some(message.clone()),
        }
    }

    /// A copy of everything a host renders.
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state();
        let (result, error) = match &state.run {
            RunState::Idle => (None, None),
            RunState::Finished {
                result,
                outcome_error,
            } => (Some(result.clone()), outcome_error.map(str::to_string)),
            RunState::Failed(message) => (None, Some(message.clone())),
        };

        SessionSnapshot {
            busy: state.busy,
            result,
            error,
            custom_input: state.custom_input.clone(),
        }
    }

    fn prepare(
        &self,
        code: String,
        language: &str,
    ) -> Result<(Arc<dyn SubmissionProvider>, u32, String), String> {
        let provider = match self.provider_read().as_ref() {
            None => return Err("No judge is configured".to_string()),
            Some(slot) if !slot.connected => {
                return Err(format!(
                    "Judge {} is not connected, check the provider configuration",
                    slot.provider.name()
                ))
            }
            Some(slot) => slot.provider.clone(),
        };

        if code.trim().is_empty() {
            return Err("No code to execute".to_string());
        }

        let language_id = self
            .languages
            .resolve(language)
            .ok_or_else(|| format!("Language '{}' is not supported by the judge", language))?;

        Ok((provider, language_id, code))
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn provider_read(&self) -> RwLockReadGuard<'_, Option<ProviderSlot>> {
        self.provider.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn provider_slot(&self) -> RwLockWriteGuard<'_, Option<ProviderSlot>> {
        self.provider.write().unwrap_or_else(PoisonError::into_inner)
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl SourceBuffer for SourceSnapshot {
    fn code(&self) -> String {
        self.code.clone()
    }

    fn language(&self) -> String {
        self.language.clone()
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.session.state();
        state.busy = false;
        state.cancel = None;
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
