//! An in-memory provider that replays a script of poll responses.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use tokio::time::Instant;

use crate::{
    payload::{Language, Status, Submission, SubmissionResult},
    provider::SubmissionProvider,
    status, JudgekitError, JudgekitResult,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// One response to a `get_submission` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PollStep {
    /// Report the given status id
    Status(u32),

    /// Fail the call
    Fail,
}

/// A provider whose answers are fixed up front. Once the script runs out the last step repeats.
pub(crate) struct ScriptedProvider {
    name: String,
    create_fails: bool,
    statuses_fail: bool,
    languages_fail: bool,
    script: Mutex<VecDeque<PollStep>>,
    last: Mutex<PollStep>,
    creates: AtomicUsize,
    submissions: Mutex<Vec<Submission>>,
    polls: Mutex<Vec<Instant>>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ScriptedProvider {
    pub(crate) fn new() -> Self {
        Self {
            name: "scripted".to_string(),
            create_fails: false,
            statuses_fail: false,
            languages_fail: false,
            script: Mutex::new(VecDeque::new()),
            last: Mutex::new(PollStep::Status(3)),
            creates: AtomicUsize::new(0),
            submissions: Mutex::new(Vec::new()),
            polls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub(crate) fn with_script(self, steps: impl IntoIterator<Item = PollStep>) -> Self {
        self.script.lock().unwrap().extend(steps);
        self
    }

    /// Reports `id` for `times` polls, then `then` from there on.
    pub(crate) fn status_run(self, id: u32, times: usize, then: u32) -> Self {
        self.with_script(
            std::iter::repeat(PollStep::Status(id))
                .take(times)
                .chain([PollStep::Status(then)]),
        )
    }

    pub(crate) fn queued_forever(self) -> Self {
        self.with_script([PollStep::Status(status::STATUS_IN_QUEUE)])
    }

    pub(crate) fn failing_create(mut self) -> Self {
        self.create_fails = true;
        self
    }

    pub(crate) fn failing_statuses(mut self) -> Self {
        self.statuses_fail = true;
        self
    }

    pub(crate) fn failing_languages(mut self) -> Self {
        self.languages_fail = true;
        self
    }

    pub(crate) fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    /// The most recent submission passed to `create_submission`.
    pub(crate) fn last_submission(&self) -> Option<Submission> {
        self.submissions.lock().unwrap().last().cloned()
    }

    pub(crate) fn poll_count(&self) -> usize {
        self.polls.lock().unwrap().len()
    }

    pub(crate) fn poll_times(&self) -> Vec<Instant> {
        self.polls.lock().unwrap().clone()
    }

    fn next_step(&self) -> PollStep {
        let mut last = self.last.lock().unwrap();
        if let Some(step) = self.script.lock().unwrap().pop_front() {
            *last = step;
        }
        *last
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

#[async_trait]
impl SubmissionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn create_submission(&self, submission: &Submission) -> JudgekitResult<SubmissionResult> {
        let n = self.creates.fetch_add(1, Ordering::SeqCst);
        self.submissions.lock().unwrap().push(submission.clone());
        if self.create_fails {
            return Err(JudgekitError::provider("create submission", "connection refused"));
        }

        Ok(SubmissionResult {
            token: format!("{}-{}", self.name, n + 1),
            status: Some(Status {
                id: status::STATUS_IN_QUEUE,
                description: "In Queue".to_string(),
            }),
            ..Default::default()
        })
    }

    async fn get_submission(&self, token: &str, _wait: bool) -> JudgekitResult<SubmissionResult> {
        self.polls.lock().unwrap().push(Instant::now());

        match self.next_step() {
            PollStep::Fail => Err(JudgekitError::provider("get submission", "connection reset")),
            PollStep::Status(id) => Ok(SubmissionResult {
                token: token.to_string(),
                status: Some(Status {
                    id,
                    description: status::builtin_label(id).unwrap_or("Unknown").to_string(),
                }),
                stdout: status::is_terminal(id).then(|| "1\n".to_string()),
                compile_output: (id == 6).then(|| "main.c:1: error".to_string()),
                ..Default::default()
            }),
        }
    }

    async fn get_languages(&self) -> JudgekitResult<Vec<Language>> {
        if self.languages_fail {
            return Err(JudgekitError::provider("get languages", "unauthorized"));
        }

        Ok(vec![Language {
            id: 71,
            name: "Python (3.8.1)".to_string(),
            is_archived: None,
        }])
    }

    async fn get_statuses(&self) -> JudgekitResult<Vec<Status>> {
        if self.statuses_fail {
            return Err(JudgekitError::provider("get statuses", "unauthorized"));
        }

        Ok(status::KNOWN_STATUSES
            .iter()
            .map(|(id, label, _)| Status {
                id: *id,
                description: label.to_string(),
            })
            .collect())
    }
}
