//! Status taxonomy for judge submissions.
//!
//! A judge reports progress as a numeric status id. This module maps those ids to labels and to a
//! semantic [`StatusClass`], decides which ids are terminal, and keeps a [`StatusCatalog`] of
//! labels that can be refreshed from the judge's own `/statuses` listing.

use std::{collections::BTreeMap, fmt};

use crate::{payload::Status, provider::SubmissionProvider};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Status id of a submission waiting for a worker.
pub const STATUS_IN_QUEUE: u32 = 1;

/// Status id of a submission being compiled or run.
pub const STATUS_PROCESSING: u32 = 2;

/// Known statuses with their labels and classes.
pub const KNOWN_STATUSES: &[(u32, &str, StatusClass)] = &[
    (1, "In Queue", StatusClass::Queued),
    (2, "Processing", StatusClass::Processing),
    (3, "Accepted", StatusClass::Accepted),
    (4, "Wrong Answer", StatusClass::WrongAnswer),
    (5, "Time Limit Exceeded", StatusClass::TimeLimitExceeded),
    (6, "Compilation Error", StatusClass::CompilationError),
    (7, "Runtime Error (SIGSEGV)", StatusClass::RuntimeError),
    (8, "Runtime Error (SIGXFSZ)", StatusClass::RuntimeError),
    (9, "Runtime Error (SIGFPE)", StatusClass::RuntimeError),
    (10, "Runtime Error (SIGABRT)", StatusClass::RuntimeError),
    (11, "Runtime Error (NZEC)", StatusClass::RuntimeError),
    (12, "Runtime Error (Other)", StatusClass::RuntimeError),
    (13, "Internal Error", StatusClass::InternalError),
    (14, "Exec Format Error", StatusClass::ExecFormatError),
];

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// What a status id means for the submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    /// Waiting for a worker
    Queued,

    /// Being compiled or run
    Processing,

    /// Ran and matched the expected output, or ran cleanly with none given
    Accepted,

    /// Ran but did not match the expected output
    WrongAnswer,

    /// Stopped for exceeding its time limit
    TimeLimitExceeded,

    /// Did not compile
    CompilationError,

    /// Crashed or exited with a non-zero code
    RuntimeError,

    /// The judge itself failed
    InternalError,

    /// The produced binary could not be executed
    ExecFormatError,

    /// An id this crate does not know
    Unknown,
}

/// Status labels for display, seeded from [`KNOWN_STATUSES`] and optionally refreshed from a judge.
#[derive(Debug, Clone)]
pub struct StatusCatalog {
    labels: BTreeMap<u32, String>,
    source: CatalogSource,
}

/// Where the labels of a [`StatusCatalog`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    /// The built-in table
    Builtin,

    /// The judge's `/statuses` listing
    Judge,
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Whether a status id means the judge is done with the submission.
pub fn is_terminal(id: u32) -> bool {
    id > STATUS_PROCESSING
}

/// Maps a status id to its class.
pub fn classify(id: u32) -> StatusClass {
    KNOWN_STATUSES
        .iter()
        .find(|(known, _, _)| *known == id)
        .map(|(_, _, class)| *class)
        .unwrap_or(StatusClass::Unknown)
}

/// The built-in label for a status id.
pub fn builtin_label(id: u32) -> Option<&'static str> {
    KNOWN_STATUSES
        .iter()
        .find(|(known, _, _)| *known == id)
        .map(|(_, label, _)| *label)
}

/// The message a host shows when a finished submission failed to compile or run.
///
/// Wrong answers are not failures: the program ran and its output is shown for comparison.
pub fn outcome_error(id: u32) -> Option<&'static str> {
    match id {
        5 => Some("Time Limit Exceeded"),
        6 => Some("Compilation Error"),
        7..=12 => Some("Runtime Error"),
        13 => Some("Internal Error"),
        _ => None,
    }
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl StatusClass {
    /// Whether the class is a failure a host should report as an error.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            StatusClass::TimeLimitExceeded
                | StatusClass::CompilationError
                | StatusClass::RuntimeError
                | StatusClass::InternalError
        )
    }
}

impl StatusCatalog {
    /// Creates a catalog holding the built-in labels.
    pub fn builtin() -> Self {
        let labels = KNOWN_STATUSES
            .iter()
            .map(|(id, label, _)| (*id, label.to_string()))
            .collect();

        Self {
            labels,
            source: CatalogSource::Builtin,
        }
    }

    /// Creates a catalog from a judge's status listing, warning about every entry that
    /// disagrees with the built-in table.
    pub fn from_statuses(statuses: &[Status]) -> Self {
        reconcile(statuses);

        let labels = statuses
            .iter()
            .map(|s| (s.id, s.description.clone()))
            .collect();

        Self {
            labels,
            source: CatalogSource::Judge,
        }
    }

    /// Fetches the judge's status listing and returns a catalog built from it, or the built-in
    /// catalog if the judge could not be asked.
    pub async fn fetch<P>(provider: &P) -> Self
    where
        P: SubmissionProvider + ?Sized,
    {
        match provider.get_statuses().await {
            Ok(statuses) if !statuses.is_empty() => Self::from_statuses(&statuses),
            Ok(_) => {
                tracing::warn!(
                    "{} returned no statuses, using built-in status table",
                    provider.name()
                );
                Self::builtin()
            }
            Err(e) => {
                tracing::warn!(
                    "could not fetch statuses from {}, using built-in status table: {}",
                    provider.name(),
                    e
                );
                Self::builtin()
            }
        }
    }

    /// The label of a status id, falling back to the built-in table for ids the judge did not list.
    pub fn label(&self, id: u32) -> String {
        self.labels
            .get(&id)
            .cloned()
            .or_else(|| builtin_label(id).map(str::to_string))
            .unwrap_or_else(|| format!("Unknown Status ({})", id))
    }

    /// Where the labels came from.
    pub fn source(&self) -> CatalogSource {
        self.source
    }

    /// Iterates over the catalog as `(id, label, class)` triples ordered by id.
    pub fn entries(&self) -> impl Iterator<Item = (u32, &str, StatusClass)> + '_ {
        self.labels
            .iter()
            .map(|(id, label)| (*id, label.as_str(), classify(*id)))
    }
}

fn reconcile(statuses: &[Status]) {
    for status in statuses {
        match builtin_label(status.id) {
            Some(label) if label != status.description => {
                tracing::warn!(
                    "judge describes status {} as {:?}, built-in table says {:?}",
                    status.id,
                    status.description,
                    label
                );
            }
            None => {
                tracing::warn!(
                    "judge lists status {} ({:?}) missing from the built-in table",
                    status.id,
                    status.description
                );
            }
            _ => {}
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Default for StatusCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StatusClass::Queued => "queued",
            StatusClass::Processing => "processing",
            StatusClass::Accepted => "accepted",
            StatusClass::WrongAnswer => "wrong answer",
            StatusClass::TimeLimitExceeded => "time limit exceeded",
            StatusClass::CompilationError => "compilation error",
            StatusClass::RuntimeError => "runtime error",
            StatusClass::InternalError => "internal error",
            StatusClass::ExecFormatError => "exec format error",
            StatusClass::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::scripted::ScriptedProvider;

    #[test]
    fn test_outcome_error_by_id() {
        assert_eq!(outcome_error(3), None);
        assert_eq!(outcome_error(4), None);
        assert_eq!(outcome_error(5), Some("Time Limit Exceeded"));
        assert_eq!(outcome_error(6), Some("Compilation Error"));
        for id in 7..=12 {
            assert_eq!(outcome_error(id), Some("Runtime Error"));
        }
        assert_eq!(outcome_error(13), Some("Internal Error"));
        assert_eq!(outcome_error(14), None);
        assert_eq!(outcome_error(0), None);
        assert_eq!(outcome_error(99), None);
    }

    #[test]
    fn test_outcome_error_agrees_with_class() {
        for id in 0..20 {
            assert_eq!(outcome_error(id).is_some(), classify(id).is_failure(), "id {}", id);
        }
    }

    #[test]
    fn test_terminal_ids() {
        assert!(!is_terminal(STATUS_IN_QUEUE));
        assert!(!is_terminal(STATUS_PROCESSING));
        assert!(is_terminal(3));
        assert!(is_terminal(14));
        assert!(is_terminal(42));
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(1), StatusClass::Queued);
        assert_eq!(classify(4), StatusClass::WrongAnswer);
        assert_eq!(classify(9), StatusClass::RuntimeError);
        assert_eq!(classify(14), StatusClass::ExecFormatError);
        assert_eq!(classify(15), StatusClass::Unknown);
    }

    #[test]
    fn test_catalog_prefers_judge_labels() {
        let catalog = StatusCatalog::from_statuses(&[
            Status {
                id: 3,
                description: "OK".to_string(),
            },
            Status {
                id: 20,
                description: "Queued For Rejudge".to_string(),
            },
        ]);

        assert_eq!(catalog.source(), CatalogSource::Judge);
        assert_eq!(catalog.label(3), "OK");
        assert_eq!(catalog.label(20), "Queued For Rejudge");
        assert_eq!(catalog.label(6), "Compilation Error");
        assert_eq!(catalog.label(77), "Unknown Status (77)");

        let entries: Vec<_> = catalog.entries().collect();
        assert_eq!(entries[0], (3, "OK", StatusClass::Accepted));
        assert_eq!(entries[1], (20, "Queued For Rejudge", StatusClass::Unknown));
    }

    #[tokio::test]
    async fn test_fetch_falls_back_to_builtin() {
        let provider = ScriptedProvider::new().failing_statuses();
        let catalog = StatusCatalog::fetch(&provider).await;

        assert_eq!(catalog.source(), CatalogSource::Builtin);
        assert_eq!(catalog.entries().count(), KNOWN_STATUSES.len());
        assert_eq!(catalog.label(11), "Runtime Error (NZEC)");
    }

    #[tokio::test]
    async fn test_fetch_uses_judge_statuses() {
        let provider = ScriptedProvider::new();
        let catalog = StatusCatalog::fetch(&provider).await;

        assert_eq!(catalog.source(), CatalogSource::Judge);
        assert_eq!(catalog.label(1), "In Queue");
    }
}
