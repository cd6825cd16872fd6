//! Request and response payloads exchanged with a judge.
//!
//! This module defines the data structures for:
//! - Submissions sent to a judge and the overrides a caller may layer on top
//! - Submission results reported back by a judge
//! - Reference data (languages and statuses) listed by a judge
//!
//! Field names follow the judge's JSON representation so the types serialize as-is.

use base64::{prelude::BASE64_STANDARD, Engine};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::status;

//--------------------------------------------------------------------------------------------------
// Types: Requests
//--------------------------------------------------------------------------------------------------

/// A piece of source code to be compiled and run by a judge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
pub struct Submission {
    /// The program text
    #[builder(setter(into))]
    pub source_code: String,

    /// The judge's id for the language the program is written in
    pub language_id: u32,

    /// Text fed to the program's standard input
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdin: Option<String>,

    /// Output the judge compares the program's stdout against
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<String>,

    /// CPU time limit in seconds
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_time_limit: Option<f64>,

    /// Memory limit in kilobytes
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_limit: Option<u64>,

    /// Extra flags passed to the compiler
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler_options: Option<String>,

    /// Arguments passed to the program
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_line_arguments: Option<String>,
}

/// Overrides applied on top of a composed [`Submission`]. Every field that is set replaces the
/// corresponding submission field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionOptions {
    /// Replacement program text
    pub source_code: Option<String>,

    /// Replacement language id
    pub language_id: Option<u32>,

    /// Replacement standard input
    pub stdin: Option<String>,

    /// Expected output for the judge's own comparison
    pub expected_output: Option<String>,

    /// CPU time limit in seconds
    pub cpu_time_limit: Option<f64>,

    /// Memory limit in kilobytes
    pub memory_limit: Option<u64>,

    /// Extra compiler flags
    pub compiler_options: Option<String>,

    /// Program arguments
    pub command_line_arguments: Option<String>,
}

//--------------------------------------------------------------------------------------------------
// Types: Responses
//--------------------------------------------------------------------------------------------------

/// The judge's view of a submission at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResult {
    /// Opaque identifier the judge assigned to the submission
    #[serde(default)]
    pub token: String,

    /// Current status of the submission
    #[serde(default)]
    pub status: Option<Status>,

    /// Program standard output
    #[serde(default)]
    pub stdout: Option<String>,

    /// Program standard error
    #[serde(default)]
    pub stderr: Option<String>,

    /// Compiler output, set when compilation produced diagnostics
    #[serde(default)]
    pub compile_output: Option<String>,

    /// Judge message, typically describing why the program was stopped
    #[serde(default)]
    pub message: Option<String>,

    /// Elapsed CPU time in seconds, formatted by the judge
    #[serde(default)]
    pub time: Option<String>,

    /// Peak memory usage in kilobytes
    #[serde(default)]
    pub memory: Option<u64>,

    /// Exit code of the program
    #[serde(default)]
    pub exit_code: Option<i32>,
}

/// A language a judge can compile and run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// The judge's id for the language
    pub id: u32,

    /// Display name, usually including the compiler version
    pub name: String,

    /// Whether the judge keeps the language only for old submissions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
}

/// A status a submission can be in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Status {
    /// Numeric status id
    pub id: u32,

    /// Human readable label
    pub description: String,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Submission {
    /// Composes a submission from its essential parts. Standard input defaults to an empty
    /// string; `options` may then replace any field.
    pub fn compose(
        source_code: impl Into<String>,
        language_id: u32,
        input: Option<&str>,
        options: Option<SubmissionOptions>,
    ) -> Self {
        let submission = Submission::builder()
            .source_code(source_code)
            .language_id(language_id)
            .stdin(input.unwrap_or_default())
            .build();

        match options {
            Some(options) => submission.with_overrides(options),
            None => submission,
        }
    }

    /// Returns a copy of the submission with every field set in `options` replaced.
    pub fn with_overrides(mut self, options: SubmissionOptions) -> Self {
        if let Some(source_code) = options.source_code {
            self.source_code = source_code;
        }
        if let Some(language_id) = options.language_id {
            self.language_id = language_id;
        }
        if options.stdin.is_some() {
            self.stdin = options.stdin;
        }
        if options.expected_output.is_some() {
            self.expected_output = options.expected_output;
        }
        if options.cpu_time_limit.is_some() {
            self.cpu_time_limit = options.cpu_time_limit;
        }
        if options.memory_limit.is_some() {
            self.memory_limit = options.memory_limit;
        }
        if options.compiler_options.is_some() {
            self.compiler_options = options.compiler_options;
        }
        if options.command_line_arguments.is_some() {
            self.command_line_arguments = options.command_line_arguments;
        }
        self
    }
}

impl SubmissionResult {
    /// The numeric status id, if the judge reported one.
    pub fn status_id(&self) -> Option<u32> {
        self.status.as_ref().map(|s| s.id)
    }

    /// Whether the judge is done with the submission, successfully or not.
    pub fn is_terminal(&self) -> bool {
        self.status_id().is_some_and(status::is_terminal)
    }

    /// Decodes the text fields of a result fetched with `base64_encoded=true`.
    ///
    /// The judge wraps encoded text at fixed widths, so whitespace is dropped before decoding.
    /// Bytes that are not valid UTF-8 are replaced rather than rejected.
    pub fn decode_base64_fields(&mut self) -> Result<(), base64::DecodeError> {
        for field in [
            &mut self.stdout,
            &mut self.stderr,
            &mut self.compile_output,
            &mut self.message,
        ] {
            if let Some(encoded) = field.take() {
                let compact: String = encoded.split_whitespace().collect();
                let bytes = BASE64_STANDARD.decode(compact)?;
                *field = Some(String::from_utf8_lossy(&bytes).into_owned());
            }
        }
        Ok(())
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_compose_defaults_stdin_to_empty() {
        let submission = Submission::compose("print(1)", 71, None, None);
        assert_eq!(submission.stdin.as_deref(), Some(""));
        assert_eq!(submission.language_id, 71);
        assert_eq!(submission.cpu_time_limit, None);
    }

    #[test]
    fn test_compose_applies_overrides() {
        let options = SubmissionOptions {
            language_id: Some(70),
            stdin: Some("override".to_string()),
            cpu_time_limit: Some(2.5),
            memory_limit: Some(128_000),
            ..Default::default()
        };
        let submission = Submission::compose("print(input())", 71, Some("typed"), Some(options));

        assert_eq!(submission.source_code, "print(input())");
        assert_eq!(submission.language_id, 70);
        assert_eq!(submission.stdin.as_deref(), Some("override"));
        assert_eq!(submission.cpu_time_limit, Some(2.5));
        assert_eq!(submission.memory_limit, Some(128_000));
        assert_eq!(submission.compiler_options, None);
    }

    #[test]
    fn test_submission_omits_unset_fields() {
        let submission = Submission::builder()
            .source_code("int main() {}")
            .language_id(54)
            .compiler_options("-O2")
            .build();
        let value = serde_json::to_value(&submission).unwrap();

        assert_eq!(
            value,
            json!({
                "source_code": "int main() {}",
                "language_id": 54,
                "compiler_options": "-O2",
            })
        );
    }

    #[test]
    fn test_result_parses_judge_response() {
        let result: SubmissionResult = serde_json::from_value(json!({
            "stdout": "1\n",
            "stderr": null,
            "status": { "id": 3, "description": "Accepted" },
            "compile_output": null,
            "message": null,
            "time": "0.012",
            "memory": 3200,
            "exit_code": 0
        }))
        .unwrap();

        assert_eq!(result.token, "");
        assert_eq!(result.status_id(), Some(3));
        assert!(result.is_terminal());
        assert_eq!(result.stdout.as_deref(), Some("1\n"));
        assert_eq!(result.time.as_deref(), Some("0.012"));
        assert_eq!(result.memory, Some(3200));
    }

    #[test]
    fn test_result_without_status_is_not_terminal() {
        let result: SubmissionResult =
            serde_json::from_value(json!({ "token": "abc" })).unwrap();
        assert!(!result.is_terminal());

        let queued = SubmissionResult {
            status: Some(Status {
                id: 2,
                description: "Processing".to_string(),
            }),
            ..Default::default()
        };
        assert!(!queued.is_terminal());
    }

    #[test]
    fn test_decode_base64_fields() {
        let mut result = SubmissionResult {
            stdout: Some("aGVs\nbG8K\n".to_string()),
            compile_output: None,
            message: Some(BASE64_STANDARD.encode([0xff, b'x'])),
            ..Default::default()
        };
        result.decode_base64_fields().unwrap();

        assert_eq!(result.stdout.as_deref(), Some("hello\n"));
        assert_eq!(result.compile_output, None);
        assert_eq!(result.message.as_deref(), Some("\u{fffd}x"));
    }

    #[test]
    fn test_decode_base64_fields_rejects_garbage() {
        let mut result = SubmissionResult {
            stderr: Some("not base64!".to_string()),
            ..Default::default()
        };
        assert!(result.decode_base64_fields().is_err());
    }
}
