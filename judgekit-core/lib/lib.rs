//! `judgekit` submits source code to remote code-execution judges and follows each submission
//! to a classified outcome without blocking the caller.
//!
//! # Overview
//!
//! A judge (any Judge0-compatible deployment) accepts a submission, hands back a token and
//! works on it asynchronously. judgekit handles:
//! - Building submissions and talking to hosted or self-hosted judges
//! - Polling a submission until the judge reports a finished status
//! - Classifying finished statuses into compile, runtime, time-limit and internal failures
//! - Holding the state of "the current run" for an interactive host
//!
//! # Modules
//!
//! - [`config`] - Provider configuration and its on-disk store
//! - [`language`] - Mapping from language short names to judge language ids
//! - [`orchestrator`] - The create-then-poll loop
//! - [`payload`] - Request and response payloads exchanged with judges
//! - [`provider`] - The provider trait, the HTTP providers and the provider factory
//! - [`session`] - The execution session driven by a host
//! - [`status`] - Status taxonomy and the status catalog

#![warn(missing_docs)]

mod error;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub mod config;
pub mod language;
pub mod orchestrator;
pub mod payload;
pub mod provider;
pub mod session;
pub mod status;

pub use error::*;
