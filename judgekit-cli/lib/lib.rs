//! Command line front end for judgekit.
//!
//! The `jk` binary reads a source file, submits it to the configured judge and prints the
//! classified outcome. This library holds its argument definitions, error type and styling.

#![warn(missing_docs)]

mod args;
mod error;
mod styles;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use args::*;
pub use error::*;
pub use styles::*;
