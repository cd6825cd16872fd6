//! Terminal glyphs used by the command line front end.

use std::sync::LazyLock;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// A green checkmark.
pub static CHECKMARK: LazyLock<String> =
    LazyLock::new(|| format!("{}", console::style("✓").green()));

/// A red cross.
pub static CROSSMARK: LazyLock<String> =
    LazyLock::new(|| format!("{}", console::style("✗").red()));

/// A yellow warning sign.
pub static WARNMARK: LazyLock<String> =
    LazyLock::new(|| format!("{}", console::style("!").yellow()));
