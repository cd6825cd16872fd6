//! Default values shared across the judgekit crates.

use std::{path::PathBuf, sync::LazyLock, time::Duration};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The name of the judgekit home directory, relative to the user's home directory.
pub const JUDGEKIT_HOME_DIR: &str = ".judgekit";

/// The name of the provider configuration file inside the judgekit home directory.
pub const CONFIG_FILENAME: &str = "config.toml";

/// The default judgekit home directory.
pub static DEFAULT_JUDGEKIT_HOME: LazyLock<PathBuf> = LazyLock::new(|| {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(JUDGEKIT_HOME_DIR)
});

/// Time to wait between two polls of a pending submission.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Number of polls made before a pending submission is given up on.
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 30;

/// Upper bound for a single HTTP request to a judge.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// User agent sent with every request to a judge.
pub const DEFAULT_USER_AGENT: &str = concat!("judgekit/", env!("CARGO_PKG_VERSION"));
