use std::path::PathBuf;

use clap::{Parser, Subcommand};
use judgekit_core::config::AuthStyle;

use crate::styles;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Run code on remote judges
#[derive(Debug, Parser)]
#[command(name = "jk", author, styles=styles::styles())]
pub struct JudgekitArgs {
    /// The subcommand to run
    #[command(subcommand)]
    pub subcommand: Option<JudgekitSubcommand>,

    /// Show version
    #[arg(short = 'V', long, default_value_t = false)]
    pub version: bool,

    /// Show logs with error level
    #[arg(long, default_value_t = false)]
    pub error: bool,

    /// Show logs with warn level
    #[arg(long, default_value_t = false)]
    pub warn: bool,

    /// Show logs with info level
    #[arg(long, default_value_t = false)]
    pub info: bool,

    /// Show logs with debug level
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Show logs with trace level
    #[arg(long, default_value_t = false)]
    pub trace: bool,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum JudgekitSubcommand {
    /// Run a source file on the configured judge
    #[command(name = "run")]
    Run {
        /// The source file to run
        file: PathBuf,

        /// Language short name, guessed from the file extension if omitted
        #[arg(short, long)]
        lang: Option<String>,

        /// File whose contents are passed as stdin
        #[arg(short, long, conflicts_with = "input")]
        stdin: Option<PathBuf>,

        /// Text passed as stdin
        #[arg(short, long)]
        input: Option<String>,

        /// Output the judge compares stdout against
        #[arg(long)]
        expected_output: Option<String>,

        /// CPU time limit in seconds
        #[arg(long)]
        cpu_time_limit: Option<f64>,

        /// Memory limit in kilobytes
        #[arg(long)]
        memory_limit: Option<u64>,
    },

    /// List the languages the judge supports
    #[command(name = "languages")]
    Languages,

    /// List the statuses the judge reports
    #[command(name = "statuses")]
    Statuses,

    /// Check that the judge is reachable with the configured credentials
    #[command(name = "ping")]
    Ping,

    /// Show or change the judge configuration
    #[command(name = "config")]
    Config {
        /// The config subcommand to run
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

/// Subcommands for the `config` subcommand
#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective configuration
    #[command(name = "show")]
    Show,

    /// Select a judge and store it in the configuration file
    #[command(name = "set")]
    Set {
        /// A hosted judge: `rapidapi` or `sulu`
        #[arg(short, long, required_unless_present = "base_url", conflicts_with = "base_url")]
        provider: Option<String>,

        /// Base URL of a self-hosted or other Judge0-compatible deployment
        #[arg(short, long)]
        base_url: Option<String>,

        /// How the API key is sent to a custom deployment: `bearer` or `header-pair`
        #[arg(long, requires = "base_url")]
        auth_style: Option<AuthStyle>,

        /// API key for the judge
        #[arg(short = 'k', long)]
        api_key: Option<String>,

        /// HTTP request timeout in seconds
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: Option<u64>,
    },
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
