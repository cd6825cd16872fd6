#[path = "mod.rs"]
mod jk;

use clap::{CommandFactory, Parser};
use jk::handlers;
use judgekit_cli::{AnsiStyles, ConfigSubcommand, JudgekitArgs, JudgekitCliResult, JudgekitSubcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

const DEFAULT_LOG_FILTER: &str = "warn";

//--------------------------------------------------------------------------------------------------
// Functions: main
//--------------------------------------------------------------------------------------------------

#[tokio::main]
async fn main() -> JudgekitCliResult<()> {
    // Parse command line arguments
    let args = JudgekitArgs::parse();

    // Verbosity flags win over RUST_LOG from a .env file
    handlers::log_level(&args);
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Print version if requested
    if args.version {
        println!("{}", format!("v{}", env!("CARGO_PKG_VERSION")).literal());
        return Ok(());
    }

    match args.subcommand {
        Some(JudgekitSubcommand::Run {
            file,
            lang,
            stdin,
            input,
            expected_output,
            cpu_time_limit,
            memory_limit,
        }) => {
            handlers::run_subcommand(
                file,
                lang,
                stdin,
                input,
                expected_output,
                cpu_time_limit,
                memory_limit,
            )
            .await?;
        }
        Some(JudgekitSubcommand::Languages) => {
            handlers::languages_subcommand().await?;
        }
        Some(JudgekitSubcommand::Statuses) => {
            handlers::statuses_subcommand().await?;
        }
        Some(JudgekitSubcommand::Ping) => {
            handlers::ping_subcommand().await?;
        }
        Some(JudgekitSubcommand::Config { subcommand }) => match subcommand {
            ConfigSubcommand::Show => {
                handlers::config_show_subcommand().await?;
            }
            ConfigSubcommand::Set {
                provider,
                base_url,
                auth_style,
                api_key,
                timeout,
            } => {
                handlers::config_set_subcommand(provider, base_url, auth_style, api_key, timeout)
                    .await?;
            }
        },
        None => {
            JudgekitArgs::command().print_help()?;
        }
    }

    Ok(())
}
