use std::{path::PathBuf, sync::Arc, time::Duration};

use judgekit_cli::{AnsiStyles, JudgekitArgs, JudgekitCliError, JudgekitCliResult};
use judgekit_core::{
    config::{AuthStyle, ConfigStore, ProviderConfig, ProviderSettings},
    language::LanguageTable,
    payload::{SubmissionOptions, SubmissionResult},
    provider::{create_provider, SubmissionProvider},
    session::{ExecutionSession, RunOutcome, SourceSnapshot},
    status::{CatalogSource, StatusCatalog},
};
use judgekit_utils::{CHECKMARK, CROSSMARK, WARNMARK};

//--------------------------------------------------------------------------------------------------
// Functions: Handlers
//--------------------------------------------------------------------------------------------------

pub fn log_level(args: &JudgekitArgs) {
    let level = if args.trace {
        Some("trace")
    } else if args.debug {
        Some("debug")
    } else if args.info {
        Some("info")
    } else if args.warn {
        Some("warn")
    } else if args.error {
        Some("error")
    } else {
        None
    };

    // Set RUST_LOG environment variable only if a level is specified
    if let Some(level) = level {
        std::env::set_var(
            "RUST_LOG",
            format!("judgekit_core={},jk={}", level, level),
        );
    }
}

pub async fn run_subcommand(
    file: PathBuf,
    lang: Option<String>,
    stdin: Option<PathBuf>,
    input: Option<String>,
    expected_output: Option<String>,
    cpu_time_limit: Option<f64>,
    memory_limit: Option<u64>,
) -> JudgekitCliResult<()> {
    let store = ConfigStore::load_default().await?;
    let config = store
        .effective_provider()?
        .ok_or(JudgekitCliError::NotConfigured)?;

    let languages = LanguageTable::default();
    let language = match lang {
        Some(lang) => lang,
        None => languages
            .short_name_for_path(&file)
            .ok_or_else(|| JudgekitCliError::UnknownLanguage(file.display().to_string()))?,
    };

    let code = tokio::fs::read_to_string(&file).await?;
    let custom_input = match (stdin, input) {
        (Some(path), _) => tokio::fs::read_to_string(path).await?,
        (None, Some(input)) => input,
        (None, None) => String::new(),
    };

    let session = Arc::new(ExecutionSession::new(Arc::new(languages)));
    session.install_provider(&config, &store.get_config().settings)?;
    if !session.validate_connection().await {
        return Err(JudgekitCliError::RunFailed(format!(
            "cannot reach the judge ({}), check `{}`",
            config,
            "jk config show".literal()
        )));
    }
    session.set_custom_input(custom_input);

    let options = SubmissionOptions {
        expected_output,
        cpu_time_limit,
        memory_limit,
        ..Default::default()
    };

    // Ctrl-C stops polling; the submission itself stays on the judge
    let interrupt = {
        let session = session.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupted, cancelling run");
                session.cancel();
            }
        })
    };

    let snapshot = SourceSnapshot::new(code, language);
    let outcome = session.execute_code_with(&snapshot, Some(options)).await;
    interrupt.abort();

    if let Some(result) = session.result() {
        print_result(&result);
    }

    match (outcome, session.error()) {
        (RunOutcome::Completed, None) => Ok(()),
        (_, Some(error)) => {
            println!("{} {}", &*CROSSMARK, error.error());
            Err(JudgekitCliError::RunFailed(error))
        }
        (_, None) => Err(JudgekitCliError::RunFailed("run did not finish".to_string())),
    }
}

pub async fn languages_subcommand() -> JudgekitCliResult<()> {
    let provider = configured_provider().await?;

    let mut languages = provider.get_languages().await?;
    languages.sort_by_key(|l| l.id);

    for language in languages {
        let archived = if language.is_archived.unwrap_or(false) {
            format!(" {}", console::style("(archived)").dim())
        } else {
            String::new()
        };
        println!("{:>4}  {}{}", language.id, language.name, archived);
    }

    Ok(())
}

pub async fn statuses_subcommand() -> JudgekitCliResult<()> {
    let provider = configured_provider().await?;

    let catalog = StatusCatalog::fetch(provider.as_ref()).await;
    if catalog.source() == CatalogSource::Builtin {
        println!(
            "{} could not fetch statuses from {}, showing the built-in table",
            &*WARNMARK,
            provider.name()
        );
    }

    for (id, label, class) in catalog.entries() {
        println!("{:>4}  {:<28} {}", id, label, console::style(class).dim());
    }

    Ok(())
}

pub async fn ping_subcommand() -> JudgekitCliResult<()> {
    let provider = configured_provider().await?;

    if provider.test_connection().await {
        println!("{} {} is reachable", &*CHECKMARK, provider.name());
        Ok(())
    } else {
        println!("{} {} is not reachable", &*CROSSMARK, provider.name());
        Err(JudgekitCliError::RunFailed(format!(
            "connection test against {} failed",
            provider.name()
        )))
    }
}

pub async fn config_show_subcommand() -> JudgekitCliResult<()> {
    let store = ConfigStore::load_default().await?;
    let settings = &store.get_config().settings;

    println!("{} {}", "file:".header(), store.get_path().display());
    match store.effective_provider()? {
        Some(config) => {
            let origin = if store.get_config().provider.as_ref() == Some(&config) {
                "config file"
            } else {
                "environment"
            };
            println!("{} {} ({})", "judge:".header(), config, origin);
        }
        None => println!("{} {}", "judge:".header(), "none".placeholder()),
    }
    println!(
        "{} {}s",
        "timeout:".header(),
        settings.get_request_timeout_secs()
    );
    println!("{} {}", "user agent:".header(), settings.get_user_agent());

    Ok(())
}

pub async fn config_set_subcommand(
    provider: Option<String>,
    base_url: Option<String>,
    auth_style: Option<AuthStyle>,
    api_key: Option<String>,
    timeout: Option<u64>,
) -> JudgekitCliResult<()> {
    let mut store = ConfigStore::load_default().await?;

    let config = match (provider, base_url) {
        (_, Some(base_url)) => {
            ProviderConfig::custom(base_url, api_key, auth_style.unwrap_or_default())
        }
        (Some(provider), None) => ProviderConfig::named(provider, api_key),
        (None, None) => return Err(JudgekitCliError::NotConfigured),
    };

    let settings = match timeout {
        Some(secs) => ProviderSettings::new(
            Duration::from_secs(secs),
            store.get_config().settings.get_user_agent().clone(),
        )?,
        None => store.get_config().settings.clone(),
    };

    // Refuse to store a configuration the factory cannot build
    create_provider(&config, &settings)?;

    store.set_provider(config.clone()).await?;
    if timeout.is_some() {
        store.set_settings(settings).await?;
    }

    println!(
        "{} saved {} to {}",
        &*CHECKMARK,
        config,
        store.get_path().display()
    );

    Ok(())
}

//--------------------------------------------------------------------------------------------------
// Functions: Helpers
//--------------------------------------------------------------------------------------------------

async fn configured_provider() -> JudgekitCliResult<Arc<dyn SubmissionProvider>> {
    let store = ConfigStore::load_default().await?;
    let config = store
        .effective_provider()?
        .ok_or(JudgekitCliError::NotConfigured)?;

    Ok(create_provider(&config, &store.get_config().settings)?)
}

fn print_result(result: &SubmissionResult) {
    let status = result
        .status
        .as_ref()
        .map(|s| s.description.clone())
        .unwrap_or_else(|| "Unknown".to_string());

    let mut stats = Vec::new();
    if let Some(time) = &result.time {
        stats.push(format!("{} s", time));
    }
    if let Some(memory) = result.memory {
        stats.push(format!("{} KB", memory));
    }
    if let Some(exit_code) = result.exit_code {
        stats.push(format!("exit {}", exit_code));
    }

    if stats.is_empty() {
        println!("{}", status.header());
    } else {
        println!("{} ({})", status.header(), stats.join(", "));
    }

    for (label, text) in [
        ("stdout", &result.stdout),
        ("stderr", &result.stderr),
        ("compile output", &result.compile_output),
        ("message", &result.message),
    ] {
        if let Some(text) = text.as_deref().filter(|t| !t.is_empty()) {
            println!("{}", format!("{}:", label).placeholder());
            print!("{}", text);
            if !text.ends_with('\n') {
                println!();
            }
        }
    }
}
