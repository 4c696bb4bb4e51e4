//! querylens - ask a database questions in plain language.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use querylens::cli::{Cli, RunMode};
use querylens::config::{Config, Settings};
use querylens::controller::{RequestLifecycleController, SubmissionInput};
use querylens::error::QueryLensError;
use querylens::logging;
use querylens::output::OneShotOutput;
use querylens::render::ResponseDispatcher;
use querylens::service::{HttpQueryService, MockQueryService, QueryService};
use tracing::{error, info};

fn main() -> ExitCode {
    // A missing .env file is fine.
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let mode = cli.run_mode();

    match mode {
        RunMode::Interactive => logging::init_file_logging(),
        RunMode::Once | RunMode::Check => logging::init_stderr_logging(),
    }

    let result = tokio::runtime::Runtime::new()
        .context("Failed to start the async runtime")
        .and_then(|runtime| runtime.block_on(run(&cli, mode)));

    match result {
        Ok(code) => code,
        Err(e) => {
            match e.downcast_ref::<QueryLensError>() {
                Some(err) => error!("{}: {}", err.category(), err),
                None => error!("{:#}", e),
            }
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, mode: RunMode) -> anyhow::Result<ExitCode> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;
    let settings = Settings::resolve(&cli.overrides(), &config)?;

    let service: Arc<dyn QueryService> = if cli.mock {
        info!("Using the built-in mock service");
        Arc::new(MockQueryService::new())
    } else {
        Arc::new(HttpQueryService::new(settings.service_config()?)?)
    };

    match mode {
        RunMode::Check => check(service.as_ref()).await,
        RunMode::Once => run_once(cli, &settings, service).await,
        RunMode::Interactive => {
            querylens::tui::run(&settings, service, cli.prompt.as_deref()).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Calls the service's health endpoint and prints its greeting.
async fn check(service: &dyn QueryService) -> anyhow::Result<ExitCode> {
    let greeting = service
        .health()
        .await
        .context("Query service is not reachable")?;
    println!("{greeting}");
    Ok(ExitCode::SUCCESS)
}

/// Submits one request and prints the rendered sections.
///
/// Exits non-zero when the submission is rejected or the request fails.
async fn run_once(
    cli: &Cli,
    settings: &Settings,
    service: Arc<dyn QueryService>,
) -> anyhow::Result<ExitCode> {
    let format = cli
        .parse_output_format()
        .map_err(QueryLensError::config)?;

    let input = SubmissionInput::new(
        settings.database_url.clone().unwrap_or_default(),
        cli.prompt.clone().unwrap_or_default(),
    );

    let dispatcher = ResponseDispatcher::terminal().with_diagnostics(settings.show_diagnostics);
    let mut controller = RequestLifecycleController::new(service, dispatcher);

    let start = Instant::now();
    controller.submit(&input).await?;
    let elapsed = start.elapsed();

    print!("{}", OneShotOutput::new(format).format(controller.display(), elapsed));

    Ok(if controller.display().has_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
