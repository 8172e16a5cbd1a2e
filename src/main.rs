//! AgileTest Uploadr - import automated test results into AgileTest

use agiletest_uploadr::{config::Config, logging, UploadClient, UploadOutcome};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// AgileTest Uploadr - upload test results to AgileTest cloud or data center
#[derive(Parser, Debug)]
#[command(name = "agiletest")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (defaults to AGILETEST_* environment variables)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Use the data center API with AGILETEST_DC_TOKEN
    #[arg(long, global = true)]
    data_center: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Test execution operations
    #[command(name = "test-execution", subcommand)]
    TestExecution(TestExecutionCommand),
}

#[derive(Subcommand, Debug)]
enum TestExecutionCommand {
    /// Import a result file as the request body
    Import {
        /// Test framework of the result file (junit, nunit, xunit, testng, robot, cucumber, behave)
        #[arg(short = 't', long)]
        framework_type: String,

        /// Jira project key
        #[arg(short = 'p', long)]
        project_key: String,

        /// Existing test execution issue to import into
        #[arg(short = 'e', long)]
        test_execution_key: Option<String>,

        /// Result file
        file: PathBuf,
    },

    /// Import a result file together with a test execution info JSON file
    ImportMultipart {
        /// Test framework of the result file
        #[arg(short = 't', long)]
        framework_type: String,

        /// Result file
        results: PathBuf,

        /// Test execution info JSON file
        info: PathBuf,
    },
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path))?,
        None => Config::from_env().context("Failed to load configuration from environment")?,
    };

    if args.data_center {
        config.agiletest.data_center = true;
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.to_lowercase();
    }

    Ok(config)
}

async fn run(args: Args) -> anyhow::Result<UploadOutcome> {
    let config = load_config(&args)?;
    logging::init_subscriber(&config.logging)?;

    info!("Starting AgileTest Uploadr v{}", agiletest_uploadr::VERSION);

    let client = UploadClient::new(&config)?;

    let outcome = match args.command {
        Command::TestExecution(TestExecutionCommand::Import {
            framework_type,
            project_key,
            test_execution_key,
            file,
        }) => {
            client
                .upload_text_file(
                    &framework_type,
                    &project_key,
                    &file,
                    test_execution_key.as_deref(),
                )
                .await?
        }
        Command::TestExecution(TestExecutionCommand::ImportMultipart {
            framework_type,
            results,
            info,
        }) => {
            client
                .upload_multipart_files(&framework_type, &results, &info)
                .await?
        }
    };

    Ok(outcome)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(UploadOutcome::Success(execution)) => {
            match serde_json::to_string_pretty(&execution) {
                Ok(json) => println!("{}", json),
                Err(_) => println!("{} {}", execution.key, execution.url),
            }
            ExitCode::SUCCESS
        }
        Ok(UploadOutcome::Failure) => {
            eprintln!("Error: test execution upload failed");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
