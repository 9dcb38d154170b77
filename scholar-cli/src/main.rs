use anyhow::{Context, Result};
use clap::Parser;
use scholar_cli::backends;
use scholar_cli::cli::{Cli, Command};
use scholar_cli::console;
use scholar_rag::AssistantConfig;
use scholar_telemetry::{TelemetryConfig, init_telemetry};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let telemetry = TelemetryConfig {
        log_file: cli.log_file.clone(),
        json: cli.log_json,
        ..TelemetryConfig::default()
    };
    init_telemetry(&telemetry).context("initializing logging")?;

    let base = AssistantConfig::from_env().context("reading SCHOLAR_* configuration")?;
    let config = cli.assistant_config(base).context("invalid configuration")?;
    info!(
        input_dir = %config.input_dir.display(),
        collection = %config.collection,
        command = ?cli.command(),
        "starting"
    );

    let assistant = backends::assistant(&cli, config).await?;
    let records = assistant.index_directory().await.context("indexing the input folder")?;
    info!(papers = records.len(), "indexing finished");

    match cli.command() {
        Command::Index => {
            println!("{}", assistant.list_papers().await);
            Ok(())
        }
        Command::Chat => console::run(&assistant).await,
    }
}
