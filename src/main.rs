use anyhow::Context;
use clap::Parser;
use gwosc_fetcher::apis::GwoscClient;
use gwosc_fetcher::config::Config;
use gwosc_fetcher::constants::DEFAULT_CONFIG_PATH;
use gwosc_fetcher::logging;
use gwosc_fetcher::pipeline::{Pipeline, RunOutcome};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "gwosc_fetcher")]
#[command(about = "Fetch GWOSC gravitational-wave events for the mass plot")]
#[command(version = "0.1.0")]
struct Cli {
    /// Optional TOML config; defaults apply when the file does not exist
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    // Dropping the guard at the end of main flushes the log file
    let _log_guard = logging::init_logging(&config.logging);

    println!("{}", "=".repeat(60));
    println!("GWOSC Gravitational Wave Events Fetcher");
    println!("{}", "=".repeat(60));

    let client = GwoscClient::new(&config.source).context("building HTTP client")?;
    info!("Using catalog endpoint {}", client.url());

    let outcome = Pipeline::run(&client, &config.output.path)
        .await
        .with_context(|| format!("writing {}", config.output.path.display()))?;

    if let RunOutcome::Written(summary) = outcome {
        println!("{}", "=".repeat(60));
        println!("Data fetch completed successfully! Total events: {}", summary.unique_events);
        println!("{}", "=".repeat(60));
    }
    Ok(())
}
