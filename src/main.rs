use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use runeterra_cards::config::Settings;
use runeterra_cards::infra::http_client::ReqwestFetcher;
use runeterra_cards::logging;
use runeterra_cards::pipeline::Orchestrator;

#[derive(Parser)]
#[command(name = "runeterra_cards")]
#[command(about = "Fetches and normalizes Legends of Runeterra card data for every configured language")]
#[command(version)]
struct Cli {
    /// Directory holding config.json, language.json and the optional lists
    #[arg(long, default_value = ".")]
    config_dir: PathBuf,

    /// Only process these languages (repeatable); defaults to all configured
    #[arg(long = "language")]
    languages: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let _guard = logging::init_logging();
    let cli = Cli::parse();

    let result = run(&cli);
    if let Err(e) = &result {
        error!("Run failed: {:#}", e);
    }
    result
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut settings = Settings::load(&cli.config_dir)
        .with_context(|| format!("loading configuration from {}", cli.config_dir.display()))?;
    settings.restrict_languages(&cli.languages)?;

    let fetcher = ReqwestFetcher::new();
    let orchestrator = Orchestrator::new(&settings, &fetcher, &cli.config_dir);
    let summaries = orchestrator.run()?;

    for summary in &summaries {
        info!(
            "✅ {}: {} cards from {} set(s), {} images moved -> {}",
            summary.language,
            summary.cards,
            summary.sets.len(),
            summary.images_moved,
            summary.output_file.display()
        );
    }
    println!(
        "Finished: {} language file(s) written to {}{}",
        summaries.len(),
        settings.config.output_folder.display(),
        if settings.config.include_images {
            format!(", card images in {}", settings.config.images_folder.display())
        } else {
            String::new()
        }
    );
    Ok(())
}
