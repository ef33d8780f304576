use clap::Parser;
use pawmatch::config::{LoggingSettings, Settings};
use pawmatch::models::{Category, RecommendRequest};
use pawmatch::services::{Dataset, RecommendationService, RepositoryError, ServiceError};
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Score a dog against the activities and dogs in an exported dataset
#[derive(Debug, Parser)]
#[command(name = "pawmatch", version, about)]
struct Cli {
    /// JSON file with `dogs` and `candidates` arrays
    #[arg(short, long)]
    data: PathBuf,

    /// Id of the dog to recommend for
    #[arg(long)]
    dog: String,

    /// Only rank one category (training, playdate, dogPark, competition, playmate, general)
    #[arg(long)]
    category: Option<Category>,

    /// Maximum results per list
    #[arg(long)]
    limit: Option<u16>,

    /// Candidate ids to leave out
    #[arg(long = "exclude", value_delimiter = ',')]
    exclude_ids: Vec<String>,

    /// Use the flat top-picks threshold across all categories
    #[arg(long)]
    top_picks: bool,

    /// Settings file, instead of config/default and config/local
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("data error: {0}")]
    Data(#[from] RepositoryError),

    #[error("{0}")]
    Service(#[from] ServiceError),

    #[error("output error: {0}")]
    Output(#[from] serde_json::Error),
}

fn init_tracing(logging: &LoggingSettings) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let filter = EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };

    init_tracing(&settings.logging);
    info!("Configuration loaded successfully");

    let (dogs, candidates) = Dataset::load(&cli.data)?.into_repositories();
    info!(
        "Loaded {} dogs and {} candidates",
        dogs.len(),
        candidates.len()
    );

    let recommender = settings.recommender();
    let service = RecommendationService::new(
        dogs,
        candidates,
        recommender,
        settings.recommendations.max_limit,
    );

    let request = RecommendRequest {
        dog_id: cli.dog,
        category: cli.category,
        limit: cli.limit.unwrap_or(settings.recommendations.default_limit),
        exclude_ids: cli.exclude_ids,
        top_picks: cli.top_picks,
    };

    let response = service.recommend(&request)?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("pawmatch: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}
