//! Command implementation for the ingestion CLI
//!
//! Sets up logging, layers configuration, wires the filesystem stores and
//! runs one [`IngestJob`], then prints a short summary.

use anyhow::{Context, Result};
use chrono::Utc;
use colored::*;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::IngestError;
use crate::app::adapters::{AnyFetcher, FileStorage, LoggingWebhookRegistrar};
use crate::cli::args::Args;
use crate::config::{IngestConfig, RunInput};
use crate::constants::DEFAULT_STORE_NAME;
use crate::pipeline::{IngestJob, RunOutcome};

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("who_covid_ingest={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()
        .context("Failed to initialise logging")?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Layer configuration: variant defaults, config file, CLI overrides
pub fn load_configuration(args: &Args) -> Result<IngestConfig> {
    let mut config = match &args.config_file {
        Some(path) => {
            info!("Using config file: {}", path.display());
            IngestConfig::load(path, args.variant)?
        }
        None => IngestConfig::for_variant(args.variant.unwrap_or_default()),
    };

    if let Some(url) = &args.source_url {
        config = config.with_source_url(url.clone());
    }
    if let Some(dir) = &args.storage_dir {
        config = config.with_storage_dir(dir.clone());
    }

    config.validate()?;
    Ok(config)
}

/// Run one ingestion
pub async fn run(args: Args, cancellation_token: CancellationToken) -> Result<Option<RunOutcome>> {
    setup_logging(&args)?;
    let start = Instant::now();

    let config = load_configuration(&args)?;
    info!(
        "Variant {} from {} (storage: {})",
        config.variant,
        config.source_url,
        config.storage_dir.display()
    );

    let input = RunInput::load(args.input.as_deref(), &config.storage_dir)
        .context("Failed to load run input")?;

    let fetcher = AnyFetcher::for_url(&config.source_url)?;
    let job = IngestJob::new(config.clone(), fetcher, LoggingWebhookRegistrar::new());

    if args.dry_run {
        let (snapshot, stats) = job.fetch_snapshot(Utc::now()).await?;
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        eprintln!(
            "{} {} (nothing written)",
            "Dry run:".bright_yellow().bold(),
            stats.summary()
        );
        return Ok(None);
    }

    let storage = FileStorage::new(&config.storage_dir);
    let latest = storage
        .key_value_store(&config.key_value_store)
        .record(&config.latest_key);
    let history = storage.dataset(&config.history_dataset);
    let output = storage.dataset(DEFAULT_STORE_NAME);

    if cancellation_token.is_cancelled() {
        return Err(IngestError::interrupted("Cancelled before the run started").into());
    }

    let outcome = job
        .run(&input, &latest, &history, &output, Utc::now())
        .await
        .with_context(|| format!("Ingestion from {} failed", config.source_url))?;

    print_summary(&outcome, &config, start.elapsed());
    Ok(Some(outcome))
}

fn print_summary(outcome: &RunOutcome, config: &IngestConfig, elapsed: std::time::Duration) {
    println!();
    println!("{}", "Ingestion complete".bright_green().bold());
    println!(
        "  {} {}",
        "Countries:".bright_white(),
        outcome.countries.to_string().bright_cyan()
    );
    if config.variant.has_regions() {
        println!(
            "  {} {}",
            "Regions:".bright_white(),
            outcome.regions.to_string().bright_cyan()
        );
    }
    println!(
        "  {} {}",
        "Points:".bright_white(),
        outcome.points.to_string().bright_cyan()
    );
    if !outcome.unresolved_codes.is_empty() {
        println!(
            "  {} {}",
            "Dropped codes:".bright_white(),
            outcome.unresolved_codes.join(", ").bright_yellow()
        );
    }
    if !outcome.duplicate_codes.is_empty() {
        println!(
            "  {} {}",
            "Repeated codes:".bright_white(),
            outcome.duplicate_codes.join(", ").bright_yellow()
        );
    }

    let history = if outcome.history_appended {
        format!("appended to {}", config.history_dataset).bright_green()
    } else {
        "unchanged".bright_black()
    };
    println!("  {} {}", "History:".bright_white(), history);
    println!(
        "  {} {}",
        "Elapsed:".bright_white(),
        format!("{:.2?}", elapsed).bright_black()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceVariant;
    use std::path::PathBuf;

    #[test]
    fn test_cli_overrides_apply_last() {
        let args = Args {
            variant: Some(SourceVariant::Flat),
            source_url: Some("file:///tmp/gis.json".to_string()),
            storage_dir: Some(PathBuf::from("/tmp/who-storage")),
            ..Args::default()
        };

        let config = load_configuration(&args).unwrap();
        assert_eq!(config.variant, SourceVariant::Flat);
        assert_eq!(config.source_url, "file:///tmp/gis.json");
        assert_eq!(config.key_value_store, "COVID-19-WHO-GIS");
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/who-storage"));
    }

    #[test]
    fn test_variant_flag_sits_on_top_of_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"key_value_store": "CUSTOM", "read_me_url": "https://example.org/mine"}"#,
        )
        .unwrap();

        let args = Args {
            variant: Some(SourceVariant::Flat),
            config_file: Some(path),
            ..Args::default()
        };

        let config = load_configuration(&args).unwrap();
        assert_eq!(config.variant, SourceVariant::Flat);
        assert_eq!(config.key_value_store, "CUSTOM");
        assert_eq!(config.read_me_url, "https://example.org/mine");
        assert_eq!(config.history_dataset, "COVID-19-WHO-GIS-HISTORY");
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let args = Args {
            source_url: Some("ftp://example.org/data.json".to_string()),
            ..Args::default()
        };

        assert!(load_configuration(&args).is_err());
    }
}
