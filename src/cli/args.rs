//! Command-line argument definitions for the WHO COVID-19 ingestion job
//!
//! Every flag is optional. A bare invocation runs the default sprinkler
//! variant against the live dashboard and the default local storage.

use clap::Parser;
use std::path::PathBuf;

use crate::models::SourceVariant;

/// CLI arguments for one ingestion run
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "who-covid-ingest",
    version,
    about = "Fetch WHO COVID-19 statistics and keep a latest snapshot with change history",
    long_about = "Fetches the WHO COVID-19 dashboard feed, builds per-country (and for the regional \
                  feed, per-region) time series, and writes the snapshot to a latest record, a \
                  change-only history dataset and the run's default output dataset."
)]
pub struct Args {
    /// Upstream payload shape
    ///
    /// sprinkler: page-data country groups. regional: country and region
    /// groups plus transmission classifications. flat: GIS export rows.
    #[arg(
        long = "variant",
        value_name = "NAME",
        help = "Upstream variant: sprinkler, regional or flat"
    )]
    pub variant: Option<SourceVariant>,

    /// Override the fetched URL (http, https, file:// or a plain path)
    #[arg(long = "source-url", value_name = "URL")]
    pub source_url: Option<String>,

    /// Root of the local storage tree
    ///
    /// Defaults to $WHO_COVID_STORAGE_DIR, then the user data directory.
    #[arg(short = 's', long = "storage-dir", value_name = "PATH")]
    pub storage_dir: Option<PathBuf>,

    /// Run input JSON ({"notificationEmail": "..."})
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Configuration file (JSON) applied over the variant defaults
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Fetch and build, print the snapshot, write nothing
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: debug, -vv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Log level derived from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_invocation() {
        let args = Args::try_parse_from(["who-covid-ingest"]).unwrap();
        assert_eq!(args.variant, None);
        assert!(!args.dry_run);
        assert_eq!(args.get_log_level(), "info");
    }

    #[test]
    fn test_all_flags() {
        let args = Args::try_parse_from([
            "who-covid-ingest",
            "--variant",
            "regional",
            "--source-url",
            "file:///tmp/page-data.json",
            "-s",
            "/tmp/storage",
            "--input",
            "/tmp/input.json",
            "--dry-run",
            "-vv",
        ])
        .unwrap();

        assert_eq!(args.variant, Some(SourceVariant::Regional));
        assert_eq!(args.source_url.as_deref(), Some("file:///tmp/page-data.json"));
        assert_eq!(args.storage_dir, Some(PathBuf::from("/tmp/storage")));
        assert!(args.dry_run);
        assert_eq!(args.get_log_level(), "trace");
    }

    #[test]
    fn test_invalid_variant_and_conflicts() {
        assert!(Args::try_parse_from(["who-covid-ingest", "--variant", "csv"]).is_err());
        assert!(Args::try_parse_from(["who-covid-ingest", "-q", "-v"]).is_err());
    }
}
