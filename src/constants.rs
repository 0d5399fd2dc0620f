//! Application constants for the WHO COVID-19 ingestion job
//!
//! Upstream endpoints, store names, webhook settings and the positional
//! field layouts of every upstream row shape.

// =============================================================================
// Upstream Endpoints and Published URLs
// =============================================================================

/// Public dashboard the data is attributed to
pub const SITE_URL: &str = "https://covid19.who.int/";

/// Page-data JSON behind the dashboard (sprinkler and regional shapes)
pub const PAGE_DATA_URL: &str = "https://covid19.who.int/page-data/index/page-data.json";

/// Flat GIS export with one row per country and day
pub const GIS_DATA_URL: &str =
    "https://dashboards-dev.sprinklr.com/data/9043/global-covid19-who-gis.json";

/// Where consumers can download the full change history
pub const HISTORY_DATA_URL: &str =
    "https://api.apify.com/v2/datasets/4wrWtORugf0148gJ6/items?format=json&clean=1";

/// Human-readable description of the published dataset
pub const READ_ME_URL: &str = "https://apify.com/davidrychly/covid-who-sprinklr";

/// Browser-like agent; the dashboard CDN rejects bare clients
pub const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

pub const FETCH_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Storage
// =============================================================================

pub const DEFAULT_KEY_VALUE_STORE: &str = "COVID-19-WHO-SPRINKLR";
pub const DEFAULT_HISTORY_DATASET: &str = "COVID-19-WHO-SPRINKLR-HISTORY";
pub const GIS_KEY_VALUE_STORE: &str = "COVID-19-WHO-GIS";
pub const GIS_HISTORY_DATASET: &str = "COVID-19-WHO-GIS-HISTORY";

/// Key of the singleton record holding the most recent snapshot
pub const LATEST_KEY: &str = "LATEST";

/// Key of the per-run input object inside the default key-value store
pub const INPUT_KEY: &str = "INPUT";

/// Store and dataset that receive the current run's output
pub const DEFAULT_STORE_NAME: &str = "default";

pub const KEY_VALUE_STORES_DIR: &str = "key_value_stores";
pub const DATASETS_DIR: &str = "datasets";

/// Width of the zero-padded item file names inside a dataset directory
pub const DATASET_ITEM_DIGITS: usize = 9;

pub const STORAGE_DIR_ENV: &str = "WHO_COVID_STORAGE_DIR";
pub const INPUT_PATH_ENV: &str = "WHO_COVID_INPUT";
pub const APP_DIR_NAME: &str = "who-covid-ingest";

// =============================================================================
// Snapshot Document
// =============================================================================

/// Snapshot field that differs on every run and is ignored by change detection
pub const RUN_TIMESTAMP_FIELD: &str = "lastUpdatedAtRun";

/// Placeholder when the upstream carries no last-update stamp
pub const UNKNOWN_SOURCE_UPDATE: &str = "N/A";

// =============================================================================
// Failure Notification
// =============================================================================

pub mod webhook {
    pub const EVENT_RUN_FAILED: &str = "ACTOR.RUN.FAILED";
    pub const EVENT_RUN_TIMED_OUT: &str = "ACTOR.RUN.TIMED_OUT";

    pub const EVENT_TYPES: &[&str] = &[EVENT_RUN_FAILED, EVENT_RUN_TIMED_OUT];

    pub const REQUEST_URL: &str =
        "https://api.apify.com/v2/acts/mnmkng~email-notification-webhook/runs";
}

// =============================================================================
// Upstream Field Layouts
// =============================================================================

/// Column offsets of the upstream row shapes
pub mod offsets {
    /// Sprinkler country rows: `[date, _, deaths, cumDeaths, _, _, _, cases, cumCases]`
    pub mod sprinkler_country {
        pub const DATE: usize = 0;
        pub const DECEASED_NEW: usize = 2;
        pub const DECEASED: usize = 3;
        pub const CONFIRMED_NEW: usize = 7;
        pub const CONFIRMED: usize = 8;
    }

    /// Regional country rows carry a lead column before the region layout
    pub mod regional_country {
        pub const DATE: usize = 0;
        pub const DECEASED_NEW: usize = 2;
        pub const DECEASED: usize = 3;
        pub const DECEASED_LAST_7_DAYS: usize = 4;
        pub const DECEASED_LAST_7_DAYS_CHANGE: usize = 5;
        pub const DECEASED_PER_MILLION: usize = 6;
        pub const CONFIRMED_NEW: usize = 7;
        pub const CONFIRMED: usize = 8;
        pub const CASES_LAST_7_DAYS: usize = 9;
        pub const CASES_LAST_7_DAYS_CHANGE: usize = 10;
        pub const CASES_PER_MILLION: usize = 11;
    }

    /// Region rows: eleven columns starting with the date
    pub mod regional_region {
        pub const DATE: usize = 0;
        pub const DECEASED_NEW: usize = 1;
        pub const DECEASED: usize = 2;
        pub const DECEASED_LAST_7_DAYS: usize = 3;
        pub const DECEASED_LAST_7_DAYS_CHANGE: usize = 4;
        pub const DECEASED_PER_MILLION: usize = 5;
        pub const CONFIRMED_NEW: usize = 6;
        pub const CONFIRMED: usize = 7;
        pub const CASES_LAST_7_DAYS: usize = 8;
        pub const CASES_LAST_7_DAYS_CHANGE: usize = 9;
        pub const CASES_PER_MILLION: usize = 10;
    }

    /// Flat GIS rows: `[date, code, region, deaths, cumDeaths, cases, cumCases]`
    pub mod flat {
        pub const DATE: usize = 0;
        pub const CODE: usize = 1;
        pub const DECEASED_NEW: usize = 3;
        pub const DECEASED: usize = 4;
        pub const CONFIRMED_NEW: usize = 5;
        pub const CONFIRMED: usize = 6;
    }

    /// Named columns of the regional `transmissionData` table
    pub mod transmission {
        pub const CODE: &str = "ISO_2_CODE";
        pub const WHO_REGION: &str = "WHO_REGION";
        pub const CLASSIFICATION: &str = "CLASSIFICATION";
        pub const DATE: &str = "DATE";
    }
}
