pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{http::OmniDispatcher, storage::LocalStorage};
pub use config::{AlertConfig, DispatchConfig};
pub use core::{
    aggregator::{group_expiries_by_month, ExpiryAggregator},
    etl::{AlertEngine, RunSummary},
    ingest::{CsvIngestor, IngestSummary},
    report::{generate_alert_text, ReportFormatter},
};
pub use domain::model::{DispatchOutcome, ExpiryReport, InventoryRecord, MonthKey, Record};
pub use utils::error::{AlertError, Result};
