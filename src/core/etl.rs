use crate::config::AlertConfig;
use crate::core::aggregator::ExpiryAggregator;
use crate::core::report::{preview, ReportFormatter};
use crate::core::store::load_inventory;
use crate::core::{AlertDispatcher, Storage};
use crate::domain::model::DispatchOutcome;
use crate::utils::error::Result;
use chrono::{Local, NaiveDateTime};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub records_loaded: usize,
    pub records_skipped: usize,
    pub months: Vec<String>,
    pub message: String,
    /// `None` for a dry run.
    pub outcome: Option<DispatchOutcome>,
}

/// One run of load, aggregate, format and dispatch.
pub struct AlertEngine<S: Storage, D: AlertDispatcher> {
    storage: S,
    dispatcher: D,
    config: AlertConfig,
}

impl<S: Storage, D: AlertDispatcher> AlertEngine<S, D> {
    pub fn new(storage: S, dispatcher: D, config: AlertConfig) -> Self {
        Self {
            storage,
            dispatcher,
            config,
        }
    }

    pub async fn run(&self, dry_run: bool) -> Result<RunSummary> {
        self.run_at(Local::now().naive_local(), dry_run).await
    }

    pub async fn run_at(&self, now: NaiveDateTime, dry_run: bool) -> Result<RunSummary> {
        println!("🔎 Processing inventory for expiry alerts...");

        let data_path = &self.config.inventory.data_path;
        let records = load_inventory(&self.storage, data_path).await?;
        println!("Loaded {} inventory records", records.len());

        let aggregation =
            ExpiryAggregator::new(self.config.report.window_days).aggregate(&records, now);
        if aggregation.skipped > 0 {
            tracing::info!("Skipped {} malformed inventory records", aggregation.skipped);
        }
        println!(
            "Found {} expiring items across {} months",
            aggregation.report.total_items(),
            aggregation.report.buckets().len()
        );

        let message =
            ReportFormatter::new(self.config.report.max_items_per_month).render(&aggregation.report);
        println!(
            "\n📤 Final voice message:\n{}",
            preview(&message, self.config.report.preview_chars)
        );

        let outcome = if dry_run {
            tracing::info!("🔍 DRY RUN MODE - No call will be placed");
            None
        } else {
            let to_number = &self.config.dispatch.to_number;
            println!("\n📞 Dispatching voice alert to {}...", to_number);
            let outcome = self.dispatcher.dispatch(&message, to_number).await;
            match &outcome {
                DispatchOutcome::Delivered { .. } => println!("✅ Voice alert sent successfully."),
                DispatchOutcome::Failed { status, detail } => {
                    let status = status.map_or_else(|| "no response".to_string(), |s| s.to_string());
                    println!("❌ Failed to send voice alert ({}): {}", status, detail);
                }
            }
            Some(outcome)
        };

        Ok(RunSummary {
            records_loaded: records.len(),
            records_skipped: aggregation.skipped,
            months: aggregation.report.months(),
            message,
            outcome,
        })
    }
}
