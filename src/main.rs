use chrono::Local;
use clap::Parser;
use inventory_alert::core::store::{expiring_flagged, load_inventory};
use inventory_alert::domain::model::fields;
use inventory_alert::utils::error::ErrorSeverity;
use inventory_alert::utils::logger;
use inventory_alert::{
    AlertConfig, AlertEngine, AlertError, CliConfig, Command, CsvIngestor, DispatchOutcome,
    LocalStorage, OmniDispatcher,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(cli.verbose, cli.json_logs);

    tracing::info!("Starting inventory-alert");
    tracing::debug!("CLI config: {:?}", cli);

    let config = match AlertConfig::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    let storage = LocalStorage::new(".".to_string());

    match cli.command() {
        Command::Alert { dry_run } => {
            let validation = config.validate_report().and_then(|_| {
                if dry_run {
                    Ok(())
                } else {
                    config.validate_dispatch()
                }
            });
            if let Err(e) = validation {
                fail(&e);
            }

            let dispatcher = OmniDispatcher::new(config.dispatch.clone());
            let engine = AlertEngine::new(storage, dispatcher, config);

            match engine.run(dry_run).await {
                Ok(summary) => {
                    tracing::info!(
                        "✅ Report built from {} records ({} skipped), months: {:?}",
                        summary.records_loaded,
                        summary.records_skipped,
                        summary.months
                    );
                    if let Some(DispatchOutcome::Failed { status, detail }) = &summary.outcome {
                        tracing::error!(
                            "❌ Voice alert not delivered (status: {:?}): {}",
                            status,
                            detail
                        );
                        std::process::exit(2);
                    }
                }
                Err(e) => fail(&e),
            }
        }
        Command::Ingest { as_of } => {
            if let Err(e) = config.validate_ingest() {
                fail(&e);
            }

            let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
            let ingestor = CsvIngestor::new(storage, config.ingest.soon_days);
            match ingestor
                .run(&config.ingest.csv_path, config.ingest_output_path(), as_of)
                .await
            {
                Ok(summary) => {
                    println!(
                        "✅ Wrote {} records to {} ({} skipped, {} expiring soon)",
                        summary.written,
                        config.ingest_output_path(),
                        summary.skipped,
                        summary.flagged
                    );
                }
                Err(e) => fail(&e),
            }
        }
        Command::Expiring => {
            if let Err(e) = config.validate_report() {
                fail(&e);
            }

            match load_inventory(&storage, &config.inventory.data_path).await {
                Ok(records) => {
                    let flagged = expiring_flagged(&records);
                    println!("🚨 Found {} expiring items", flagged.len());
                    for record in flagged {
                        let text = |field: &str| {
                            record.get_text(field).unwrap_or_else(|| "?".to_string())
                        };
                        println!(
                            "- {} ({}) expiring on {} at {}",
                            text(fields::NAME),
                            text(fields::ITEM_ID),
                            text(fields::EXPIRATION_DATE),
                            text(fields::WAREHOUSE_LOCATION)
                        );
                    }
                }
                Err(e) => fail(&e),
            }
        }
    }

    Ok(())
}

fn fail(e: &AlertError) -> ! {
    tracing::error!(
        "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
