use crate::core::aggregator::parse_expiration_date;
use crate::core::Storage;
use crate::domain::model::fields;
use crate::utils::error::{AlertError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Days ahead of the reference date that set `Expiring_Soon`.
pub const DEFAULT_SOON_DAYS: i64 = 7;

const REQUIRED_COLUMNS: [&str; 4] = [
    "Product_ID",
    "Product_Name",
    "Expiration_Date",
    "Warehouse_Location",
];

#[derive(Debug, Deserialize)]
struct InventoryRow {
    #[serde(rename = "Product_ID")]
    product_id: String,
    #[serde(rename = "Product_Name")]
    product_name: String,
    #[serde(rename = "Stock_Quantity", default)]
    stock_quantity: Option<i64>,
    #[serde(rename = "Expiration_Date")]
    expiration_date: String,
    #[serde(rename = "Warehouse_Location")]
    warehouse_location: String,
}

#[derive(Debug, Serialize)]
struct CleanRecord<'a> {
    #[serde(rename = "Item_ID")]
    item_id: &'a str,
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Expiration_Date")]
    expiration_date: &'a str,
    #[serde(rename = "Warehouse_Location")]
    warehouse_location: &'a str,
    #[serde(rename = "Stock_Quantity", skip_serializing_if = "Option::is_none")]
    stock_quantity: Option<i64>,
    #[serde(rename = "Expiring_Soon")]
    expiring_soon: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub written: usize,
    pub skipped: usize,
    pub flagged: usize,
}

/// Cleans the raw inventory CSV export into the JSONL record store.
pub struct CsvIngestor<S: Storage> {
    storage: S,
    soon_days: i64,
}

impl<S: Storage> CsvIngestor<S> {
    pub fn new(storage: S, soon_days: i64) -> Self {
        Self { storage, soon_days }
    }

    pub async fn run(
        &self,
        csv_path: &str,
        output_path: &str,
        as_of: NaiveDate,
    ) -> Result<IngestSummary> {
        let raw = self
            .storage
            .read_file(csv_path)
            .await
            .map_err(|e| AlertError::SourceLoadError {
                path: csv_path.to_string(),
                message: e.to_string(),
            })?;

        let (jsonl, summary) = self.clean(&raw, csv_path, as_of)?;
        self.storage.write_file(output_path, jsonl.as_bytes()).await?;

        tracing::info!(
            "🧹 Ingested {} records ({} skipped, {} expiring soon) into {}",
            summary.written,
            summary.skipped,
            summary.flagged,
            output_path
        );
        Ok(summary)
    }

    fn clean(
        &self,
        raw: &[u8],
        csv_path: &str,
        as_of: NaiveDate,
    ) -> Result<(String, IngestSummary)> {
        let mut reader = csv::Reader::from_reader(raw);

        let headers = reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h.trim() == column) {
                return Err(AlertError::SourceLoadError {
                    path: csv_path.to_string(),
                    message: format!("missing column {}", column),
                });
            }
        }

        let mut summary = IngestSummary::default();
        let mut lines = Vec::new();

        for (idx, row) in reader.deserialize::<InventoryRow>().enumerate() {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    tracing::warn!("Skipping CSV row {}: {}", idx + 2, e);
                    summary.skipped += 1;
                    continue;
                }
            };

            let expiring_soon = self.is_expiring_soon(&row.expiration_date, as_of);
            let clean = CleanRecord {
                item_id: &row.product_id,
                name: &row.product_name,
                expiration_date: &row.expiration_date,
                warehouse_location: &row.warehouse_location,
                stock_quantity: row.stock_quantity,
                expiring_soon,
            };
            lines.push(serde_json::to_string(&clean)?);

            summary.written += 1;
            if expiring_soon {
                summary.flagged += 1;
            }
        }

        let mut jsonl = lines.join("\n");
        if !jsonl.is_empty() {
            jsonl.push('\n');
        }
        Ok((jsonl, summary))
    }

    /// Uses the same strict `MM/DD/YYYY` parser as the aggregator, so an unpadded
    /// date such as `7/2/2025` is never flagged.
    fn is_expiring_soon(&self, expiration_date: &str, as_of: NaiveDate) -> bool {
        match parse_expiration_date(expiration_date) {
            Some(date) => (0..=self.soon_days).contains(&(date - as_of).num_days()),
            None => {
                tracing::debug!(
                    "Invalid {} '{}', not flagged",
                    fields::EXPIRATION_DATE,
                    expiration_date
                );
                false
            }
        }
    }
}
