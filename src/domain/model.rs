use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Field names used by the ingestion output.
pub mod fields {
    pub const ITEM_ID: &str = "Item_ID";
    pub const NAME: &str = "Name";
    pub const EXPIRATION_DATE: &str = "Expiration_Date";
    pub const WAREHOUSE_LOCATION: &str = "Warehouse_Location";
    pub const AISLE: &str = "Aisle";
    pub const SHELF: &str = "Shelf";
    pub const STOCK_QUANTITY: &str = "Stock_Quantity";
    pub const EXPIRING_SOON: &str = "Expiring_Soon";
}

/// One raw line of the inventory source, as a flat field map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, Value>,
}

impl Record {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field).filter(|v| !v.is_null())
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// String or number fields rendered as text.
    pub fn get_text(&self, field: &str) -> Option<String> {
        self.get(field).and_then(scalar_text)
    }

    pub fn is_flagged_expiring(&self) -> bool {
        self.get(fields::EXPIRING_SOON)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordIssue {
    #[error("missing field {0}")]
    MissingField(&'static str),

    #[error("field {field} has unsupported value {value}")]
    InvalidField { field: &'static str, value: String },

    #[error("invalid expiration date '{0}'")]
    InvalidDate(String),
}

/// A typed inventory record that passed per-record validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryRecord {
    pub item_id: String,
    pub name: String,
    pub expiration_date: NaiveDate,
    pub warehouse_location: String,
    pub aisle: Option<String>,
    pub shelf: Option<String>,
    /// Rendered as found in the source, so `12.0` or `"12 units"` read out as-is.
    pub stock_quantity: Option<String>,
    pub expiring_soon: Option<bool>,
}

impl InventoryRecord {
    /// Builds the typed record once the expiration date has already been validated.
    pub fn from_record(
        record: &Record,
        expiration_date: NaiveDate,
    ) -> std::result::Result<Self, RecordIssue> {
        Ok(Self {
            item_id: required_text(record, fields::ITEM_ID)?,
            name: required_text(record, fields::NAME)?,
            expiration_date,
            warehouse_location: required_text(record, fields::WAREHOUSE_LOCATION)?,
            aisle: display_text(record, fields::AISLE),
            shelf: display_text(record, fields::SHELF),
            stock_quantity: display_text(record, fields::STOCK_QUANTITY),
            expiring_soon: record.get(fields::EXPIRING_SOON).and_then(Value::as_bool),
        })
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn required_text(record: &Record, field: &'static str) -> std::result::Result<String, RecordIssue> {
    match record.get(field) {
        None => Err(RecordIssue::MissingField(field)),
        Some(value) => scalar_text(value).ok_or_else(|| RecordIssue::InvalidField {
            field,
            value: value.to_string(),
        }),
    }
}

/// Optional display fields never reject a record; non-string values use their JSON text.
fn display_text(record: &Record, field: &str) -> Option<String> {
    record
        .get(field)
        .map(|value| scalar_text(value).unwrap_or_else(|| value.to_string()))
}

/// Grouping key of the expiry report, rendered as `"August 2025"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("Unknown");
        write!(f, "{} {}", name, self.year)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthBucket {
    pub key: MonthKey,
    pub items: Vec<InventoryRecord>,
}

/// Month buckets in first-seen order; items keep their input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpiryReport {
    buckets: Vec<MonthBucket>,
    index: HashMap<MonthKey, usize>,
}

impl ExpiryReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: InventoryRecord) {
        let key = MonthKey::of(item.expiration_date);
        match self.index.get(&key) {
            Some(&pos) => self.buckets[pos].items.push(item),
            None => {
                self.index.insert(key, self.buckets.len());
                self.buckets.push(MonthBucket {
                    key,
                    items: vec![item],
                });
            }
        }
    }

    pub fn buckets(&self) -> &[MonthBucket] {
        &self.buckets
    }

    pub fn get(&self, key: &MonthKey) -> Option<&MonthBucket> {
        self.index.get(key).map(|&pos| &self.buckets[pos])
    }

    pub fn months(&self) -> Vec<String> {
        self.buckets.iter().map(|b| b.key.to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn total_items(&self) -> usize {
        self.buckets.iter().map(|b| b.items.len()).sum()
    }
}

/// Result of handing a narration to the voice-call service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Delivered { status: u16, body: String },
    Failed { status: Option<u16>, detail: String },
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered { .. })
    }
}
