use crate::domain::model::{fields, ExpiryReport, InventoryRecord, Record, RecordIssue};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Days past `now` that still count as expiring soon.
pub const EXPIRY_WINDOW_DAYS: i64 = 32;

/// Largest window accepted from configuration.
pub const MAX_WINDOW_DAYS: i64 = 3650;

const DATE_FORMAT: &str = "%m/%d/%Y";

/// Parses `MM/DD/YYYY` strictly: the input must equal the canonical
/// formatting of the parsed date, so `1/13/2025` or `01/13/2025 ` are rejected.
pub fn parse_expiration_date(value: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(value, DATE_FORMAT).ok()?;
    (date.format(DATE_FORMAT).to_string() == value).then_some(date)
}

pub fn is_valid_date(value: &str) -> bool {
    parse_expiration_date(value).is_some()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    pub report: ExpiryReport,
    /// Records dropped because of a bad date or a malformed field.
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct ExpiryAggregator {
    window: Duration,
}

impl Default for ExpiryAggregator {
    fn default() -> Self {
        Self::new(EXPIRY_WINDOW_DAYS)
    }
}

impl ExpiryAggregator {
    /// Windows beyond what chrono can represent saturate.
    pub fn new(window_days: i64) -> Self {
        Self {
            window: Duration::try_days(window_days).unwrap_or(Duration::MAX),
        }
    }

    /// Groups the records expiring within `[now, now + window]` by month.
    pub fn aggregate(&self, records: &[Record], now: NaiveDateTime) -> Aggregation {
        let horizon = now
            .checked_add_signed(self.window)
            .unwrap_or(NaiveDateTime::MAX);
        let mut aggregation = Aggregation::default();

        for (line, record) in records.iter().enumerate() {
            match self.qualify(record, now, horizon) {
                Ok(Some(item)) => aggregation.report.push(item),
                Ok(None) => {}
                Err(issue) => {
                    tracing::debug!("Skipping inventory record {}: {}", line + 1, issue);
                    aggregation.skipped += 1;
                }
            }
        }

        tracing::debug!(
            "Aggregated {} expiring items into {} months ({} skipped)",
            aggregation.report.total_items(),
            aggregation.report.buckets().len(),
            aggregation.skipped
        );
        aggregation
    }

    fn qualify(
        &self,
        record: &Record,
        now: NaiveDateTime,
        horizon: NaiveDateTime,
    ) -> std::result::Result<Option<InventoryRecord>, RecordIssue> {
        let raw_date = record.get_str(fields::EXPIRATION_DATE).unwrap_or_default();
        let date = parse_expiration_date(raw_date)
            .ok_or_else(|| RecordIssue::InvalidDate(raw_date.to_string()))?;

        let expires_at = date.and_time(NaiveTime::MIN);
        if expires_at < now || expires_at > horizon {
            return Ok(None);
        }

        InventoryRecord::from_record(record, date).map(Some)
    }
}

/// Aggregates with the default window.
pub fn group_expiries_by_month(records: &[Record], now: NaiveDateTime) -> ExpiryReport {
    ExpiryAggregator::default().aggregate(records, now).report
}
