use crate::domain::model::{ExpiryReport, InventoryRecord};

/// Items read out per month before the rest is summarised.
pub const MAX_ITEMS_PER_MONTH: usize = 10;

pub const EMPTY_REPORT_MESSAGE: &str =
    "Hello. This is your weekly inventory update. No items are expiring in the next two months. Thank you.";

const OPENING: &str = "Hello. This is your Inventory Assistant. Here's your weekly expiry report.";
const CLOSING: &str = "Please review your inventory dashboard for full details. Thank you.";
const PLACEHOLDER: &str = "N/A";

/// Renders an [`ExpiryReport`] as one narration string for speech synthesis.
#[derive(Debug, Clone, Copy)]
pub struct ReportFormatter {
    max_items_per_month: usize,
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new(MAX_ITEMS_PER_MONTH)
    }
}

impl ReportFormatter {
    pub fn new(max_items_per_month: usize) -> Self {
        Self {
            max_items_per_month,
        }
    }

    pub fn render(&self, report: &ExpiryReport) -> String {
        if report.is_empty() {
            return EMPTY_REPORT_MESSAGE.to_string();
        }

        let mut parts = vec![OPENING.to_string()];

        for bucket in report.buckets() {
            // 換行代表語音停頓
            parts.push(format!("\nIn {}, the following items are expiring:", bucket.key));
            parts.extend(
                bucket
                    .items
                    .iter()
                    .take(self.max_items_per_month)
                    .map(item_line),
            );
            if bucket.items.len() > self.max_items_per_month {
                parts.push(format!(
                    "...and {} more items.",
                    bucket.items.len() - self.max_items_per_month
                ));
            }
        }

        parts.push(CLOSING.to_string());
        parts.join(" ")
    }
}

fn item_line(item: &InventoryRecord) -> String {
    format!(
        "- {} (ID: {}) at {}, Aisle {} Shelf {}, Quantity left: {}",
        item.name,
        item.item_id,
        item.warehouse_location,
        item.aisle.as_deref().unwrap_or(PLACEHOLDER),
        item.shelf.as_deref().unwrap_or(PLACEHOLDER),
        item.stock_quantity.as_deref().unwrap_or(PLACEHOLDER)
    )
}

pub fn generate_alert_text(report: &ExpiryReport) -> String {
    ReportFormatter::default().render(report)
}

/// First `max_chars` characters of the narration, with `...` when cut.
pub fn preview(message: &str, max_chars: usize) -> String {
    match message.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &message[..cut]),
        None => message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn item(id: usize, day: u32) -> InventoryRecord {
        InventoryRecord {
            item_id: format!("P{:03}", id),
            name: format!("Item {}", id),
            expiration_date: NaiveDate::from_ymd_opt(2025, 8, day).unwrap(),
            warehouse_location: "Dock 2".to_string(),
            aisle: None,
            shelf: None,
            stock_quantity: None,
            expiring_soon: None,
        }
    }

    #[test]
    fn test_empty_report_message() {
        assert_eq!(generate_alert_text(&ExpiryReport::new()), EMPTY_REPORT_MESSAGE);
    }

    #[test]
    fn test_single_item_narration() {
        let mut report = ExpiryReport::new();
        report.push(InventoryRecord {
            aisle: Some("F".to_string()),
            shelf: Some("3".to_string()),
            stock_quantity: Some("12".to_string()),
            ..item(1, 5)
        });

        assert_eq!(
            generate_alert_text(&report),
            "Hello. This is your Inventory Assistant. Here's your weekly expiry report. \
             \nIn August 2025, the following items are expiring: \
             - Item 1 (ID: P001) at Dock 2, Aisle F Shelf 3, Quantity left: 12 \
             Please review your inventory dashboard for full details. Thank you."
        );
    }

    #[test]
    fn test_missing_optional_fields_use_placeholder() {
        let mut report = ExpiryReport::new();
        report.push(item(7, 9));

        let text = generate_alert_text(&report);
        assert!(text.contains("- Item 7 (ID: P007) at Dock 2, Aisle N/A Shelf N/A, Quantity left: N/A"));
    }

    #[test]
    fn test_truncates_after_ten_items() {
        let mut report = ExpiryReport::new();
        for id in 1..=12 {
            report.push(item(id, 10));
        }

        let text = generate_alert_text(&report);
        assert_eq!(text.matches("- Item ").count(), 10);
        assert!(text.contains("Item 10 (ID: P010)"));
        assert!(!text.contains("Item 11 (ID"));
        assert!(text.contains("Quantity left: N/A ...and 2 more items. Please review"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let mut report = ExpiryReport::new();
        for id in 1..=3 {
            report.push(item(id, id as u32));
        }

        let formatter = ReportFormatter::default();
        assert_eq!(formatter.render(&report), formatter.render(&report));
    }

    #[test]
    fn test_preview_truncation() {
        assert_eq!(preview("short", 500), "short");
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview("abc", 3), "abc");
        assert_eq!(preview("ééé", 2), "éé...");
    }
}
