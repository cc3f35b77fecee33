use crate::core::Storage;
use crate::domain::model::Record;
use crate::utils::error::{AlertError, Result};
use serde_json::Value;

/// Loads the JSONL inventory snapshot. Blank lines are ignored; any other
/// line that is not a JSON object fails the whole load.
pub async fn load_inventory<S: Storage>(storage: &S, path: &str) -> Result<Vec<Record>> {
    let bytes = storage
        .read_file(path)
        .await
        .map_err(|e| AlertError::SourceLoadError {
            path: path.to_string(),
            message: e.to_string(),
        })?;

    let content = String::from_utf8(bytes).map_err(|e| AlertError::SourceLoadError {
        path: path.to_string(),
        message: format!("file is not valid UTF-8: {}", e),
    })?;

    let records = parse_jsonl(&content).map_err(|message| AlertError::SourceLoadError {
        path: path.to_string(),
        message,
    })?;

    if records.is_empty() {
        return Err(AlertError::EmptyInventoryError {
            path: path.to_string(),
        });
    }

    tracing::debug!("Loaded {} inventory records from {}", records.len(), path);
    Ok(records)
}

fn parse_jsonl(content: &str) -> std::result::Result<Vec<Record>, String> {
    let mut records = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(obj)) => records.push(Record {
                data: obj.into_iter().collect(),
            }),
            Ok(_) => return Err(format!("line {} is not a JSON object", idx + 1)),
            Err(e) => return Err(format!("line {}: {}", idx + 1, e)),
        }
    }
    Ok(records)
}

/// Records the ingestion step already flagged with `Expiring_Soon`.
pub fn expiring_flagged(records: &[Record]) -> Vec<&Record> {
    records.iter().filter(|r| r.is_flagged_expiring()).collect()
}
