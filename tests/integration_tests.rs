use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use httpmock::prelude::*;
use inventory_alert::core::report::EMPTY_REPORT_MESSAGE;
use inventory_alert::{
    AlertConfig, AlertEngine, AlertError, CsvIngestor, DispatchOutcome, LocalStorage,
    OmniDispatcher,
};
use tempfile::TempDir;

fn config_for(server: &MockServer, data_path: &str) -> AlertConfig {
    let toml = format!(
        r#"
[inventory]
data_path = "{}"

[dispatch]
endpoint = "{}"
api_key = "test-key"
agent_id = 2428
to_number = "+917550041200"
"#,
        data_path,
        server.url("/api/v1/calls/dispatch")
    );
    AlertConfig::from_toml_str(&toml).unwrap()
}

fn storage(temp_dir: &TempDir) -> LocalStorage {
    LocalStorage::new(temp_dir.path().to_str().unwrap().replace('\\', "/"))
}

fn morning(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

fn inventory_line(id: usize, name: &str, date: &str) -> String {
    serde_json::json!({
        "Item_ID": format!("P{:03}", id),
        "Name": name,
        "Expiration_Date": date,
        "Warehouse_Location": "48 Del Sol Trail",
        "Aisle": "B",
        "Shelf": 2,
        "Stock_Quantity": id * 3,
        "Expiring_Soon": false
    })
    .to_string()
}

#[tokio::test]
async fn test_end_to_end_alert_with_real_http() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let mut lines: Vec<String> = (1..=12)
        .map(|i| inventory_line(i, &format!("Item {}", i), "08/20/2025"))
        .collect();
    lines.push(inventory_line(13, "September Item", "09/01/2025"));
    lines.push(r#"{"Item_ID": "X", "Expiration_Date": "08/21/2025"}"#.to_string());
    lines.push(inventory_line(14, "Bad Date", "2025-08-21"));
    std::fs::create_dir_all(temp_dir.path().join("data"))?;
    std::fs::write(temp_dir.path().join("data/output.jsonl"), lines.join("\n"))?;

    let server = MockServer::start();
    let call_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/calls/dispatch")
            .header("authorization", "Bearer test-key")
            .body_contains("\"agent_id\":2428")
            .body_contains("\"to_number\":\"+917550041200\"")
            .body_contains("...and 2 more items.");
        then.status(200).body(r#"{"success":true}"#);
    });

    let config = config_for(&server, "data/output.jsonl");
    let dispatcher = OmniDispatcher::new(config.dispatch.clone());
    let engine = AlertEngine::new(storage(&temp_dir), dispatcher, config);

    let summary = engine.run_at(morning(2025, 8, 1), false).await?;

    call_mock.assert();
    assert_eq!(summary.records_loaded, 15);
    assert_eq!(summary.records_skipped, 2);
    assert_eq!(summary.months, vec!["August 2025", "September 2025"]);
    assert!(summary.outcome.as_ref().is_some_and(|o| o.is_success()));

    let message = &summary.message;
    assert!(message.starts_with("Hello. This is your Inventory Assistant."));
    assert!(message.contains(
        "- Item 1 (ID: P001) at 48 Del Sol Trail, Aisle B Shelf 2, Quantity left: 3"
    ));
    assert!(message.contains("\nIn September 2025, the following items are expiring:"));
    assert!(!message.contains("Item 11 (ID"));
    assert!(message.ends_with("Please review your inventory dashboard for full details. Thank you."));
    Ok(())
}

#[tokio::test]
async fn test_dispatch_rejection_is_reported_not_raised() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(
        temp_dir.path().join("output.jsonl"),
        inventory_line(1, "Milk", "08/02/2025"),
    )?;

    let server = MockServer::start();
    let call_mock = server.mock(|when, then| {
        when.method(POST).path("/api/v1/calls/dispatch");
        then.status(403).body("agent not found");
    });

    let config = config_for(&server, "output.jsonl");
    let dispatcher = OmniDispatcher::new(config.dispatch.clone());
    let engine = AlertEngine::new(storage(&temp_dir), dispatcher, config);

    let summary = engine.run_at(morning(2025, 8, 1), false).await?;

    call_mock.assert();
    assert_eq!(
        summary.outcome,
        Some(DispatchOutcome::Failed {
            status: Some(403),
            detail: "agent not found".to_string()
        })
    );
    Ok(())
}

#[tokio::test]
async fn test_missing_inventory_never_calls() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    let call_mock = server.mock(|when, then| {
        when.method(POST).path("/api/v1/calls/dispatch");
        then.status(200);
    });

    let config = config_for(&server, "missing.jsonl");
    let dispatcher = OmniDispatcher::new(config.dispatch.clone());
    let engine = AlertEngine::new(storage(&temp_dir), dispatcher, config);

    let result = engine.run_at(morning(2025, 8, 1), false).await;

    assert!(matches!(result, Err(AlertError::SourceLoadError { .. })));
    call_mock.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_nothing_expiring_sends_filler_message() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(
        temp_dir.path().join("output.jsonl"),
        inventory_line(1, "Rice", "12/31/2030"),
    )?;

    let server = MockServer::start();
    let call_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/calls/dispatch")
            .json_body(serde_json::json!({
                "agent_id": 2428,
                "to_number": "+917550041200",
                "call_context": {"message": EMPTY_REPORT_MESSAGE}
            }));
        then.status(200);
    });

    let config = config_for(&server, "output.jsonl");
    let dispatcher = OmniDispatcher::new(config.dispatch.clone());
    let engine = AlertEngine::new(storage(&temp_dir), dispatcher, config);

    let summary = engine.run_at(morning(2025, 8, 1), false).await?;

    call_mock.assert();
    assert_eq!(summary.message, EMPTY_REPORT_MESSAGE);
    Ok(())
}

#[tokio::test]
async fn test_ingest_then_alert_uses_wall_clock() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let today = Local::now().date_naive();
    let soon = (today + Duration::days(3)).format("%m/%d/%Y").to_string();
    let later = (today + Duration::days(200)).format("%m/%d/%Y").to_string();

    let csv = format!(
        "Product_ID,Product_Name,Catagory,Supplier_ID,Supplier_Name,Stock_Quantity,Expiration_Date,Warehouse_Location,Status\n\
         29-205-1132,Sushi Rice,Grains & Pulses,38-037-1699,Jaxnation,22,{},48 Del Sol Trail,Active\n\
         40-681-9981,Arabica Coffee,Beverages,54-470-7479,Feedmix,45,{},36 3rd Place,Active\n",
        soon, later
    );
    std::fs::create_dir_all(temp_dir.path().join("data/uploads"))?;
    std::fs::write(temp_dir.path().join("data/uploads/inventory.csv"), csv)?;

    let ingestor = CsvIngestor::new(storage(&temp_dir), 7);
    let ingest = ingestor
        .run(
            "data/uploads/inventory.csv",
            "data/processed/output.jsonl",
            today,
        )
        .await?;
    assert_eq!(ingest.written, 2);
    assert_eq!(ingest.flagged, 1);

    let server = MockServer::start();
    let call_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/calls/dispatch")
            .body_contains("Sushi Rice (ID: 29-205-1132)");
        then.status(200);
    });

    let config = config_for(&server, "data/processed/output.jsonl");
    let dispatcher = OmniDispatcher::new(config.dispatch.clone());
    let engine = AlertEngine::new(storage(&temp_dir), dispatcher, config);

    let summary = engine.run(false).await?;

    call_mock.assert();
    assert_eq!(summary.records_loaded, 2);
    assert_eq!(summary.months.len(), 1);
    assert!(summary.message.contains("Quantity left: 22"));
    assert!(!summary.message.contains("Arabica Coffee"));
    Ok(())
}
