pub mod aggregator;
pub mod etl;
pub mod ingest;
pub mod report;
pub mod store;

pub use crate::domain::model::{DispatchOutcome, ExpiryReport, InventoryRecord, Record};
pub use crate::domain::ports::{AlertDispatcher, Storage};
pub use crate::utils::error::Result;
