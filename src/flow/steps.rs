// ABOUTME: Default pipeline stage tasks: process, aggregate, and save
// ABOUTME: The fetch stage is always injected by the caller; only its shape is fixed

use chrono::Utc;
use tracing::info;

use super::record::{Aggregate, ProcessedRecord, SourceRecord};
use crate::task::{Task, TaskError};

/// Processing stage: doubles the fetched value.
pub fn process_record() -> Task<SourceRecord, ProcessedRecord> {
    Task::new("process-record", |record: SourceRecord| async move {
        info!(source_id = record.source_id, "processing record");
        Ok(ProcessedRecord {
            source_id: record.source_id,
            raw_value: record.value,
            processed_value: record.value * 2,
            processed_at: Utc::now(),
        })
    })
}

/// Fan-in stage: aggregates all processed records in one input.
pub fn aggregate_records() -> Task<Vec<ProcessedRecord>, Aggregate> {
    Task::new(
        "aggregate-records",
        |records: Vec<ProcessedRecord>| async move {
            info!(count = records.len(), "aggregating results");
            Ok(Aggregate::from_records(&records))
        },
    )
}

/// Persist stage: serializes the aggregate and returns a summary line.
pub fn save_aggregate() -> Task<Aggregate, String> {
    Task::new("save-aggregate", |aggregate: Aggregate| async move {
        let payload = serde_json::to_string(&aggregate)
            .map_err(|e| TaskError::attempt(format!("failed to serialize aggregate: {}", e)))?;
        info!(%payload, "saving aggregated results");
        Ok(format!(
            "Results saved successfully: {} sources processed",
            aggregate.sources.len()
        ))
    })
}
