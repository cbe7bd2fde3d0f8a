// ABOUTME: Data records flowing between pipeline stages and the final report
// ABOUTME: Aggregation preserves submission order in derived source lists

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw value fetched from one external source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub source_id: u32,
    pub value: i64,
    pub fetched_at: DateTime<Utc>,
}

impl SourceRecord {
    pub fn new(source_id: u32, value: i64) -> Self {
        Self {
            source_id,
            value,
            fetched_at: Utc::now(),
        }
    }
}

/// A source record after the processing stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedRecord {
    pub source_id: u32,
    pub raw_value: i64,
    pub processed_value: i64,
    pub processed_at: DateTime<Utc>,
}

/// Fan-in summary over a collection of processed records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub total: i64,
    pub average: f64,
    pub count: usize,
    pub sources: Vec<u32>,
}

impl Aggregate {
    /// Aggregate processed records, keeping `sources` in input order.
    pub fn from_records(records: &[ProcessedRecord]) -> Self {
        let total: i64 = records.iter().map(|r| r.processed_value).sum();
        let count = records.len();
        let average = if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        };

        Self {
            total,
            average,
            count,
            sources: records.iter().map(|r| r.source_id).collect(),
        }
    }
}

/// Terminal result of a completed flow run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    pub aggregate: Aggregate,
    pub summary: String,
    pub skipped_sources: usize,
}

/// Terminal outcome of a flow: a value or a descriptive failure, never a panic.
#[derive(Debug, Clone)]
pub enum FlowOutcome {
    /// All stages ran; carries the aggregate and the save step's summary.
    Completed(FlowReport),
    /// Threshold gate short-circuited the flow before processing.
    Insufficient {
        succeeded: usize,
        submitted: usize,
        message: String,
    },
    /// A stage the flow cannot continue without failed.
    Failed { reason: String },
}

impl FlowOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, FlowOutcome::Completed(_))
    }

    /// Human-readable terminal description, whatever the variant.
    pub fn description(&self) -> String {
        match self {
            FlowOutcome::Completed(report) => report.summary.clone(),
            FlowOutcome::Insufficient { message, .. } => message.clone(),
            FlowOutcome::Failed { reason } => format!("Flow failed: {}", reason),
        }
    }
}
