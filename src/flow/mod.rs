// ABOUTME: Flow orchestration over an explicitly constructed executor
// ABOUTME: Implements the fan-out, chaining, gating, fan-in, and sync-final patterns

pub mod record;
pub mod steps;

pub use record::{Aggregate, FlowOutcome, FlowReport, ProcessedRecord, SourceRecord};

use tokio::time::Instant;
use tracing::{info, instrument, warn};

use crate::executor::{Executor, TaskFuture};
use crate::task::Task;

/// The four stage tasks a pipeline run is wired from.
///
/// The fetch stage talks to the outside world and is always supplied by the
/// caller; the remaining stages default to the library-provided steps.
#[derive(Debug, Clone)]
pub struct PipelineTasks {
    pub fetch: Task<u32, SourceRecord>,
    pub process: Task<SourceRecord, ProcessedRecord>,
    pub aggregate: Task<Vec<ProcessedRecord>, Aggregate>,
    pub save: Task<Aggregate, String>,
}

impl PipelineTasks {
    /// Standard pipeline around an injected fetch task.
    pub fn standard(fetch: Task<u32, SourceRecord>) -> Self {
        Self {
            fetch,
            process: steps::process_record(),
            aggregate: steps::aggregate_records(),
            save: steps::save_aggregate(),
        }
    }
}

/// Runs flows against one executor instance.
///
/// The executor is constructed explicitly and passed in; there is no
/// process-wide runtime or registry behind the scenes.
#[derive(Debug)]
pub struct FlowRunner {
    executor: Executor,
}

impl FlowRunner {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Fan out fetches, chain processing per resolved fetch, gather, fan in,
    /// then persist synchronously.
    ///
    /// A failed fetch skips its processing branch and is logged; independent
    /// branches keep running. A failure in the processing, aggregation, or
    /// save stage terminates the flow with a descriptive `Failed` outcome.
    #[instrument(skip(self, tasks), fields(flow_name = "parallel-data-pipeline"))]
    pub async fn run_pipeline(&self, tasks: &PipelineTasks, num_sources: u32) -> FlowOutcome {
        let run_id = uuid::Uuid::new_v4().to_string();
        let started_at = chrono::Utc::now();
        let start = Instant::now();

        info!(%run_id, num_sources, "starting pipeline run");

        // Fan out: submit all fetches up front.
        let fetch_futures: Vec<_> = (0..num_sources)
            .map(|source_id| self.executor.submit(&tasks.fetch, source_id))
            .collect();

        // Chained submission: consume fetch futures in submission order,
        // handing each result to the processing stage while the rest of the
        // batch is still running.
        let mut process_futures: Vec<TaskFuture<ProcessedRecord>> = Vec::new();
        let mut skipped_sources = 0;
        for mut future in fetch_futures {
            match future.result().await {
                Ok(record) => {
                    process_futures.push(self.executor.submit(&tasks.process, record));
                }
                Err(error) => {
                    warn!(task = %future.task_name(), %error, "skipping failed fetch");
                    skipped_sources += 1;
                }
            }
        }

        // Gather all processed results before proceeding.
        let mut processed = Vec::with_capacity(process_futures.len());
        for mut future in process_futures {
            match future.result().await {
                Ok(record) => processed.push(record),
                Err(error) => {
                    return FlowOutcome::Failed {
                        reason: format!("processing stage failed: {}", error),
                    };
                }
            }
        }

        // Fan in: one task consuming the full collection.
        let mut aggregate_future = self.executor.submit(&tasks.aggregate, processed);
        let aggregate = match aggregate_future.result().await {
            Ok(aggregate) => aggregate,
            Err(error) => {
                return FlowOutcome::Failed {
                    reason: format!("aggregation failed: {}", error),
                };
            }
        };

        // Final dependent step runs inline, blocking flow completion on it.
        let summary = match self.executor.invoke(&tasks.save, aggregate.clone()).await {
            Ok(summary) => summary,
            Err(error) => {
                return FlowOutcome::Failed {
                    reason: format!("save step failed: {}", error),
                };
            }
        };

        info!(%run_id, %summary, skipped_sources, "flow completed");

        FlowOutcome::Completed(FlowReport {
            run_id,
            started_at,
            duration: start.elapsed(),
            aggregate,
            summary,
            skipped_sources,
        })
    }

    /// Fan out fetches and continue only if at least `threshold` succeed.
    ///
    /// Successes and failures are partitioned per future; falling short of
    /// the threshold short-circuits with a descriptive outcome whose counts
    /// use the original submission count as denominator.
    #[instrument(skip(self, tasks), fields(flow_name = "gated-data-pipeline"))]
    pub async fn run_gated_pipeline(
        &self,
        tasks: &PipelineTasks,
        num_sources: u32,
        threshold: usize,
    ) -> FlowOutcome {
        let run_id = uuid::Uuid::new_v4().to_string();
        let started_at = chrono::Utc::now();
        let start = Instant::now();

        info!(%run_id, num_sources, threshold, "starting gated pipeline run");

        let fetch_futures: Vec<_> = (0..num_sources)
            .map(|source_id| self.executor.submit(&tasks.fetch, source_id))
            .collect();

        // Partition outcomes, inspecting each future rather than assuming
        // success.
        let mut completed_fetches = Vec::new();
        let mut failed_fetches = Vec::new();
        for (source_id, mut future) in fetch_futures.into_iter().enumerate() {
            match future.result().await {
                Ok(record) => completed_fetches.push(record),
                Err(error) => failed_fetches.push((source_id, error.to_string())),
            }
        }

        if !failed_fetches.is_empty() {
            warn!(
                failed = failed_fetches.len(),
                details = ?failed_fetches,
                "failed to fetch from some sources"
            );
        }

        if completed_fetches.len() < threshold {
            let message = format!(
                "Flow failed: insufficient data sources ({}/{})",
                completed_fetches.len(),
                num_sources
            );
            info!(%run_id, %message, "short-circuiting below threshold");
            return FlowOutcome::Insufficient {
                succeeded: completed_fetches.len(),
                submitted: num_sources as usize,
                message,
            };
        }

        // Process all successful fetches in parallel.
        let process_futures: Vec<_> = completed_fetches
            .into_iter()
            .map(|record| self.executor.submit(&tasks.process, record))
            .collect();

        let mut processed = Vec::with_capacity(process_futures.len());
        for mut future in process_futures {
            match future.result().await {
                Ok(record) => processed.push(record),
                Err(error) => {
                    return FlowOutcome::Failed {
                        reason: format!("processing stage failed: {}", error),
                    };
                }
            }
        }

        let skipped_sources = num_sources as usize - processed.len();

        let mut aggregate_future = self.executor.submit(&tasks.aggregate, processed);
        let aggregate = match aggregate_future.result().await {
            Ok(aggregate) => aggregate,
            Err(error) => {
                return FlowOutcome::Failed {
                    reason: format!("aggregation failed: {}", error),
                };
            }
        };

        let summary = match self.executor.invoke(&tasks.save, aggregate.clone()).await {
            Ok(summary) => summary,
            Err(error) => {
                return FlowOutcome::Failed {
                    reason: format!("save step failed: {}", error),
                };
            }
        };

        info!(%run_id, %summary, "gated flow completed");

        FlowOutcome::Completed(FlowReport {
            run_id,
            started_at,
            duration: start.elapsed(),
            aggregate,
            summary,
            skipped_sources,
        })
    }
}
