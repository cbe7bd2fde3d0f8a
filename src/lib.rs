// ABOUTME: Main library module for the tributary task-orchestration core
// ABOUTME: Exports the task, executor, and flow modules and common types

pub mod executor;
pub mod flow;
pub mod task;

// Re-export commonly used types
pub use executor::{
    Clock, Executor, ExecutorError, ExecutorStats, FutureState, TaskFuture, TokioClock,
};
pub use flow::{
    Aggregate, FlowOutcome, FlowReport, FlowRunner, PipelineTasks, ProcessedRecord, SourceRecord,
};
pub use task::{RetryPolicy, Task, TaskError};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
