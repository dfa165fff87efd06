pub mod report;

pub use report::{ExecutionResult, ProbeOutcome, RunReport};
