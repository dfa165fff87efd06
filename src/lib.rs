pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod service;
pub mod types;

pub use config::{Config, Credentials};
pub use db::{CHANGESETS, ChangeSet};
pub use error::MigrateError;
pub use service::{MigrationRunner, run};
pub use types::{ExecutionResult, ProbeOutcome, RunReport};
