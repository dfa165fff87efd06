pub mod manual;
pub mod runner;

pub use runner::{MigrationRunner, run};
