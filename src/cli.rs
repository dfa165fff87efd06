//! CLI argument definitions using clap derive API

use clap::{Parser, Subcommand};

/// Apply the freebie event schema changes to a Supabase project
#[derive(Parser, Debug)]
#[command(name = "supa-migrate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute (default: apply)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Commands {
    /// Send every change-set to the backend, then probe connectivity
    #[default]
    Apply,

    /// Print the change-sets and verification query for manual execution
    Show,
}
