use clap::Parser;
use mimalloc::MiMalloc;
use std::process::ExitCode;
use supa_migrate::cli::{Cli, Commands};
use supa_migrate::config::Config;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn init_tracing(loglevel: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(loglevel));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Project-local overrides first; dotenvy never overwrites existing vars.
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or_default();

    // `show` needs no configuration; print before any tunable can fail.
    if command == Commands::Show {
        print!("{}", supa_migrate::service::manual::manual_instructions());
        return ExitCode::SUCCESS;
    }

    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            init_tracing("info");
            error!(error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&cfg.loglevel);

    match supa_migrate::run(&cfg).await {
        Ok(report) => {
            print!("{}", report.summary());
            ExitCode::SUCCESS
        }
        Err(e) if e.is_config() => {
            error!(error = %e, "missing or invalid Supabase configuration");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = %e, "migration run aborted");
            info!("apply the SQL manually with `supa-migrate show`");
            ExitCode::FAILURE
        }
    }
}
