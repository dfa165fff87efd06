use crate::api::SupabaseApi;
use crate::config::{Config, Credentials};
use crate::db::{CHANGESETS, ChangeSet};
use crate::error::MigrateError;
use crate::types::{ExecutionResult, ProbeOutcome, RunReport};
use std::time::Duration;
use tracing::{info, warn};

/// Applies change-sets one after another against a single backend.
///
/// Requests are awaited in order; a failed change-set is reported and
/// skipped, never retried.
pub struct MigrationRunner {
    client: reqwest::Client,
    creds: Credentials,
    changesets: &'static [ChangeSet],
    request_timeout: Duration,
    probe_timeout: Duration,
}

impl MigrationRunner {
    pub fn new(creds: Credentials, cfg: &Config) -> Result<Self, MigrateError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("supa-migrate/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            client,
            creds,
            changesets: CHANGESETS,
            request_timeout: cfg.request_timeout(),
            probe_timeout: cfg.probe_timeout(),
        })
    }

    pub fn with_changesets(mut self, changesets: &'static [ChangeSet]) -> Self {
        self.changesets = changesets;
        self
    }

    pub fn changesets(&self) -> &'static [ChangeSet] {
        self.changesets
    }

    /// Send one change-set. Failures are captured in the result.
    pub async fn apply_changeset(&self, cs: &ChangeSet) -> ExecutionResult {
        info!(changeset = %cs.name, "running migration");
        let result =
            SupabaseApi::execute_sql(&self.client, &self.creds, cs.statement, self.request_timeout)
                .await;

        match result {
            Ok(status) => {
                info!(changeset = %cs.name, status = status.as_u16(), "migration completed");
                ExecutionResult::success(cs.name, status)
            }
            Err(e) => {
                match &e {
                    MigrateError::UpstreamStatus { status, body } => warn!(
                        changeset = %cs.name,
                        status = status.as_u16(),
                        response = %body,
                        "migration rejected by server"
                    ),
                    _ => warn!(
                        changeset = %cs.name,
                        timeout = e.is_timeout(),
                        error = %e,
                        "migration request failed"
                    ),
                }
                ExecutionResult::failure(cs.name, &e)
            }
        }
    }

    /// Advisory liveness check; the outcome never affects the run.
    pub async fn verify_reachability(&self) -> ProbeOutcome {
        info!("verifying connection");
        let outcome: ProbeOutcome =
            SupabaseApi::probe_events(&self.client, &self.creds, self.probe_timeout)
                .await
                .into();

        match &outcome {
            ProbeOutcome::Verified => info!("connection verified"),
            ProbeOutcome::Status(code) => {
                warn!(status = code, "verification incomplete");
            }
            ProbeOutcome::Unreachable(reason) => {
                warn!(error = %reason, "verification check failed");
            }
        }
        outcome
    }

    pub async fn run(&self) -> RunReport {
        let mut results = Vec::with_capacity(self.changesets.len());
        for cs in self.changesets {
            results.push(self.apply_changeset(cs).await);
        }
        let probe = self.verify_reachability().await;

        let report = RunReport { results, probe };
        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            verified = report.probe.is_verified(),
            "migration run finished"
        );
        report
    }
}

/// Validate credentials, then apply every change-set and probe the backend.
/// Only configuration or client construction errors are returned.
pub async fn run(cfg: &Config) -> Result<RunReport, MigrateError> {
    let creds = cfg.credentials()?;
    info!(url = %creds.base_url(), "connecting to Supabase");

    let runner = MigrationRunner::new(creds, cfg)?;
    Ok(runner.run().await)
}
