use crate::error::MigrateError;
use reqwest::StatusCode;
use std::fmt::Write as _;

/// Outcome of applying one change-set. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub changeset_name: String,
    pub succeeded: bool,
    pub status_code: Option<u16>,
    pub message: Option<String>,
}

impl ExecutionResult {
    pub fn success(changeset_name: impl Into<String>, status: StatusCode) -> Self {
        Self {
            changeset_name: changeset_name.into(),
            succeeded: true,
            status_code: Some(status.as_u16()),
            message: None,
        }
    }

    pub fn failure(changeset_name: impl Into<String>, err: &MigrateError) -> Self {
        let message = match err {
            MigrateError::UpstreamStatus { body, .. } => body.clone(),
            other if other.is_timeout() => format!("request timed out: {other}"),
            other => other.to_string(),
        };
        Self {
            changeset_name: changeset_name.into(),
            succeeded: false,
            status_code: err.status().map(|s| s.as_u16()),
            message: Some(message),
        }
    }
}

/// Advisory result of the reachability probe; never fails a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Verified,
    Status(u16),
    Unreachable(String),
}

impl ProbeOutcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, ProbeOutcome::Verified)
    }
}

impl From<Result<StatusCode, MigrateError>> for ProbeOutcome {
    fn from(result: Result<StatusCode, MigrateError>) -> Self {
        match result {
            Ok(StatusCode::OK) => ProbeOutcome::Verified,
            Ok(status) => ProbeOutcome::Status(status.as_u16()),
            Err(e) => ProbeOutcome::Unreachable(e.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub results: Vec<ExecutionResult>,
    pub probe: ProbeOutcome,
}

const RULE_WIDTH: usize = 60;

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.succeeded).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    /// Closing banner with the manual follow-up steps. The banner text is
    /// fixed; failed change-sets are listed on their own lines below it.
    pub fn summary(&self) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let mut out = String::new();
        let _ = writeln!(out, "\n{rule}\nMigrations applied successfully!\n{rule}");
        if self.failed() > 0 {
            let _ = writeln!(
                out,
                "{} of {} applied, {} need manual attention:",
                self.succeeded(),
                self.results.len(),
                self.failed()
            );
        }
        for r in self.results.iter().filter(|r| !r.succeeded) {
            let status = r
                .status_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "no response".to_string());
            let _ = writeln!(out, "  failed: {} ({status})", r.changeset_name);
        }
        let _ = writeln!(out, "\nNext steps:");
        let _ = writeln!(
            out,
            "1. Go to Supabase dashboard: https://supabase.com/dashboard"
        );
        let _ = writeln!(out, "2. Select your project");
        let _ = writeln!(out, "3. Go to SQL Editor");
        let _ = writeln!(
            out,
            "4. Run the queries printed by `supa-migrate show` if not auto-applied"
        );
        let _ = writeln!(out, "5. Test the freebie feature in admin dashboard");
        out
    }
}
