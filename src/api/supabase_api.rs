use crate::config::Credentials;
use crate::error::MigrateError;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde::Serialize;
use std::time::Duration;

/// Edge function that executes raw SQL with service-role privileges.
pub const SQL_FUNCTION_PATH: &str = "functions/v1/sql";
/// PostgREST collection used for the liveness probe.
pub const EVENTS_PATH: &str = "rest/v1/events";
pub const PGRST_OBJECT_JSON: &str = "application/vnd.pgrst.object+json";

/// Max characters of an error body kept for diagnostics.
pub const BODY_SNIPPET_CHARS: usize = 200;

#[derive(Debug, Serialize)]
struct SqlPayload<'a> {
    sql: &'a str,
}

/// Stateless calls against the Supabase REST facade.
pub struct SupabaseApi;

impl SupabaseApi {
    /// POST one SQL block. Only 200 and 201 count as applied.
    pub async fn execute_sql(
        client: &reqwest::Client,
        creds: &Credentials,
        sql: &str,
        timeout: Duration,
    ) -> Result<StatusCode, MigrateError> {
        let url = creds.endpoint(SQL_FUNCTION_PATH)?;
        let resp = client
            .post(url)
            .bearer_auth(creds.secret_key())
            .header("apikey", creds.secret_key())
            .json(&SqlPayload { sql })
            .timeout(timeout)
            .send()
            .await?;

        let status = resp.status();
        if matches!(status, StatusCode::OK | StatusCode::CREATED) {
            return Ok(status);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(MigrateError::UpstreamStatus {
            status,
            body: body_snippet(&body),
        })
    }

    /// GET a single id from `events`. Any HTTP answer is returned as-is;
    /// only transport failures and timeouts are errors.
    pub async fn probe_events(
        client: &reqwest::Client,
        creds: &Credentials,
        timeout: Duration,
    ) -> Result<StatusCode, MigrateError> {
        let url = creds.endpoint(EVENTS_PATH)?;
        let resp = client
            .get(url)
            .query(&[("select", "id"), ("limit", "1")])
            .bearer_auth(creds.secret_key())
            .header("apikey", creds.secret_key())
            .header(ACCEPT, PGRST_OBJECT_JSON)
            .timeout(timeout)
            .send()
            .await?;
        Ok(resp.status())
    }
}

pub(crate) fn body_snippet(body: &str) -> String {
    body.chars().take(BODY_SNIPPET_CHARS).collect()
}
