use crate::error::MigrateError;
use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use url::Url;

pub const SUPABASE_URL_ENV: &str = "NEXT_PUBLIC_SUPABASE_URL";
pub const SERVICE_ROLE_KEY_ENV: &str = "SUPABASE_SERVICE_ROLE_KEY";

/// Prefix for optional tunables, e.g. `MIGRATE_LOGLEVEL=debug`.
pub const TUNABLE_PREFIX: &str = "MIGRATE_";

/// Runtime configuration.
///
/// Layering (later wins):
/// - built-in defaults
/// - `MIGRATE_*` environment tunables
/// - the two Supabase variables, read under their own names
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(
        rename = "next_public_supabase_url",
        skip_serializing_if = "Option::is_none"
    )]
    pub supabase_url: Option<String>,

    #[serde(
        rename = "supabase_service_role_key",
        skip_serializing_if = "Option::is_none"
    )]
    pub service_role_key: Option<String>,

    pub loglevel: String,
    pub request_timeout_ms: u64,
    pub probe_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            supabase_url: None,
            service_role_key: None,
            loglevel: "info".to_string(),
            request_timeout_ms: 30_000,
            probe_timeout_ms: 10_000,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("supabase_url", &self.supabase_url)
            .field(
                "service_role_key",
                &self.service_role_key.as_ref().map(|_| "<redacted>"),
            )
            .field("loglevel", &self.loglevel)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("probe_timeout_ms", &self.probe_timeout_ms)
            .finish()
    }
}

impl Config {
    /// The figment used by the binary. Call after `.env` files are loaded.
    ///
    /// The Supabase variables are merged as plain strings: `Env` would parse
    /// a key such as `0123456789` or `true` into a number or bool.
    pub fn figment() -> Figment {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::prefixed(TUNABLE_PREFIX));

        [
            (SUPABASE_URL_ENV, "next_public_supabase_url"),
            (SERVICE_ROLE_KEY_ENV, "supabase_service_role_key"),
        ]
        .into_iter()
        .fold(figment, |figment, (var, key)| match std::env::var(var) {
            Ok(value) => figment.merge(Serialized::default(key, value)),
            Err(_) => figment,
        })
    }

    pub fn from_env() -> Result<Self, MigrateError> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self, MigrateError> {
        Ok(figment.extract()?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Validate and return the credentials needed for `apply`.
    pub fn credentials(&self) -> Result<Credentials, MigrateError> {
        let url = required(self.supabase_url.as_deref(), SUPABASE_URL_ENV)?;
        let key = required(self.service_role_key.as_deref(), SERVICE_ROLE_KEY_ENV)?;
        Credentials::new(url, key)
    }
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, MigrateError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(MigrateError::MissingConfig(name)),
    }
}

/// Backend location and service-role key. Immutable once built.
#[derive(Clone)]
pub struct Credentials {
    base_url: Url,
    secret_key: String,
}

impl Credentials {
    pub fn new(base_url: &str, secret_key: &str) -> Result<Self, MigrateError> {
        if secret_key.trim().is_empty() {
            return Err(MigrateError::MissingConfig(SERVICE_ROLE_KEY_ENV));
        }
        let mut base_url = Url::parse(base_url.trim())?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(MigrateError::UnsupportedScheme(base_url.scheme().to_string()));
        }
        // `Url::join` replaces the last segment unless the path ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        base_url.set_query(None);
        base_url.set_fragment(None);

        Ok(Self {
            base_url,
            secret_key: secret_key.trim().to_string(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// Resolve a relative API path (no leading slash) against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, MigrateError> {
        Ok(self.base_url.join(path)?)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url.as_str())
            .field("secret_key", &"<redacted>")
            .finish()
    }
}
