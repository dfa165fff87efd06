use reqwest::StatusCode;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum MigrateError {
    #[error("missing required environment value: {0}")]
    MissingConfig(&'static str),

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("unsupported base URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Upstream error with status: {status}")]
    UpstreamStatus { status: StatusCode, body: String },
}

impl MigrateError {
    /// Configuration failures abort the run before any request is sent;
    /// everything else is a remote failure recovered by the runner.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            MigrateError::MissingConfig(_)
                | MigrateError::InvalidBaseUrl(_)
                | MigrateError::UnsupportedScheme(_)
                | MigrateError::Figment(_)
        )
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            MigrateError::UpstreamStatus { status, .. } => Some(*status),
            MigrateError::Reqwest(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, MigrateError::Reqwest(e) if e.is_timeout())
    }
}

impl From<figment::Error> for MigrateError {
    fn from(e: figment::Error) -> Self {
        MigrateError::Figment(Box::new(e))
    }
}
