use thiserror::Error;

#[derive(Error, Debug)]
pub enum TowerError {
    #[error("{kind} '{reference}' not found")]
    ReferenceNotFound { kind: &'static str, reference: String },

    #[error("{kind} '{reference}' is ambiguous, it matches: {}", candidates.join(", "))]
    AmbiguousReference {
        kind: &'static str,
        reference: String,
        candidates: Vec<String>,
    },

    #[error("No primary compute environment found at {workspace} workspace")]
    NoPrimaryComputeEnvironment { workspace: String },

    #[error("{count} compute environments are flagged as primary at {workspace} workspace")]
    AmbiguousPrimaryComputeEnvironment { workspace: String, count: usize },

    #[error("Invalid reference '{0}'")]
    InvalidReference(String),

    #[error("Missing {0} reference, use the command option or set its environment variable")]
    MissingReference(&'static str),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Connection error: {0}")]
    Transport(String),

    #[error("Invalid response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Render error: {0}")]
    Template(#[from] minijinja::Error),
}

impl TowerError {
    pub fn not_found(kind: &'static str, reference: impl Into<String>) -> Self {
        TowerError::ReferenceNotFound {
            kind,
            reference: reference.into(),
        }
    }

    pub fn ambiguous(
        kind: &'static str,
        reference: impl Into<String>,
        candidates: Vec<String>,
    ) -> Self {
        TowerError::AmbiguousReference {
            kind,
            reference: reference.into(),
            candidates,
        }
    }

    /// HTTP status of an API failure, when the error came from the platform.
    pub fn status(&self) -> Option<u16> {
        match self {
            TowerError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TowerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return TowerError::InvalidResponse {
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
                reason: err.to_string(),
            };
        }
        match err.status() {
            Some(status) => TowerError::Api {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => TowerError::Transport(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, TowerError>;
