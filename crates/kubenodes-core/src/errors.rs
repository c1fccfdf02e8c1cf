//! Error hierarchy for one inventory parse.

/// Failure of the node list query. Always aborts the parse.
#[derive(Clone, Debug, thiserror::Error)]
pub enum SourceError {
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("api error {code}: {message}")]
    Api { code: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("client configuration error: {0}")]
    Config(String),
}

impl SourceError {
    /// Classify an HTTP status returned by the API server.
    pub fn from_status(code: u16, message: String) -> Self {
        match code {
            401 | 403 => Self::Authentication(message),
            _ => Self::Api { code, message },
        }
    }

    /// Short classification string for logging.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::Authentication(_) => "authentication_failed",
            Self::Api { .. } => "api_error",
            Self::Transport(_) => "transport_error",
            Self::Config(_) => "config_error",
        }
    }
}

/// Failure evaluating one composite variable, conditional group or keyed group.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RuleError {
    #[error("template error: {0}")]
    Template(String),
    #[error("invalid group name format, expected a string, a list or a mapping, got {0}")]
    InvalidKeyShape(&'static str),
    #[error("no key or key resulted empty")]
    EmptyKey,
}

/// Errors that abort an inventory parse.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("failed to list nodes: {0}")]
    Source(#[from] SourceError),
    #[error("could not evaluate {rule} for host {host}: {source}")]
    Rule {
        host: String,
        rule: String,
        #[source]
        source: RuleError,
    },
    #[error("node #{0} in the list response has no name")]
    InvalidNode(usize),
}
