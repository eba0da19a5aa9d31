use serde::Serialize;
use std::error::Error;
use std::fmt;

/// Internal error taxonomy for everything between the dispatcher and the
/// backend. The dispatcher is the single place where these are translated
/// into protocol error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    /// Arguments that passed the schema gate but are unusable by a handler.
    InvalidParams,
    /// No usable credential, or the login exchange was rejected.
    Auth,
    /// The backend answered with a non-success status.
    Api,
    /// Network failures and everything else.
    Internal,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub message: String,
    /// Upstream HTTP status for `Api` errors, carried verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidParams, message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Auth, message)
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: ToolErrorKind::Api,
            message: message.into(),
            status: Some(status),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Internal, message)
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for ToolError {}

impl From<reqwest::Error> for ToolError {
    fn from(err: reqwest::Error) -> Self {
        ToolError::internal(format!("request failed: {}", err))
    }
}
