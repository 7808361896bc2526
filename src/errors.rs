use reqwest::StatusCode;
use serde::Deserialize;

/// Error payload shape used by the backend for rejected requests.
///
/// The backend is inconsistent about which field carries the human message
/// (`message` on business rejections, `error` on some infrastructure paths),
/// so both are accepted and the first non-empty one wins.
#[derive(Debug, Default, Deserialize)]
pub struct BackendErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl BackendErrorBody {
    pub fn best_message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .filter(|m| !m.trim().is_empty())
    }
}

/// Client-side error taxonomy.
///
/// Three families matter for the UI:
/// - `Validation` / `OperationInFlight` / `NoOpenSession`: local pre-checks
///   that must block an action before any network call happens.
/// - `Rejected` / `Unauthorized` / `Forbidden` / `NotFound`: the backend
///   refused the request; the message is surfaced verbatim when available so
///   the operator sees exactly what the ledger owner said.
/// - `Transport` / `UnexpectedResponse`: the backend could not be reached or
///   answered garbage. Callers treat these conservatively (fail closed for
///   session-status checks, keep local state for mutations).
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("another operation is already in flight")]
    OperationInFlight,

    #[error("no open cash session")]
    NoOpenSession,

    #[error("{0}")]
    Rejected(String),

    #[error("authentication required")]
    Unauthorized,

    #[error("access denied")]
    Forbidden,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response from backend: {0}")]
    UnexpectedResponse(String),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }

    /// Maps an HTTP error status plus the parsed error body to the taxonomy.
    /// The backend's own message takes precedence over the generic fallback.
    pub fn from_status(status: StatusCode, body: &BackendErrorBody) -> Self {
        let verbatim = body.best_message().map(str::to_string);
        match status {
            StatusCode::UNAUTHORIZED => ServiceError::Unauthorized,
            StatusCode::FORBIDDEN => ServiceError::Forbidden,
            StatusCode::NOT_FOUND => {
                ServiceError::NotFound(verbatim.unwrap_or_else(|| "recurso".to_string()))
            }
            s if s.is_client_error() => ServiceError::Rejected(
                verbatim.unwrap_or_else(|| "Requisição rejeitada pelo servidor.".to_string()),
            ),
            s => ServiceError::Transport(
                verbatim.unwrap_or_else(|| format!("servidor respondeu {}", s.as_u16())),
            ),
        }
    }

    /// True when the failure came from the network rather than from a rule.
    /// Session-status checks use this to decide "treat as no open session".
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ServiceError::Transport(_) | ServiceError::UnexpectedResponse(_)
        )
    }

    /// True for failures the operator can fix by correcting the form.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ServiceError::Validation(_)
                | ServiceError::OperationInFlight
                | ServiceError::NoOpenSession
        )
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ServiceError::UnexpectedResponse(err.to_string())
        } else {
            ServiceError::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for ServiceError {
    fn from(err: url::ParseError) -> Self {
        ServiceError::Transport(format!("invalid URL: {}", err))
    }
}
