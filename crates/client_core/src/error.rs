use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a backend call, classified the way the board reacts to it.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Network unreachable, or a non-success response without a usable body.
    #[error("transport failure: {0}")]
    Transport(String),
    /// Non-success response carrying a structured reason.
    #[error("backend rejected request ({status}): {reason}")]
    Application { status: StatusCode, reason: String },
    /// The target order no longer exists on the backend.
    #[error("order not found")]
    NotFound,
    #[error("malformed data: {0}")]
    MalformedData(String),
}

impl BoardError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, BoardError::NotFound)
    }

    /// Server-provided reason suitable for showing to staff.
    pub fn reason(&self) -> Option<&str> {
        match self {
            BoardError::Application { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BoardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BoardError::MalformedData(err.to_string())
        } else {
            BoardError::Transport(err.to_string())
        }
    }
}
