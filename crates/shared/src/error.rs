use serde::{Deserialize, Serialize};

/// Error body returned by the orders backend on non-success responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
        }
    }

    /// The server-provided reason, if it carries any text.
    pub fn reason(&self) -> Option<&str> {
        self.error
            .as_deref()
            .map(str::trim)
            .filter(|reason| !reason.is_empty())
    }
}
