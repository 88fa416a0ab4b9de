use serde::{Deserialize, Serialize};

/// `{"message": ..., "status": ...}` body shared by health and error replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPayload {
    pub message: String,
    pub status: String,
}

impl StatusPayload {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: "success".to_string(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: "error".to_string(),
        }
    }
}
