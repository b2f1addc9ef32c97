use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Fetch,
    DataUnavailable,
    Transport,
}

/// Why a single lookup produced no country.
///
/// The `Display` text is exactly what the error-message field shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Country \"{query}\" not found. Please check the spelling.")]
    NotFound { query: String },
    #[error("Failed to fetch data: {status} {status_text}")]
    Fetch { status: u16, status_text: String },
    #[error("Country data or flag information not available for this search.")]
    DataUnavailable,
    #[error("Failed to fetch data: {message}")]
    Transport { message: String },
}

impl LookupError {
    pub fn not_found(query: impl Into<String>) -> Self {
        Self::NotFound {
            query: query.into(),
        }
    }

    pub fn fetch(status: u16, status_text: impl Into<String>) -> Self {
        Self::Fetch {
            status,
            status_text: status_text.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Fetch { .. } => ErrorCode::Fetch,
            Self::DataUnavailable => ErrorCode::DataUnavailable,
            Self::Transport { .. } => ErrorCode::Transport,
        }
    }
}
