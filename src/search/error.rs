//! Search pipeline errors

use crate::providers::ResolveError;
use thiserror::Error;

/// Outcome of a failed search.
///
/// Client errors map to 400 and upstream failures to 500. None of them is
/// retried and none is ever cached.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Missing focus mode or query")]
    MissingInput,

    #[error(transparent)]
    Model(#[from] ResolveError),

    #[error("Invalid focus mode")]
    InvalidFocusMode,

    /// Error reported by the agent through its event stream
    #[error("{0}")]
    Agent(String),

    /// Failure while starting the agent or any other unexpected error
    #[error("An error has occurred.")]
    Internal(#[source] anyhow::Error),
}

impl SearchError {
    /// Whether the caller is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingInput | Self::Model(_) | Self::InvalidFocusMode
        )
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert_eq!(SearchError::MissingInput.status_code(), 400);
        assert_eq!(SearchError::InvalidFocusMode.status_code(), 400);
        assert_eq!(
            SearchError::from(ResolveError::MissingCustomCredentials).to_string(),
            "Missing custom OpenAI base URL or key"
        );
        assert!(SearchError::from(ResolveError::InvalidModel).is_client_error());
    }

    #[test]
    fn test_server_errors() {
        let agent = SearchError::Agent("boom".to_string());
        assert_eq!(agent.status_code(), 500);
        assert_eq!(agent.to_string(), "boom");

        let internal = SearchError::Internal(anyhow::anyhow!("socket closed"));
        assert_eq!(internal.status_code(), 500);
        assert_eq!(internal.to_string(), "An error has occurred.");
    }
}
