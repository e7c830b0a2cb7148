//! Error type shared by every stage of an IP lookup

use thiserror::Error;

/// Errors produced while classifying, resolving, fetching or normalizing a lookup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Empty or unparseable query
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Domain has no A-record, or the resolver call failed
    #[error("unable to resolve domain: {0}")]
    ResolutionFailure(String),

    /// Provider signalled an error or answered with a non-success status
    #[error("geolocation provider failed: {0}")]
    ProviderFailure(String),

    /// Response body could not be understood
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl LookupError {
    /// Short machine-friendly name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            LookupError::InvalidInput(_) => "invalid_input",
            LookupError::ResolutionFailure(_) => "resolution_failure",
            LookupError::ProviderFailure(_) => "provider_failure",
            LookupError::MalformedResponse(_) => "malformed_response",
        }
    }
}

pub type LookupResult<T> = Result<T, LookupError>;
