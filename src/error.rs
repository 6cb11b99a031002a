use http::StatusCode;
use thiserror::Error;

use crate::transport::TransportError;

/// Everything that can go wrong while talking to a MockServer.
///
/// `mock_any_response`, `mock_simple_response`, `clear` and `reset` never look at the status code
/// returned by the server: a rejected document reaches you as a plain [`HttpResponse`].
/// Only verifications turn a status code into an error, and they keep "the expected requests were
/// not received" ([`Error::VerificationFailed`]) apart from "the server could not answer the
/// question" ([`Error::UnexpectedStatus`]) and "the server could not be reached"
/// ([`Error::Transport`]).
///
/// [`HttpResponse`]: crate::HttpResponse
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid MockServer url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("cannot serialize JSON: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("failed to reach the MockServer: {0}")]
    Transport(#[source] TransportError),
    #[error("verification failed ({status}): {body}")]
    VerificationFailed { status: StatusCode, body: String },
    #[error("unexpected response to a verification ({status}): {body}")]
    UnexpectedStatus { status: StatusCode, body: String },
}

impl Error {
    /// `true` when the server evaluated the verification and the expected requests were not
    /// received as specified.
    pub fn is_verification_failure(&self) -> bool {
        matches!(self, Error::VerificationFailed { .. })
    }

    /// The status code returned by the server, if the error comes from a server answer.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::VerificationFailed { status, .. } | Error::UnexpectedStatus { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Error::Transport(e)
    }
}
