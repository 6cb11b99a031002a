use crate::error::Error;
use http::StatusCode;
use serde::{Deserialize, Serialize};

/// How many times a request must have been received for a verification to pass.
///
/// `exact: Some(true)` means "exactly `count` times", `Some(false)` "at least `count` times".
/// `None` is sent as `null` and lets the server apply its own default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationTimes {
    pub count: u64,
    pub exact: Option<bool>,
}

impl VerificationTimes {
    /// `count` falls back to `1` when absent. `exact` is forwarded untouched.
    pub fn new(count: Option<u64>, exact: Option<bool>) -> Self {
        Self {
            count: count.unwrap_or(1),
            exact,
        }
    }

    pub fn exactly(count: u64) -> Self {
        Self::new(Some(count), Some(true))
    }

    pub fn at_least(count: u64) -> Self {
        Self::new(Some(count), Some(false))
    }
}

impl Default for VerificationTimes {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// The body of a `PUT /verify` call.
///
/// `http_request` can be any serializable matcher: a [`RequestMatcher`] or a hand-written
/// document carrying only the fields you care about.
///
/// [`RequestMatcher`]: crate::RequestMatcher
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification<'a, R: ?Sized> {
    pub http_request: &'a R,
    pub times: VerificationTimes,
}

impl<'a, R: ?Sized> Verification<'a, R> {
    pub fn new(http_request: &'a R, times: VerificationTimes) -> Self {
        Self {
            http_request,
            times,
        }
    }
}

/// The body of a `PUT /verifySequence` call: the requests must have been received in this
/// order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationSequence<'a, R> {
    pub http_requests: &'a [R],
}

impl<'a, R> VerificationSequence<'a, R> {
    pub fn new(http_requests: &'a [R]) -> Self {
        Self { http_requests }
    }
}

/// Map the server's answer to a verification onto an outcome.
///
/// `202 Accepted` means the verification passed, `406 Not Acceptable` that the expected requests
/// were not received. Anything else means the server could not evaluate the verification.
pub(crate) fn outcome(status: StatusCode, body: &[u8]) -> Result<(), Error> {
    match status {
        StatusCode::ACCEPTED => Ok(()),
        StatusCode::NOT_ACCEPTABLE => Err(Error::VerificationFailed {
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        }),
        _ => Err(Error::UnexpectedStatus {
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        }),
    }
}
