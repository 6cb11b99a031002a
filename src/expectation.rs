use crate::request_matcher::RequestMatcher;
use crate::response_spec::{ResponseSpec, DEFAULT_STATUS_CODE};
use serde::{Deserialize, Serialize};

/// How many more times an [`Expectation`] may fire on the server.
///
/// ```rust
/// use mockserver_client::Times;
///
/// assert_eq!(Times::default(), Times::once());
/// assert_eq!(Times::exactly(3).remaining_times, 3);
/// assert!(Times::unlimited().unlimited);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Times {
    pub remaining_times: u64,
    pub unlimited: bool,
}

impl Times {
    pub fn once() -> Self {
        Self::exactly(1)
    }

    pub fn exactly(n: u64) -> Self {
        Self {
            remaining_times: n,
            unlimited: false,
        }
    }

    pub fn unlimited() -> Self {
        Self {
            remaining_times: 0,
            unlimited: true,
        }
    }
}

impl Default for Times {
    fn default() -> Self {
        Self::once()
    }
}

/// A rule for the server: when a request matches `http_request`, answer with `http_response`,
/// at most `times`.
///
/// `Expectation`s are plain documents: they do nothing until they are sent with
/// [`MockServerClient::mock_any_response`].
///
/// [`MockServerClient::mock_any_response`]: crate::MockServerClient::mock_any_response
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expectation {
    pub http_request: RequestMatcher,
    pub http_response: ResponseSpec,
    pub times: Times,
}

impl Expectation {
    /// Pair a matcher with a response. The expectation fires once unless [`times`] says
    /// otherwise.
    ///
    /// [`times`]: #method.times
    pub fn new(http_request: RequestMatcher, http_response: ResponseSpec) -> Self {
        Self {
            http_request,
            http_response,
            times: Times::once(),
        }
    }

    pub fn times(mut self, times: Times) -> Self {
        self.times = times;
        self
    }
}

/// Shorthand for [`RequestMatcher::new`]: a matcher on `path`, every other field empty.
pub fn create_request_matcher<P>(path: P) -> RequestMatcher
where
    P: Into<String>,
{
    RequestMatcher::new(path)
}

/// The expectation behind [`MockServerClient::mock_simple_response`].
///
/// Matches requests on `path` alone and answers with the JSON text of `response_body`, the
/// default headers and no delay, exactly once.
/// `status_code` falls back to `200` only when it is `None`: `Some(0)` is sent as `0`.
///
/// ### Example:
/// ```rust
/// use mockserver_client::create_expectation;
/// use serde_json::json;
///
/// let expectation = create_expectation("/hello", &json!({"msg": "hi"}), None).unwrap();
///
/// assert_eq!(expectation.http_request.path, "/hello");
/// assert_eq!(expectation.http_response.status_code, 200);
/// assert_eq!(expectation.http_response.body, r#"{"msg": "hi"}"#);
/// ```
///
/// [`MockServerClient::mock_simple_response`]: crate::MockServerClient::mock_simple_response
pub fn create_expectation<P, B>(
    path: P,
    response_body: &B,
    status_code: Option<u16>,
) -> Result<Expectation, serde_json::Error>
where
    P: Into<String>,
    B: ?Sized + Serialize,
{
    let response = ResponseSpec::new(status_code.unwrap_or(DEFAULT_STATUS_CODE))
        .body_json(response_body)?;
    Ok(Expectation::new(create_request_matcher(path), response))
}
