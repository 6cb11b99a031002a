use crate::json::to_spaced_string;
use crate::request_matcher::{append_value, Cookie, KeyValues};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::time::Duration;

/// Status code used when none is specified.
pub const DEFAULT_STATUS_CODE: u16 = 200;

/// The headers every [`ResponseSpec`] starts with.
pub fn default_headers() -> Vec<KeyValues> {
    vec![
        KeyValues::new("Content-Type", "application/json; charset=utf-8"),
        KeyValues::new("Cache-Control", "no-cache, no-store"),
    ]
}

/// Time units understood by MockServer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

/// How long MockServer should wait before returning a response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delay {
    pub time_unit: TimeUnit,
    pub value: u64,
}

impl Delay {
    pub fn new(time_unit: TimeUnit, value: u64) -> Self {
        Self { time_unit, value }
    }
}

/// No delay at all, expressed as `0` microseconds.
impl Default for Delay {
    fn default() -> Self {
        Self::new(TimeUnit::Microseconds, 0)
    }
}

/// Millisecond precision. Sub-millisecond parts are dropped, durations too large for a `u64`
/// are capped.
impl From<Duration> for Delay {
    fn from(duration: Duration) -> Self {
        let value = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        Self::new(TimeUnit::Milliseconds, value)
    }
}

/// The response MockServer returns when an expectation matches.
///
/// A fresh `ResponseSpec` answers with an empty body, the two [`default_headers`], no cookies and
/// no delay.
///
/// ### Example:
/// ```rust
/// use mockserver_client::{Delay, ResponseSpec};
/// use serde_json::json;
/// use std::time::Duration;
///
/// let response = ResponseSpec::new(201)
///     .body_json(&json!({"id": 7}))
///     .unwrap()
///     .header("Location", "/orders/7")
///     .delay(Delay::from(Duration::from_millis(250)));
///
/// assert_eq!(response.body, r#"{"id": 7}"#);
/// assert_eq!(response.headers.len(), 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSpec {
    pub status_code: u16,
    pub body: String,
    pub cookies: Vec<Cookie>,
    pub headers: Vec<KeyValues>,
    pub delay: Delay,
}

impl ResponseSpec {
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            body: String::new(),
            cookies: Vec::new(),
            headers: default_headers(),
            delay: Delay::default(),
        }
    }

    /// Set the body to the JSON text of `body`.
    pub fn body_json<B>(mut self, body: &B) -> Result<Self, serde_json::Error>
    where
        B: ?Sized + Serialize,
    {
        self.body = to_spaced_string(body)?;
        Ok(self)
    }

    /// Set the body verbatim.
    pub fn body_raw<T>(mut self, body: T) -> Self
    where
        T: Into<String>,
    {
        self.body = body.into();
        self
    }

    /// Append a header value. Values for an existing header name (case-insensitive) are added
    /// to that entry.
    pub fn header<N, V>(mut self, name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        append_value(&mut self.headers, name.into(), value.into(), true);
        self
    }

    /// Drop every header, the defaults included.
    pub fn without_headers(mut self) -> Self {
        self.headers.clear();
        self
    }

    pub fn cookie<N, V>(mut self, name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.cookies.push(Cookie::new(name, value));
        self
    }

    pub fn delay(mut self, delay: Delay) -> Self {
        self.delay = delay;
        self
    }
}

impl Default for ResponseSpec {
    fn default() -> Self {
        Self::new(DEFAULT_STATUS_CODE)
    }
}
