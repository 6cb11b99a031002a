use http::{HeaderMap, HeaderValue, StatusCode};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::sync::Arc;

/// Whatever went wrong below HTTP: connection refused, DNS failure, timeout...
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The one thing the client needs from an HTTP stack: send a `PUT` and hand back the response.
///
/// [`ReqwestTransport`] is used unless you pass your own to
/// [`MockServerClientBuilder::transport`]. Implement it to add timeouts, proxies or to stub the
/// network out in your tests.
///
/// [`MockServerClientBuilder::transport`]: crate::MockServerClientBuilder::transport
pub trait Transport: Send + Sync {
    /// Send `PUT url`. `body`, when present, is a JSON document.
    fn put(&self, url: &str, body: Option<Vec<u8>>) -> Result<HttpResponse, TransportError>;
}

impl<T> Transport for Arc<T>
where
    T: Transport + ?Sized,
{
    fn put(&self, url: &str, body: Option<Vec<u8>>) -> Result<HttpResponse, TransportError> {
        self.as_ref().put(url, body)
    }
}

/// A response returned by the MockServer, passed back to the caller untouched.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    pub fn with_body<B>(mut self, body: B) -> Self
    where
        B: Into<Vec<u8>>,
    {
        self.body = body.into();
        self
    }

    /// The body as text. Invalid UTF-8 sequences are replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// A blocking [`Transport`] backed by `reqwest`.
///
/// The underlying client keeps a connection pool: build one transport and share it.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a pre-configured blocking client, e.g. one with a timeout.
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    fn put(&self, url: &str, body: Option<Vec<u8>>) -> Result<HttpResponse, TransportError> {
        let mut request = self.client.put(url);
        if let Some(body) = body {
            request = request
                .header(
                    http::header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                )
                .body(body);
        }

        let response = request.send()?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes()?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
