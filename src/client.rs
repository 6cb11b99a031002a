use crate::error::Error;
use crate::expectation::create_expectation;
use crate::json::to_spaced_string;
use crate::observer::{BodyPrintLimit, LogObserver, Observer};
use crate::transport::{HttpResponse, ReqwestTransport, Transport};
use crate::verification::{self, Verification, VerificationSequence, VerificationTimes};
use log::debug;
use serde::Serialize;
use std::fmt::{Debug, Formatter};
use url::Url;

const EXPECTATION: &str = "/expectation";
const VERIFY: &str = "/verify";
const VERIFY_SEQUENCE: &str = "/verifySequence";
const CLEAR: &str = "/clear";
const RESET: &str = "/reset";

/// A blocking client for a MockServer that is already running somewhere.
///
/// The client holds the base url of the server and nothing else worth mentioning: every call
/// builds a JSON document, sends it with a `PUT` and waits for the answer.
/// It can be shared between threads.
///
/// ### Example:
/// ```rust,no_run
/// use mockserver_client::{MockServerClient, RequestMatcher};
/// use serde_json::json;
///
/// fn main() -> Result<(), mockserver_client::Error> {
///     let client = MockServerClient::new("http://localhost:1080")?;
///
///     // Arrange: the next request on `/hello` gets a JSON greeting.
///     client.mock_simple_response("/hello", &json!({"msg": "hi"}), None)?;
///
///     // ... exercise the code under test ...
///
///     // Assert: `/hello` was called exactly once, then start from a clean slate.
///     client
///         .verify(&RequestMatcher::new("/hello").method("GET"), Some(1), Some(true))?
///         .reset()?;
///     Ok(())
/// }
/// ```
pub struct MockServerClient {
    url: String,
    transport: Box<dyn Transport>,
    observer: Box<dyn Observer>,
}

impl Debug for MockServerClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // Neither the transport nor the observer are required to implement `Debug`.
        f.debug_struct("MockServerClient")
            .field("url", &self.url)
            .finish()
    }
}

impl MockServerClient {
    /// A client for the server at `url`, using the default [`ReqwestTransport`] and
    /// [`LogObserver`].
    ///
    /// Fails if `url` is not an absolute url.
    pub fn new<T>(url: T) -> Result<Self, Error>
    where
        T: Into<String>,
    {
        Self::builder(url).build()
    }

    /// Use `MockServerClient::builder` to plug in your own transport or observer.
    pub fn builder<T>(url: T) -> MockServerClientBuilder
    where
        T: Into<String>,
    {
        MockServerClientBuilder::new(url)
    }

    /// The base url of the server, as it was given (minus any trailing `/`).
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Register an expectation on the server.
    ///
    /// `expectation` is usually an [`Expectation`], but any document the server understands
    /// will do. The server's answer is returned as is, whatever its status code: check it if
    /// you care.
    ///
    /// [`Expectation`]: crate::Expectation
    pub fn mock_any_response<E>(&self, expectation: &E) -> Result<HttpResponse, Error>
    where
        E: ?Sized + Serialize,
    {
        self.put_json(EXPECTATION, expectation)
    }

    /// Register an expectation answering the next request on `path` with `response_body`
    /// serialized as JSON. `status_code` defaults to `200` when `None`.
    ///
    /// Sends exactly what `mock_any_response(&create_expectation(path, response_body,
    /// status_code)?)` would.
    pub fn mock_simple_response<P, B>(
        &self,
        path: P,
        response_body: &B,
        status_code: Option<u16>,
    ) -> Result<HttpResponse, Error>
    where
        P: Into<String>,
        B: ?Sized + Serialize,
    {
        let expectation = create_expectation(path, response_body, status_code)?;
        self.mock_any_response(&expectation)
    }

    /// Check that the server received requests matching `request`.
    ///
    /// `count` defaults to `1`. `exact` chooses between "exactly `count` times" (`Some(true)`)
    /// and "at least `count` times" (`Some(false)`); `None` is sent as `null`.
    ///
    /// Returns the client itself when the server accepts the verification, so that calls can be
    /// chained. Otherwise the [`Observer`] is told about the answer and an error is returned:
    /// [`Error::VerificationFailed`] if the requests were not received as expected,
    /// [`Error::UnexpectedStatus`] if the server could not evaluate the verification.
    pub fn verify<R>(
        &self,
        request: &R,
        count: Option<u64>,
        exact: Option<bool>,
    ) -> Result<&Self, Error>
    where
        R: ?Sized + Serialize,
    {
        let verification = Verification::new(request, VerificationTimes::new(count, exact));
        let response = self.put_json(VERIFY, &verification)?;
        self.check_verification(VERIFY, response)
    }

    /// Check that the server received requests matching `requests`, in this order.
    ///
    /// Same contract as [`verify`](#method.verify).
    pub fn verify_sequence<R>(&self, requests: &[R]) -> Result<&Self, Error>
    where
        R: Serialize,
    {
        let response = self.put_json(VERIFY_SEQUENCE, &VerificationSequence::new(requests))?;
        self.check_verification(VERIFY_SEQUENCE, response)
    }

    /// Remove the expectations and recorded requests matching `request`.
    /// The server's answer is returned as is.
    pub fn clear<R>(&self, request: &R) -> Result<HttpResponse, Error>
    where
        R: ?Sized + Serialize,
    {
        self.put_json(CLEAR, request)
    }

    /// Remove every expectation and recorded request from the server.
    /// The server's answer is returned as is.
    pub fn reset(&self) -> Result<HttpResponse, Error> {
        self.put(RESET, None)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url, path)
    }

    fn put_json<T>(&self, path: &str, document: &T) -> Result<HttpResponse, Error>
    where
        T: ?Sized + Serialize,
    {
        let body = to_spaced_string(document)?;
        self.put(path, Some(body.into_bytes()))
    }

    fn put(&self, path: &str, body: Option<Vec<u8>>) -> Result<HttpResponse, Error> {
        let url = self.endpoint(path);
        debug!(
            "PUT {} ({} bytes)",
            url,
            body.as_ref().map(Vec::len).unwrap_or(0)
        );
        let response = self.transport.put(&url, body)?;
        debug!("{} answered {}", url, response.status);
        Ok(response)
    }

    fn check_verification(&self, path: &str, response: HttpResponse) -> Result<&Self, Error> {
        let outcome = verification::outcome(response.status, &response.body);
        if outcome.is_err() {
            self.observer
                .verification_failed(&self.endpoint(path), response.status, &response.body);
        }
        outcome.map(|_| self)
    }
}

/// A builder providing a fluent API to assemble a [`MockServerClient`] step-by-step.
/// Use [`MockServerClient::builder`] to get started.
pub struct MockServerClientBuilder {
    url: String,
    transport: Option<Box<dyn Transport>>,
    observer: Option<Box<dyn Observer>>,
    body_print_limit: BodyPrintLimit,
}

impl MockServerClientBuilder {
    pub(crate) fn new<T>(url: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            url: url.into(),
            transport: None,
            observer: None,
            body_print_limit: BodyPrintLimit::default(),
        }
    }

    /// Send requests through `transport` instead of a default [`ReqwestTransport`].
    pub fn transport<T>(mut self, transport: T) -> Self
    where
        T: Transport + 'static,
    {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Report failed verifications to `observer` instead of a [`LogObserver`].
    pub fn observer<O>(mut self, observer: O) -> Self
    where
        O: Observer + 'static,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    /// How much of a failed verification's body the default [`LogObserver`] prints.
    /// Ignored when a custom observer is set.
    pub fn body_print_limit(mut self, limit: BodyPrintLimit) -> Self {
        self.body_print_limit = limit;
        self
    }

    /// Finalise the builder. Fails if the url is not an absolute url.
    pub fn build(self) -> Result<MockServerClient, Error> {
        Url::parse(&self.url)?;
        let transport: Box<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Box::new(ReqwestTransport::new()),
        };
        let observer: Box<dyn Observer> = match self.observer {
            Some(observer) => observer,
            None => Box::new(LogObserver::new(self.body_print_limit)),
        };
        Ok(MockServerClient {
            url: self.url.trim_end_matches('/').to_string(),
            transport,
            observer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;
    use crate::{Expectation, RequestMatcher, ResponseSpec, Times};
    use http::StatusCode;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone)]
    struct SentRequest {
        url: String,
        body: Option<Vec<u8>>,
    }

    impl SentRequest {
        fn json(&self) -> Value {
            serde_json::from_slice(self.body.as_ref().expect("No body was sent.")).unwrap()
        }
    }

    /// Answers every request with the same status and body, and remembers what it was sent.
    struct StubTransport {
        status: StatusCode,
        body: &'static str,
        sent: Mutex<Vec<SentRequest>>,
    }

    impl StubTransport {
        fn answering(status: u16, body: &'static str) -> Arc<Self> {
            Arc::new(Self {
                status: StatusCode::from_u16(status).unwrap(),
                body,
                sent: Mutex::new(Vec::new()),
            })
        }

        fn sent(&self) -> Vec<SentRequest> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl Transport for StubTransport {
        fn put(&self, url: &str, body: Option<Vec<u8>>) -> Result<HttpResponse, TransportError> {
            self.sent.lock().unwrap().push(SentRequest {
                url: url.to_string(),
                body,
            });
            Ok(HttpResponse::new(self.status).with_body(self.body))
        }
    }

    struct UnreachableTransport;

    impl Transport for UnreachableTransport {
        fn put(&self, _url: &str, _body: Option<Vec<u8>>) -> Result<HttpResponse, TransportError> {
            Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )))
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        failures: Mutex<Vec<(String, StatusCode, String)>>,
    }

    impl Observer for RecordingObserver {
        fn verification_failed(&self, url: &str, status: StatusCode, body: &[u8]) {
            self.failures.lock().unwrap().push((
                url.to_string(),
                status,
                String::from_utf8_lossy(body).into_owned(),
            ));
        }
    }

    fn client(transport: &Arc<StubTransport>) -> MockServerClient {
        MockServerClient::builder("http://localhost:1080")
            .transport(transport.clone())
            .build()
            .unwrap()
    }

    #[test]
    fn invalid_urls_are_rejected() {
        let outcome = MockServerClient::new("/no/scheme/or/host");

        assert!(matches!(outcome, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn trailing_slashes_do_not_double_up() {
        let transport = StubTransport::answering(200, "");
        let client = MockServerClient::builder("http://localhost:1080/")
            .transport(transport.clone())
            .build()
            .unwrap();

        client.reset().unwrap();

        assert_eq!(client.url(), "http://localhost:1080");
        assert_eq!(transport.sent()[0].url, "http://localhost:1080/reset");
    }

    #[test]
    fn mock_simple_response_puts_the_expectation() {
        let transport = StubTransport::answering(201, "");
        let client = client(&transport);

        let response = client
            .mock_simple_response("/hello", &json!({"msg": "hi"}), Some(200))
            .unwrap();

        assert_eq!(response.status, StatusCode::CREATED);
        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, "http://localhost:1080/expectation");
        let document = sent[0].json();
        assert_eq!(document["httpRequest"]["path"], "/hello");
        assert_eq!(document["httpResponse"]["statusCode"], 200);
        assert_eq!(document["httpResponse"]["body"], r#"{"msg": "hi"}"#);
        assert_eq!(
            document["times"],
            json!({"remainingTimes": 1, "unlimited": false})
        );
    }

    #[test]
    fn simple_and_any_response_send_identical_bytes() {
        let transport = StubTransport::answering(201, "");
        let client = client(&transport);
        let body = json!({"name": "value", "list": [1, 2]});

        client
            .mock_simple_response("/somePath", &body, Some(203))
            .unwrap();
        client
            .mock_any_response(&create_expectation("/somePath", &body, Some(203)).unwrap())
            .unwrap();

        let sent = transport.sent();
        assert_eq!(sent[0].url, sent[1].url);
        assert_eq!(sent[0].body, sent[1].body);
    }

    #[test]
    fn mock_any_response_returns_rejections_untouched() {
        let transport = StubTransport::answering(400, "incorrect expectation json format");
        let client = client(&transport);
        let expectation = Expectation::new(
            RequestMatcher::new("/somePath"),
            ResponseSpec::new(200).body_raw("ok"),
        )
        .times(Times::unlimited());

        let response = client.mock_any_response(&expectation).unwrap();

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.text(), "incorrect expectation json format");
        assert_eq!(transport.sent()[0].json()["times"]["unlimited"], true);
    }

    #[test]
    fn mock_any_response_accepts_free_form_documents() {
        let transport = StubTransport::answering(201, "");
        let client = client(&transport);
        let expectation = json!({
            "httpRequest": {"path": "/somePath", "body": {"type": "STRING", "value": "someBody"}},
            "httpResponse": {"statusCode": 200}
        });

        client.mock_any_response(&expectation).unwrap();

        assert_eq!(transport.sent()[0].json(), expectation);
    }

    #[test]
    fn verify_defaults_to_one_non_exact_match() {
        let transport = StubTransport::answering(202, "");
        let client = client(&transport);

        client
            .verify(&json!({"method": "POST", "path": "/somePath"}), None, None)
            .unwrap();

        let sent = transport.sent();
        assert_eq!(sent[0].url, "http://localhost:1080/verify");
        assert_eq!(
            sent[0].json(),
            json!({
                "httpRequest": {"method": "POST", "path": "/somePath"},
                "times": {"count": 1, "exact": null}
            })
        );
    }

    #[test]
    fn verify_returns_the_client_for_chaining() {
        let transport = StubTransport::answering(202, "");
        let client = client(&transport);

        let returned = client
            .verify(&RequestMatcher::new("/a"), Some(2), Some(true))
            .unwrap();

        assert!(std::ptr::eq(returned, &client));
        assert_eq!(
            transport.sent()[0].json()["times"],
            json!({"count": 2, "exact": true})
        );
    }

    #[test]
    fn failed_verifications_are_reported_to_the_observer() {
        let transport = StubTransport::answering(400, "incorrect verification json format");
        let observer = Arc::new(RecordingObserver::default());
        let client = MockServerClient::builder("http://localhost:1080")
            .transport(transport.clone())
            .observer(observer.clone())
            .build()
            .unwrap();

        let error = client
            .verify(&RequestMatcher::new("/a"), None, None)
            .unwrap_err();

        assert!(matches!(error, Error::UnexpectedStatus { .. }));
        let failures = observer.failures.lock().unwrap();
        assert_eq!(
            *failures,
            vec![(
                "http://localhost:1080/verify".to_string(),
                StatusCode::BAD_REQUEST,
                "incorrect verification json format".to_string()
            )]
        );
    }

    #[test]
    fn unmet_verifications_are_distinguished_from_server_errors() {
        let transport = StubTransport::answering(406, "Request not found exactly 2 times");
        let observer = Arc::new(RecordingObserver::default());
        let client = MockServerClient::builder("http://localhost:1080")
            .transport(transport)
            .observer(observer.clone())
            .build()
            .unwrap();

        let error = client
            .verify(&RequestMatcher::new("/a"), Some(2), Some(true))
            .unwrap_err();

        assert!(error.is_verification_failure());
        assert_eq!(observer.failures.lock().unwrap().len(), 1);
    }

    #[test]
    fn verify_sequence_lists_requests_in_order() {
        let transport = StubTransport::answering(202, "");
        let client = client(&transport);

        client
            .verify_sequence(&[RequestMatcher::new("/first"), RequestMatcher::new("/second")])
            .unwrap();

        let sent = transport.sent();
        assert_eq!(sent[0].url, "http://localhost:1080/verifySequence");
        let document = sent[0].json();
        assert_eq!(document["httpRequests"][0]["path"], "/first");
        assert_eq!(document["httpRequests"][1]["path"], "/second");
    }

    #[test]
    fn clear_sends_the_matcher() {
        let transport = StubTransport::answering(200, "");
        let client = client(&transport);

        client.clear(&RequestMatcher::new("/stale")).unwrap();

        let sent = transport.sent();
        assert_eq!(sent[0].url, "http://localhost:1080/clear");
        assert_eq!(sent[0].json()["path"], "/stale");
    }

    #[test]
    fn reset_sends_no_body_and_returns_the_response() {
        let transport = StubTransport::answering(200, "reset done");
        let client = client(&transport);

        let response = client.reset().unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, b"reset done".to_vec());
        let sent = transport.sent();
        assert_eq!(sent[0].url, "http://localhost:1080/reset");
        assert!(sent[0].body.is_none());
    }

    #[test]
    fn transport_failures_are_surfaced() {
        let observer = Arc::new(RecordingObserver::default());
        let client = MockServerClient::builder("http://localhost:1080")
            .transport(UnreachableTransport)
            .observer(observer.clone())
            .build()
            .unwrap();

        assert!(matches!(client.reset(), Err(Error::Transport(_))));
        assert!(matches!(
            client.verify(&RequestMatcher::new("/"), None, None),
            Err(Error::Transport(_))
        ));
        // Unreachable servers are not verification failures.
        assert!(observer.failures.lock().unwrap().is_empty());
    }

    #[test]
    fn client_is_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MockServerClient>();
    }
}
