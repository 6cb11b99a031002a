//! `mockserver-client` drives a [MockServer] that is already running, from Rust.
//!
//! It builds the JSON documents MockServer understands (expectations and verifications) and
//! sends them over HTTP to set up canned responses, check which requests were received and
//! clean up between tests.
//!
//! # Table of Contents
//! 1. [Getting started](#getting-started)
//! 2. [Expectations](#expectations)
//! 3. [Verifications](#verifications)
//! 4. [Transport and logging](#transport-and-logging)
//!
//! ## Getting started
//! ```rust,no_run
//! use mockserver_client::{MockServerClient, RequestMatcher};
//! use serde_json::json;
//!
//! fn main() -> Result<(), mockserver_client::Error> {
//!     let client = MockServerClient::new("http://localhost:1080")?;
//!
//!     // Arrange: the next request on `/hello` gets `{"msg": "hi"}` back, with a 200.
//!     let response = client.mock_simple_response("/hello", &json!({"msg": "hi"}), None)?;
//!     assert!(response.is_success());
//!
//!     // ... exercise the code under test ...
//!
//!     // Assert: `/hello` was called at least once.
//!     client.verify(&RequestMatcher::new("/hello"), None, Some(false))?;
//!
//!     // Start the next test from a clean slate.
//!     client.reset()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Expectations
//!
//! An [`Expectation`] pairs a [`RequestMatcher`] with a [`ResponseSpec`] and a number of
//! [`Times`] it may fire. [`create_expectation`] covers the common case (match on a path, answer
//! once with a JSON body); build an [`Expectation`] by hand for anything else and send it with
//! [`MockServerClient::mock_any_response`].
//!
//! Every document is fully shaped: fields you do not set are sent with their empty default,
//! which MockServer treats as "no constraint".
//!
//! ## Verifications
//!
//! [`MockServerClient::verify`] and [`MockServerClient::verify_sequence`] return the client when
//! the server accepts the verification, so they can be chained.
//! Otherwise they return an [`Error`] that tells apart requests that were not received
//! ([`Error::VerificationFailed`]), answers the client did not expect
//! ([`Error::UnexpectedStatus`]) and servers that could not be reached ([`Error::Transport`]).
//!
//! ## Transport and logging
//!
//! Requests go through a [`Transport`]; [`ReqwestTransport`], a blocking `reqwest` client, is
//! used by default. Failed verifications are reported to an [`Observer`]; the default
//! [`LogObserver`] logs the server's answer at `error` level through the `log` facade.
//! Both can be replaced with [`MockServerClient::builder`].
//!
//! [MockServer]: https://www.mock-server.com/
mod client;
mod error;
mod expectation;
pub mod http;
pub mod json;
mod observer;
mod request_matcher;
mod response_spec;
mod transport;
mod verification;

pub use client::{MockServerClient, MockServerClientBuilder};
pub use error::Error;
pub use expectation::{create_expectation, create_request_matcher, Expectation, Times};
pub use observer::{BodyPrintLimit, LogObserver, Observer, BODY_PRINT_LIMIT};
pub use request_matcher::{Cookie, KeyValues, RequestMatcher};
pub use response_spec::{
    default_headers, Delay, ResponseSpec, TimeUnit, DEFAULT_STATUS_CODE,
};
pub use transport::{HttpResponse, ReqwestTransport, Transport, TransportError};
pub use verification::{Verification, VerificationSequence, VerificationTimes};
