//! Convenient re-exports of http types that are part of `mockserver-client`'s public API.
pub use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
