use http::StatusCode;
use log::error;
use std::fmt;
use std::sync::Arc;

pub const BODY_PRINT_LIMIT: usize = 10_000;

/// Specifies limitations on printing response bodies when reporting failed verifications.
/// Some MockServer answers embed every recorded request and can get very large.
///
/// Use `Unlimited` to log the server's raw answer in full.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BodyPrintLimit {
    /// Maximum length of a body to print in bytes.
    Limited(usize),
    /// There is no limit to the size of a body that may be printed.
    Unlimited,
}

impl Default for BodyPrintLimit {
    fn default() -> Self {
        BodyPrintLimit::Limited(BODY_PRINT_LIMIT)
    }
}

/// Gets told about verifications the server did not accept, before the client returns the
/// corresponding error.
///
/// The client never touches a global logger directly for this: inject your own `Observer` to
/// capture failures in tests, or rely on [`LogObserver`].
pub trait Observer: Send + Sync {
    fn verification_failed(&self, url: &str, status: StatusCode, body: &[u8]);
}

impl<T> Observer for Arc<T>
where
    T: Observer + ?Sized,
{
    fn verification_failed(&self, url: &str, status: StatusCode, body: &[u8]) {
        self.as_ref().verification_failed(url, status, body)
    }
}

/// The default [`Observer`]: logs the response body at `error` level through the `log` facade.
#[derive(Debug, Copy, Clone, Default)]
pub struct LogObserver {
    body_print_limit: BodyPrintLimit,
}

impl LogObserver {
    pub fn new(body_print_limit: BodyPrintLimit) -> Self {
        Self { body_print_limit }
    }
}

impl Observer for LogObserver {
    fn verification_failed(&self, url: &str, status: StatusCode, body: &[u8]) {
        let mut printed = String::new();
        if print_body_with_limit(&mut printed, body, self.body_print_limit).is_err() {
            printed = String::from_utf8_lossy(body).into_owned();
        }
        error!("{} answered {}: {}", url, status, printed);
    }
}

pub(crate) fn print_body_with_limit(
    mut buffer: impl fmt::Write,
    body: &[u8],
    body_print_limit: BodyPrintLimit,
) -> fmt::Result {
    match body_print_limit {
        BodyPrintLimit::Limited(limit) if body.len() > limit => {
            let prefix = &body[..limit];
            let truncated = match std::str::from_utf8(prefix) {
                Ok(truncated) => Some(truncated),
                // The cut landed in the middle of a character: back off to the last full one.
                Err(e) if e.error_len().is_none() => {
                    std::str::from_utf8(&prefix[..e.valid_up_to()]).ok()
                }
                Err(_) => None,
            };
            match truncated {
                Some(truncated) => write!(
                    buffer,
                    "{}\nWe truncated the body because it was too large: {} bytes (limit: {} bytes)",
                    truncated,
                    body.len(),
                    limit
                ),
                None => write!(
                    buffer,
                    "Body is likely binary (invalid utf-8) size is {} bytes",
                    body.len()
                ),
            }
        }
        _ => match std::str::from_utf8(body) {
            Ok(body) => write!(buffer, "{}", body),
            Err(_) => write!(
                buffer,
                "Body is likely binary (invalid utf-8) size is {} bytes",
                body.len()
            ),
        },
    }
}
