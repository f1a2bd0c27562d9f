// src/checker/http.rs
// =============================================================================
// This module checks if remote URLs are alive by making HTTP requests.
//
// Key functionality:
// - Makes one HTTP GET per URL and throws the body away unread
// - Applies the configured per-request timeout (zero = wait forever)
// - Turns the response or the transport error into an Outcome
//
// Classification rules:
// - status >= 400                        -> HttpStatus failure
// - "message head is too large" error    -> Ok (we never read the headers
//                                           or the body, so a server sending
//                                           huge headers is still reachable)
// - any other transport error            -> RemoteFetch failure
//
// Redirects are followed (up to MAX_REDIRECTS) and the status of the final
// response decides. A checker that stops at the first response would count
// every 3xx as alive, including a redirect to a page that is gone; here
// that is a 404 failure.
//
// Rust concepts:
// - async/await: For network I/O
// - Error source chains: walking `source()` to find the root cause
// =============================================================================

use super::outcome::{CheckError, Outcome};
use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use std::error::Error as StdError;
use std::time::Duration;
use tracing::debug;

/// Identifies us to the servers we check
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// How many redirects we follow before calling it a failure
pub const MAX_REDIRECTS: usize = 10;

// What hyper reports when a response head does not fit its read buffer
const HEAD_TOO_LARGE: &str = "message head is too large";

// Builds the HTTP client shared by every check of a run.
//
// The timeout is applied per request (see `fetch`), not here, so that a zero
// timeout really means "no deadline".
pub fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()
        .context("failed to create HTTP client")
}

// Fetches one URL and classifies the result.
//
// Parameters:
//   client: shared reqwest client (connection pooling)
//   url: the remote target, exactly as written in the document
//   timeout: per-request deadline, Duration::ZERO for none
pub async fn fetch(client: &Client, url: &str, timeout: Duration) -> Outcome {
    let mut request = client.get(url);
    if !timeout.is_zero() {
        request = request.timeout(timeout);
    }

    match request.send().await {
        // Dropping the response without reading it discards the body
        Ok(response) => classify_status(response.status()),
        Err(err) => classify_error(&err),
    }
}

// Decides the outcome of a request that got a response
pub fn classify_status(status: StatusCode) -> Outcome {
    if status.as_u16() >= 400 {
        Outcome::Failed(CheckError::HttpStatus {
            code: status.as_u16(),
            text: status.canonical_reason().unwrap_or("Unknown Status").to_string(),
        })
    } else {
        Outcome::Ok
    }
}

// Decides the outcome of a request that failed at the transport level
fn classify_error(err: &reqwest::Error) -> Outcome {
    if is_head_too_large(err) {
        debug!(url = ?err.url().map(|u| u.as_str()), "ignoring oversized response head");
        return Outcome::Ok;
    }

    Outcome::Failed(CheckError::RemoteFetch(describe(err)))
}

// Walks the error and everything it wraps looking for the one transport
// failure we treat as benign
pub(crate) fn is_head_too_large(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.to_string().contains(HEAD_TOO_LARGE) {
            return true;
        }
        current = e.source();
    }
    false
}

// One-line description including the root causes, so that
// "error sending request" also tells you it was a DNS or TLS problem
pub(crate) fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        current = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    // A two-level error chain for exercising the source walkers
    #[derive(Debug)]
    struct Wrapper {
        message: &'static str,
        inner: Option<Box<Wrapper>>,
    }

    impl fmt::Display for Wrapper {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.message)
        }
    }

    impl StdError for Wrapper {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            self.inner.as_deref().map(|e| e as &(dyn StdError + 'static))
        }
    }

    fn chain(outer: &'static str, inner: &'static str) -> Wrapper {
        Wrapper {
            message: outer,
            inner: Some(Box::new(Wrapper {
                message: inner,
                inner: None,
            })),
        }
    }

    #[test]
    fn test_success_and_redirect_statuses_are_ok() {
        for code in [200, 204, 301, 302, 304, 399] {
            let status = StatusCode::from_u16(code).unwrap();
            assert_eq!(classify_status(status), Outcome::Ok, "{}", code);
        }
    }

    #[test]
    fn test_error_statuses_fail_with_code_and_text() {
        assert_eq!(
            classify_status(StatusCode::NOT_FOUND),
            Outcome::Failed(CheckError::HttpStatus {
                code: 404,
                text: "Not Found".to_string()
            })
        );
        assert!(classify_status(StatusCode::BAD_REQUEST).is_failed());
        assert!(classify_status(StatusCode::SERVICE_UNAVAILABLE).is_failed());
    }

    #[test]
    fn test_head_too_large_found_in_source_chain() {
        let err = chain("error sending request", "message head is too large");
        assert!(is_head_too_large(&err));

        let other = chain("error sending request", "connection refused");
        assert!(!is_head_too_large(&other));
    }

    #[test]
    fn test_describe_includes_causes_once() {
        let err = chain("error sending request", "dns error");
        assert_eq!(describe(&err), "error sending request: dns error");

        let repeated = chain("timed out: operation timed out", "operation timed out");
        assert_eq!(describe(&repeated), "timed out: operation timed out");
    }
}
