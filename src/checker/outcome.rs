// src/checker/outcome.rs
// =============================================================================
// The result types every reference check produces.
//
// A check ends in exactly one of three ways:
// - Ok:      the reference is valid (or excluded by pattern)
// - Skipped: the reference was deliberately not checked (--local-only)
// - Failed:  the reference is broken, with a kind and a detail message
//
// Skipped is its own variant so nothing can mistake it for a success or a
// failure when counting results.
// =============================================================================

use std::fmt;
use thiserror::Error;

/// Why a single reference failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    /// The reference could not be parsed as a URI at all
    #[error("invalid URL syntax: {0}")]
    InvalidUrlSyntax(String),

    /// A `file` scheme reference that does not start with `file://`
    #[error("wrong file URL syntax")]
    MalformedFileUrlScheme,

    /// An absolute local path, but no document root to anchor it to
    #[error("document root directory is not specified")]
    MissingDocumentRoot,

    /// The local target does not exist or cannot be accessed
    #[error("{target}: {detail}")]
    BrokenLocalLink { target: String, detail: String },

    /// Transport, DNS, TLS or connection failure
    #[error("{0}")]
    RemoteFetch(String),

    /// The server answered with a status code >= 400
    #[error("{text} (HTTP error {code})")]
    HttpStatus { code: u16, text: String },
}

impl CheckError {
    /// Stable snake_case name of the failure kind, used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            CheckError::InvalidUrlSyntax(_) => "invalid_url_syntax",
            CheckError::MalformedFileUrlScheme => "malformed_file_url_scheme",
            CheckError::MissingDocumentRoot => "missing_document_root",
            CheckError::BrokenLocalLink { .. } => "broken_local_link",
            CheckError::RemoteFetch(_) => "remote_fetch_error",
            CheckError::HttpStatus { .. } => "http_status_error",
        }
    }
}

/// Final verdict for one reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Skipped,
    Failed(CheckError),
}

impl Outcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    /// The failure, if there is one
    pub fn error(&self) -> Option<&CheckError> {
        match self {
            Outcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Short status label: "ok", "skipped" or "failed"
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Ok => "ok",
            Outcome::Skipped => "skipped",
            Outcome::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ok => write!(f, "OK"),
            Outcome::Skipped => write!(f, "skipped as instructed"),
            Outcome::Failed(err) => write!(f, "{}", err),
        }
    }
}

/// One entry on the result stream of a batch check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    /// The reference exactly as it appeared in the document
    pub reference: String,
    pub outcome: Outcome,
}
