// src/lib.rs
// =============================================================================
// doc-guardian: find broken links and missing files in documentation.
//
// Modules:
// - checker:  resolving and checking references (the core engine)
// - extract:  pulling references out of markdown and HTML
// - discover: finding the documents to check
// - scan:     running the checker over a set of documents
// - report:   text/JSON output and exit codes
// - cli, config: command-line flags and the immutable run configuration
// =============================================================================

pub mod checker;
pub mod cli;
pub mod config;
pub mod discover;
pub mod extract;
pub mod report;
pub mod scan;

pub use checker::{CheckError, CheckResult, ConcurrencyLimiter, Outcome, ReferenceChecker};
pub use config::{CheckerConfig, DEFAULT_CONCURRENCY};
