// src/checker/mod.rs
// =============================================================================
// This module contains all reference checking logic.
//
// Submodules:
// - limiter: bounds how many remote checks run at once
// - resolve: turns a raw reference into a local path or a remote URL
// - http: fetches remote URLs and classifies the response
// - reference: the checker itself, single and batch
// - outcome: Ok / Skipped / Failed and the failure kinds
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
// =============================================================================

mod http;
mod limiter;
mod outcome;
mod reference;
mod resolve;

// Re-export public items from submodules
// This lets users write `checker::ReferenceChecker` instead of
// `checker::reference::ReferenceChecker`
pub use http::{MAX_REDIRECTS, USER_AGENT};
pub use limiter::{ConcurrencyLimiter, LimiterSlot};
pub use outcome::{CheckError, CheckResult, Outcome};
pub use reference::ReferenceChecker;
pub use resolve::{resolve, Resolution};
