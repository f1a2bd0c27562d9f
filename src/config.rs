// src/config.rs
// =============================================================================
// The immutable configuration of one checking run.
//
// Built once from the command line and then shared read-only by every check,
// so no locking is ever needed to read it.
// =============================================================================

use crate::cli::Cli;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Remote requests allowed in flight when --concurrency is not given
pub const DEFAULT_CONCURRENCY: u32 = 256;

#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// Per-request deadline; zero means no deadline
    pub timeout: Duration,
    /// Base for absolute local paths; `None` means no root configured
    pub document_root: Option<PathBuf>,
    /// Resolved targets matching this are valid without checking
    pub excluded: Option<Regex>,
    /// Never fetch remote references, report them as skipped
    pub local_only: bool,
    /// Capacity of the concurrency limiter
    pub concurrency: usize,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::ZERO,
            document_root: None,
            excluded: None,
            local_only: false,
            concurrency: DEFAULT_CONCURRENCY as usize,
        }
    }
}

impl CheckerConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            timeout: Duration::from_secs(cli.timeout),
            // An empty --document-root is the same as none at all
            document_root: cli
                .document_root
                .clone()
                .filter(|root| !root.as_os_str().is_empty()),
            excluded: cli.exclude.clone(),
            local_only: cli.local_only,
            concurrency: cli.concurrency as usize,
        }
    }

    pub fn document_root(&self) -> Option<&Path> {
        self.document_root.as_deref()
    }

    /// True when `target` matches the exclusion pattern
    pub fn is_excluded(&self, target: &str) -> bool {
        self.excluded
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(target))
    }
}
