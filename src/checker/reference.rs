// src/checker/reference.rs
// =============================================================================
// Checks references: one at a time, or a whole batch concurrently.
//
// A single check goes through these steps, stopping at the first that
// decides the outcome:
// 1. Resolve the reference (see resolve.rs); a resolution error is the outcome
// 2. Resolved target matches --exclude       -> Ok, nothing else is touched
// 3. Local target                             -> does the file exist?
// 4. Remote target with --local-only          -> Skipped
// 5. Remote target                            -> take a limiter slot, GET it
//
// Local checks never take a limiter slot: a metadata lookup is cheap and
// the limiter is there to protect remote servers, not the disk.
//
// A batch (`check_many`) spawns one task per reference. Every task writes
// exactly one result to the output channel, and the channel closes only
// after all tasks have finished.
// =============================================================================

use super::http;
use super::limiter::ConcurrencyLimiter;
use super::outcome::{CheckError, CheckResult, Outcome};
use super::resolve::{self, Resolution};
use crate::config::CheckerConfig;
use anyhow::Result;
use reqwest::Client;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error};

/// Validates references against the filesystem and the network.
///
/// Cloning is cheap: clones share the configuration, the limiter and the
/// HTTP connection pool.
#[derive(Debug, Clone)]
pub struct ReferenceChecker {
    config: Arc<CheckerConfig>,
    limiter: ConcurrencyLimiter,
    client: Client,
}

impl ReferenceChecker {
    /// Creates a checker. The limiter is shared, so several checkers (or
    /// several runs) can be bounded by the same pool.
    pub fn new(config: CheckerConfig, limiter: ConcurrencyLimiter) -> Result<Self> {
        Ok(Self {
            config: Arc::new(config),
            limiter,
            client: http::build_client()?,
        })
    }

    /// Creates a checker with its own limiter sized from `config.concurrency`
    pub fn from_config(config: CheckerConfig) -> Result<Self> {
        let limiter = ConcurrencyLimiter::new(config.concurrency);
        Self::new(config, limiter)
    }

    pub fn limiter(&self) -> &ConcurrencyLimiter {
        &self.limiter
    }

    /// Resolves `reference` found in `source` without checking it
    pub fn resolve(&self, reference: &str, source: &Path) -> Result<Resolution, CheckError> {
        resolve::resolve(reference, source, self.config.document_root())
    }

    /// Checks a single reference found in the document at `source`
    pub async fn check(&self, reference: &str, source: &Path) -> Outcome {
        let resolution = match self.resolve(reference, source) {
            Ok(resolution) => resolution,
            Err(err) => return Outcome::Failed(err),
        };

        if self.config.is_excluded(&resolution.target) {
            debug!(reference, target = %resolution.target, "excluded by pattern");
            return Outcome::Ok;
        }

        if let Some(path) = &resolution.path {
            return check_local(path, &resolution.target).await;
        }

        if self.config.local_only {
            return Outcome::Skipped;
        }

        // Held until the end of this function, whatever fetch returns
        let _slot = self.limiter.acquire().await;
        let outcome = http::fetch(&self.client, &resolution.target, self.config.timeout).await;
        debug!(reference, outcome = %outcome, "remote check finished");
        outcome
    }

    /// Checks every reference concurrently and streams the results.
    ///
    /// One result per reference is sent to `results`, in no particular
    /// order. The sender is dropped once every check has finished, so the
    /// receiver sees the end of the stream right after the last result
    /// (provided the caller kept no other clone of it).
    ///
    /// Sends wait while the channel is full. Either size the channel for
    /// the whole batch or drain it while this call is running.
    pub async fn check_many(
        &self,
        references: Vec<String>,
        source: &Path,
        results: mpsc::Sender<CheckResult>,
    ) {
        let source: Arc<Path> = Arc::from(source);
        let mut tasks = JoinSet::new();

        for reference in references {
            let checker = self.clone();
            let source = Arc::clone(&source);
            let results = results.clone();

            tasks.spawn(async move {
                let outcome = checker.check(&reference, &source).await;
                if results.send(CheckResult { reference, outcome }).await.is_err() {
                    debug!("result receiver dropped before the batch finished");
                }
            });
        }

        while let Some(joined) = tasks.join_next().await {
            // A panicking check loses only its own result
            if let Err(err) = joined {
                error!(source = %source.display(), "reference check task failed: {}", err);
            }
        }

        drop(results);
    }

    /// Runs `check_many` and collects the whole batch.
    ///
    /// The channel is sized to the batch, so no check ever waits on it.
    pub async fn check_all(&self, references: Vec<String>, source: &Path) -> Vec<CheckResult> {
        let (tx, mut rx) = mpsc::channel(references.len().max(1));
        self.check_many(references, source, tx).await;

        let mut collected = Vec::new();
        while let Some(result) = rx.recv().await {
            collected.push(result);
        }
        collected
    }
}

// Existence check for a local target. `path` keeps the exact bytes, `target`
// is only for the error message.
async fn check_local(path: &Path, target: &str) -> Outcome {
    match tokio::fs::metadata(path).await {
        Ok(_) => Outcome::Ok,
        Err(err) => Outcome::Failed(CheckError::BrokenLocalLink {
            target: target.to_string(),
            detail: err.to_string(),
        }),
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is a JoinSet?
//    - A collection of spawned tasks you can wait on as a group
//    - join_next() hands back whichever task finishes first
//    - When the loop ends, every task has completed (fan-in)
//
// 2. Why clone the sender into every task?
//    - An mpsc channel closes when the last Sender is dropped
//    - Each task drops its clone when it finishes
//    - We drop our own copy after the join, so the channel closes exactly
//      when the last result is in
//
// 3. Why Arc<Path> for the source file?
//    - Spawned tasks must own their data ('static)
//    - Arc lets all tasks share one allocation instead of copying the path
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use std::fs;
    use tempfile::tempdir;

    fn checker(config: CheckerConfig) -> ReferenceChecker {
        ReferenceChecker::from_config(config).unwrap()
    }

    #[tokio::test]
    async fn test_local_reference_exists() {
        let dir = tempdir().unwrap();
        let readme = dir.path().join("README.md");
        fs::write(&readme, "# hello").unwrap();

        let checker = checker(CheckerConfig::default());
        assert_eq!(checker.check("README.md", &readme).await, Outcome::Ok);
        assert_eq!(checker.check("file://README.md", &readme).await, Outcome::Ok);
    }

    #[tokio::test]
    async fn test_missing_local_reference_is_broken() {
        let dir = tempdir().unwrap();
        let readme = dir.path().join("README.md");

        let checker = checker(CheckerConfig::default());
        for reference in ["MISSING.md", "file://foo-bar-missing-file"] {
            let outcome = checker.check(reference, &readme).await;
            assert!(
                matches!(outcome, Outcome::Failed(CheckError::BrokenLocalLink { .. })),
                "{}: {:?}",
                reference,
                outcome
            );
        }
    }

    #[tokio::test]
    async fn test_absolute_reference_needs_document_root() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("guide.md"), "guide").unwrap();
        let source = dir.path().join("README.md");

        let without_root = checker(CheckerConfig::default());
        assert_eq!(
            without_root.check("/guide.md", &source).await,
            Outcome::Failed(CheckError::MissingDocumentRoot)
        );

        let with_root = checker(CheckerConfig {
            document_root: Some(dir.path().to_path_buf()),
            ..CheckerConfig::default()
        });
        assert_eq!(with_root.check("/guide.md", &source).await, Outcome::Ok);
    }

    #[tokio::test]
    async fn test_excluded_targets_are_ok_without_checking() {
        let checker = checker(CheckerConfig {
            excluded: Some(Regex::new(r"^http://localhost:[13]$|MISSING").unwrap()),
            ..CheckerConfig::default()
        });

        // Nothing listens on these ports and the file does not exist
        for reference in ["http://localhost:1", "http://localhost:3", "MISSING.md"] {
            assert_eq!(checker.check(reference, Path::new("README.md")).await, Outcome::Ok);
        }
    }

    #[tokio::test]
    async fn test_exclusion_matches_resolved_target() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("docs").join("index.md");

        // "gone.md" resolves to ".../docs/gone.md"
        let checker = checker(CheckerConfig {
            excluded: Some(Regex::new(r"docs/gone\.md$").unwrap()),
            ..CheckerConfig::default()
        });
        assert_eq!(checker.check("gone.md", &source).await, Outcome::Ok);
        assert!(checker.check("other.md", &source).await.is_failed());
    }

    #[tokio::test]
    async fn test_local_only_skips_remote_references() {
        let checker = checker(CheckerConfig {
            local_only: true,
            ..CheckerConfig::default()
        });

        for reference in ["https://www.google.com", "http://localhost:2/anything"] {
            assert_eq!(
                checker.check(reference, Path::new("README.md")).await,
                Outcome::Skipped
            );
        }
        assert_eq!(checker.limiter().available(), checker.limiter().capacity());
    }

    #[tokio::test]
    async fn test_resolution_errors_propagate() {
        let checker = checker(CheckerConfig::default());
        let source = Path::new("README.md");

        assert!(matches!(
            checker.check("://", source).await,
            Outcome::Failed(CheckError::InvalidUrlSyntax(_))
        ));
        assert_eq!(
            checker.check("file:README.md", source).await,
            Outcome::Failed(CheckError::MalformedFileUrlScheme)
        );
    }

    #[tokio::test]
    async fn test_check_many_with_no_references_closes_immediately() {
        let checker = checker(CheckerConfig::default());
        let (tx, mut rx) = mpsc::channel::<CheckResult>(1);

        checker.check_many(Vec::new(), Path::new("README.md"), tx).await;
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_check_many_yields_one_result_per_reference() {
        let dir = tempdir().unwrap();
        let readme = dir.path().join("README.md");
        fs::write(&readme, "# hello").unwrap();

        let checker = checker(CheckerConfig {
            local_only: true,
            ..CheckerConfig::default()
        });
        let references: Vec<String> = ["README.md", "MISSING.md", "https://example.com", "/abs"]
            .iter()
            .map(|r| r.to_string())
            .collect();

        let mut results = checker.check_all(references, &readme).await;
        results.sort_by(|a, b| a.reference.cmp(&b.reference));

        let summary: Vec<(&str, &str)> = results
            .iter()
            .map(|r| (r.reference.as_str(), r.outcome.label()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("/abs", "failed"),
                ("MISSING.md", "failed"),
                ("README.md", "ok"),
                ("https://example.com", "skipped"),
            ]
        );
    }

    #[tokio::test]
    async fn test_check_many_with_small_channel_and_concurrent_consumer() {
        let checker = checker(CheckerConfig {
            local_only: true,
            ..CheckerConfig::default()
        });
        let references: Vec<String> = (0..100).map(|i| format!("https://example.com/{}", i)).collect();

        let (tx, mut rx) = mpsc::channel::<CheckResult>(1);
        let consumer = tokio::spawn(async move {
            let mut count = 0;
            while let Some(result) = rx.recv().await {
                assert!(result.outcome.is_skipped());
                count += 1;
            }
            count
        });

        checker.check_many(references, Path::new("README.md"), tx).await;
        assert_eq!(consumer.await.unwrap(), 100);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_name_that_is_not_utf8() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let source = dir.path().join("README.md");
        if fs::write(dir.path().join(OsStr::from_bytes(b"caf\xe9.md")), "latin-1").is_err() {
            // Some filesystems refuse names that are not UTF-8
            return;
        }

        let checker = checker(CheckerConfig::default());
        assert_eq!(checker.check("caf%E9.md", &source).await, Outcome::Ok);
        assert_eq!(checker.check("file://caf%E9.md", &source).await, Outcome::Ok);
        assert!(checker.check("caf%C3%A9.md", &source).await.is_failed());
    }
}
