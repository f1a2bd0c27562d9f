// src/scan.rs
// =============================================================================
// Glues discovery, extraction and checking together for a set of documents.
//
// Documents are processed concurrently (a handful at a time); inside each
// document every reference is checked concurrently by the checker, with
// remote requests bounded by the shared limiter.
//
// A document that cannot be read becomes an "unreadable" report; the other
// documents are still checked. Content is decoded lossily, so stray bytes
// that are not UTF-8 never stop a document from being checked.
// =============================================================================

use crate::checker::ReferenceChecker;
use crate::extract::{extract_references, DocumentFormat};
use crate::report::FileReport;
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use tracing::{info, warn};

/// Documents read and parsed at the same time
pub const DOCUMENT_CONCURRENCY: usize = 16;

/// Checks every reference of every document, one report per document,
/// sorted by path
pub async fn check_documents(
    checker: &ReferenceChecker,
    documents: Vec<PathBuf>,
) -> Vec<FileReport> {
    let mut reports: Vec<FileReport> = stream::iter(documents)
        .map(|document| check_document(checker, document))
        .buffer_unordered(DOCUMENT_CONCURRENCY)
        .collect()
        .await;

    reports.sort_by(|a, b| a.file.cmp(&b.file));
    reports
}

async fn check_document(checker: &ReferenceChecker, document: PathBuf) -> FileReport {
    let bytes = match tokio::fs::read(&document).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(file = %document.display(), "cannot read document: {}", err);
            return FileReport::unreadable(document, err.to_string());
        }
    };
    let content = String::from_utf8_lossy(&bytes);

    // Files named explicitly may have any extension; read those as markdown
    let format = DocumentFormat::from_path(&document).unwrap_or(DocumentFormat::Markdown);
    let references = extract_references(&content, format);
    info!(file = %document.display(), references = references.len(), "checking document");

    let results = checker.check_all(references, &document).await;
    FileReport::new(document, results)
}
