// src/extract/mod.rs
// =============================================================================
// Pulls references out of documents.
//
// Submodules:
// - markdown: links, images and embedded HTML of .md files
// - html: <a href> and <img src> of .html files
//
// Only references we know how to check are kept: plain paths, file:// URLs
// and http(s) URLs. Same-page anchors, mailto:, tel: and friends are dropped.
// =============================================================================

mod html;
mod markdown;

pub use html::extract_html_references;
pub use markdown::extract_markdown_references;

use std::collections::HashSet;
use std::path::Path;

/// Kind of document, decided by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Markdown,
    Html,
}

impl DocumentFormat {
    /// Format of a known document extension, `None` for anything else
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "md" | "markdown" => Some(DocumentFormat::Markdown),
            "html" | "htm" => Some(DocumentFormat::Html),
            _ => None,
        }
    }
}

/// Extracts the references of a document, first occurrence of each only
pub fn extract_references(content: &str, format: DocumentFormat) -> Vec<String> {
    let references = match format {
        DocumentFormat::Markdown => extract_markdown_references(content),
        DocumentFormat::Html => extract_html_references(content),
    };

    let mut seen = HashSet::new();
    references
        .into_iter()
        .filter(|reference| seen.insert(reference.clone()))
        .collect()
}

// A reference is worth checking if it names a path or an http(s)/file URL
pub(crate) fn is_checkable_reference(reference: &str) -> bool {
    if reference.is_empty() || reference.starts_with('#') {
        return false;
    }

    match reference.split_once(':') {
        // "C:" style or "a/b:c" colons are not schemes; leave them to the
        // resolver, which reports what is wrong with them
        Some((scheme, _)) if is_scheme(scheme) => {
            matches!(
                scheme.to_ascii_lowercase().as_str(),
                "http" | "https" | "file"
            )
        }
        _ => true,
    }
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
