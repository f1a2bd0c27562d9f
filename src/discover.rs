// src/discover.rs
// =============================================================================
// Finds the documents to check.
//
// - Files named on the command line are always checked
// - Directories are walked only with --recursive; everything inside with a
//   markdown or HTML extension is picked up
// - Hidden entries (.git, .github, ...) are never descended into
// - An entry the walk cannot read (dangling symlink, no permission) is
//   logged and skipped; it never stops discovery
// =============================================================================

use crate::extract::DocumentFormat;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Expands `paths` into a sorted, duplicate-free list of documents
pub fn collect_documents(paths: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();

    for path in paths {
        let metadata = fs::metadata(path)
            .with_context(|| format!("cannot access {}", path.display()))?;

        if metadata.is_dir() {
            if recursive {
                walk(path, &mut documents);
            } else {
                warn!(path = %path.display(), "skipping directory (use --recursive to descend)");
            }
        } else {
            documents.push(path.clone());
        }
    }

    documents.sort();
    documents.dedup();
    Ok(documents)
}

fn walk(dir: &Path, documents: &mut Vec<PathBuf>) {
    let entries = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable entry: {}", err);
                continue;
            }
        };

        if entry.file_type().is_file() && DocumentFormat::from_path(entry.path()).is_some() {
            documents.push(entry.into_path());
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    let hidden = entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'));
    if hidden {
        debug!(path = %entry.path().display(), "skipping hidden entry");
    }
    hidden
}
