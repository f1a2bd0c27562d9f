// src/report.rs
// =============================================================================
// Turns check results into something a human (or a CI job) can read.
//
// Two formats:
// - text: one block per document listing its broken references (and, with
//   --verbose, the good and skipped ones too), then a summary
// - JSON: a flat array of {file, reference, status, kind, message}
//
// Also decides the process exit code:
//   0 = nothing broken, 1 = at least one broken reference,
//   2 = at least one document could not be read
// =============================================================================

use crate::checker::{CheckResult, Outcome};
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// Exit code when every reference is fine (or skipped)
pub const EXIT_OK: i32 = 0;
/// Exit code when at least one reference is broken
pub const EXIT_BROKEN: i32 = 1;
/// Exit code for internal errors (unreadable input, bad arguments)
pub const EXIT_ERROR: i32 = 2;

/// All results for one document
#[derive(Debug, Clone)]
pub struct FileReport {
    pub file: PathBuf,
    pub results: Vec<CheckResult>,
    /// Why the document could not be read; `results` is empty then
    pub error: Option<String>,
}

impl FileReport {
    /// Builds a report with results sorted by reference, so output is stable
    /// no matter in which order the checks finished
    pub fn new(file: PathBuf, mut results: Vec<CheckResult>) -> Self {
        results.sort_by(|a, b| a.reference.cmp(&b.reference));
        Self {
            file,
            results,
            error: None,
        }
    }

    /// A document that could not be read at all
    pub fn unreadable(file: PathBuf, error: String) -> Self {
        Self {
            file,
            results: Vec::new(),
            error: Some(error),
        }
    }

    pub fn failed(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| r.outcome.is_failed())
    }
}

/// Counts across all documents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub ok: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total: usize,
    /// Documents that could not be read
    pub unreadable: usize,
}

impl Summary {
    pub fn from_reports(reports: &[FileReport]) -> Self {
        let mut summary = Summary {
            unreadable: reports.iter().filter(|r| r.error.is_some()).count(),
            ..Summary::default()
        };
        for result in reports.iter().flat_map(|r| &r.results) {
            match result.outcome {
                Outcome::Ok => summary.ok += 1,
                Outcome::Skipped => summary.skipped += 1,
                Outcome::Failed(_) => summary.failed += 1,
            }
            summary.total += 1;
        }
        summary
    }

    pub fn exit_code(&self) -> i32 {
        if self.unreadable > 0 {
            EXIT_ERROR
        } else if self.failed > 0 {
            EXIT_BROKEN
        } else {
            EXIT_OK
        }
    }
}

// One row of the JSON output
#[derive(Debug, Serialize)]
struct JsonEntry<'a> {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<&'a str>,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl<'a> JsonEntry<'a> {
    fn new(file: &FileReport, result: &'a CheckResult) -> Self {
        let error = result.outcome.error();
        Self {
            file: file.file.display().to_string(),
            reference: Some(&result.reference),
            status: result.outcome.label(),
            kind: error.map(|e| e.kind()),
            message: error.map(|e| e.to_string()),
        }
    }

    fn unreadable(file: &FileReport, error: &str) -> Self {
        Self {
            file: file.file.display().to_string(),
            reference: None,
            status: "unreadable",
            kind: Some("unreadable_document"),
            message: Some(error.to_string()),
        }
    }
}

/// Writes the reports as a pretty-printed JSON array
pub fn write_json(out: &mut impl Write, reports: &[FileReport]) -> Result<()> {
    let mut entries = Vec::new();
    for report in reports {
        if let Some(error) = &report.error {
            entries.push(JsonEntry::unreadable(report, error));
        }
        entries.extend(report.results.iter().map(|r| JsonEntry::new(report, r)));
    }
    serde_json::to_writer_pretty(&mut *out, &entries)?;
    writeln!(out)?;
    Ok(())
}

/// Writes the human-readable report followed by the summary
pub fn write_text(out: &mut impl Write, reports: &[FileReport], verbose: bool) -> Result<()> {
    for report in reports {
        if let Some(error) = &report.error {
            writeln!(out, "{}", report.file.display())?;
            writeln!(out, "    {:<8} cannot read document", "ERROR")?;
            writeln!(out, "             {}", error)?;
            writeln!(out)?;
            continue;
        }

        let shown: Vec<&CheckResult> = if verbose {
            report.results.iter().collect()
        } else {
            report.failed().collect()
        };

        if shown.is_empty() {
            continue;
        }

        writeln!(out, "{}", report.file.display())?;
        for result in shown {
            writeln!(out, "    {:<8} {}", status_tag(&result.outcome), result.reference)?;
            if let Outcome::Failed(err) = &result.outcome {
                writeln!(out, "             {}", err)?;
            }
        }
        writeln!(out)?;
    }

    let summary = Summary::from_reports(reports);
    writeln!(out, "Summary:")?;
    writeln!(out, "   OK:      {}", summary.ok)?;
    writeln!(out, "   Skipped: {}", summary.skipped)?;
    writeln!(out, "   Broken:  {}", summary.failed)?;
    writeln!(out, "   Total:   {}", summary.total)?;
    if summary.unreadable > 0 {
        writeln!(out, "   Unreadable documents: {}", summary.unreadable)?;
    }
    Ok(())
}

fn status_tag(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Ok => "OK",
        Outcome::Skipped => "SKIPPED",
        Outcome::Failed(_) => "ERROR",
    }
}
