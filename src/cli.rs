// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap's "derive" API lets us describe the CLI as a plain struct; every field
// becomes a flag or a positional argument.
//
// The flags map one-to-one onto the checker configuration (see config.rs),
// plus a few that only the driver cares about (--recursive, --verbose,
// --json).
// =============================================================================

use crate::config::DEFAULT_CONCURRENCY;
use clap::Parser;
use regex::Regex;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "doc-guardian",
    version,
    about = "Find broken links and missing files referenced from markdown and HTML documents",
    long_about = "doc-guardian reads markdown and HTML documents, extracts every link and image \
                  reference, and checks that local files exist and remote URLs answer. \
                  It exits with 1 when something is broken, which makes it a good fit for CI."
)]
pub struct Cli {
    /// Files or directories to check
    #[arg(required = true, value_name = "PATHS")]
    pub paths: Vec<PathBuf>,

    /// Maximum number of remote requests in flight at once
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_CONCURRENCY,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub concurrency: u32,

    /// Directory that absolute local paths (like /img/logo.png) are relative to
    #[arg(short, long, value_name = "DIR")]
    pub document_root: Option<PathBuf>,

    /// Descend into directories and check every markdown/HTML file found
    #[arg(short, long)]
    pub recursive: bool,

    /// Per-request timeout in seconds (0 = no timeout)
    #[arg(short, long, value_name = "SECONDS", default_value_t = 0)]
    pub timeout: u64,

    /// Regex of resolved targets to treat as valid without checking
    #[arg(short = 'x', long, value_name = "REGEX", value_parser = Regex::new)]
    pub exclude: Option<Regex>,

    /// Also list references that passed or were skipped
    #[arg(short, long)]
    pub verbose: bool,

    /// Only check local files; remote URLs are reported as skipped
    #[arg(short, long)]
    pub local_only: bool,

    /// Output results in JSON format instead of text
    #[arg(long)]
    pub json: bool,
}
