// src/checker/resolve.rs
// =============================================================================
// Turns a raw reference into something we can actually check.
//
// A reference found in a document can be:
// - a remote URL:            https://example.com/page
// - a relative local path:   ../docs/guide.md
// - an absolute local path:  /docs/guide.md   (needs a document root)
// - a file URL:              file:///docs/guide.md or file://docs/guide.md
//
// Remote URLs are passed through untouched. Everything else becomes a
// filesystem path, joined either to the directory of the source document
// (relative paths) or to the document root (absolute paths).
//
// file:// URLs are a mess in the wild: besides the RFC forms
// file://host/path and file:///path, documents routinely use
// file://relative/path. So we never let a URL parser read the host part of a
// file URL; we take everything after the literal "file://" prefix as the path.
// =============================================================================

use super::outcome::CheckError;
use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};
use url::Url;

const FILE_PREFIX: &str = "file://";

/// A reference translated into a concrete target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Filesystem path for local targets, the untouched URL for remote ones.
    /// Bytes that are not UTF-8 show up as U+FFFD here; `path` keeps them.
    pub target: String,
    pub is_local: bool,
    /// The exact filesystem path of a local target, `None` for remote ones
    pub path: Option<PathBuf>,
}

impl Resolution {
    fn local(path: Vec<u8>) -> Self {
        Self {
            target: String::from_utf8_lossy(&path).into_owned(),
            is_local: true,
            path: Some(bytes_to_path(path)),
        }
    }

    fn remote(target: &str) -> Self {
        Self {
            target: target.to_string(),
            is_local: false,
            path: None,
        }
    }
}

/// Resolves `reference`, found in the document at `source`.
///
/// `document_root` anchors absolute local paths; `None` or an empty path
/// both mean "no root configured".
pub fn resolve(
    reference: &str,
    source: &Path,
    document_root: Option<&Path>,
) -> Result<Resolution, CheckError> {
    if let Some(c) = reference.chars().find(|c| c.is_ascii_control()) {
        return Err(CheckError::InvalidUrlSyntax(format!(
            "invalid control character {:?} in URL",
            c
        )));
    }

    let local_path = match split_scheme(reference)? {
        Some(scheme) if !scheme.eq_ignore_ascii_case("file") => {
            // Remote: validate, then hand back exactly what the author wrote
            Url::parse(reference)
                .map_err(|e| CheckError::InvalidUrlSyntax(format!("{}: {}", reference, e)))?;
            return Ok(Resolution::remote(reference));
        }
        Some(_) => {
            let rest = reference
                .strip_prefix(FILE_PREFIX)
                .ok_or(CheckError::MalformedFileUrlScheme)?;
            unescape(rest)?
        }
        None => unescape(path_component(reference)?)?,
    };

    if !local_path.starts_with(b"/") {
        let source_dir = parent_dir(&path_to_bytes(source));
        let joined = join(&[source_dir.as_slice(), local_path.as_slice()]);
        return Ok(Resolution::local(joined));
    }

    match document_root.map(path_to_bytes) {
        Some(root) if !root.is_empty() => {
            let joined = join(&[root.as_slice(), local_path.as_slice()]);
            Ok(Resolution::local(joined))
        }
        _ => Err(CheckError::MissingDocumentRoot),
    }
}

// Finds the RFC 3986 scheme, if any.
//
// scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) ":"
// Anything that breaks that grammar before the first ':' means the reference
// is a plain path. A leading ':' is an error: there is a scheme separator but
// no scheme.
fn split_scheme(reference: &str) -> Result<Option<&str>, CheckError> {
    for (i, c) in reference.char_indices() {
        match c {
            'a'..='z' | 'A'..='Z' => {}
            '0'..='9' | '+' | '-' | '.' if i > 0 => {}
            ':' if i == 0 => {
                return Err(CheckError::InvalidUrlSyntax(format!(
                    "{}: missing protocol scheme",
                    reference
                )));
            }
            ':' => return Ok(Some(&reference[..i])),
            _ => return Ok(None),
        }
    }
    Ok(None)
}

// The still-encoded path part of a scheme-less reference: query and fragment
// dropped, authority skipped for "//host/path" forms.
fn path_component(reference: &str) -> Result<&str, CheckError> {
    let end = reference.find(['?', '#']).unwrap_or(reference.len());
    let mut path = &reference[..end];

    if let Some(rest) = path.strip_prefix("//") {
        path = rest.find('/').map_or("", |i| &rest[i..]);
    }

    // "a:b/c" would read as scheme "a", so a colon in the first segment of a
    // relative path is ambiguous
    let first_segment = path.split('/').next().unwrap_or("");
    if first_segment.contains(':') {
        return Err(CheckError::InvalidUrlSyntax(format!(
            "{}: first path segment in URL cannot contain colon",
            reference
        )));
    }

    Ok(path)
}

// Percent-decodes a path into raw bytes, rejecting truncated or non-hex
// escapes. The bytes need not be UTF-8: file names on disk need not be either.
fn unescape(encoded: &str) -> Result<Vec<u8>, CheckError> {
    let bytes = encoded.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                let escape: String = encoded[i..].chars().take(3).collect();
                return Err(CheckError::InvalidUrlSyntax(format!(
                    "invalid URL escape {:?}",
                    escape
                )));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    Ok(percent_decode_str(encoded).collect())
}

#[cfg(unix)]
fn path_to_bytes(path: &Path) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    path.as_os_str().as_bytes().to_vec()
}

#[cfg(not(unix))]
fn path_to_bytes(path: &Path) -> Vec<u8> {
    path.to_string_lossy().replace('\\', "/").into_bytes()
}

#[cfg(unix)]
fn bytes_to_path(bytes: Vec<u8>) -> PathBuf {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;
    PathBuf::from(OsString::from_vec(bytes))
}

#[cfg(not(unix))]
fn bytes_to_path(bytes: Vec<u8>) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(&bytes).into_owned())
}

/// Directory part of a slash-separated path, "." when there is none.
fn parent_dir(path: &[u8]) -> Vec<u8> {
    match path.iter().rposition(|b| *b == b'/') {
        Some(0) => b"/".to_vec(),
        Some(i) => clean(&path[..i]),
        None => b".".to_vec(),
    }
}

/// Joins the non-empty parts with '/' and cleans the result lexically.
fn join(parts: &[&[u8]]) -> Vec<u8> {
    let parts: Vec<&[u8]> = parts.iter().copied().filter(|p| !p.is_empty()).collect();
    if parts.is_empty() {
        return Vec::new();
    }
    clean(&parts.join(&b'/'))
}

/// Lexical path cleanup: collapses repeated slashes, drops "." segments and
/// folds ".." into its parent where there is one. Never touches the
/// filesystem, so symlinks are not followed.
fn clean(path: &[u8]) -> Vec<u8> {
    let rooted = path.first() == Some(&b'/');
    let mut segments: Vec<&[u8]> = Vec::new();

    for segment in path.split(|b| *b == b'/') {
        match segment {
            b"" | b"." => {}
            b".." => {
                if segments.last().is_some_and(|s| *s != &b".."[..]) {
                    segments.pop();
                } else if !rooted {
                    segments.push(segment);
                }
            }
            _ => segments.push(segment),
        }
    }

    let joined = segments.join(&b'/');
    if rooted {
        let mut cleaned = vec![b'/'];
        cleaned.extend(joined);
        cleaned
    } else if joined.is_empty() {
        b".".to_vec()
    } else {
        joined
    }
}
