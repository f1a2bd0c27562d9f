// src/extract/markdown.rs
// =============================================================================
// This module extracts references from Markdown text.
//
// We use the `pulldown-cmark` crate which:
// - Parses Markdown into events (heading, paragraph, link, etc.)
// - Follows the CommonMark specification
// - Is fast and memory-efficient (it's a streaming parser)
//
// Both links and images count as references, and so do href/src attributes
// of raw HTML embedded in the markdown (handed over to the HTML extractor).
// =============================================================================

use super::html::extract_html_references;
use super::is_checkable_reference;
use pulldown_cmark::{Event, Parser, Tag};

// Extracts every checkable reference from Markdown text, in document order
//
// Example input:
//   "See [the guide](docs/guide.md) and ![logo](img/logo.png)"
//
// Example output:
//   vec!["docs/guide.md", "img/logo.png"]
pub fn extract_markdown_references(markdown: &str) -> Vec<String> {
    let mut references = Vec::new();

    for event in Parser::new(markdown) {
        match event {
            // In pulldown-cmark 0.9 links and images carry
            // (link_type, destination, title)
            Event::Start(Tag::Link(_, destination, _))
            | Event::Start(Tag::Image(_, destination, _)) => {
                if is_checkable_reference(&destination) {
                    references.push(destination.to_string());
                }
            }

            // Raw HTML, e.g. <img src="diagram.svg" width="300">
            Event::Html(html) => {
                references.extend(extract_html_references(&html));
            }

            // Text, headings, code blocks: nothing to check
            _ => {}
        }
    }

    references
}
