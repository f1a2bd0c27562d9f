// src/extract/html.rs
// =============================================================================
// This module extracts references from HTML.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser), so broken markup and
//   fragments (like raw HTML pulled out of markdown) parse fine too
//
// References are the href of <a> elements and the src of <img> elements,
// returned exactly as written. Resolving them is the checker's job.
// =============================================================================

use super::is_checkable_reference;
use scraper::{Html, Selector};

// Extracts all checkable references from HTML content, in document order
//
// Example:
//   html = "<a href='/docs'>Docs</a><img src='logo.png'>"
//   result = ["/docs", "logo.png"]
pub fn extract_html_references(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    // The selector is a constant, so parsing it cannot fail at runtime
    let selector = Selector::parse("a[href], img[src]").expect("static selector is valid");

    document
        .select(&selector)
        .filter_map(|element| {
            let attribute = match element.value().name() {
                "a" => "href",
                _ => "src",
            };
            element.value().attr(attribute).map(|value| value.trim().to_string())
        })
        .filter(|reference| is_checkable_reference(reference))
        .collect()
}
