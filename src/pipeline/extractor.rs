//! HTML extractor for page titles and email addresses
//!
//! This module turns a fetched body into:
//! - The page title (from the first `<title>` tag)
//! - Every distinct email-like string in the rendered page text
//!
//! Extraction never fails. Malformed markup is repaired by the HTML parser,
//! and bodies that are not text at all yield an empty, degraded result.

use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid email regex")
});

/// Elements whose text is not part of the rendered page
const NON_TEXT_ELEMENTS: [&str; 3] = ["script", "style", "template"];

/// Elements that start a new line of rendered text
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "caption", "dd", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "head", "header", "hr", "html", "li", "main", "nav", "ol", "option", "p", "pre", "section",
    "table", "tbody", "td", "tfoot", "th", "thead", "title", "tr", "ul",
];

/// Extracted information from a page body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// The page title, trimmed; `None` when missing or blank
    pub title: Option<String>,

    /// Distinct email addresses in order of first appearance
    pub emails: Vec<String>,

    /// True when the body could not be treated as HTML
    pub degraded: bool,
}

impl Extraction {
    fn degraded() -> Self {
        Self {
            degraded: true,
            ..Self::default()
        }
    }
}

/// Parses a body as HTML and extracts the title and email addresses
///
/// # Rules
///
/// - The body is decoded as UTF-8; invalid sequences are replaced.
/// - Bodies containing NUL bytes are treated as binary and yield an empty,
///   degraded extraction.
/// - Emails are matched against the text of the whole document, `<head>`
///   included, with `<script>`, `<style>` and `<template>` contents skipped.
/// - Matches keep their original case and are de-duplicated.
///
/// # Example
///
/// ```
/// use email_scraper::pipeline::extract;
///
/// let html = b"<html><head><title> Acme </title></head><body>Contact: a@b.com and a@b.com</body></html>";
/// let extraction = extract(html);
/// assert_eq!(extraction.title.as_deref(), Some("Acme"));
/// assert_eq!(extraction.emails, vec!["a@b.com".to_string()]);
/// ```
pub fn extract(body: &[u8]) -> Extraction {
    if body.contains(&0) {
        return Extraction::degraded();
    }

    let html = String::from_utf8_lossy(body);
    let document = Html::parse_document(&html);

    Extraction {
        title: extract_title(&document),
        emails: extract_emails(&render_text(&document)),
        degraded: false,
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Renders the document as plain text
///
/// Text inside the same block is concatenated as-is, so an address split
/// over inline tags (`<span>john</span>@<span>acme.com</span>`) reads as one
/// token. A line break separates text belonging to different block-level
/// elements and text on either side of a `<br>`.
fn render_text(document: &Html) -> String {
    let mut rendered = String::new();
    let mut previous_block = None;
    let mut pending_break = false;

    for node in document.tree.root().descendants() {
        if let Some(element) = node.value().as_element() {
            if element.name() == "br" || BLOCK_ELEMENTS.contains(&element.name()) {
                pending_break = true;
            }
            continue;
        }

        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| NON_TEXT_ELEMENTS.contains(&element.name()))
        });
        if hidden {
            continue;
        }

        let block = node
            .ancestors()
            .find(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|element| BLOCK_ELEMENTS.contains(&element.name()))
            })
            .map(|ancestor| ancestor.id());

        if !rendered.is_empty() && (pending_break || block != previous_block) {
            rendered.push('\n');
        }
        rendered.push_str(text);

        previous_block = block;
        pending_break = false;
    }

    rendered
}

/// Finds distinct email-like substrings in order of first appearance
pub fn extract_emails(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();

    EMAIL_PATTERN
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|email| seen.insert(*email))
        .map(str::to_string)
        .collect()
}
