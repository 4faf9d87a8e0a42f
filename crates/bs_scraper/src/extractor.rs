//! Heuristic article text extraction.
//!
//! Content containers are tried from most to least specific. The first one
//! whose paragraphs, subheadings and list items add up to
//! [`ACCEPT_SEGMENTS`] segments wins; if none does, a relaxed pass over the
//! whole `<body>` is used instead.

use std::collections::HashSet;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use bs_core::{BoundedText, Document, ExtractionError};

/// Shorter texts are treated as navigation or boilerplate and dropped.
pub const MIN_SEGMENT_CHARS: usize = 30;
/// Segments a container must yield before it is accepted.
pub const ACCEPT_SEGMENTS: usize = 30;
/// Segments the final text must have, otherwise extraction fails.
pub const MIN_SEGMENTS: usize = 10;

/// Content containers, most specific first.
pub const CONTENT_SELECTORS: [&str; 7] = [
    "article",
    ".article-content",
    ".post-content",
    ".entry-content",
    ".blog-post",
    "main",
    "body",
];

/// Reported in [`Extracted::matched`] when no container met the threshold.
pub const RELAXED_BODY: &str = "body (relaxed)";

const SEGMENT_SEPARATOR: &str = "\n\n";

lazy_static! {
    static ref CASCADE: Vec<(&'static str, Selector)> = CONTENT_SELECTORS
        .iter()
        .map(|s| (*s, Selector::parse(s).expect("content selector")))
        .collect();
    static ref TEXT_NODES: Selector = Selector::parse("p, h2, h3, h4, li").expect("text selector");
    static ref RELAXED_TEXT_NODES: Selector = Selector::parse("p, h2, h3, h4").expect("text selector");
    static ref BODY: Selector = Selector::parse("body").expect("body selector");
    static ref INLINE_WHITESPACE: Regex = Regex::new(r"[^\S\n]{2,}").expect("regex");
    static ref BRACKETED: Regex = Regex::new(r"\[.*?\]").expect("regex");
    static ref ADVERT_LINE: Regex = Regex::new(r"(?im)^[^\S\n]*advertisement\b.*(?:\n|$)").expect("regex");
    static ref BLANK_RUNS: Regex = Regex::new(r"\n{3,}").expect("regex");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub text: String,
    /// Selector that produced the text, or [`RELAXED_BODY`]
    pub matched: &'static str,
}

/// Extract and cap the readable text of `html`.
pub fn extract(html: &str) -> Result<BoundedText, ExtractionError> {
    extract_text(html).map(|extracted| BoundedText::new(&extracted.text))
}

pub fn extract_document(url: &str, html: &str) -> Result<Document, ExtractionError> {
    extract_text(html).map(|extracted| Document::new(url, extracted.text))
}

/// Extract the readable text of `html` without length capping.
pub fn extract_text(html: &str) -> Result<Extracted, ExtractionError> {
    let document = Html::parse_document(html);

    let (raw, matched) = match select_container(&document) {
        Some(found) => found,
        None => {
            let text = collect_segments(document.select(&BODY), &RELAXED_TEXT_NODES).join(SEGMENT_SEPARATOR);
            (text, RELAXED_BODY)
        }
    };

    let text = clean(&raw);
    let segments = count_segments(&text);
    if text.is_empty() || segments < MIN_SEGMENTS {
        tracing::debug!("Only {} segments found via {}", segments, matched);
        return Err(ExtractionError::InsufficientContent);
    }

    tracing::debug!("Extracted {} segments via {}", segments, matched);
    Ok(Extracted { text, matched })
}

fn select_container(document: &Html) -> Option<(String, &'static str)> {
    for (name, selector) in CASCADE.iter() {
        let mut containers = document.select(selector).peekable();
        if containers.peek().is_none() {
            continue;
        }
        let text = collect_segments(containers, &TEXT_NODES).join(SEGMENT_SEPARATOR);
        if count_segments(&text) >= ACCEPT_SEGMENTS {
            return Some((text, *name));
        }
    }
    None
}

/// Trimmed text of every matching leaf node under `containers`, each node
/// once. A node that wraps another matching node (`<li><p>..</p></li>`) is
/// skipped so its text is only counted through the inner node.
fn collect_segments<'a>(containers: impl Iterator<Item = ElementRef<'a>>, nodes: &Selector) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut segments = Vec::new();
    for container in containers {
        for node in container.select(nodes) {
            if !seen.insert(node.id()) || node.select(nodes).next().is_some() {
                continue;
            }
            let text = node.text().collect::<String>();
            let text = text.trim();
            if text.chars().count() >= MIN_SEGMENT_CHARS {
                segments.push(text.to_string());
            }
        }
    }
    segments
}

fn count_segments(text: &str) -> usize {
    text.lines().filter(|line| !line.trim().is_empty()).count()
}

fn clean(text: &str) -> String {
    let text = INLINE_WHITESPACE.replace_all(text, " ");
    let text = BRACKETED.replace_all(&text, "");
    let text = ADVERT_LINE.replace_all(&text, "");
    let text = BLANK_RUNS.replace_all(&text, "\n\n");
    text.trim().to_string()
}
