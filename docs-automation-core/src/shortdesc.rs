//! Short description ("shortdesc") rules for AsciiDoc topics.
//!
//! A shortdesc is the paragraph that follows a `[role="_abstract"]` line. It must be
//! between [`SHORTDESC_MIN`] and [`SHORTDESC_MAX`] characters once collapsed onto one
//! line. This module derives candidates from titles, shortens and pads existing
//! paragraphs, and performs the text surgery that inserts or replaces the block.
//!
//! All lengths are counted in characters, not bytes.

use std::sync::LazyLock;

use regex::Regex;

pub const SHORTDESC_MIN: usize = 50;
pub const SHORTDESC_MAX: usize = 300;
/// Cap used when shortening an existing paragraph; leaves room below the hard max.
pub const SHORTEN_LIMIT: usize = SHORTDESC_MAX - 3;
/// Appended to reach the minimum length when deriving or expanding.
pub const DEFAULT_SUFFIX: &str = " Use this when writing or matching rules.";
pub const ABSTRACT_MARKER: &str = "[role=\"_abstract\"]";
/// Title used for documents without a heading.
pub const FALLBACK_TITLE: &str = "This topic";

const EMPTY_TITLE_BASE: &str = "This topic.";
const ELLIPSIS: char = '…';

static RE_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^=+\s+(.+)$").expect("title regex"));
static RE_ROLE_ABSTRACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^\[role="_abstract"\]\s*$"#).expect("abstract regex"));
static RE_HEADING_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^=+\s+").expect("heading regex"));
// A line break followed by a line holding only spaces or tabs, LF or CRLF.
static RE_BLANK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n[ \t]*\r?\n").expect("blank line regex"));

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// The first `n` characters of `text` (all of it if shorter).
pub fn take_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Cut `text` to at most `limit` characters without splitting a word.
///
/// When the prefix contains whitespace the last (possibly partial) word is dropped
/// and `…` appended. A prefix with no whitespace is kept whole, without ellipsis.
pub fn truncate_at_word_boundary(text: &str, limit: usize) -> String {
    let prefix = take_chars(text, limit).trim_end();
    match prefix.rfind(char::is_whitespace) {
        Some(idx) => {
            let mut out = prefix[..idx].trim_end().to_string();
            out.push(ELLIPSIS);
            out
        }
        None => prefix.to_string(),
    }
}

/// Append [`DEFAULT_SUFFIX`] until `text` reaches the minimum, then cap at the maximum.
fn pad_to_min(mut text: String) -> String {
    while char_len(&text) < SHORTDESC_MIN {
        text.push_str(DEFAULT_SUFFIX);
    }
    take_chars(&text, SHORTDESC_MAX).to_string()
}

/// Build a compliant shortdesc from a topic title.
///
/// The result is always between [`SHORTDESC_MIN`] and [`SHORTDESC_MAX`] characters.
pub fn derive_shortdesc_from_title(title: &str) -> String {
    let raw = title.trim();
    let base = if raw.is_empty() {
        EMPTY_TITLE_BASE.to_string()
    } else if raw.ends_with('.') {
        raw.to_string()
    } else {
        format!("{raw}.")
    };

    let candidate = format!("{base}{DEFAULT_SUFFIX}").trim().to_string();
    if char_len(&candidate) <= SHORTDESC_MAX {
        return pad_to_min(candidate);
    }

    // Title alone is too long for the suffix; keep as much of it as fits.
    pad_to_min(truncate_at_word_boundary(&base, SHORTDESC_MAX - 1))
}

/// Shorten a paragraph to `max_len` characters at a word boundary.
pub fn shorten_paragraph(para: &str, max_len: usize) -> String {
    if char_len(para) <= max_len {
        return para.to_string();
    }
    truncate_at_word_boundary(para, max_len)
}

/// Pad a too-short paragraph with [`DEFAULT_SUFFIX`], capped at the maximum.
///
/// Returns `None` when the padded text still falls short of the minimum.
pub fn expand_paragraph(para: &str) -> Option<String> {
    let padded = format!("{para}{DEFAULT_SUFFIX}");
    let padded = take_chars(&padded, SHORTDESC_MAX);
    (char_len(padded) >= SHORTDESC_MIN).then(|| padded.to_string())
}

/// The text of the first level heading, trimmed.
pub fn extract_title(content: &str) -> Option<String> {
    RE_TITLE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

pub fn has_abstract(content: &str) -> bool {
    RE_ROLE_ABSTRACT.is_match(content)
}

/// The paragraph following the abstract marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbstractParagraph {
    /// Paragraph collapsed onto one line and trimmed.
    pub text: String,
    /// Byte offset where the paragraph's first non-whitespace character starts.
    pub start: usize,
    /// Byte offset just past the paragraph's last non-whitespace character.
    pub end: usize,
}

/// Locate the paragraph after `[role="_abstract"]`: everything up to the next blank
/// line, or the end of the text. `None` when there is no marker or the paragraph is empty.
pub fn first_paragraph_after_abstract(content: &str) -> Option<AbstractParagraph> {
    let marker = RE_ROLE_ABSTRACT.find(content)?;
    let span_start = marker.end();
    let span_end = RE_BLANK_LINE
        .find(&content[span_start..])
        .map(|m| span_start + m.start())
        .unwrap_or(content.len());
    let span = &content[span_start..span_end];

    let text = span.replace("\r\n", " ").replace('\n', " ").trim().to_string();
    if text.is_empty() {
        return None;
    }

    Some(AbstractParagraph {
        text,
        start: span_start + (span.len() - span.trim_start().len()),
        end: span_end - (span.len() - span.trim_end().len()),
    })
}

/// Swap the paragraph text for `replacement`, leaving the surrounding lines untouched.
pub fn replace_paragraph(content: &str, para: &AbstractParagraph, replacement: &str) -> String {
    let mut out = String::with_capacity(content.len() + replacement.len());
    out.push_str(&content[..para.start]);
    out.push_str(replacement);
    out.push_str(&content[para.end..]);
    out
}

fn is_preserved_after_heading(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with(':') || line.starts_with("//")
}

/// Insert an abstract block after the first heading.
///
/// Blank, `:attribute:` and `//` comment lines directly after the heading stay in
/// front of the new block, which consists of a blank line, the marker, the
/// shortdesc (capped at [`SHORTDESC_MAX`]) and a trailing blank line.
/// Text without a heading is returned unchanged. CRLF documents get CRLF lines.
pub fn add_abstract(content: &str, shortdesc: &str) -> String {
    let lines: Vec<&str> = content.split('\n').collect();
    let cr = if content.contains("\r\n") { "\r" } else { "" };
    let marker_line = format!("{ABSTRACT_MARKER}{cr}");
    let desc_line = format!("{}{cr}", take_chars(shortdesc, SHORTDESC_MAX));
    let mut out: Vec<&str> = Vec::with_capacity(lines.len() + 4);
    let mut inserted = false;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        out.push(line);
        i += 1;
        if !inserted && RE_HEADING_LINE.is_match(line) {
            while i < lines.len() && is_preserved_after_heading(lines[i]) {
                out.push(lines[i]);
                i += 1;
            }
            out.extend([cr, marker_line.as_str(), desc_line.as_str(), cr]);
            inserted = true;
        }
    }

    out.join("\n")
}
