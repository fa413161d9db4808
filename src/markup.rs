/*!
 * Inline markup handling for subtitle lines.
 *
 * SRT lines may carry HTML-like tags (`<i>`, `<font color="...">`) or brace
 * tags (`{b}`). Readability metrics count only visible characters, and text
 * transforms must leave the tags themselves alone.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Formatting tags that do not count towards visible length
static HTML_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</?(?:b|i|u|font)(?: [^>]*)?\s*>").unwrap()
});

static BRACE_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\{/?\s*[biu]\s*\}").unwrap()
});

/// Any angle or brace span, used to fence off markup from text transforms
static ANY_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^>]+>|\{[^}]+\}").unwrap()
});

/// A piece of a line: either markup passed through verbatim, or plain text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Tag(&'a str),
    Text(&'a str),
}

/// Remove formatting tags, leaving only what the viewer reads
pub fn strip_tags(text: &str) -> String {
    let without_html = HTML_TAG_REGEX.replace_all(text, "");
    BRACE_TAG_REGEX.replace_all(&without_html, "").into_owned()
}

/// Number of visible characters in a piece of text
pub fn visible_len(text: &str) -> usize {
    strip_tags(text).chars().count()
}

/// Visible characters across all lines of an entry, lines concatenated
/// without separators
pub fn visible_char_count(lines: &[String]) -> usize {
    lines.iter().map(|line| visible_len(line)).sum()
}

/// Split a line into alternating text and tag segments. Concatenating the
/// segments reproduces the line exactly.
pub fn split_markup(line: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;
    for tag in ANY_TAG_REGEX.find_iter(line) {
        if tag.start() > last {
            segments.push(Segment::Text(&line[last..tag.start()]));
        }
        segments.push(Segment::Tag(tag.as_str()));
        last = tag.end();
    }
    if last < line.len() {
        segments.push(Segment::Text(&line[last..]));
    }
    segments
}
