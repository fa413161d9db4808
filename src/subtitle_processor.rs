use std::fmt;
use regex::Regex;
use once_cell::sync::Lazy;
use log::{warn, debug};
use serde::{Deserialize, Serialize};

use crate::encoding::{self, TextEncoding};
use crate::errors::{EncodingError, SubtitleError};
use crate::markup;

// @module: SRT parsing, serialization and the per-file document model

// @const: Strict SRT timestamp regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}):(\d{2}):(\d{2}),(\d{3})$").unwrap()
});

// @const: Largest time the HH:MM:SS,mmm shape can carry (99:59:59,999)
pub const MAX_TIMESTAMP_MS: u64 = 359_999_999;

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleEntry {
    // @field: Sequence number as read from the file
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Text lines, markup included
    pub lines: Vec<String>,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, lines: Vec<String>) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            lines,
        }
    }

    /// Creates an entry from newline-separated text
    pub fn from_text(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: &str) -> Self {
        Self::new(seq_num, start_time_ms, end_time_ms, text.split('\n').map(str::to_string).collect())
    }

    /// Lines joined with newlines
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.end_time_ms.saturating_sub(self.start_time_ms)
    }

    /// Visible (markup-stripped) characters across all lines
    pub fn visible_chars(&self) -> usize {
        markup::visible_char_count(&self.lines)
    }

    /// Characters per second; zero for entries without duration
    pub fn cps(&self) -> f64 {
        let duration_sec = self.duration_ms() as f64 / 1000.0;
        if duration_sec > 0.0 {
            self.visible_chars() as f64 / duration_sec
        } else {
            0.0
        }
    }

    /// Whether timing or text differs from another entry
    pub fn differs_from(&self, other: &SubtitleEntry) -> bool {
        self.start_time_ms != other.start_time_ms
            || self.end_time_ms != other.end_time_ms
            || self.lines != other.lines
    }

    /// Parse an SRT timestamp (`HH:MM:SS,mmm`) to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64, SubtitleError> {
        let caps = TIMESTAMP_REGEX
            .captures(timestamp.trim())
            .ok_or_else(|| SubtitleError::InvalidTimestamp(timestamp.to_string()))?;

        let part = |idx: usize| -> Result<u64, SubtitleError> {
            caps[idx]
                .parse::<u64>()
                .map_err(|_| SubtitleError::InvalidTimestamp(timestamp.to_string()))
        };

        Ok(part(1)? * 3_600_000 + part(2)? * 60_000 + part(3)? * 1_000 + part(4)?)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm).
    /// Values past 99:59:59,999 are clamped so the result always parses back.
    pub fn format_timestamp(ms: u64) -> String {
        let ms = ms.min(MAX_TIMESTAMP_MS);
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_time_ms)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        write!(f, "{}", self.text())
    }
}

/// Result of parsing SRT text: the entries that could be read plus one
/// diagnostic per block that had to be skipped
#[derive(Debug, Clone, Default)]
pub struct ParsedSubtitles {
    pub entries: Vec<SubtitleEntry>,
    pub diagnostics: Vec<SubtitleError>,
}

/// Parse SRT format string into subtitle entries.
///
/// Malformed blocks are skipped and reported; they never abort the document.
pub fn parse_srt_string(content: &str) -> ParsedSubtitles {
    let normalized = content
        .replace("\r\n", "\n")
        .replace('\r', "\n");
    let normalized = normalized.trim_start_matches('\u{feff}');

    let mut parsed = ParsedSubtitles::default();
    let mut block_number = 0;

    for (line_number, raw_block) in split_blocks(normalized) {
        block_number += 1;
        let block = raw_block.trim();
        if block.is_empty() {
            continue;
        }
        match parse_block(block) {
            Ok(entry) => parsed.entries.push(entry),
            Err(reason) => {
                warn!("Skipping block {} at line {}: {}", block_number, line_number, reason);
                parsed.diagnostics.push(SubtitleError::MalformedBlock {
                    block_number,
                    line_number,
                    reason,
                });
            }
        }
    }

    debug!(
        "Parsed {} entries, skipped {} blocks",
        parsed.entries.len(),
        parsed.diagnostics.len()
    );
    parsed
}

/// Split text on runs of empty lines, keeping the 1-based line number each
/// block starts on
fn split_blocks(content: &str) -> Vec<(usize, String)> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut start_line = 0;

    for (idx, line) in content.split('\n').enumerate() {
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push((start_line, current.join("\n")));
                current.clear();
            }
            continue;
        }
        if current.is_empty() {
            start_line = idx + 1;
        }
        current.push(line);
    }
    if !current.is_empty() {
        blocks.push((start_line, current.join("\n")));
    }
    blocks
}

fn parse_block(block: &str) -> Result<SubtitleEntry, String> {
    let block_lines: Vec<&str> = block.split('\n').collect();
    if block_lines.len() < 3 {
        return Err(format!("expected at least 3 lines, found {}", block_lines.len()));
    }

    let seq_num = block_lines[0]
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("sequence number '{}' is not an integer", block_lines[0].trim()))?;

    let time_parts: Vec<&str> = block_lines[1].split("-->").collect();
    if time_parts.len() != 2 {
        return Err(format!("'{}' is not a timing line", block_lines[1]));
    }

    let start_time_ms = SubtitleEntry::parse_timestamp(time_parts[0]).map_err(|e| e.to_string())?;
    let end_time_ms = SubtitleEntry::parse_timestamp(time_parts[1]).map_err(|e| e.to_string())?;
    if end_time_ms < start_time_ms {
        return Err(format!(
            "end time {} is before start time {}",
            SubtitleEntry::format_timestamp(end_time_ms),
            SubtitleEntry::format_timestamp(start_time_ms)
        ));
    }

    let lines = block_lines[2..].iter().map(|line| line.to_string()).collect();
    Ok(SubtitleEntry::new(seq_num, start_time_ms, end_time_ms, lines))
}

/// Serialize entries to SRT text, renumbering from 1
pub fn serialize_srt(entries: &[SubtitleEntry]) -> String {
    let blocks: Vec<String> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            format!(
                "{}\n{} --> {}\n{}",
                i + 1,
                entry.format_start_time(),
                entry.format_end_time(),
                entry.text()
            )
        })
        .collect();

    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

/// Renumber entries contiguously from 1
pub fn renumber(entries: &mut [SubtitleEntry]) {
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.seq_num = i + 1;
    }
}

/// One loaded subtitle file: the immutable original timeline plus the
/// working copy produced by the last pipeline run
#[derive(Debug, Clone)]
pub struct SubtitleDocument {
    /// File name, used for output naming and diagnostics
    pub name: String,

    original_entries: Vec<SubtitleEntry>,

    /// Working timeline
    pub entries: Vec<SubtitleEntry>,

    original_encoding: TextEncoding,

    /// Encoding the working timeline will be written in
    pub encoding: TextEncoding,

    /// Blocks skipped while parsing
    pub diagnostics: Vec<SubtitleError>,
}

impl SubtitleDocument {
    /// Build a document from already-parsed entries
    pub fn from_entries(name: impl Into<String>, entries: Vec<SubtitleEntry>, encoding: TextEncoding) -> Self {
        SubtitleDocument {
            name: name.into(),
            original_entries: entries.clone(),
            entries,
            original_encoding: encoding,
            encoding,
            diagnostics: Vec::new(),
        }
    }

    /// Detect the encoding of raw file bytes, decode and parse them
    pub fn load(name: impl Into<String>, bytes: &[u8]) -> Result<Self, EncodingError> {
        let name = name.into();
        let encoding = encoding::detect_encoding(bytes);
        let content = encoding::decode(bytes, encoding)?;
        let parsed = parse_srt_string(&content);

        if parsed.entries.is_empty() {
            warn!("No valid subtitle entries found in {}", name);
        }
        debug!("Loaded {} ({}, {} entries)", name, encoding, parsed.entries.len());

        let mut document = Self::from_entries(name, parsed.entries, encoding);
        document.diagnostics = parsed.diagnostics;
        Ok(document)
    }

    /// The timeline as loaded
    pub fn original_entries(&self) -> &[SubtitleEntry] {
        &self.original_entries
    }

    /// The encoding detected at load time
    pub fn original_encoding(&self) -> TextEncoding {
        self.original_encoding
    }

    /// Deep copy of the original timeline for a fresh pipeline run
    pub fn fresh_entries(&self) -> Vec<SubtitleEntry> {
        self.original_entries.clone()
    }

    /// Discard processing results
    pub fn reset(&mut self) {
        self.entries = self.fresh_entries();
        self.encoding = self.original_encoding;
    }

    /// Whether the working timeline differs from the original
    pub fn has_changes(&self) -> bool {
        self.entries.len() != self.original_entries.len()
            || self
                .entries
                .iter()
                .zip(&self.original_entries)
                .any(|(working, original)| working.differs_from(original))
    }

    /// Serialized original timeline
    pub fn original_srt(&self) -> String {
        serialize_srt(&self.original_entries)
    }

    /// Serialized working timeline
    pub fn to_srt(&self) -> String {
        serialize_srt(&self.entries)
    }

    /// Working timeline encoded in the working encoding
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodingError> {
        encoding::encode(&self.to_srt(), self.encoding)
    }
}

impl fmt::Display for SubtitleDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Document")?;
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Encoding: {}", self.encoding)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}
