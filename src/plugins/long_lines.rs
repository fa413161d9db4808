//! Line rebalancing for entries with over-long lines.

use super::{LONG_LINES, ParamKind, ParamValues, PipelineContext, PluginParam, SubtitlePlugin, param_or};
use crate::markup::visible_len;
use crate::subtitle_processor::SubtitleEntry;

/// Default maximum visible characters per line
pub const DEFAULT_MAX_LINE_LENGTH: f64 = 42.0;

static PARAMS: [PluginParam; 1] = [PluginParam {
    key: "maxLength",
    label: "Max Line Length",
    default_value: DEFAULT_MAX_LINE_LENGTH,
    kind: ParamKind::Range { min: Some(1.0), step: Some(1.0) },
}];

/// Split text into two lines at the word boundary whose visible prefix
/// length is closest to half the total. Single words stay whole.
pub fn split_into_two_lines(text: &str) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= 1 {
        return vec![text.to_string()];
    }

    let target = visible_len(text) as f64 / 2.0;
    let mut best_idx = 0;
    let mut best_diff = f64::INFINITY;
    let mut accum = 0usize;

    for (i, word) in words[..words.len() - 1].iter().enumerate() {
        accum += visible_len(word);
        if i > 0 {
            accum += 1;
        }
        let diff = (accum as f64 - target).abs();
        // Strict comparison keeps the earliest boundary on ties
        if diff < best_diff {
            best_diff = diff;
            best_idx = i;
        }
    }

    vec![
        words[..=best_idx].join(" "),
        words[best_idx + 1..].join(" "),
    ]
}

pub struct LongLinesPlugin;

impl SubtitlePlugin for LongLinesPlugin {
    fn id(&self) -> &'static str {
        LONG_LINES
    }

    fn name(&self) -> &'static str {
        "Long Lines"
    }

    fn description(&self) -> &'static str {
        "Splits lines that exceed the maximum character count. Merges multi-line subtitles first, then re-splits at the best word boundary for balanced line lengths."
    }

    fn params(&self) -> &'static [PluginParam] {
        &PARAMS
    }

    fn run(
        &self,
        mut entries: Vec<SubtitleEntry>,
        params: &ParamValues,
        _context: &PipelineContext,
    ) -> Vec<SubtitleEntry> {
        let max_length = param_or(params, "maxLength", DEFAULT_MAX_LINE_LENGTH);

        for entry in entries.iter_mut() {
            let has_long_line = entry
                .lines
                .iter()
                .any(|line| visible_len(line) as f64 > max_length);
            if !has_long_line {
                continue;
            }

            let merged = entry.lines.join(" ");
            entry.lines = if visible_len(&merged) as f64 <= max_length {
                vec![merged]
            } else {
                split_into_two_lines(&merged)
            };
        }
        entries
    }
}
