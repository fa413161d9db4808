/*!
 * Readability statistics for a timeline.
 *
 * Maxima and minima remember the 1-based position of the first entry that
 * reached them; later entries must beat the value strictly to take over.
 */

use std::fmt;

use serde::Serialize;

use crate::markup;
use crate::subtitle_processor::SubtitleEntry;

/// CPS values above which entries are counted
pub const CPS_THRESHOLDS: [f64; 5] = [15.0, 17.0, 20.0, 25.0, 30.0];

/// Durations (ms) below which entries are counted
pub const DURATION_THRESHOLDS_MS: [u64; 4] = [500, 1000, 1500, 2000];

/// A value plus the position of the first entry that produced it
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SubtitleStat {
    pub value: f64,
    /// 1-based entry position; 0 when nothing was recorded
    pub line: usize,
}

impl SubtitleStat {
    fn record_if_greater(&mut self, value: f64, line: usize) {
        if value > self.value {
            *self = SubtitleStat { value, line };
        }
    }
}

/// Number of entries past a threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdCount {
    pub threshold: f64,
    pub count: usize,
}

/// Statistics of one timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtitleInfo {
    pub entry_count: usize,
    /// End time of the last entry
    pub total_duration_ms: u64,
    pub max_cps: SubtitleStat,
    /// Longest visible line, in characters
    pub max_line_length: SubtitleStat,
    /// Seconds
    pub max_duration: SubtitleStat,
    /// Seconds
    pub min_duration: SubtitleStat,
    /// Count of entries with more than two lines, and the first of them
    pub more_than_two_lines: SubtitleStat,
    /// Entries whose CPS exceeds each of [`CPS_THRESHOLDS`]
    pub cps_over: Vec<ThresholdCount>,
    /// Entries shorter than each of [`DURATION_THRESHOLDS_MS`]
    pub shorter_than: Vec<ThresholdCount>,
}

/// Compute statistics for a timeline
pub fn compute_sub_info(entries: &[SubtitleEntry]) -> SubtitleInfo {
    let mut max_cps = SubtitleStat::default();
    let mut max_line_length = SubtitleStat::default();
    let mut max_duration = SubtitleStat::default();
    let mut min_duration = SubtitleStat {
        value: f64::INFINITY,
        line: 0,
    };
    let mut more_than_two_lines = SubtitleStat::default();
    let mut cps_over = [0usize; CPS_THRESHOLDS.len()];
    let mut shorter_than = [0usize; DURATION_THRESHOLDS_MS.len()];

    for (idx, entry) in entries.iter().enumerate() {
        let position = idx + 1;
        let duration_sec = entry.duration_ms() as f64 / 1000.0;
        let cps = entry.cps();

        max_cps.record_if_greater(cps, position);

        for line in &entry.lines {
            max_line_length.record_if_greater(markup::visible_len(line) as f64, position);
        }

        max_duration.record_if_greater(duration_sec, position);
        if duration_sec < min_duration.value {
            min_duration = SubtitleStat {
                value: duration_sec,
                line: position,
            };
        }

        if entry.lines.len() > 2 {
            if more_than_two_lines.value == 0.0 {
                more_than_two_lines.line = position;
            }
            more_than_two_lines.value += 1.0;
        }

        for (count, threshold) in cps_over.iter_mut().zip(CPS_THRESHOLDS) {
            if cps > threshold {
                *count += 1;
            }
        }
        for (count, threshold) in shorter_than.iter_mut().zip(DURATION_THRESHOLDS_MS) {
            if entry.duration_ms() < threshold {
                *count += 1;
            }
        }
    }

    if entries.is_empty() {
        min_duration = SubtitleStat::default();
    }

    SubtitleInfo {
        entry_count: entries.len(),
        total_duration_ms: entries.last().map_or(0, |entry| entry.end_time_ms),
        max_cps,
        max_line_length,
        max_duration,
        min_duration,
        more_than_two_lines,
        cps_over: CPS_THRESHOLDS
            .iter()
            .zip(cps_over)
            .map(|(&threshold, count)| ThresholdCount { threshold, count })
            .collect(),
        shorter_than: DURATION_THRESHOLDS_MS
            .iter()
            .zip(shorter_than)
            .map(|(&threshold, count)| ThresholdCount {
                threshold: threshold as f64,
                count,
            })
            .collect(),
    }
}

/// CPS rounded to a whole number
pub fn format_cps(value: f64) -> String {
    format!("{}", value.round())
}

/// Seconds with two decimals and an `s` suffix
pub fn format_duration(seconds: f64) -> String {
    format!("{:.2}s", seconds)
}

impl fmt::Display for SubtitleInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Entries: {}", self.entry_count)?;
        writeln!(
            f,
            "Total duration: {}",
            SubtitleEntry::format_timestamp(self.total_duration_ms)
        )?;
        writeln!(f, "Max CPS: {} (line {})", format_cps(self.max_cps.value), self.max_cps.line)?;
        writeln!(
            f,
            "Max line length: {} (line {})",
            self.max_line_length.value, self.max_line_length.line
        )?;
        writeln!(
            f,
            "Max duration: {} (line {})",
            format_duration(self.max_duration.value),
            self.max_duration.line
        )?;
        writeln!(
            f,
            "Min duration: {} (line {})",
            format_duration(self.min_duration.value),
            self.min_duration.line
        )?;
        if self.more_than_two_lines.value > 0.0 {
            writeln!(
                f,
                "> 2 lines: {} (first: line {})",
                self.more_than_two_lines.value, self.more_than_two_lines.line
            )?;
        } else {
            writeln!(f, "> 2 lines: None")?;
        }
        for over in &self.cps_over {
            writeln!(f, "CPS > {}: {}", over.threshold, over.count)?;
        }
        for under in &self.shorter_than {
            writeln!(f, "Duration < {}ms: {}", under.threshold, under.count)?;
        }
        Ok(())
    }
}
