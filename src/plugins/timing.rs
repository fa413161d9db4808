//! Shared end-time extension rule for the timing plugins.

use super::{GAP, PipelineContext};

/// Default minimum gap (ms) between consecutive subtitles
pub const DEFAULT_MIN_GAP_MS: f64 = 125.0;

/// Distance kept from the next entry when the gap plugin is off
pub const SAFETY_BUFFER_MS: u64 = 1;

/// Gap the timing plugins must leave before the next entry: the gap plugin's
/// configured minimum when it is enabled, otherwise `None`.
pub fn configured_gap(context: &PipelineContext) -> Option<u64> {
    if !context.is_enabled(GAP) {
        return None;
    }
    let min_gap = context
        .param(GAP, "minGap")
        .filter(|value| value.is_finite())
        .unwrap_or(DEFAULT_MIN_GAP_MS);
    Some(min_gap.max(0.0).round() as u64)
}

/// New end time for an entry that wants to end at `desired_end`.
///
/// The result never passes `next_start - min_gap` (or the 1 ms safety buffer
/// when no gap is configured) and is never earlier than `original_end`.
pub fn extended_end(
    desired_end: u64,
    original_end: u64,
    next_start: Option<u64>,
    min_gap: Option<u64>,
) -> u64 {
    let mut new_end = desired_end;

    if let Some(next_start) = next_start {
        let buffer = min_gap.unwrap_or(SAFETY_BUFFER_MS);
        new_end = new_end.min(next_start.saturating_sub(buffer));
    }

    new_end.max(original_end)
}
