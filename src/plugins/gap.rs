//! Minimum gap enforcement between consecutive entries.

use super::timing::DEFAULT_MIN_GAP_MS;
use super::{GAP, ParamKind, ParamValues, PipelineContext, PluginParam, SubtitlePlugin, param_or};
use crate::subtitle_processor::SubtitleEntry;

static PARAMS: [PluginParam; 1] = [PluginParam {
    key: "minGap",
    label: "Min Gap (ms)",
    default_value: DEFAULT_MIN_GAP_MS,
    kind: ParamKind::Range { min: Some(0.0), step: Some(1.0) },
}];

pub struct GapPlugin;

impl SubtitlePlugin for GapPlugin {
    fn id(&self) -> &'static str {
        GAP
    }

    fn name(&self) -> &'static str {
        "Gap (Minimum Gap)"
    }

    fn description(&self) -> &'static str {
        "Enforces a minimum gap (in ms) between the end of one subtitle and the start of the next. If a subtitle's end time violates the gap, it is trimmed back."
    }

    fn enabled_by_default(&self) -> bool {
        true
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
        let min_gap = param_or(params, "minGap", DEFAULT_MIN_GAP_MS).max(0.0).round() as i64;

        for i in 0..entries.len().saturating_sub(1) {
            let next_start = entries[i + 1].start_time_ms as i64;
            let entry = &mut entries[i];

            let gap = next_start - entry.end_time_ms as i64;
            if gap >= min_gap {
                continue;
            }

            let new_end = next_start - min_gap;
            // Trimming past the start would erase the entry
            if new_end <= entry.start_time_ms as i64 {
                continue;
            }
            entry.end_time_ms = new_end as u64;
        }
        entries
    }
}
