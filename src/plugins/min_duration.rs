//! Extends entries shorter than a configured minimum duration.

use super::timing::{configured_gap, extended_end};
use super::{MIN_DURATION, ParamKind, ParamValues, PipelineContext, PluginParam, SubtitlePlugin, param_or};
use crate::subtitle_processor::SubtitleEntry;

/// Default minimum subtitle duration (ms)
pub const DEFAULT_MIN_DURATION_MS: f64 = 2000.0;

static PARAMS: [PluginParam; 1] = [PluginParam {
    key: "minDuration",
    label: "Min Duration (ms)",
    default_value: DEFAULT_MIN_DURATION_MS,
    kind: ParamKind::Range { min: Some(0.0), step: Some(1.0) },
}];

pub struct MinDurationPlugin;

impl SubtitlePlugin for MinDurationPlugin {
    fn id(&self) -> &'static str {
        MIN_DURATION
    }

    fn name(&self) -> &'static str {
        "Min Duration"
    }

    fn description(&self) -> &'static str {
        "Extends subtitle end time if its duration is below the minimum. Respects Gap plugin constraints when Gap is active."
    }

    fn params(&self) -> &'static [PluginParam] {
        &PARAMS
    }

    fn run(
        &self,
        mut entries: Vec<SubtitleEntry>,
        params: &ParamValues,
        context: &PipelineContext,
    ) -> Vec<SubtitleEntry> {
        let min_duration = param_or(params, "minDuration", DEFAULT_MIN_DURATION_MS)
            .max(0.0)
            .round() as u64;
        let min_gap = configured_gap(context);

        for i in 0..entries.len() {
            let next_start = entries.get(i + 1).map(|next| next.start_time_ms);
            let entry = &mut entries[i];

            if entry.duration_ms() >= min_duration {
                continue;
            }

            entry.end_time_ms = extended_end(
                entry.start_time_ms.saturating_add(min_duration),
                entry.end_time_ms,
                next_start,
                min_gap,
            );
        }
        entries
    }
}
