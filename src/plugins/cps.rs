//! Reading-speed correction: extends entries whose characters per second
//! exceed the configured maximum.

use super::timing::{configured_gap, extended_end};
use super::{CPS, ParamKind, ParamValues, PipelineContext, PluginParam, SubtitlePlugin, param_or};
use crate::subtitle_processor::SubtitleEntry;

/// Default maximum characters per second
pub const DEFAULT_MAX_CPS: f64 = 25.0;

static PARAMS: [PluginParam; 1] = [PluginParam {
    key: "maxCps",
    label: "Max CPS",
    default_value: DEFAULT_MAX_CPS,
    kind: ParamKind::Range { min: Some(1.0), step: Some(1.0) },
}];

pub struct CpsPlugin;

impl SubtitlePlugin for CpsPlugin {
    fn id(&self) -> &'static str {
        CPS
    }

    fn name(&self) -> &'static str {
        "CPS (Characters Per Second)"
    }

    fn description(&self) -> &'static str {
        "Extends subtitle duration if CPS exceeds the threshold. Respects Gap plugin constraints when Gap is active."
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
        context: &PipelineContext,
    ) -> Vec<SubtitleEntry> {
        let max_cps = param_or(params, "maxCps", DEFAULT_MAX_CPS);
        if max_cps <= 0.0 {
            return entries;
        }
        let min_gap = configured_gap(context);

        for i in 0..entries.len() {
            let next_start = entries.get(i + 1).map(|next| next.start_time_ms);
            let entry = &mut entries[i];

            let chars = entry.visible_chars();
            if chars == 0 {
                continue;
            }
            // Zero-length entries read infinitely fast
            if entry.duration_ms() > 0 && entry.cps() <= max_cps {
                continue;
            }

            let required_ms = (chars as f64 * 1000.0 / max_cps).ceil() as u64;
            entry.end_time_ms = extended_end(
                entry.start_time_ms.saturating_add(required_ms),
                entry.end_time_ms,
                next_start,
                min_gap,
            );
        }
        entries
    }
}
