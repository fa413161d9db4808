//! Output encoding selection. Leaves the timeline untouched; the pipeline
//! reads the target after all transforms have run.

use super::{ENCODING, ParamKind, ParamValues, PipelineContext, PluginParam, SubtitlePlugin, param_or};
use crate::encoding::TextEncoding;
use crate::subtitle_processor::SubtitleEntry;

/// Option values of the `targetEncoding` parameter
pub const TARGET_ENCODING_OPTIONS: &[(f64, &str)] = &[
    (0.0, "Keep original"),
    (1.0, "UTF-8"),
    (2.0, "Windows-1250"),
    (3.0, "Windows-1251"),
];

static PARAMS: [PluginParam; 1] = [PluginParam {
    key: "targetEncoding",
    label: "Target Encoding",
    default_value: 0.0,
    kind: ParamKind::Options(TARGET_ENCODING_OPTIONS),
}];

/// Encoding selected by a `targetEncoding` value; `None` keeps the original
pub fn target_encoding(params: &ParamValues) -> Option<TextEncoding> {
    match param_or(params, "targetEncoding", 0.0) as i64 {
        1 => Some(TextEncoding::Utf8),
        2 => Some(TextEncoding::Windows1250),
        3 => Some(TextEncoding::Windows1251),
        _ => None,
    }
}

pub struct EncodingPlugin;

impl SubtitlePlugin for EncodingPlugin {
    fn id(&self) -> &'static str {
        ENCODING
    }

    fn name(&self) -> &'static str {
        "Encoding"
    }

    fn description(&self) -> &'static str {
        "Choose the output encoding for processed files. When Cyrillization is active, Windows-1250 is automatically changed to Windows-1251."
    }

    fn params(&self) -> &'static [PluginParam] {
        &PARAMS
    }

    fn run(
        &self,
        entries: Vec<SubtitleEntry>,
        _params: &ParamValues,
        _context: &PipelineContext,
    ) -> Vec<SubtitleEntry> {
        entries
    }
}
