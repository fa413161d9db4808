/*!
 * Subtitle transformation plugins.
 *
 * Each plugin is an independent transform over a timeline. Plugins run in
 * the fixed order returned by [`all_plugins`] and can read, but never change,
 * the enabled set and parameters of every other plugin through a
 * [`PipelineContext`]. This is how the timing plugins stay clear of the gap
 * that the `gap` plugin is going to enforce after them.
 *
 * - `remove_ads`: drops known advertisement entries at either end
 * - `cyrillization`: Serbian Latin to Cyrillic transliteration
 * - `long_lines`: merges and re-splits over-long lines
 * - `cps`: extends entries that read too fast
 * - `min_duration`: extends entries that are too short
 * - `gap`: trims entries that crowd the next one
 * - `output_encoding`: retargets the output encoding
 */

pub mod cps;
pub mod cyrillization;
pub mod gap;
pub mod long_lines;
pub mod min_duration;
pub mod output_encoding;
pub mod remove_ads;
pub mod timing;

use std::collections::{BTreeMap, BTreeSet};

use crate::subtitle_processor::SubtitleEntry;

pub const REMOVE_ADS: &str = "removeAds";
pub const CYRILLIZATION: &str = "cyrillization";
pub const LONG_LINES: &str = "longLines";
pub const CPS: &str = "cps";
pub const MIN_DURATION: &str = "minDuration";
pub const GAP: &str = "gap";
pub const ENCODING: &str = "encoding";

/// Parameter values of one plugin, keyed by parameter name
pub type ParamValues = BTreeMap<String, f64>;

/// How a numeric parameter may be set
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamKind {
    /// Free number with an optional lower bound and an input step
    Range { min: Option<f64>, step: Option<f64> },
    /// One of a fixed set of labelled values
    Options(&'static [(f64, &'static str)]),
}

/// Declaration of a plugin parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PluginParam {
    pub key: &'static str,
    pub label: &'static str,
    pub default_value: f64,
    pub kind: ParamKind,
}

impl PluginParam {
    /// Whether the value satisfies the declared bounds or option set
    pub fn accepts(&self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        match self.kind {
            ParamKind::Range { min, .. } => min.is_none_or(|min| value >= min),
            ParamKind::Options(options) => options.iter().any(|(option, _)| *option == value),
        }
    }
}

/// Read-only view of the whole plugin configuration for one pipeline run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineContext {
    enabled: BTreeSet<String>,
    params: BTreeMap<String, ParamValues>,
}

impl PipelineContext {
    pub fn new(enabled: BTreeSet<String>, params: BTreeMap<String, ParamValues>) -> Self {
        Self { enabled, params }
    }

    /// Whether a plugin takes part in this run
    pub fn is_enabled(&self, plugin_id: &str) -> bool {
        self.enabled.contains(plugin_id)
    }

    /// All parameter values of a plugin
    pub fn params_for(&self, plugin_id: &str) -> Option<&ParamValues> {
        self.params.get(plugin_id)
    }

    /// A single parameter value of any plugin
    pub fn param(&self, plugin_id: &str, key: &str) -> Option<f64> {
        self.params.get(plugin_id).and_then(|values| values.get(key).copied())
    }
}

/// A timeline transform
pub trait SubtitlePlugin: Send + Sync {
    /// Stable identifier used in configuration files
    fn id(&self) -> &'static str;

    /// Display name
    fn name(&self) -> &'static str;

    /// One-sentence explanation of what the plugin does
    fn description(&self) -> &'static str;

    /// Whether the plugin is on in a fresh configuration
    fn enabled_by_default(&self) -> bool {
        false
    }

    /// Declared parameters
    fn params(&self) -> &'static [PluginParam] {
        &[]
    }

    /// Transform the timeline
    fn run(
        &self,
        entries: Vec<SubtitleEntry>,
        params: &ParamValues,
        context: &PipelineContext,
    ) -> Vec<SubtitleEntry>;

    /// Change-report line for a run that touched `changed` entries
    fn summary(&self, changed: usize) -> String {
        format!("{} applied in {} subtitle lines", self.name(), changed)
    }

    /// Look up a declared parameter
    fn param(&self, key: &str) -> Option<&'static PluginParam> {
        self.params().iter().find(|param| param.key == key)
    }

    /// Parameter defaults
    fn default_params(&self) -> ParamValues {
        self.params()
            .iter()
            .map(|param| (param.key.to_string(), param.default_value))
            .collect()
    }
}

/// Every plugin, in execution order
pub fn all_plugins() -> Vec<Box<dyn SubtitlePlugin>> {
    vec![
        Box::new(remove_ads::RemoveAdsPlugin),
        Box::new(cyrillization::CyrillizationPlugin),
        Box::new(long_lines::LongLinesPlugin),
        Box::new(cps::CpsPlugin),
        Box::new(min_duration::MinDurationPlugin),
        Box::new(gap::GapPlugin),
        Box::new(output_encoding::EncodingPlugin),
    ]
}

/// Find a plugin by identifier
pub fn find_plugin(plugin_id: &str) -> Option<Box<dyn SubtitlePlugin>> {
    all_plugins().into_iter().find(|plugin| plugin.id() == plugin_id)
}

/// Parameter value with the declared default as fallback
pub(crate) fn param_or(params: &ParamValues, key: &str, default: f64) -> f64 {
    params.get(key).copied().filter(|value| value.is_finite()).unwrap_or(default)
}
