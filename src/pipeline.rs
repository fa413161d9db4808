/*!
 * Plugin configuration and the ordered processing pipeline.
 *
 * [`PluginStates`] is the persisted per-plugin configuration (enabled flag
 * plus parameter values). A [`Pipeline`] takes a snapshot of it and runs the
 * enabled plugins over a fresh copy of each document's original timeline,
 * producing a [`ChangeReport`] per document.
 */

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::encoding::TextEncoding;
use crate::errors::ConfigError;
use crate::plugins::output_encoding::target_encoding;
use crate::plugins::{
    CYRILLIZATION, ENCODING, ParamKind, ParamValues, PipelineContext, SubtitlePlugin, all_plugins,
    find_plugin,
};
use crate::subtitle_processor::{SubtitleDocument, SubtitleEntry};

// @struct: Persisted state of one plugin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginState {
    // @field: Whether the plugin runs
    pub enabled: bool,

    // @field: Parameter values by key
    #[serde(default)]
    pub params: ParamValues,
}

/// Configuration of every known plugin, keyed by plugin id.
///
/// Deserializing merges the stored values onto the built-in defaults:
/// unknown plugins and parameters are ignored, invalid values are dropped
/// with a warning, and anything that is not an object leaves the defaults
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct PluginStates(BTreeMap<String, PluginState>);

impl Default for PluginStates {
    fn default() -> Self {
        let states = all_plugins()
            .iter()
            .map(|plugin| {
                let state = PluginState {
                    enabled: plugin.enabled_by_default(),
                    params: plugin.default_params(),
                };
                (plugin.id().to_string(), state)
            })
            .collect();
        PluginStates(states)
    }
}

impl From<Value> for PluginStates {
    fn from(stored: Value) -> Self {
        let mut states = PluginStates::default();
        match stored {
            Value::Object(map) => states.merge(&map),
            Value::Null => {}
            other => warn!("Ignoring plugin configuration that is not an object: {}", other),
        }
        states
    }
}

impl PluginStates {
    fn merge(&mut self, stored: &serde_json::Map<String, Value>) {
        for (plugin_id, saved) in stored {
            if !self.0.contains_key(plugin_id) {
                debug!("Ignoring configuration for unknown plugin '{}'", plugin_id);
                continue;
            }

            if let Some(enabled) = saved.get("enabled").and_then(Value::as_bool) {
                // Known id checked above
                let _ = self.set_enabled(plugin_id, enabled);
            }

            let Some(params) = saved.get("params").and_then(Value::as_object) else {
                continue;
            };
            for (key, value) in params {
                let Some(value) = value.as_f64() else {
                    warn!("Ignoring non-numeric value for {}.{}", plugin_id, key);
                    continue;
                };
                match self.set_param(plugin_id, key, value) {
                    Ok(()) => {}
                    Err(ConfigError::UnknownParam { .. }) => {
                        debug!("Ignoring unknown parameter {}.{}", plugin_id, key);
                    }
                    Err(e) => warn!("{}; keeping the default", e),
                }
            }
        }
    }

    /// State of one plugin
    pub fn get(&self, plugin_id: &str) -> Option<&PluginState> {
        self.0.get(plugin_id)
    }

    /// Iterate over `(plugin id, state)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PluginState)> {
        self.0.iter()
    }

    pub fn is_enabled(&self, plugin_id: &str) -> bool {
        self.0.get(plugin_id).is_some_and(|state| state.enabled)
    }

    /// Current value of a parameter
    pub fn param(&self, plugin_id: &str, key: &str) -> Option<f64> {
        self.0.get(plugin_id).and_then(|state| state.params.get(key).copied())
    }

    /// Turn a plugin on or off
    pub fn set_enabled(&mut self, plugin_id: &str, enabled: bool) -> Result<(), ConfigError> {
        let state = self
            .0
            .get_mut(plugin_id)
            .ok_or_else(|| ConfigError::UnknownPlugin(plugin_id.to_string()))?;
        state.enabled = enabled;
        Ok(())
    }

    /// Flip a plugin's enabled flag, returning the new value
    pub fn toggle(&mut self, plugin_id: &str) -> Result<bool, ConfigError> {
        let enabled = !self.is_enabled(plugin_id);
        self.set_enabled(plugin_id, enabled)?;
        Ok(enabled)
    }

    /// Set a parameter after checking it against the plugin's declaration.
    /// The previous value is kept when the new one is rejected.
    pub fn set_param(&mut self, plugin_id: &str, key: &str, value: f64) -> Result<(), ConfigError> {
        validate_param(plugin_id, key, value)?;
        let state = self
            .0
            .get_mut(plugin_id)
            .ok_or_else(|| ConfigError::UnknownPlugin(plugin_id.to_string()))?;
        state.params.insert(key.to_string(), value);
        Ok(())
    }

    /// Read-only snapshot handed to every plugin of a run
    pub fn context(&self) -> PipelineContext {
        let enabled: BTreeSet<String> = self
            .0
            .iter()
            .filter(|(_, state)| state.enabled)
            .map(|(id, _)| id.clone())
            .collect();
        let params = self
            .0
            .iter()
            .map(|(id, state)| (id.clone(), state.params.clone()))
            .collect();
        PipelineContext::new(enabled, params)
    }
}

fn validate_param(plugin_id: &str, key: &str, value: f64) -> Result<(), ConfigError> {
    let plugin = find_plugin(plugin_id)
        .ok_or_else(|| ConfigError::UnknownPlugin(plugin_id.to_string()))?;
    let param = plugin.param(key).ok_or_else(|| ConfigError::UnknownParam {
        plugin: plugin_id.to_string(),
        param: key.to_string(),
    })?;

    if !value.is_finite() {
        return Err(ConfigError::NotFinite {
            plugin: plugin_id.to_string(),
            param: key.to_string(),
        });
    }
    if param.accepts(value) {
        return Ok(());
    }

    match param.kind {
        ParamKind::Range { min, .. } => Err(ConfigError::OutOfRange {
            plugin: plugin_id.to_string(),
            param: key.to_string(),
            value,
            min: min.unwrap_or(f64::NEG_INFINITY),
        }),
        ParamKind::Options(_) => Err(ConfigError::NotAnOption {
            plugin: plugin_id.to_string(),
            param: key.to_string(),
            value,
        }),
    }
}

/// What one plugin did during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginOutcome {
    pub plugin_id: &'static str,
    /// Entries whose timing or text differs after the plugin ran
    pub changed: usize,
    /// Entries the plugin dropped
    pub removed: usize,
}

/// Human-readable account of one document's run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeReport {
    pub file_name: String,
    /// One line per plugin that changed or removed something
    pub summaries: Vec<String>,
    /// Encoding changes
    pub notes: Vec<String>,
    pub outcomes: Vec<PluginOutcome>,
}

impl ChangeReport {
    /// Whether there is anything to show
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty() && self.notes.is_empty()
    }

    /// Summaries followed by notes
    pub fn lines(&self) -> impl Iterator<Item = &String> {
        self.summaries.iter().chain(self.notes.iter())
    }
}

/// Ordered plugin chain bound to a configuration snapshot
pub struct Pipeline {
    plugins: Vec<Box<dyn SubtitlePlugin>>,
    context: PipelineContext,
}

impl Pipeline {
    /// Snapshot the configuration; later changes to `states` do not affect
    /// this pipeline
    pub fn new(states: &PluginStates) -> Self {
        Pipeline {
            plugins: all_plugins(),
            context: states.context(),
        }
    }

    pub fn context(&self) -> &PipelineContext {
        &self.context
    }

    /// Run every enabled plugin in order over a timeline
    pub fn run_entries(&self, mut entries: Vec<SubtitleEntry>) -> (Vec<SubtitleEntry>, Vec<PluginOutcome>) {
        let empty = ParamValues::new();
        let mut outcomes = Vec::new();

        for plugin in &self.plugins {
            if !self.context.is_enabled(plugin.id()) {
                continue;
            }
            let params = self.context.params_for(plugin.id()).unwrap_or(&empty);
            let before = entries.clone();
            entries = plugin.run(entries, params, &self.context);

            let removed = before.len().saturating_sub(entries.len());
            let changed = count_changes(&before, &entries);
            debug!(
                "{}: {} changed, {} removed",
                plugin.name(),
                changed,
                removed
            );
            outcomes.push(PluginOutcome {
                plugin_id: plugin.id(),
                changed,
                removed,
            });
        }

        (entries, outcomes)
    }

    /// Recompute a document's working timeline and encoding from its original
    pub fn process(&self, document: &mut SubtitleDocument) -> ChangeReport {
        let (entries, outcomes) = self.run_entries(document.fresh_entries());

        let mut summaries = Vec::new();
        for outcome in &outcomes {
            if outcome.removed > 0 {
                let plural = if outcome.removed > 1 { "s" } else { "" };
                summaries.push(format!("Removed {} ad subtitle{}", outcome.removed, plural));
            } else if outcome.changed > 0 {
                if let Some(plugin) = self.plugins.iter().find(|p| p.id() == outcome.plugin_id) {
                    summaries.push(plugin.summary(outcome.changed));
                }
            }
        }

        let (encoding, notes) = self.resolve_encoding(document.original_encoding());

        document.entries = entries;
        document.encoding = encoding;

        let report = ChangeReport {
            file_name: document.name.clone(),
            summaries,
            notes,
            outcomes,
        };
        for line in report.lines() {
            info!("{}: {}", report.file_name, line);
        }
        report
    }

    /// Process several documents with the same configuration snapshot
    pub fn process_all(&self, documents: &mut [SubtitleDocument]) -> Vec<ChangeReport> {
        documents.iter_mut().map(|document| self.process(document)).collect()
    }

    /// Working encoding after the retarget plugin and the Cyrillic override
    fn resolve_encoding(&self, original: TextEncoding) -> (TextEncoding, Vec<String>) {
        let mut encoding = original;
        let mut notes = Vec::new();

        if self.context.is_enabled(ENCODING) {
            let target = self.context.params_for(ENCODING).and_then(target_encoding);
            if let Some(target) = target.filter(|target| *target != encoding) {
                notes.push(format!("Encoding changed: {} \u{2192} {}", encoding, target));
                encoding = target;
            }
        }

        // Windows-1250 has no Cyrillic letters
        if self.context.is_enabled(CYRILLIZATION) && encoding == TextEncoding::Windows1250 {
            warn!("Cyrillization is enabled; writing Windows-1251 instead of Windows-1250");
            notes.push(format!(
                "Encoding override: {} \u{2192} {} (Cyrillic required)",
                encoding.display_name(),
                TextEncoding::Windows1251.display_name()
            ));
            encoding = TextEncoding::Windows1251;
        }

        (encoding, notes)
    }
}

/// Entries that differ between two timelines.
///
/// When the second timeline is shorter, entries were dropped somewhere, so
/// every shift of `after` against `before` up to the number of dropped
/// entries is tried and the smallest count wins.
fn count_changes(before: &[SubtitleEntry], after: &[SubtitleEntry]) -> usize {
    let removed = before.len().saturating_sub(after.len());
    (0..=removed)
        .map(|offset| {
            after
                .iter()
                .zip(&before[offset..])
                .filter(|(new, old)| new.differs_from(old))
                .count()
        })
        .min()
        .unwrap_or(0)
}
