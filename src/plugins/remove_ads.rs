//! Drops known advertisement entries from the start and end of a file.

use log::debug;

use super::{ParamValues, PipelineContext, REMOVE_ADS, SubtitlePlugin};
use crate::subtitle_processor::{SubtitleEntry, renumber};

/// Entry texts known to be advertisements
pub const KNOWN_ADS: &[&str] = &[
    "Preuzeto sa www.titlovi.com",
    "www.titlovi.com",
];

fn is_ad(entry: &SubtitleEntry) -> bool {
    let text = entry.lines.join(" ");
    let text = text.trim();
    KNOWN_ADS.iter().any(|ad| *ad == text)
}

pub struct RemoveAdsPlugin;

impl SubtitlePlugin for RemoveAdsPlugin {
    fn id(&self) -> &'static str {
        REMOVE_ADS
    }

    fn name(&self) -> &'static str {
        "Remove Ads"
    }

    fn description(&self) -> &'static str {
        "Removes known advertisement subtitles (e.g. titlovi.com) from the first and last position in the file."
    }

    fn run(
        &self,
        mut entries: Vec<SubtitleEntry>,
        _params: &ParamValues,
        _context: &PipelineContext,
    ) -> Vec<SubtitleEntry> {
        let original_len = entries.len();

        if entries.last().is_some_and(is_ad) {
            entries.pop();
        }
        if entries.first().is_some_and(is_ad) {
            entries.remove(0);
        }

        if entries.len() != original_len {
            debug!("Removed {} advertisement entries", original_len - entries.len());
            renumber(&mut entries);
        }
        entries
    }
}
