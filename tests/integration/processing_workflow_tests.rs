/*!
 * End-to-end processing of subtitle files and timeline-wide properties of
 * the plugin chain
 */

use anyhow::Result;
use srtsmith::encoding::{encode, TextEncoding};
use srtsmith::pipeline::{Pipeline, PluginStates};
use srtsmith::plugins::{all_plugins, CPS, CYRILLIZATION, GAP, MIN_DURATION, REMOVE_ADS};
use srtsmith::subtitle_processor::{SubtitleDocument, SubtitleEntry};

use crate::common::{entry, generate_entries, SERBIAN_SRT};

fn only(enabled: &[&str]) -> PluginStates {
    let mut states = PluginStates::default();
    for plugin in all_plugins() {
        states
            .set_enabled(plugin.id(), enabled.contains(&plugin.id()))
            .unwrap();
    }
    states
}

fn run(states: &PluginStates, entries: Vec<SubtitleEntry>) -> Vec<SubtitleEntry> {
    Pipeline::new(states).run_entries(entries).0
}

/// Timeline mixing calm entries with ones far too fast to read
fn crowded_timeline() -> Vec<SubtitleEntry> {
    let mut entries = generate_entries(40, 800, 300);
    entries.push(entry(41, 40_000, 40_000, "Zero length entry with text"));
    entries.push(entry(42, 40_050, 40_100, &"B".repeat(80)));
    entries
}

/// Test the full chain on a Latin code page file
#[test]
fn test_workflow_with1250File_shouldCleanConvertAndReencode() -> Result<()> {
    let mut states = PluginStates::default();
    states.set_enabled(REMOVE_ADS, true)?;
    states.set_enabled(CYRILLIZATION, true)?;
    let bytes = encode(SERBIAN_SRT, TextEncoding::Windows1250)?;

    let mut document = SubtitleDocument::load("movie.srt", &bytes)?;
    assert_eq!(document.original_encoding(), TextEncoding::Windows1250);
    let report = Pipeline::new(&states).process(&mut document);

    assert_eq!(document.encoding, TextEncoding::Windows1251);
    assert_eq!(report.summaries[0], "Removed 1 ad subtitle");
    assert!(report.summaries.contains(&"Transliterated to Cyrillic".to_string()));
    assert_eq!(
        report.notes,
        vec!["Encoding override: Windows-1250 \u{2192} Windows-1251 (Cyrillic required)"]
    );

    let reloaded = SubtitleDocument::load("movie.cyr.sr.srt", &document.to_bytes()?)?;
    assert_eq!(reloaded.original_encoding(), TextEncoding::Windows1251);
    assert_eq!(reloaded.entries.len(), 2);
    assert_eq!(reloaded.entries[0].seq_num, 1);
    assert_eq!(reloaded.entries[0].text(), "Здраво, како си данас, пријатељу мој драги?");
    assert_eq!(reloaded.entries[0].end_time_ms, 3925);
    assert_eq!(reloaded.entries[1].text(), "<i>Љубав је све што нам треба.</i>");
    Ok(())
}

/// Test that reprocessing with another configuration starts from the file
#[test]
fn test_workflow_withChangedConfig_shouldRecomputeFromOriginal() -> Result<()> {
    let mut document = SubtitleDocument::load("movie.srt", SERBIAN_SRT.as_bytes())?;

    Pipeline::new(&only(&[REMOVE_ADS, CYRILLIZATION])).process(&mut document);
    assert_eq!(document.entries.len(), 2);

    let report = Pipeline::new(&only(&[])).process(&mut document);
    assert!(report.is_empty());
    assert!(!document.has_changes());
    assert_eq!(document.to_srt(), document.original_srt());
    Ok(())
}

/// Test that CPS fixes never shorten an entry and stay clear of the next one
#[test]
fn test_cps_overCrowdedTimeline_shouldOnlyExtendWithinGap() {
    let before = crowded_timeline();
    let after = run(&only(&[CPS, GAP]), before.clone());

    assert_eq!(after.len(), before.len());
    for (i, (old, new)) in before.iter().zip(&after).enumerate() {
        assert_eq!(new.start_time_ms, old.start_time_ms);
        assert!(new.end_time_ms >= new.start_time_ms, "entry {} inverted", i + 1);
        if let Some(next) = before.get(i + 1) {
            let untouched = new.end_time_ms == old.end_time_ms;
            assert!(
                untouched || new.end_time_ms + 125 <= next.start_time_ms,
                "entry {} crowds the next one",
                i + 1
            );
        }
    }
}

/// Test that CPS alone never moves an end backwards
#[test]
fn test_cps_withoutGap_shouldNeverShrink() {
    let before = crowded_timeline();
    let after = run(&only(&[CPS, MIN_DURATION]), before.clone());
    for (old, new) in before.iter().zip(&after) {
        assert!(new.end_time_ms >= old.end_time_ms);
        assert_eq!(new.lines, old.lines);
    }
}

/// Test that gap trimming never inverts an entry
#[test]
fn test_gap_overCrowdedTimeline_shouldKeepEndAfterStart() {
    let mut before = crowded_timeline();
    // Overlapping entries
    for e in before.iter_mut().step_by(2) {
        e.end_time_ms += 900;
    }
    let after = run(&only(&[GAP]), before.clone());

    for (old, new) in before.iter().zip(&after) {
        assert!(new.end_time_ms <= old.end_time_ms);
        if new.end_time_ms != old.end_time_ms {
            assert!(new.end_time_ms > new.start_time_ms);
        }
    }
}

/// Test that ads are only dropped from the first and last position
#[test]
fn test_removeAds_withAdInTheMiddle_shouldKeepIt() {
    let entries = vec![
        entry(1, 0, 1000, "Hello"),
        entry(2, 2000, 3000, "www.titlovi.com"),
        entry(3, 4000, 5000, "World"),
    ];
    let after = run(&only(&[REMOVE_ADS]), entries.clone());
    assert_eq!(after, entries);
}

/// Test that converting an already converted timeline changes nothing
#[test]
fn test_cyrillization_appliedTwice_shouldBeIdempotent() {
    let states = only(&[CYRILLIZATION]);
    let entries = vec![
        entry(1, 0, 2000, "<i>Njegova džungla</i> je lepa"),
        entry(2, 3000, 5000, "Gledaj YouTube u 21h, poglavlje IV"),
        entry(3, 6000, 8000, "Nadživeti konjugaciju"),
    ];

    let once = run(&states, entries);
    let twice = run(&states, once.clone());

    assert_eq!(once, twice);
    assert_eq!(once[0].text(), "<i>Његова џунгла</i> је лепа");
    assert!(once[1].text().contains("YouTube"));
    assert!(once[1].text().contains("IV"));
    assert_eq!(once[2].text(), "Надживети конјугацију");
}

/// Test the reading speed and gap examples together
#[test]
fn test_defaultChain_withReadmeExamples_shouldMatchExpectedTimes() {
    let entries = vec![
        entry(1, 0, 1000, &"A".repeat(42)),
        entry(2, 3000, 4950, "Short"),
        entry(3, 5000, 7000, "End"),
    ];
    let after = run(&PluginStates::default(), entries);
    assert_eq!(after[0].end_time_ms, 1680);
    assert_eq!(after[1].end_time_ms, 4875);
    assert_eq!(after[2].end_time_ms, 7000);
}
