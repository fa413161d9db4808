/*!
 * Tests for readability statistics over parsed and processed files
 */

use srtsmith::pipeline::{Pipeline, PluginStates};
use srtsmith::plugins::REMOVE_ADS;
use srtsmith::stats::{compute_sub_info, format_cps, format_duration};
use srtsmith::subtitle_processor::SubtitleDocument;

use crate::common::{generate_entries, SAMPLE_SRT, SERBIAN_SRT};

fn counts(thresholds: &[srtsmith::stats::ThresholdCount]) -> Vec<usize> {
    thresholds.iter().map(|t| t.count).collect()
}

#[test]
fn test_computeSubInfo_withSerbianFile_shouldFindExtremes() {
    let document = SubtitleDocument::load("a.srt", SERBIAN_SRT.as_bytes()).unwrap();
    let info = compute_sub_info(&document.entries);

    assert_eq!(info.entry_count, 3);
    assert_eq!(info.total_duration_ms, 7000);
    assert_eq!(info.max_cps.line, 2);
    assert_eq!(info.max_line_length.line, 2);
    assert_eq!(info.max_duration.line, 3);
    assert_eq!(info.max_duration.value, 2.95);
    assert_eq!(info.min_duration.line, 2);
    assert_eq!(info.min_duration.value, 1.0);
    assert_eq!(info.more_than_two_lines.value, 0.0);
    assert_eq!(counts(&info.cps_over), vec![2, 2, 1, 1, 1]);
    assert_eq!(counts(&info.shorter_than), vec![0, 0, 1, 2]);
}

#[test]
fn test_computeSubInfo_afterAdRemoval_shouldUseProcessedPositions() {
    let mut states = PluginStates::default();
    states.set_enabled(REMOVE_ADS, true).unwrap();
    let mut document = SubtitleDocument::load("a.srt", SERBIAN_SRT.as_bytes()).unwrap();
    Pipeline::new(&states).process(&mut document);

    let before = compute_sub_info(document.original_entries());
    let after = compute_sub_info(&document.entries);

    assert_eq!(before.entry_count, 3);
    assert_eq!(after.entry_count, 2);
    assert_eq!(before.max_cps.line, 2);
    assert_eq!(after.max_cps.line, 1);
    // The gap plugin trims the fast entry, so it reads even faster
    assert!(after.max_cps.value > before.max_cps.value);
    assert_eq!(after.total_duration_ms, 7000);
}

#[test]
fn test_subtitleInfo_display_shouldListEveryRow() {
    let document = SubtitleDocument::load("a.srt", SERBIAN_SRT.as_bytes()).unwrap();
    let rendered = compute_sub_info(&document.entries).to_string();

    assert!(rendered.contains("Entries: 3"));
    assert!(rendered.contains("Total duration: 00:00:07,000"));
    assert!(rendered.contains("Max duration: 2.95s (line 3)"));
    assert!(rendered.contains("Min duration: 1.00s (line 2)"));
    assert!(rendered.contains("> 2 lines: None"));
    assert!(rendered.contains("CPS > 15: 2"));
    assert!(rendered.contains("Duration < 2000ms: 2"));
}

#[test]
fn test_computeSubInfo_withCalmFile_shouldCountNothing() {
    let document = SubtitleDocument::load("a.srt", SAMPLE_SRT.as_bytes()).unwrap();
    let info = compute_sub_info(&document.entries);
    assert_eq!(counts(&info.cps_over), vec![0; 5]);
    assert_eq!(counts(&info.shorter_than), vec![0; 4]);
    // Entries 2 and 3 tie on duration; the first one wins
    assert_eq!(info.max_duration.line, 2);
    assert_eq!(info.min_duration.line, 1);
}

#[test]
fn test_computeSubInfo_withGeneratedTimeline_shouldKeepCountsConsistent() {
    let entries = generate_entries(60, 1500, 700);
    let info = compute_sub_info(&entries);

    assert_eq!(info.entry_count, 60);
    // Counts only grow as the thresholds loosen
    let over = counts(&info.cps_over);
    assert!(over.windows(2).all(|pair| pair[0] >= pair[1]));
    let under = counts(&info.shorter_than);
    assert!(under.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(under, vec![0, 60, 60, 60]);
    assert!(info.max_cps.line >= 1 && info.max_cps.line <= 60);
}

#[test]
fn test_formatters_shouldRoundForDisplay() {
    assert_eq!(format_cps(17.5), "18");
    assert_eq!(format_cps(0.0), "0");
    assert_eq!(format_duration(1.0), "1.00s");
}
