/*!
 * Tests for SRT parsing, serialization and the document model
 */

use srtsmith::encoding::TextEncoding;
use srtsmith::errors::SubtitleError;
use srtsmith::subtitle_processor::{parse_srt_string, serialize_srt, SubtitleDocument, SubtitleEntry, MAX_TIMESTAMP_MS};
use crate::common;

/// Test timestamp parsing and formatting
#[test]
fn test_timestamp_parsing_withValidTimestamp_shouldParseAndFormat() {
    let ts = "01:23:45,678";
    let ms = SubtitleEntry::parse_timestamp(ts).unwrap();
    assert_eq!(ms, 5025678);

    let formatted = SubtitleEntry::format_timestamp(ms);
    assert_eq!(formatted, ts);
}

#[test]
fn test_timestamp_parsing_withWrongShape_shouldFail() {
    for bad in ["1:23:45,678", "01:23:45.678", "01:23:45,67", "01-23-45,678", "", "aa:bb:cc,ddd"] {
        assert!(
            matches!(SubtitleEntry::parse_timestamp(bad), Err(SubtitleError::InvalidTimestamp(_))),
            "{bad} should be rejected"
        );
    }
}

#[test]
fn test_timestamp_formatting_withAnyMillis_shouldRoundTrip() {
    for ms in [0, 1, 999, 1000, 59_999, 3_600_000, 86_399_999, 123_456_789] {
        let formatted = SubtitleEntry::format_timestamp(ms);
        assert_eq!(SubtitleEntry::parse_timestamp(&formatted).unwrap(), ms);
    }
}

#[test]
fn test_timestamp_formatting_withHundredHoursOrMore_shouldClampToLargestTimestamp() {
    assert_eq!(SubtitleEntry::format_timestamp(MAX_TIMESTAMP_MS), "99:59:59,999");
    assert_eq!(SubtitleEntry::format_timestamp(MAX_TIMESTAMP_MS + 1), "99:59:59,999");
    assert_eq!(SubtitleEntry::format_timestamp(u64::MAX), "99:59:59,999");

    let formatted = SubtitleEntry::format_timestamp(MAX_TIMESTAMP_MS);
    assert_eq!(SubtitleEntry::parse_timestamp(&formatted).unwrap(), MAX_TIMESTAMP_MS);
}

/// Test subtitle entry display formatting
#[test]
fn test_subtitle_entry_display_withValidEntry_shouldFormatCorrectly() {
    let entry = common::entry(1, 5000, 10000, "Test subtitle\nSecond line");
    assert_eq!(
        entry.to_string(),
        "1\n00:00:05,000 --> 00:00:10,000\nTest subtitle\nSecond line"
    );
}

#[test]
fn test_parse_withSampleFile_shouldReadAllEntries() {
    let parsed = parse_srt_string(common::SAMPLE_SRT);
    assert!(parsed.diagnostics.is_empty());
    assert_eq!(parsed.entries.len(), 3);
    assert_eq!(parsed.entries[1].seq_num, 2);
    assert_eq!(parsed.entries[1].start_time_ms, 5000);
    assert_eq!(parsed.entries[1].end_time_ms, 9000);
    assert_eq!(parsed.entries[1].lines, vec!["It contains multiple entries."]);
}

#[test]
fn test_parse_withCrlfAndBom_shouldNormalize() {
    let content = "\u{feff}1\r\n00:00:01,000 --> 00:00:02,000\r\nHello\r\nWorld\r\n\r\n2\r\n00:00:03,000 --> 00:00:04,000\r\nBye\r\n";
    let parsed = parse_srt_string(content);
    assert_eq!(parsed.entries.len(), 2);
    assert_eq!(parsed.entries[0].lines, vec!["Hello", "World"]);
}

#[test]
fn test_parse_withMalformedBlocks_shouldSkipOnlyThoseBlocks() {
    let content = "1
00:00:01,000 --> 00:00:02,000
Good one

x
00:00:03,000 --> 00:00:04,000
Bad ordinal

3
00:00:05,000 -> 00:00:06,000
Bad arrow

4
00:00:07,000 --> 00:00:08
Bad timestamp

5
00:00:09,000
Too short

6
00:00:11,000 --> 00:00:12,000
Good two
";
    let parsed = parse_srt_string(content);
    let texts: Vec<String> = parsed.entries.iter().map(|e| e.text()).collect();
    assert_eq!(texts, vec!["Good one", "Good two"]);
    assert_eq!(parsed.diagnostics.len(), 4);
    assert!(matches!(
        parsed.diagnostics[0],
        SubtitleError::MalformedBlock { block_number: 2, line_number: 5, .. }
    ));
}

#[test]
fn test_parse_withEndBeforeStart_shouldSkipBlock() {
    let parsed = parse_srt_string("1\n00:00:05,000 --> 00:00:01,000\nBackwards\n");
    assert!(parsed.entries.is_empty());
    assert_eq!(parsed.diagnostics.len(), 1);
}

#[test]
fn test_parse_withEmptyInput_shouldReturnNothing() {
    let parsed = parse_srt_string("");
    assert!(parsed.entries.is_empty());
    assert!(parsed.diagnostics.is_empty());
}

#[test]
fn test_serialize_withOddOrdinals_shouldRenumberFromOne() {
    let entries = vec![
        common::entry(7, 1000, 2000, "First"),
        common::entry(42, 3000, 4000, "Second\nline"),
    ];
    assert_eq!(
        serialize_srt(&entries),
        "1\n00:00:01,000 --> 00:00:02,000\nFirst\n\n2\n00:00:03,000 --> 00:00:04,000\nSecond\nline\n"
    );
}

#[test]
fn test_parse_serialize_withSampleFile_shouldBeStable() {
    let first = parse_srt_string(common::SAMPLE_SRT).entries;
    let second = parse_srt_string(&serialize_srt(&first)).entries;
    assert_eq!(first, second);
    assert_eq!(serialize_srt(&first), common::SAMPLE_SRT);
}

#[test]
fn test_document_load_withUtf8Bytes_shouldDetectAndParse() {
    let document = SubtitleDocument::load("test.srt", common::SAMPLE_SRT.as_bytes()).unwrap();
    assert_eq!(document.name, "test.srt");
    assert_eq!(document.encoding, TextEncoding::Utf8);
    assert_eq!(document.original_encoding(), TextEncoding::Utf8);
    assert_eq!(document.entries.len(), 3);
    assert!(!document.has_changes());
}

#[test]
fn test_document_reset_afterEdit_shouldRestoreOriginal() {
    let mut document = SubtitleDocument::load("test.srt", common::SAMPLE_SRT.as_bytes()).unwrap();
    document.entries[0].end_time_ms += 500;
    document.encoding = TextEncoding::Windows1251;
    assert!(document.has_changes());

    document.reset();
    assert!(!document.has_changes());
    assert_eq!(document.encoding, TextEncoding::Utf8);
}

#[test]
fn test_document_toBytes_withCodePageEncoding_shouldEncodeText() {
    let entries = vec![common::entry(1, 0, 1000, "Здраво како си данас пријатељу")];
    let mut document = SubtitleDocument::from_entries("a.srt", entries, TextEncoding::Utf8);
    document.encoding = TextEncoding::Windows1251;

    let bytes = document.to_bytes().unwrap();
    let reloaded = SubtitleDocument::load("a.srt", &bytes).unwrap();
    assert_eq!(reloaded.original_encoding(), TextEncoding::Windows1251);
    assert_eq!(reloaded.entries[0].lines, vec!["Здраво како си данас пријатељу"]);
}
