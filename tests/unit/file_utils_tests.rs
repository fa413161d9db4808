/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::fs;
use std::path::Path;
use srtsmith::file_utils::{FileManager, CYRILLIC_SUFFIX};

use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", b"test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::dir_exists(&test_file));
    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that dir_exists returns false for non-existent directories
#[test]
fn test_dir_exists_withNonExistentDir_shouldReturnFalse() {
    assert!(!FileManager::dir_exists("./non_existent_directory_12345"));
}

/// Test that ensure_dir creates nested directories
#[test]
fn test_ensure_dir_withNonExistentDir_shouldCreateDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a").join("b");

    FileManager::ensure_dir(&nested)?;

    assert!(FileManager::dir_exists(&nested));
    Ok(())
}

/// Test output names with and without the Cyrillic suffix
#[test]
fn test_output_file_name_withSuffix_shouldReplaceExtension() {
    assert_eq!(FileManager::output_file_name("movie.srt", None), "movie.srt");
    assert_eq!(
        FileManager::output_file_name("movie.srt", Some(CYRILLIC_SUFFIX)),
        "movie.cyr.sr.srt"
    );
    assert_eq!(
        FileManager::output_file_name("MOVIE.SRT", Some(CYRILLIC_SUFFIX)),
        "MOVIE.cyr.sr.srt"
    );
    assert_eq!(
        FileManager::output_file_name("notes", Some(CYRILLIC_SUFFIX)),
        "notes.cyr.sr.srt"
    );
    assert_eq!(
        FileManager::output_file_name("Čuvar.srt", Some(CYRILLIC_SUFFIX)),
        "Čuvar.cyr.sr.srt"
    );
}

/// Test that generate_output_path honours the output directory
#[test]
fn test_generate_output_path_withValidInputs_shouldCreateCorrectPath() {
    let input_file = Path::new("/tmp/input/video.srt");

    let next_to_input = FileManager::generate_output_path(input_file, None, Some(CYRILLIC_SUFFIX));
    assert_eq!(next_to_input, Path::new("/tmp/input/video.cyr.sr.srt"));

    let elsewhere = FileManager::generate_output_path(input_file, Some(Path::new("/tmp/output")), None);
    assert_eq!(elsewhere, Path::new("/tmp/output/video.srt"));
}

/// Test that subtitle discovery is recursive, sorted and skips Cyrillic outputs
#[test]
fn test_find_srt_files_withMixedDirectory_shouldListInputsOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    fs::create_dir(root.join("season1"))?;
    common::create_test_file(root, "b.srt", b"")?;
    common::create_test_file(root, "a.SRT", b"")?;
    common::create_test_file(root, "a.cyr.sr.srt", b"")?;
    common::create_test_file(root, "notes.txt", b"")?;
    common::create_test_file(&root.join("season1"), "e01.srt", b"")?;

    let files = FileManager::find_srt_files(root)?;

    let names: Vec<String> = files
        .iter()
        .map(|path| path.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(names, vec!["a.SRT", "b.srt", "season1/e01.srt"]);
    Ok(())
}

/// Test that write_bytes creates missing parents and read_bytes reads back
#[test]
fn test_write_bytes_withMissingParent_shouldCreateAndRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("out").join("file.srt");
    let content = [0xC8u8, 0xE0, 0x0A];

    FileManager::write_bytes(&path, &content)?;
    let read_back = tokio_test::block_on(FileManager::read_bytes(&path))?;

    assert_eq!(read_back, content);
    Ok(())
}

/// Test that read_to_string and write_to_file agree
#[test]
fn test_write_to_file_withValidInput_shouldCreateFileWithContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = temp_dir.path().join("test_write_file.tmp");
    let content = "Test write content";

    FileManager::write_to_file(&test_file, content)?;

    assert_eq!(FileManager::read_to_string(&test_file)?, content);
    Ok(())
}

/// Test that reading a missing file fails
#[test]
fn test_read_bytes_withMissingFile_shouldFail() {
    let result = tokio_test::block_on(FileManager::read_bytes("missing_12345.srt"));
    assert!(result.is_err());
}
