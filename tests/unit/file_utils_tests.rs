/*!
 * Tests for revision-aware naming and file system helpers
 */

use anyhow::Result;
use subkit::file_utils::{
    FileManager, generate_export_file_name, is_project_file_name, parse_file_name, strip_known_extension,
};

use crate::common;

/// Test that a numbered tag is read back and incremented
#[test]
fn test_parse_file_name_withNumberedTag_shouldIncrementOnExport() {
    let info = parse_file_name("[Edited3]movie.srt");
    assert_eq!(info.base_name, "movie");
    assert_eq!(info.edited_count, 3);

    assert_eq!(generate_export_file_name(&info.base_name, info.edited_count, "srt"), "[Edited4]movie.srt");
}

/// Test that an untagged name starts a revision chain at `[Edited]`
#[test]
fn test_export_chain_fromPlainName_shouldCountUp() {
    let mut name = "episode 01.srt".to_string();
    let mut seen = Vec::new();

    for _ in 0..3 {
        let info = parse_file_name(&name);
        name = generate_export_file_name(&info.base_name, info.edited_count, ".srt");
        seen.push(name.clone());
    }

    assert_eq!(
        seen,
        vec!["[Edited]episode 01.srt", "[Edited2]episode 01.srt", "[Edited3]episode 01.srt"]
    );
}

/// Test that zero-padded and embedded tags are not revision tags
#[test]
fn test_parse_file_name_withNonTags_shouldKeepBaseName() {
    let padded = parse_file_name("[Edited01]movie.srt");
    assert_eq!(padded.base_name, "[Edited01]movie");
    assert_eq!(padded.edited_count, 0);

    let embedded = parse_file_name("movie [Edited2].srt");
    assert_eq!(embedded.base_name, "movie [Edited2]");
    assert_eq!(embedded.edited_count, 0);
}

/// Test extension handling for SRT and project names
#[test]
fn test_extensions_shouldBeRecognisedCaseInsensitively() {
    assert_eq!(strip_known_extension("movie.SRT"), "movie");
    assert_eq!(strip_known_extension("movie.skt.json"), "movie");
    assert_eq!(strip_known_extension("movie.mkv"), "movie.mkv");
    assert!(is_project_file_name("[Edited]movie.skt.json"));
    assert!(!is_project_file_name("movie.srt"));
}

/// Test file existence checking with an existing file
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file_path = common::create_test_file(temp_dir.path(), "test.srt", "content")?;

    assert!(FileManager::file_exists(&file_path));
    assert!(!FileManager::file_exists(temp_dir.path().join("missing.srt")));
    Ok(())
}

/// Test that writing into a missing directory creates it
#[test]
fn test_write_to_file_withMissingParent_shouldCreateDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("out").join("nested").join("file.srt");

    FileManager::write_to_file(&target, "hello")?;

    assert_eq!(FileManager::read_to_string(&target)?, "hello");
    Ok(())
}
