/*!
 * End-to-end subtitle workflows on disk: load, analyze, split, export, reload
 */

use anyhow::Result;
use subkit::analysis::{Analyzer, Severity};
use subkit::file_utils::{FileManager, generate_export_file_name, parse_file_name};
use subkit::preset::StylePreset;
use subkit::providers::StyleAnalyzer;
use subkit::providers::mock::MockProvider;
use subkit::project::{generate_project, parse_project};
use subkit::session::ProjectHistory;
use subkit::split::{SplitStrategy, split};
use subkit::subtitle_processor::{SubtitleCollection, TextField, update_text};

use crate::common;

/// Test the load, analyze and split workflow with files written to disk
#[test]
fn test_load_analyze_split_shouldWriteReloadableFiles() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let srt = subkit::generate_srt(&common::sample_segments(25), TextField::Translated, None);
    let input = common::create_test_file(temp_dir.path(), "drama.srt", &srt)?;

    let collection = SubtitleCollection::load(&input)?;
    assert_eq!(collection.segments.len(), 25);

    let analysis = Analyzer::new().analyze(&collection.segments);
    assert_eq!(analysis.result.total_lines, 25);
    assert_eq!(analysis.result.cps_groups.safe, 25);
    assert!(analysis.segments.iter().all(|a| a.metrics.severity == Severity::Safe));

    let results = split(&collection.segments, &collection.source_name, &SplitStrategy::ByCount(10), true)?;
    let out_dir = temp_dir.path().join("parts");
    for result in &results {
        FileManager::write_to_file(out_dir.join(&result.file_name), &result.to_srt(TextField::Translated))?;
    }

    let reloaded = SubtitleCollection::load(out_dir.join("[split 21-25] drama.srt"))?;
    assert_eq!(reloaded.segments.len(), 5);
    assert_eq!(reloaded.segments[0].start_time, collection.segments[20].start_time);
    assert_eq!(reloaded.segments[4].translated_text.as_deref(), Some("Câu 25"));
    Ok(())
}

/// Test that a project keeps both tracks and the preset across a save
#[test]
fn test_project_export_thenLoad_shouldRestoreSession() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "show.srt")?;
    let collection = SubtitleCollection::load(&input)?;

    let edited = update_text(&collection.segments, 3, TextField::Translated, "Tạm biệt");
    let preset: StylePreset = tokio_test::block_on(async {
        MockProvider::working().analyze_style("A quiet family drama").await
    })?;

    let json = generate_project(&edited, &collection.file_info.base_name, Some(&preset), None)?;
    let project_name = generate_export_file_name(&collection.file_info.base_name, 0, "skt.json");
    let project_path = common::create_test_file(temp_dir.path(), &project_name, &json)?;
    assert_eq!(project_name, "[Edited]show.skt.json");

    let restored = SubtitleCollection::load(&project_path)?;
    assert_eq!(restored.file_info.base_name, "show");
    assert_eq!(restored.file_info.edited_count, 1);
    assert_eq!(restored.preset, Some(preset));
    assert_eq!(restored.segments.len(), 3);
    assert_eq!(restored.segments[0].original_text.as_deref(), Some("你好，世界"));
    assert_eq!(restored.segments[2].translated_text.as_deref(), Some("Tạm biệt"));
    Ok(())
}

/// Test that re-saving a project keeps its creation time
#[test]
fn test_project_resave_shouldKeepCreatedAt() -> Result<()> {
    let segments = common::sample_segments(2);
    let first = parse_project(&generate_project(&segments, "ep", None, None)?)?;
    let second = parse_project(&generate_project(&first.segments, "ep", None, Some(&first.created_at))?)?;

    assert_eq!(second.created_at, first.created_at);
    assert_eq!(second.title, "ep");
    Ok(())
}

/// Test that exporting a loaded project again keeps its creation time
#[test]
fn test_project_loadThenExport_shouldKeepCreatedAt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let created_at = "2024-01-02T03:04:05.000Z";
    let json = generate_project(&common::sample_segments(3), "ep", None, Some(created_at))?;
    let path = common::create_test_file(temp_dir.path(), "[Edited]ep.skt.json", &json)?;

    let collection = SubtitleCollection::load(&path)?;
    assert_eq!(collection.created_at.as_deref(), Some(created_at));

    let exported = parse_project(&collection.to_project_json()?)?;
    assert_eq!(exported.created_at, created_at);
    assert_ne!(exported.updated_at, created_at);
    assert_eq!(exported.title, "ep");
    assert_eq!(exported.segments, parse_project(&json)?.segments);
    Ok(())
}

/// Test that an SRT export to a project starts a fresh creation time
#[test]
fn test_srt_exportToProject_shouldStampCreatedAt() -> Result<()> {
    let collection = SubtitleCollection::from_srt_str("show.srt", common::BILINGUAL_SRT)?;
    assert!(collection.created_at.is_none());

    let exported = parse_project(&collection.to_project_json()?)?;
    assert!(!exported.created_at.is_empty());
    assert_eq!(exported.title, "show");
    Ok(())
}

/// Test repeated exports through the file system
#[test]
fn test_export_revisions_shouldChainThroughFileNames() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut path = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;

    for expected in ["[Edited]movie.srt", "[Edited2]movie.srt", "[Edited3]movie.srt"] {
        let collection = SubtitleCollection::load(&path)?;
        let info = parse_file_name(&collection.source_name);
        let next = generate_export_file_name(&info.base_name, info.edited_count, "srt");
        assert_eq!(next, expected);

        path = temp_dir.path().join(&next);
        collection.write_to_srt(&path, TextField::Original)?;
    }

    assert_eq!(SubtitleCollection::load(&path)?.file_info.edited_count, 3);
    Ok(())
}

/// Test that the project history survives serialization
#[test]
fn test_history_withProjects_shouldPersistNewestFirst() -> Result<()> {
    let mut history = ProjectHistory::with_capacity(2);
    history.record("one", &common::sample_segments(1));
    history.record("two", &common::sample_segments(2));
    history.record("three", &common::sample_segments(3));

    let restored = ProjectHistory::from_json(&history.to_json()?, 2)?;
    let names: Vec<&str> = restored.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["three", "two"]);
    assert_eq!(restored.entries()[0].segments.len(), 3);
    Ok(())
}
