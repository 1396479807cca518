/*!
 * Common test utilities for the subkit test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use subkit::subtitle_processor::Segment;
use subkit::time_codec;

/// Route library logs to the test output; safe to call from every test
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Bilingual SRT with three cues
pub const BILINGUAL_SRT: &str = "1
00:00:01,000 --> 00:00:03,000
你好，世界
Xin chào thế giới

2
00:00:04,000 --> 00:00:06,500
我们走吧
Chúng ta đi thôi

3
00:00:07,000 --> 00:00:09,000
再见
";

/// Creates a sample subtitle file for testing
pub fn create_test_subtitle(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, BILINGUAL_SRT)
}

/// `n` bilingual segments, two seconds apart, 1.8 s each
pub fn sample_segments(n: usize) -> Vec<Segment> {
    (0..n)
        .map(|i| {
            let start = i as u64 * 2000;
            Segment::new(
                i + 1,
                time_codec::millis_to_time(start),
                time_codec::millis_to_time(start + 1800),
                Some(format!("第{}句", i + 1)),
                Some(format!("Câu {}", i + 1)),
            )
        })
        .collect()
}

/// `n` segments with source text only
pub fn untranslated_segments(n: usize) -> Vec<Segment> {
    sample_segments(n)
        .into_iter()
        .map(|mut s| {
            s.translated_text = None;
            s
        })
        .collect()
}
