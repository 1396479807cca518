/*!
 * Tests for configuration loading and saving
 */

use anyhow::Result;
use subkit::app_config::{Config, ConfigRepository, JsonFileConfigRepository, LogLevel};
use subkit::errors::ConfigError;

use crate::common;

/// Test that a missing file yields the default configuration
#[test]
fn test_load_withMissingFile_shouldReturnDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let repo = JsonFileConfigRepository::new(temp_dir.path().join("conf.json"));

    assert!(!repo.exists());
    assert_eq!(repo.load()?, Config::default());
    Ok(())
}

/// Test that saved settings survive a reload
#[test]
fn test_save_thenLoad_shouldRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let repo = JsonFileConfigRepository::new(temp_dir.path().join("nested").join("conf.json"));

    let mut config = Config::default();
    config.analysis.safe_max = 18.0;
    config.analysis.warning_max = 30.0;
    config.split.count_per_file = 50;
    config.log_level = LogLevel::Debug;
    repo.save(&config)?;

    assert!(repo.exists());
    let loaded = repo.load()?;
    assert_eq!(loaded, config);
    assert!(loaded.validate().is_ok());
    Ok(())
}

/// Test that broken JSON is reported as a parse error
#[test]
fn test_load_withInvalidJson_shouldFailWithParseError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    let result = JsonFileConfigRepository::new(path).load();
    assert!(matches!(result, Err(ConfigError::Parse(_))));
    Ok(())
}

/// Test that a partial file keeps defaults for everything it omits
#[test]
fn test_load_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{"split": {"duration_minutes": 5}, "auto_fix_on_upload": true}"#,
    )?;

    let config = JsonFileConfigRepository::new(path).load()?;
    assert_eq!(config.split.duration_minutes, 5.0);
    assert_eq!(config.split.count_per_file, 200);
    assert!(config.split.include_metadata);
    assert!(config.auto_fix_on_upload);
    assert_eq!(config.analysis.safe_max, 25.0);
    Ok(())
}
