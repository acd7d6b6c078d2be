/*!
 * Tests for configuration loading, defaults, and validation
 */

use anyhow::Result;
use aquarelle::app_config::{Config, LogLevel};
use crate::common;

#[test]
fn test_defaultConfig_shouldCarryReferenceDefaults() {
    let config = Config::default();
    assert_eq!(config.translation.batch_size, 35);
    assert_eq!(config.translation.overlap, 5);
    assert_eq!(config.translation.concurrent_requests, 4);
    assert_eq!(config.translation.retry_count, 3);
    assert_eq!(config.translation.retry_backoff_ms, 1000);
    assert_eq!(config.provider.model, "claude-sonnet-4-20250514");
    assert_eq!(config.provider.endpoint, "https://api.anthropic.com");
    assert_eq!(config.provider.timeout_secs, 120);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

#[test]
fn test_fromFile_withPartialConfig_shouldFillDefaults() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        dir.path(),
        "conf.json",
        r#"{"translation": {"batch_size": 20, "overlap": 3}, "log_level": "debug"}"#,
    )?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.translation.batch_size, 20);
    assert_eq!(config.translation.overlap, 3);
    assert_eq!(config.translation.concurrent_requests, 4);
    assert_eq!(config.log_level, LogLevel::Debug);
    Ok(())
}

#[test]
fn test_fromFile_withInvalidJson_shouldError() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(dir.path(), "conf.json", "{not json")?;
    assert!(Config::from_file(&path).is_err());
    Ok(())
}

#[test]
fn test_fromFileOrDefault_withMissingFile_shouldReturnDefaults() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let config = Config::from_file_or_default(dir.path().join("missing.json"))?;
    assert_eq!(config.translation.batch_size, 35);
    Ok(())
}

#[test]
fn test_validate_withOverlapEqualToBatchSize_shouldFail() {
    let mut config = Config::default();
    config.translation.batch_size = 5;
    config.translation.overlap = 5;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withZeroBatchSize_shouldFail() {
    let mut config = Config::default();
    config.translation.batch_size = 0;
    config.translation.overlap = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withUnparseableEndpoint_shouldFail() {
    let mut config = Config::default();
    config.provider.endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withMissingLexiconFile_shouldFail() {
    let mut config = Config::default();
    config.lexicon_path = Some("/definitely/not/here.json".into());
    assert!(config.validate().is_err());
}

#[test]
fn test_logLevel_fromStr_shouldParseKnownLevelsOnly() {
    assert_eq!("warn".parse::<LogLevel>().unwrap(), LogLevel::Warn);
    assert_eq!("TRACE".parse::<LogLevel>().unwrap(), LogLevel::Trace);
    assert!("verbose".parse::<LogLevel>().is_err());
}
