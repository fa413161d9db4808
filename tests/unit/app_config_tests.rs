/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use srtsmith::app_config::{Config, LogLevel, ParamOverride};
use srtsmith::errors::ConfigError;
use srtsmith::file_utils::CYRILLIC_SUFFIX;
use srtsmith::plugins::{CPS, CYRILLIZATION, GAP, LONG_LINES};

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.plugins.is_enabled(CPS));
    assert!(config.plugins.is_enabled(GAP));
    assert!(!config.plugins.is_enabled(CYRILLIZATION));
    assert_eq!(config.output.suffix_when_cyrillic, CYRILLIC_SUFFIX);
    assert!(config.output.only_changed);
    assert!(config.validate().is_ok());
}

/// Test that a missing file is created with the defaults
#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("srtsmith.json");

    let config = Config::load_or_create(&path)?;

    assert_eq!(config, Config::default());
    assert!(path.exists());
    assert_eq!(Config::load(&path)?, config);
    Ok(())
}

/// Test saving and loading a modified configuration
#[test]
fn test_save_thenLoad_shouldKeepChanges() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("custom.json");

    let mut config = Config::default();
    config.log_level = LogLevel::Debug;
    config.plugins.set_enabled(CYRILLIZATION, true)?;
    config.plugins.set_param(LONG_LINES, "maxLength", 38.0)?;
    config.output.only_changed = false;
    config.save(&path)?;

    assert_eq!(Config::load(&path)?, config);
    Ok(())
}

/// Test that a hand-written partial file is merged onto the defaults
#[test]
fn test_load_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "partial.json",
        br#"{ "plugins": { "cps": { "enabled": true, "params": { "maxCps": 0 } } } }"#,
    )?;

    let config = Config::load(&path)?;

    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.plugins.param(CPS, "maxCps"), Some(25.0));
    assert!(config.plugins.is_enabled(GAP));
    assert!(config.output.only_changed);
    Ok(())
}

/// Test that a file that is not JSON is reported
#[test]
fn test_load_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "broken.json", b"{ not json")?;
    assert!(Config::load(&path).is_err());
    Ok(())
}

/// Test parsing of `--param` values
#[test]
fn test_paramOverride_parse_shouldSplitPluginKeyAndValue() {
    let parsed: ParamOverride = "cps.maxCps=20".parse().unwrap();
    assert_eq!(
        parsed,
        ParamOverride {
            plugin: "cps".to_string(),
            key: "maxCps".to_string(),
            value: 20.0,
        }
    );

    assert!("cps.maxCps".parse::<ParamOverride>().is_err());
    assert!("maxCps=20".parse::<ParamOverride>().is_err());
    assert!("cps.maxCps=fast".parse::<ParamOverride>().is_err());
}

/// Test command line overrides, disables winning over enables
#[test]
fn test_applyOverrides_withEnableDisableAndParams_shouldUpdatePlugins() -> Result<()> {
    let mut config = Config::default();
    let enable = vec![CYRILLIZATION.to_string(), LONG_LINES.to_string()];
    let disable = vec![LONG_LINES.to_string()];
    let params = vec!["gap.minGap=80".parse::<ParamOverride>()?];

    config.apply_overrides(&enable, &disable, &params)?;

    assert!(config.plugins.is_enabled(CYRILLIZATION));
    assert!(!config.plugins.is_enabled(LONG_LINES));
    assert_eq!(config.plugins.param(GAP, "minGap"), Some(80.0));
    assert_eq!(config.cyrillic_suffix(), Some(CYRILLIC_SUFFIX));
    Ok(())
}

/// Test that invalid overrides are rejected with a typed error
#[test]
fn test_applyOverrides_withInvalidValues_shouldFail() {
    let mut config = Config::default();

    let unknown = config.apply_overrides(&["subtitleMagic".to_string()], &[], &[]);
    assert_eq!(unknown, Err(ConfigError::UnknownPlugin("subtitleMagic".to_string())));

    let negative = "gap.minGap=-1".parse::<ParamOverride>().unwrap();
    let out_of_range = config.apply_overrides(&[], &[], &[negative]);
    assert!(matches!(out_of_range, Err(ConfigError::OutOfRange { .. })));
    assert_eq!(config.plugins.param(GAP, "minGap"), Some(125.0));
}

/// Test configuration validation
#[test]
fn test_config_validation_withBadSuffix_shouldFail() {
    let mut config = Config::default();
    config.output.suffix_when_cyrillic = ".cyr.txt".to_string();
    assert!(config.validate().is_err());

    config.output.suffix_when_cyrillic = ".sr-Cyrl.SRT".to_string();
    assert!(config.validate().is_ok());
    assert_eq!(config.cyrillic_suffix(), None);
}
