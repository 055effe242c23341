/*!
 * Tests for configuration loading, defaults and validation
 */

use anyhow::Result;
use std::time::Duration;
use vttwai::app_config::{Config, LogLevel, SubtitleConfig, TranslationProvider};
use crate::common;

#[test]
fn test_default_config_shouldTranslatePortugueseToSpanishWithOllama() {
    let config = Config::default();
    assert_eq!(config.source_language, "pt");
    assert_eq!(config.target_language, "es");
    assert_eq!(config.translation.provider, TranslationProvider::Ollama);
    assert_eq!(config.translation.get_model(), "llama3");
    assert_eq!(config.translation.common.concurrent_requests, 1);
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_default_subtitle_config_shouldMatchOriginalFileNaming() {
    let subtitle = SubtitleConfig::default();
    assert_eq!(subtitle.synthetic_cue_duration(), Duration::from_secs(5));
    assert_eq!(subtitle.extensions, vec!["vtt".to_string()]);
    assert_eq!(subtitle.output_prefix, "translated_");
    assert!(!subtitle.keep_header);
}

#[test]
fn test_config_save_thenLoad_shouldKeepValues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.target_language = "fr".to_string();
    config.subtitle.synthetic_cue_duration_ms = 3_000;
    config.translation.provider_config_mut(TranslationProvider::Ollama).model = "llama3:8b".to_string();
    config.save(&path)?;

    let loaded = Config::from_file(&path)?;
    assert_eq!(loaded.target_language, "fr");
    assert_eq!(loaded.subtitle.synthetic_cue_duration_ms, 3_000);
    assert_eq!(loaded.translation.get_model(), "llama3:8b");
    Ok(())
}

#[test]
fn test_config_from_file_withoutSubtitleSection_shouldUseDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let json = r#"{
        "source_language": "pt",
        "target_language": "es",
        "translation": {
            "provider": "ollama",
            "available_providers": [
                { "type": "ollama", "model": "llama3", "endpoint": "http://localhost:11434" }
            ],
            "common": {}
        }
    }"#;
    let path = common::create_test_file(temp_dir.path(), "conf.json", json)?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.subtitle.output_prefix, "translated_");
    assert_eq!(config.translation.common.retry_count, 3);
    config.validate()?;
    Ok(())
}

#[test]
fn test_config_from_file_withBrokenJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;
    assert!(Config::from_file(&path).is_err());
    Ok(())
}

#[test]
fn test_validate_withUnknownLanguage_shouldFail() {
    let mut config = Config::default();
    config.target_language = "xx".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withZeroConcurrency_shouldFail() {
    let mut config = Config::default();
    config.translation.common.concurrent_requests = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withZeroSyntheticDuration_shouldFail() {
    let mut config = Config::default();
    config.subtitle.synthetic_cue_duration_ms = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withEmptyPrefix_shouldFail() {
    let mut config = Config::default();
    config.subtitle.output_prefix.clear();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withNoExtensions_shouldFail() {
    let mut config = Config::default();
    config.subtitle.extensions = vec![".".to_string()];
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withHostedProviderAndConfiguredKey_shouldPass() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Anthropic;
    config.translation.provider_config_mut(TranslationProvider::Anthropic).api_key = "sk-test".to_string();
    assert!(config.validate().is_ok());
    assert_eq!(config.translation.get_api_key(), "sk-test");
}

#[test]
fn test_provider_display_shouldRoundTripThroughFromStr() -> Result<()> {
    for provider in TranslationProvider::ALL {
        assert_eq!(provider.to_string().parse::<TranslationProvider>()?, provider);
    }
    Ok(())
}

#[test]
fn test_get_rate_limit_withoutProviderEntry_shouldUseProviderDefault() {
    let mut config = Config::default();
    config.translation.available_providers.clear();
    config.translation.provider = TranslationProvider::Anthropic;
    assert_eq!(config.translation.get_rate_limit(), Some(45));
    assert_eq!(config.translation.get_endpoint(), "https://api.anthropic.com");
}
