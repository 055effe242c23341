/*!
 * Integration tests for file and folder runs through the controller
 */

use anyhow::Result;
use std::fs;
use std::sync::Arc;

use vttwai::app_controller::{Controller, FileOutcome, FolderSummary};
use vttwai::file_utils::FileManager;
use crate::common::{self, mock_translator::MockTranslator};

fn controller_with(translator: MockTranslator) -> (Controller, Arc<MockTranslator>) {
    common::init_logging();
    let translator = Arc::new(translator);
    let controller = Controller::with_translator(common::test_config(), translator.clone())
        .show_progress(false);
    (controller, translator)
}

#[tokio::test]
async fn test_run_file_shouldWritePrefixedSibling() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "aula.vtt", common::PORTUGUESE_SAMPLE)?;
    let (controller, _) = controller_with(MockTranslator::portuguese_to_spanish());

    let outcome = controller.run_file(&input, false).await?;

    let expected_path = temp_dir.path().join("translated_aula.vtt");
    assert_eq!(outcome, FileOutcome::Translated(expected_path.clone()));
    assert_eq!(FileManager::read_to_string(&expected_path)?, common::SPANISH_EXPECTED);
    Ok(())
}

#[tokio::test]
async fn test_run_file_withExistingOutput_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "aula.vtt", common::PORTUGUESE_SAMPLE)?;
    let existing = common::create_test_file(temp_dir.path(), "translated_aula.vtt", "old")?;
    let (controller, translator) = controller_with(MockTranslator::portuguese_to_spanish());

    let outcome = controller.run_file(&input, false).await?;
    assert_eq!(outcome, FileOutcome::Skipped(existing.clone()));
    assert_eq!(fs::read_to_string(&existing)?, "old");
    assert_eq!(translator.call_count(), 0);

    controller.run_file(&input, true).await?;
    assert_eq!(fs::read_to_string(&existing)?, common::SPANISH_EXPECTED);
    Ok(())
}

#[tokio::test]
async fn test_run_file_withMalformedTimestamp_shouldWriteNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "bad.vtt", "00:00:AB.000 --> 00:00:03.000\ntext")?;
    let (controller, translator) = controller_with(MockTranslator::working());

    assert!(controller.run_file(&input, false).await.is_err());
    assert!(!temp_dir.path().join("translated_bad.vtt").exists());
    assert_eq!(translator.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_run_file_withMissingInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (controller, _) = controller_with(MockTranslator::working());

    assert!(controller.run_file(&temp_dir.path().join("nope.vtt"), false).await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_run_folder_shouldCountProcessedSkippedAndFailed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_file(dir, "a.vtt", "um")?;
    common::create_test_file(dir, "b.vtt", "dois")?;
    common::create_test_file(dir, "c.vtt", "três")?;
    common::create_test_file(dir, "translated_c.vtt", "already done")?;
    common::create_test_file(dir, "readme.txt", "ignored")?;
    let (controller, translator) = controller_with(MockTranslator::failing_on("dois"));

    let summary = controller.run_folder(dir, false, false).await?;

    assert_eq!(summary, FolderSummary { processed: 1, skipped: 1, failed: 1 });
    assert_eq!(fs::read_to_string(dir.join("translated_a.vtt"))?, "00:00:00.000 --> 00:00:05.000\nES: um");
    assert!(!dir.join("translated_b.vtt").exists());
    // Earlier outputs are never fed back in as inputs
    assert!(!dir.join("translated_translated_c.vtt").exists());
    assert_eq!(translator.calls(), vec!["um", "dois"]);
    Ok(())
}

#[tokio::test]
async fn test_run_folder_withRecursive_shouldReachNestedFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_file(dir, "modulo1/aula.vtt", common::PORTUGUESE_SAMPLE)?;
    let (controller, _) = controller_with(MockTranslator::portuguese_to_spanish());

    let flat = controller.run_folder(dir, false, false).await?;
    assert_eq!(flat, FolderSummary::default());

    let recursive = controller.run_folder(dir, false, true).await?;
    assert_eq!(recursive.processed, 1);
    assert!(dir.join("modulo1/translated_aula.vtt").exists());
    Ok(())
}

#[tokio::test]
async fn test_run_folder_withMissingDirectory_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (controller, _) = controller_with(MockTranslator::working());

    assert!(controller.run_folder(&temp_dir.path().join("missing"), false, false).await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_run_file_withKeepHeader_shouldCopyHeaderVerbatim() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(
        temp_dir.path(),
        "aula.vtt",
        "WEBVTT\nKind: captions\n\n00:00:01.000 --> 00:00:03.500\nOlá mundo",
    )?;

    let mut config = common::test_config();
    config.subtitle.keep_header = true;
    let translator = Arc::new(MockTranslator::portuguese_to_spanish());
    let controller = Controller::with_translator(config, translator.clone()).show_progress(false);

    controller.run_file(&input, false).await?;

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("translated_aula.vtt"))?,
        "WEBVTT\nKind: captions\n\n00:00:01.000 --> 00:00:03.500\nHola mundo"
    );
    assert_eq!(translator.calls(), vec!["Olá mundo"]);
    Ok(())
}
