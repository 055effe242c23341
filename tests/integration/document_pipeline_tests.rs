/*!
 * Integration tests for whole-document translation
 */

use std::time::Duration;

use vttwai::errors::SubtitleError;
use vttwai::reassembler::Reassembler;
use vttwai::translation::{translate_document, DocumentTranslator};
use crate::common::{self, mock_translator::MockTranslator};

#[test]
fn test_translate_document_withPortugueseSample_shouldProduceSpanishDocument() {
    common::init_logging();
    let translator = MockTranslator::portuguese_to_spanish();

    let output = tokio_test::block_on(translate_document(common::PORTUGUESE_SAMPLE, &translator)).unwrap();

    assert_eq!(output, common::SPANISH_EXPECTED);
    assert_eq!(translator.calls(), vec!["Olá mundo", "Como você está"]);
}

#[tokio::test]
async fn test_translate_document_withTimedCues_shouldKeepTimingLinesByteIdentical() {
    let timing_lines = [
        "00:00:00.000 --> 00:00:01.250",
        "00:01:02.003 --> 00:01:04.999",
        "01:00:00.000 --> 01:00:10.000",
    ];
    let input: Vec<String> = timing_lines.iter()
        .enumerate()
        .map(|(i, line)| format!("{}\nlinha {}", line, i))
        .collect();

    let output = translate_document(&input.join("\n\n"), &MockTranslator::working()).await.unwrap();

    let output_timing_lines: Vec<&str> = output.split("\n\n")
        .filter_map(|block| block.lines().next())
        .collect();
    assert_eq!(output_timing_lines, timing_lines);
}

#[tokio::test]
async fn test_translate_document_withNonCanonicalTimingLines_shouldCopyThemVerbatim() {
    let timing_lines = [
        "00:00:01.000 --> 00:00:02.000 align:start position:10%",
        "1:02:03.456 --> 1:02:05.000",
        "00:00:07.000   -->   00:00:08.000",
    ];
    let input: Vec<String> = timing_lines.iter()
        .map(|line| format!("{}\noi", line))
        .collect();
    let identity = |text: &str| -> anyhow::Result<String> { Ok(text.to_string()) };

    let output = translate_document(&input.join("\n\n"), &identity).await.unwrap();

    let output_timing_lines: Vec<&str> = output.split("\n\n")
        .filter_map(|block| block.lines().next())
        .collect();
    assert_eq!(output_timing_lines, timing_lines);
}

#[tokio::test]
async fn test_translate_document_withSettingsThenUntimedCue_shouldChainFromParsedEnd() {
    let input = "00:00:01.000 --> 00:00:02.000 line:90%\num\n\ndois";

    let output = translate_document(input, &MockTranslator::working()).await.unwrap();

    assert_eq!(output, "00:00:01.000 --> 00:00:02.000 line:90%\nES: um\n\n00:00:02.000 --> 00:00:07.000\nES: dois");
}

#[tokio::test]
async fn test_translate_document_withShortMillis_shouldFailBeforeTranslating() {
    let translator = MockTranslator::working();

    let err = translate_document("00:00:01.5 --> 00:00:02.000\nx", &translator).await.unwrap_err();

    assert!(matches!(err.downcast_ref::<SubtitleError>(), Some(SubtitleError::MalformedTimestamp { .. })));
    assert_eq!(translator.call_count(), 0);
}

#[tokio::test]
async fn test_translate_document_withUntimedRun_shouldSynthesizeFiveSecondCues() {
    let input = "00:00:20.000 --> 00:00:21.000\num\n\ndois\n\ntrês\n\nquatro";

    let output = translate_document(input, &MockTranslator::working()).await.unwrap();

    assert_eq!(output, [
        "00:00:20.000 --> 00:00:21.000\nES: um",
        "00:00:21.000 --> 00:00:26.000\nES: dois",
        "00:00:26.000 --> 00:00:31.000\nES: três",
        "00:00:31.000 --> 00:00:36.000\nES: quatro",
    ].join("\n\n"));
}

#[tokio::test]
async fn test_translate_document_withMalformedTimestamp_shouldFailBeforeTranslating() {
    let translator = MockTranslator::working();
    let input = "00:00:01.000 --> 00:00:02.000\nok\n\n00:00:AB.000 --> 00:00:03.000\ntext";

    let err = translate_document(input, &translator).await.unwrap_err();

    let subtitle_error = err.downcast_ref::<SubtitleError>()
        .expect("root cause should be a subtitle error");
    assert!(matches!(subtitle_error, SubtitleError::MalformedTimestamp { .. }));
    assert_eq!(translator.call_count(), 0);
}

#[tokio::test]
async fn test_translate_document_withEmptyInput_shouldReturnEmptyString() {
    let translator = MockTranslator::working();
    assert_eq!(translate_document("", &translator).await.unwrap(), "");
    assert_eq!(translate_document("\n \n\t\n", &translator).await.unwrap(), "");
    assert_eq!(translator.call_count(), 0);
}

#[tokio::test]
async fn test_translate_document_withFailingCue_shouldReturnNoDocument() {
    let translator = MockTranslator::failing_on("dois");

    let err = translate_document("um\n\ndois\n\ntrês", &translator).await.unwrap_err();

    let message = format!("{:#}", err);
    assert!(message.contains("Failed to translate cue 2 of 3"), "{}", message);
    assert!(message.contains("Mock provider refused 'dois'"), "{}", message);
}

#[tokio::test]
async fn test_translate_with_concurrency_shouldKeepDocumentOrder() {
    // Earlier cues answer later, so completion order is the reverse of document order
    let translator = MockTranslator::working().with_delay(|text| {
        let index: u64 = text.trim_start_matches("cue").parse().unwrap_or(0);
        Duration::from_millis(60 - index * 10)
    });
    let input: Vec<String> = (0..6).map(|i| format!("cue{}", i)).collect();

    let concurrent = DocumentTranslator::new(Reassembler::default(), 4)
        .translate(&input.join("\n\n"), &translator)
        .await
        .unwrap();
    let sequential = translate_document(&input.join("\n\n"), &MockTranslator::working())
        .await
        .unwrap();

    assert_eq!(concurrent, sequential);
}

#[tokio::test]
async fn test_translate_withBlankLineVariants_shouldProduceSameOutput() {
    let translator = MockTranslator::portuguese_to_spanish();
    let wide = "00:00:01.000 --> 00:00:03.500\nOlá mundo\n\n\n\n\nComo você está\n";

    let output = translate_document(wide, &translator).await.unwrap();

    assert_eq!(output, common::SPANISH_EXPECTED);
}

#[tokio::test]
async fn test_translate_withCustomSyntheticDuration_shouldUseConfiguredStep() {
    let mut config = common::test_config();
    config.subtitle.synthetic_cue_duration_ms = 2_000;

    let output = DocumentTranslator::from_config(&config)
        .translate(common::PORTUGUESE_SAMPLE, &MockTranslator::portuguese_to_spanish())
        .await
        .unwrap();

    assert!(output.ends_with("00:00:03.500 --> 00:00:05.500\nCómo estás"), "{}", output);
}

#[tokio::test]
async fn test_translate_withDynTranslator_shouldWork() {
    let translator: Box<dyn vttwai::Translator> = Box::new(MockTranslator::portuguese_to_spanish());

    let output = translate_document(common::PORTUGUESE_SAMPLE, translator.as_ref()).await.unwrap();

    assert_eq!(output, common::SPANISH_EXPECTED);
}
