/*!
 * Tests for model answer cleanup
 */

use vttwai::translation::cleanup::clean_response;

#[test]
fn test_clean_response_withEnglishPreamble_shouldStripIt() {
    assert_eq!(clean_response("Here is the translation: Hola mundo"), "Hola mundo");
    assert_eq!(clean_response("Translation: Cómo estás"), "Cómo estás");
}

#[test]
fn test_clean_response_withQuotedAnswerAfterPreamble_shouldStripBoth() {
    assert_eq!(clean_response("Aquí está la traducción:\n\"Hola mundo\""), "Hola mundo");
}

#[test]
fn test_clean_response_withGuillemets_shouldUnwrap() {
    assert_eq!(clean_response("«Hola»"), "Hola");
}

#[test]
fn test_clean_response_withPlainAnswer_shouldOnlyTrim() {
    assert_eq!(clean_response("  ¿Qué tal?  \n"), "¿Qué tal?");
}

#[test]
fn test_clean_response_withOnlyPreamble_shouldBeEmpty() {
    assert_eq!(clean_response("Esta es la traducción:"), "");
}
