/*!
 * Tests for ISO language code utilities
 */

use vttwai::language_utils::{get_language_name, language_codes_match, normalize_to_part2t, resolve_language};

#[test]
fn test_get_language_name_withTwoLetterCodes_shouldReturnEnglishName() {
    assert_eq!(get_language_name("pt").unwrap(), "Portuguese");
    assert_eq!(get_language_name("es").unwrap(), "Spanish");
}

#[test]
fn test_get_language_name_withThreeLetterCodes_shouldResolve() {
    assert_eq!(get_language_name("por").unwrap(), "Portuguese");
    assert_eq!(get_language_name(" FRA ").unwrap(), "French");
}

#[test]
fn test_normalize_to_part2t_withBibliographicCode_shouldReturnTerminological() {
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
    assert_eq!(normalize_to_part2t("fre").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
}

#[test]
fn test_language_codes_match_acrossFormats_shouldMatch() {
    assert!(language_codes_match("pt", "por"));
    assert!(language_codes_match("de", "ger"));
    assert!(!language_codes_match("pt", "es"));
    assert!(!language_codes_match("pt", "zz"));
}

#[test]
fn test_resolve_language_withInvalidCodes_shouldFail() {
    for code in ["", "x", "zz", "abcd"] {
        assert!(resolve_language(code).is_err(), "{:?} should be rejected", code);
    }
}
