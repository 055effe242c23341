/*!
 * Cleanup of raw model answers.
 *
 * Models tend to wrap a one-line translation in a preamble, quotes or extra
 * lines. The subtitle pipeline takes whatever the translator returns as
 * final, so this cleanup happens on the provider side, before the answer
 * leaves the translation service.
 */

use once_cell::sync::Lazy;
use regex::Regex;

// @const: Known preambles ("Here is the translation:" and friends)
static PREAMBLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)^\s*(?:",
        r"aqu[ií] est[aá] la traducci[oó]n(?: directa)?(?: en español)?",
        r"|esta es la traducci[oó]n(?: directa)?(?: en español)?",
        r"|here is the translation|here's the translation",
        r"|translation|traducci[oó]n",
        r")\s*:\s*",
    )).unwrap()
});

// @const: Runs of whitespace including line breaks
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

const QUOTE_PAIRS: &[(char, char)] = &[('\'', '\''), ('"', '"'), ('“', '”'), ('«', '»')];

/// Turn a raw model answer into a single clean line of text
pub fn clean_response(raw: &str) -> String {
    let without_preamble = PREAMBLE_REGEX.replace(raw.trim(), "");
    let single_line = WHITESPACE_REGEX.replace_all(without_preamble.trim(), " ");
    strip_wrapping_quotes(&single_line).trim().to_string()
}

// @strips: One pair of matching quotes around the whole answer
fn strip_wrapping_quotes(text: &str) -> &str {
    for (open, close) in QUOTE_PAIRS {
        if let Some(inner) = text.strip_prefix(*open).and_then(|t| t.strip_suffix(*close)) {
            return inner;
        }
    }
    text
}
