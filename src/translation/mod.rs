/*!
 * Translation of subtitle documents using AI providers.
 *
 * - `core`: the `Translator` seam and the provider-backed `TranslationService`
 * - `pipeline`: segment, translate and reassemble a whole document
 * - `cache`: in-memory cache of translated cue texts
 * - `cleanup`: normalisation of raw model answers
 */

// Re-export main types for easier usage
pub use self::core::{TokenUsageStats, TranslationService, Translator};
pub use self::pipeline::{translate_document, DocumentTranslator};

// Submodules
pub mod cache;
pub mod cleanup;
pub mod core;
pub mod pipeline;
