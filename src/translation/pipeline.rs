/*!
 * Document translation pipeline.
 *
 * segment → translate every cue (in document order) → reassemble.
 *
 * Cues may be translated several at a time, but results are collected in
 * submission order so the output never depends on which call finished first.
 * The first failing cue aborts the document; nothing partial is returned.
 */

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt, TryStreamExt};
use log::{debug, info};

use crate::app_config::Config;
use crate::reassembler::{Reassembler, BLOCK_SEPARATOR};
use crate::subtitle_processor::{segment, split_header};
use super::core::Translator;

/// Turns the content of one VTT document into its translated form
#[derive(Debug, Clone)]
pub struct DocumentTranslator {
    reassembler: Reassembler,
    /// Cues in flight at the same time, at least 1
    concurrency: usize,
    /// Copy a leading `WEBVTT` block through untranslated
    keep_header: bool,
}

impl Default for DocumentTranslator {
    fn default() -> Self {
        Self::new(Reassembler::default(), 1)
    }
}

impl DocumentTranslator {
    pub fn new(reassembler: Reassembler, concurrency: usize) -> Self {
        Self {
            reassembler,
            concurrency: concurrency.max(1),
            keep_header: false,
        }
    }

    /// Build from the application configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Reassembler::new(config.subtitle.synthetic_cue_duration()),
            config.translation.common.concurrent_requests,
        )
        .keep_header(config.subtitle.keep_header)
    }

    pub fn keep_header(mut self, keep_header: bool) -> Self {
        self.keep_header = keep_header;
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Translate a whole document
    pub async fn translate<T>(&self, content: &str, translator: &T) -> Result<String>
    where
        T: Translator + ?Sized,
    {
        self.translate_with_progress(content, translator, |_, _| {}).await
    }

    /// Translate a whole document, reporting `(done, total)` after each cue
    pub async fn translate_with_progress<T, P>(&self, content: &str, translator: &T, mut progress: P) -> Result<String>
    where
        T: Translator + ?Sized,
        P: FnMut(usize, usize),
    {
        let (header, body) = if self.keep_header {
            split_header(content)
        } else {
            (None, content.to_string())
        };

        let cues = segment(&body).context("Failed to parse subtitle content")?;
        let total = cues.len();
        info!("Translating {} cues ({} at a time)", total, self.concurrency);

        let mut done = 0;
        let translations: Vec<String> = stream::iter(cues.iter().enumerate())
            .map(|(index, cue)| async move {
                translator.translate(&cue.text)
                    .await
                    .with_context(|| format!("Failed to translate cue {} of {}", index + 1, total))
            })
            .buffered(self.concurrency)
            .inspect_ok(|_| {
                done += 1;
                progress(done, total);
            })
            .try_collect()
            .await?;

        let pairs: Vec<_> = cues.into_iter().zip(translations).collect();
        let document = self.reassembler.reassemble(&pairs);
        debug!("Reassembled document is {} bytes", document.len());

        Ok(match header {
            Some(header) if document.is_empty() => header,
            Some(header) => format!("{}{}{}", header, BLOCK_SEPARATOR, document),
            None => document,
        })
    }
}

/// Translate VTT content with default settings: one cue at a time, 5 s synthetic cues
pub async fn translate_document<T>(content: &str, translator: &T) -> Result<String>
where
    T: Translator + ?Sized,
{
    DocumentTranslator::default().translate(content, translator).await
}
