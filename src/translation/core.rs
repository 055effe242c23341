/*!
 * Core translation service implementation.
 *
 * This module contains the `Translator` seam used by the subtitle pipeline and
 * the `TranslationService`, which fulfils it with one of the configured AI
 * providers.
 */

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use parking_lot::Mutex;
use std::time::{Duration, Instant};

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::TranslationError;
use crate::language_utils::get_language_name;
use crate::providers::anthropic::{Anthropic, AnthropicRequest};
use crate::providers::ollama::{GenerationRequest, Ollama};
use crate::providers::openai::{OpenAI, OpenAIRequest};
use crate::providers::{Provider, RetryPolicy};
use super::cache::TranslationCache;
use super::cleanup::clean_response;

/// Upper bound on generated tokens; a cue is one short line
const MAX_COMPLETION_TOKENS: u32 = 1024;

/// Anything that turns one cue text into its translation.
///
/// The subtitle pipeline only knows this trait. Source and target languages
/// are fixed when the translator is built.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate a single line of cue text
    async fn translate(&self, text: &str) -> Result<String>;
}

#[async_trait]
impl<F> Translator for F
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    async fn translate(&self, text: &str) -> Result<String> {
        (self)(text)
    }
}

/// Token usage statistics for tracking API consumption
#[derive(Debug, Clone)]
pub struct TokenUsageStats {
    /// Number of prompt tokens
    pub prompt_tokens: u64,

    /// Number of completion tokens
    pub completion_tokens: u64,

    /// Number of requests that reached the provider
    pub requests: u64,

    /// Start time of token tracking
    pub start_time: Instant,

    /// Total time spent on API requests
    pub api_duration: Duration,

    /// Provider name
    pub provider: String,

    /// Model name
    pub model: String,
}

impl TokenUsageStats {
    /// Create new token usage stats with provider info
    pub fn with_provider_info(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt_tokens: 0,
            completion_tokens: 0,
            requests: 0,
            start_time: Instant::now(),
            api_duration: Duration::ZERO,
            provider: provider.into(),
            model: model.into(),
        }
    }

    /// Record one provider call
    pub fn record(&mut self, prompt_tokens: Option<u64>, completion_tokens: Option<u64>, duration: Duration) {
        self.prompt_tokens += prompt_tokens.unwrap_or(0);
        self.completion_tokens += completion_tokens.unwrap_or(0);
        self.requests += 1;
        self.api_duration += duration;
    }

    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }

    /// Calculate tokens per minute rate
    pub fn tokens_per_minute(&self) -> f64 {
        // API time first, wall time when nothing was measured
        let minutes = if self.api_duration > Duration::ZERO {
            self.api_duration.as_secs_f64() / 60.0
        } else {
            self.start_time.elapsed().as_secs_f64() / 60.0
        };

        if minutes > 0.0 {
            self.total_tokens() as f64 / minutes
        } else {
            0.0
        }
    }

    /// Generate a summary of token usage
    pub fn summary(&self) -> String {
        format!(
            "Token usage: provider {}, model {}, {} request(s), {} prompt + {} completion = {} tokens, {:.2} min of API time ({:.0} tokens/min)",
            self.provider,
            self.model,
            self.requests,
            self.prompt_tokens,
            self.completion_tokens,
            self.total_tokens(),
            self.api_duration.as_secs_f64() / 60.0,
            self.tokens_per_minute()
        )
    }
}

/// Translation provider implementation variants
#[derive(Debug)]
enum TranslationProviderImpl {
    /// Ollama LLM service
    Ollama { client: Ollama },

    /// OpenAI API service
    OpenAI { client: OpenAI },

    /// LM Studio local server (OpenAI-compatible)
    LMStudio { client: OpenAI },

    /// Anthropic API service
    Anthropic { client: Anthropic },
}

/// Build the user prompt for one cue
pub fn build_user_prompt(text: &str, source_name: &str, target_name: &str) -> String {
    format!(
        "Translate the following {source} text to {target}:\n\
         '{text}'\n\
         Rules:\n\
         1. Provide ONLY the direct {target} translation.\n\
         2. Do not include any introductory phrases or explanations.\n\
         3. Do not split the translation across multiple lines.\n\
         4. Preserve punctuation and capitalization.\n\
         5. Your response must contain ONLY the {target} translation, nothing else.",
        source = source_name,
        target = target_name,
        text = text,
    )
}

/// Main translation service for subtitle translation
#[derive(Debug)]
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,

    /// Source language code
    source_language: String,

    /// Target language code
    target_language: String,

    /// Rendered system prompt
    system_prompt: String,

    source_name: String,
    target_name: String,

    /// Translation cache for storing and retrieving translations
    pub cache: TranslationCache,

    usage: Mutex<TokenUsageStats>,
}

impl TranslationService {
    /// Create a new translation service for one language pair
    pub fn new(config: TranslationConfig, source_language: &str, target_language: &str) -> Result<Self> {
        let source_name = get_language_name(source_language)?;
        let target_name = get_language_name(target_language)?;

        let retry = RetryPolicy::new(config.common.retry_count, config.common.retry_backoff_ms);
        let timeout = config.get_timeout();
        let rate_limit = config.get_rate_limit();
        let endpoint = config.get_endpoint();

        let provider = match config.provider {
            ConfigTranslationProvider::Ollama => TranslationProviderImpl::Ollama {
                client: Ollama::new_with_config(endpoint, timeout, retry, rate_limit),
            },
            ConfigTranslationProvider::OpenAI => TranslationProviderImpl::OpenAI {
                client: OpenAI::new_with_config(config.get_api_key(), endpoint, timeout, retry, rate_limit),
            },
            ConfigTranslationProvider::LMStudio => {
                // LM Studio accepts any key
                let api_key = Some(config.get_api_key())
                    .filter(|key| !key.is_empty())
                    .unwrap_or_else(|| "lm-studio".to_string());

                TranslationProviderImpl::LMStudio {
                    client: OpenAI::new_with_config(api_key, endpoint, timeout, retry, rate_limit),
                }
            }
            ConfigTranslationProvider::Anthropic => TranslationProviderImpl::Anthropic {
                client: Anthropic::new_with_config(config.get_api_key(), endpoint, timeout, retry, rate_limit),
            },
        };

        let system_prompt = config.common.system_prompt
            .replace("{source_language}", &source_name)
            .replace("{target_language}", &target_name);

        let usage = TokenUsageStats::with_provider_info(config.provider.display_name(), config.get_model());

        Ok(Self {
            provider,
            config,
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            system_prompt,
            source_name,
            target_name,
            cache: TranslationCache::new(true),
            usage: Mutex::new(usage),
        })
    }

    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Test the connection to the translation provider
    pub async fn test_connection(&self) -> Result<()> {
        info!(
            "Testing connection to {} with model {}",
            self.config.provider.display_name(),
            self.config.get_model()
        );

        let result = match &self.provider {
            TranslationProviderImpl::Ollama { client } => client.test_connection().await,
            TranslationProviderImpl::OpenAI { client } | TranslationProviderImpl::LMStudio { client } => {
                client.test_connection().await
            }
            TranslationProviderImpl::Anthropic { client } => client.ping(&self.config.get_model()).await,
        };

        result.with_context(|| format!("Failed to connect to {}", self.config.provider.display_name()))
    }

    /// Translate a single text string
    pub async fn translate_text(&self, text: &str) -> Result<String> {
        // Nothing to ask the model
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        if let Some(cached) = self.cache.get(text, &self.source_language, &self.target_language) {
            return Ok(cached);
        }

        let raw = self.complete(text).await.map_err(TranslationError::from)?;
        let translated = clean_response(&raw);

        if translated.is_empty() {
            return Err(TranslationError::EmptyResponse(text.to_string()).into());
        }

        self.cache.insert(text, &self.source_language, &self.target_language, &translated);
        Ok(translated)
    }

    /// Snapshot of the token usage so far
    pub fn token_usage(&self) -> TokenUsageStats {
        self.usage.lock().clone()
    }

    // @sends: One prompt to the active provider, returns its raw text
    async fn complete(&self, text: &str) -> Result<String, crate::errors::ProviderError> {
        let model = self.config.get_model();
        let temperature = self.config.common.temperature;
        let prompt = build_user_prompt(text, &self.source_name, &self.target_name);
        let started = Instant::now();

        let (raw, prompt_tokens, completion_tokens) = match &self.provider {
            TranslationProviderImpl::Ollama { client } => {
                let request = GenerationRequest::new(model, prompt)
                    .system(&self.system_prompt)
                    .temperature(temperature)
                    .num_predict(MAX_COMPLETION_TOKENS);
                let response = client.complete(request).await?;
                (Ollama::extract_text(&response), response.prompt_eval_count, response.eval_count)
            }
            TranslationProviderImpl::OpenAI { client } | TranslationProviderImpl::LMStudio { client } => {
                let request = OpenAIRequest::new(model)
                    .add_message("system", &self.system_prompt)
                    .add_message("user", prompt)
                    .temperature(temperature)
                    .max_tokens(MAX_COMPLETION_TOKENS);
                let response = client.complete(request).await?;
                let usage = response.usage.as_ref();
                (
                    OpenAI::extract_text(&response),
                    usage.map(|u| u.prompt_tokens),
                    usage.map(|u| u.completion_tokens),
                )
            }
            TranslationProviderImpl::Anthropic { client } => {
                let request = AnthropicRequest::new(model, MAX_COMPLETION_TOKENS)
                    .system(&self.system_prompt)
                    .add_message("user", prompt)
                    .temperature(temperature);
                let response = client.complete(request).await?;
                (
                    Anthropic::extract_text(&response),
                    Some(u64::from(response.usage.input_tokens)),
                    Some(u64::from(response.usage.output_tokens)),
                )
            }
        };

        let elapsed = started.elapsed();
        debug!("Provider answered in {:?}", elapsed);
        self.usage.lock().record(prompt_tokens, completion_tokens, elapsed);

        Ok(raw)
    }
}

#[async_trait]
impl Translator for TranslationService {
    async fn translate(&self, text: &str) -> Result<String> {
        self.translate_text(text)
            .await
            .with_context(|| format!("{} could not translate the text", self.config.provider.display_name()))
    }
}
