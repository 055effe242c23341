// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use vttwai::app_config::{self, Config, TranslationProvider};
use vttwai::app_controller::{Controller, FileOutcome};

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Ollama,
    #[value(name = "openai")]
    OpenAI,
    Anthropic,
    #[value(name = "lmstudio")]
    LMStudio,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
            CliTranslationProvider::LMStudio => TranslationProvider::LMStudio,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate WebVTT subtitle files (default command)
    Translate {
        /// Input .vtt file or directory to process
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        #[command(flatten)]
        options: TranslateOptions,
    },

    /// Generate shell completions for vttwai
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Args, Debug, Clone)]
struct TranslateOptions {
    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Source language code (e.g., 'pt', 'en', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'es', 'en', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Also process subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Copy a leading WEBVTT header through untranslated
    #[arg(long)]
    keep_header: bool,

    /// API key for the selected provider
    #[arg(long, env = "VTTWAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Skip the provider connection check
    #[arg(long)]
    skip_connection_check: bool,
}

/// VTTwAI - WebVTT subtitle translation with AI
///
/// Translates the cues of WebVTT files with a language model, keeping the
/// timing of timed cues and giving untimed ones a synthetic timing.
#[derive(Parser, Debug)]
#[command(name = "vttwai")]
#[command(version)]
#[command(about = "AI-powered WebVTT subtitle translation tool")]
#[command(long_about = "VTTwAI translates WebVTT subtitle files cue by cue using AI providers.

EXAMPLES:
    vttwai aula.vtt                              # Translate using default config (pt -> es)
    vttwai -f aula.vtt                           # Force overwrite existing output
    vttwai -p openai -m gpt-4o-mini aula.vtt     # Use specific provider and model
    vttwai -s en -t fr talk.vtt                  # Translate from English to French
    vttwai -r --log-level debug /courses/        # Process a directory tree with debug logging
    vttwai completions bash > vttwai.bash        # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

OUTPUT:
    Each input file gets a sibling named translated_<file name>. Every output
    block is a timing line followed by one line of translated text.

SUPPORTED PROVIDERS:
    ollama    - Local Ollama server (default: llama3)
    openai    - OpenAI API (requires API key)
    anthropic - Anthropic Claude API (requires API key)
    lmstudio  - LM Studio local server (OpenAI-compatible on http://localhost:1234/v1)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input .vtt file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    #[command(flatten)]
    options: TranslateOptions,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // The logger accepts everything; log::max_level does the filtering
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI colour for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let _ = writeln!(
                std::io::stderr(),
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "vttwai", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate { input_path, options }) => run_translate(&input_path, options).await,
        None => {
            // Top-level arguments, same as the translate subcommand
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;
            run_translate(&input_path, cli.options).await
        }
    }
}

async fn run_translate(input_path: &Path, options: TranslateOptions) -> Result<()> {
    // Command line level wins over the config
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.into());
    }

    let config = load_config(&options)?;

    config.validate()
        .context("Configuration validation failed")?;

    if options.log_level.is_none() {
        log::set_max_level(config.log_level.into());
    }

    info!(
        "🚀 VTTwAI: {} - {} ({} -> {})",
        config.translation.provider.display_name(),
        config.translation.get_model(),
        config.source_language,
        config.target_language
    );

    let controller = Controller::with_config(config)?;

    if !options.skip_connection_check {
        controller.test_connection().await
            .context("Translation provider is not reachable (use --skip-connection-check to try anyway)")?;
    }

    if input_path.is_file() {
        if let FileOutcome::Skipped(output) = controller.run_file(input_path, options.force_overwrite).await? {
            info!("Nothing to do, {} already exists", output.display());
        }
    } else if input_path.is_dir() {
        let summary = controller
            .run_folder(input_path, options.force_overwrite, options.recursive)
            .await?;

        if summary.failed > 0 {
            return Err(anyhow!("{} file(s) failed to translate", summary.failed));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    Ok(())
}

// @loads: Config file (created with defaults when missing) plus CLI overrides
fn load_config(options: &TranslateOptions) -> Result<Config> {
    let config_path = Path::new(&options.config_path);

    let mut config = if config_path.exists() {
        Config::from_file(config_path)
            .with_context(|| format!("Failed to load config file: {}", options.config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", options.config_path);

        let config = Config::default();
        config.save(config_path)
            .with_context(|| format!("Failed to write default config to file: {}", options.config_path))?;
        config
    };

    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }

    let active = config.translation.provider;

    if let Some(model) = &options.model {
        config.translation.provider_config_mut(active).model = model.clone();
    }

    if let Some(api_key) = &options.api_key {
        config.translation.provider_config_mut(active).api_key = api_key.clone();
    }

    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }

    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }

    if options.keep_header {
        config.subtitle.keep_header = true;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    Ok(config)
}
