use anyhow::{anyhow, Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::translation::{DocumentTranslator, TranslationService, Translator};

// @module: Application controller for subtitle processing

/// What happened to a single input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The translation was written to this path
    Translated(PathBuf),
    /// An output already existed at this path and was left alone
    Skipped(PathBuf),
}

/// Counts reported at the end of a folder run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller for subtitle translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Collaborator every cue goes through
    translator: Arc<dyn Translator>,
    // @field: Provider-backed service, when the translator is one
    service: Option<Arc<TranslationService>>,
    document: DocumentTranslator,
    show_progress: bool,
}

impl Controller {
    // @method: Create a controller translating through the configured provider
    pub fn with_config(config: Config) -> Result<Self> {
        let service = Arc::new(
            TranslationService::new(
                config.translation.clone(),
                &config.source_language,
                &config.target_language,
            )
            .context("Failed to create translation service")?,
        );

        let mut controller = Self::with_translator(config, service.clone());
        controller.service = Some(service);
        Ok(controller)
    }

    // @method: Create a controller around any translator
    pub fn with_translator(config: Config, translator: Arc<dyn Translator>) -> Self {
        let document = DocumentTranslator::from_config(&config);
        Self {
            config,
            translator,
            service: None,
            document,
            show_progress: true,
        }
    }

    /// Turn progress bars on or off
    pub fn show_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check that the provider answers before any file is touched
    pub async fn test_connection(&self) -> Result<()> {
        match &self.service {
            Some(service) => service.test_connection().await,
            None => Ok(()),
        }
    }

    /// Translate one file into its prefixed sibling
    pub async fn run_file(&self, input_file: &Path, force_overwrite: bool) -> Result<FileOutcome> {
        let multi_progress = self.multi_progress();
        self.run_file_with_progress(input_file, force_overwrite, &multi_progress).await
    }

    async fn run_file_with_progress(
        &self,
        input_file: &Path,
        force_overwrite: bool,
        multi_progress: &MultiProgress,
    ) -> Result<FileOutcome> {
        let start_time = Instant::now();

        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let output_path = FileManager::output_path_for(input_file, &self.config.subtitle.output_prefix);
        if output_path.exists() && !force_overwrite {
            warn!("Skipping {}, translation already exists (use -f to force overwrite)", display_name(input_file));
            return Ok(FileOutcome::Skipped(output_path));
        }

        info!("Processing {}...", display_name(input_file));
        let content = FileManager::read_to_string(input_file)?;

        let progress_bar = multi_progress.add(ProgressBar::new(0));
        progress_bar.set_style(bar_style("cues"));
        progress_bar.set_message(display_name(input_file));

        let result = self.document
            .translate_with_progress(&content, self.translator.as_ref(), |done, total| {
                progress_bar.set_length(total as u64);
                progress_bar.set_position(done as u64);
            })
            .await;

        let translated = match result {
            Ok(translated) => {
                progress_bar.finish_and_clear();
                translated
            }
            Err(e) => {
                progress_bar.abandon();
                return Err(e.context(format!("Failed to translate {:?}", input_file)));
            }
        };

        FileManager::write_to_file(&output_path, &translated)?;
        info!("Translated content saved to {}", output_path.display());
        info!("Translation completed in {}.", format_duration(start_time.elapsed()));

        if let Some(service) = &self.service {
            log::debug!("{}", service.token_usage().summary());
        }

        Ok(FileOutcome::Translated(output_path))
    }

    /// Translate every subtitle file in a directory.
    ///
    /// A failing file is logged and counted; the run goes on with the next one.
    pub async fn run_folder(&self, input_dir: &Path, force_overwrite: bool, recursive: bool) -> Result<FolderSummary> {
        let start_time = Instant::now();

        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let prefix = &self.config.subtitle.output_prefix;
        let files: Vec<PathBuf> = FileManager::find_subtitle_files(input_dir, &self.config.subtitle.extensions, recursive)?
            .into_iter()
            .filter(|path| !FileManager::is_translated_output(path, prefix))
            .collect();

        let mut summary = FolderSummary::default();
        if files.is_empty() {
            warn!("No subtitle files found in directory: {:?}", input_dir);
            return Ok(summary);
        }

        let multi_progress = self.multi_progress();
        let folder_pb = multi_progress.add(ProgressBar::new(files.len() as u64));
        folder_pb.set_style(bar_style("files"));
        folder_pb.set_message("Processing files");

        for file in &files {
            folder_pb.set_message(format!("Processing: {}", display_name(file)));

            match self.run_file_with_progress(file, force_overwrite, &multi_progress).await {
                Ok(FileOutcome::Translated(_)) => summary.processed += 1,
                Ok(FileOutcome::Skipped(_)) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {:#}", display_name(file), e);
                    summary.failed += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        info!(
            "Folder processing completed: {} processed, {} skipped, {} errors in {}",
            summary.processed,
            summary.skipped,
            summary.failed,
            format_duration(start_time.elapsed())
        );

        Ok(summary)
    }

    fn multi_progress(&self) -> MultiProgress {
        let multi_progress = MultiProgress::new();
        if !self.show_progress {
            multi_progress.set_draw_target(indicatif::ProgressDrawTarget::hidden());
        }
        multi_progress
    }
}

// @creates: Bar style with a plain fallback
fn bar_style(unit: &str) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(&format!("{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}} {{eta}}", unit))
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░")
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

// Format duration in a human-readable format
fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}.{:03}s", seconds, duration.subsec_millis())
    }
}
