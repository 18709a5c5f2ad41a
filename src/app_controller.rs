use anyhow::{Result, anyhow};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use indicatif::{ProgressBar, ProgressStyle};
use crate::app_config::Config;
use crate::errors::{AppError, TranslationError};
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::providers::{Backend, TranslationBackend};
use crate::subtitle_processor::SubtitleCollection;

// @module: Application controller for subtitle translation

/// Main application controller for subtitle translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Configuration this controller runs with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Default output path: `<stem>.<target>.srt` next to the input
    pub fn output_path_for(&self, input_file: &Path) -> PathBuf {
        let output_dir = input_file.parent().unwrap_or(Path::new(""));
        FileManager::generate_output_path(input_file, output_dir, &self.config.target_language, "srt")
    }

    /// Translate a single subtitle file or every `.srt` file below a directory.
    ///
    /// The backend is selected before the input path is inspected.
    pub async fn run(&self, input_path: PathBuf, output_path: Option<PathBuf>, force_overwrite: bool) -> Result<()> {
        let backend = Backend::from_config(&self.config.translation)?;

        if input_path.is_file() {
            let output_path = output_path.unwrap_or_else(|| self.output_path_for(&input_path));
            self.translate_file_with_backend(&backend, &input_path, &output_path, force_overwrite).await?;
            Ok(())
        } else if input_path.is_dir() {
            if output_path.is_some() {
                return Err(anyhow!("--output can only be used with a single input file"));
            }
            self.translate_folder(&backend, &input_path, force_overwrite).await
        } else {
            Err(anyhow!("Input path does not exist: {:?}", input_path))
        }
    }

    /// Translate one file with the configured backend.
    ///
    /// Returns the written path, or `None` when an existing output was kept.
    /// The backend is selected before the input is touched, so an unavailable
    /// backend fails without any file or network activity.
    pub async fn translate_file(&self, input_file: &Path, output_path: Option<PathBuf>, force_overwrite: bool) -> Result<Option<PathBuf>, AppError> {
        let backend = Backend::from_config(&self.config.translation)?;
        let output_path = output_path.unwrap_or_else(|| self.output_path_for(input_file));

        self.translate_file_with_backend(&backend, input_file, &output_path, force_overwrite).await
    }

    /// Translate one file with an already selected backend
    pub async fn translate_file_with_backend(
        &self,
        backend: &dyn TranslationBackend,
        input_file: &Path,
        output_path: &Path,
        force_overwrite: bool,
    ) -> Result<Option<PathBuf>, AppError> {
        if output_path.exists() && !force_overwrite {
            warn!("Skipping {:?}, translation already exists (use -f to force overwrite)", output_path);
            return Ok(None);
        }

        let start_time = Instant::now();

        let mut subtitles = SubtitleCollection::read_from_file(input_file)?;
        if subtitles.is_empty() {
            warn!("No subtitle blocks found in {:?}", input_file);
        }

        self.translate_collection(&mut subtitles, backend).await?;

        subtitles.write_to_srt(output_path)?;

        info!(
            "Translated {} blocks with {} in {}: {:?}",
            subtitles.len(),
            backend.name(),
            Self::format_duration(start_time.elapsed()),
            output_path
        );

        Ok(Some(output_path.to_path_buf()))
    }

    /// Translate every block of a collection in order, one request at a time.
    ///
    /// Blocks without caption lines are left untouched. The first failure
    /// stops the loop; blocks translated so far stay only in memory.
    pub async fn translate_collection(&self, subtitles: &mut SubtitleCollection, backend: &dyn TranslationBackend) -> Result<(), TranslationError> {
        let source_language = self.config.source_language.as_str();
        let target_language = self.config.target_language.as_str();

        if language_utils::language_codes_match(source_language, target_language) {
            warn!("Source and target language are both '{}'", target_language);
        }

        debug!(
            "Translating {} blocks from {} to {} with {}",
            subtitles.len(),
            language_utils::get_language_name(source_language).unwrap_or_else(|_| source_language.to_string()),
            language_utils::get_language_name(target_language).unwrap_or_else(|_| target_language.to_string()),
            backend.name()
        );

        let progress_bar = Self::block_progress_bar(subtitles.len() as u64);

        for block in subtitles.blocks.iter_mut() {
            if block.is_empty() {
                progress_bar.inc(1);
                continue;
            }

            let translated = backend
                .translate(&block.text(), source_language, target_language)
                .await
                .map_err(|source| {
                    progress_bar.abandon();
                    error!("Translation failed at block {}: {}", block.index, source);
                    TranslationError::Block {
                        index: block.index.clone(),
                        source,
                    }
                })?;

            block.set_text(&translated);
            progress_bar.inc(1);
        }

        progress_bar.finish_and_clear();
        Ok(())
    }

    /// Translate every `.srt` file below a directory with the configured backend
    pub async fn run_folder(&self, input_dir: &Path, force_overwrite: bool) -> Result<()> {
        let backend = Backend::from_config(&self.config.translation)?;
        self.translate_folder(&backend, input_dir, force_overwrite).await
    }

    /// Translate every `.srt` file below a directory.
    ///
    /// Outputs of earlier runs (`*.<target>.srt`) are not picked up as inputs.
    /// A failing file is logged and the remaining files are still processed.
    async fn translate_folder(&self, backend: &Backend, input_dir: &Path, force_overwrite: bool) -> Result<()> {
        let start_time = Instant::now();

        let target_suffix = format!(".{}", self.config.target_language.to_lowercase());
        let subtitle_files: Vec<PathBuf> = FileManager::find_files(input_dir, "srt")?
            .into_iter()
            .filter(|path| {
                !path.file_stem()
                    .map(|stem| stem.to_string_lossy().to_lowercase().ends_with(&target_suffix))
                    .unwrap_or(false)
            })
            .collect();

        if subtitle_files.is_empty() {
            return Err(anyhow!("No subtitle files found in directory: {:?}", input_dir));
        }

        let mut success_count = 0;
        let mut skip_count = 0;
        let mut error_count = 0;

        for subtitle_file in &subtitle_files {
            info!("Processing {:?}", subtitle_file);
            let output_path = self.output_path_for(subtitle_file);

            match self.translate_file_with_backend(backend, subtitle_file, &output_path, force_overwrite).await {
                Ok(Some(_)) => success_count += 1,
                Ok(None) => skip_count += 1,
                Err(e) => {
                    error!("Error processing {:?}: {}", subtitle_file, e);
                    error_count += 1;
                }
            }
        }

        info!(
            "Folder complete in {}: {} translated, {} skipped, {} failed",
            Self::format_duration(start_time.elapsed()),
            success_count,
            skip_count,
            error_count
        );

        if error_count > 0 {
            return Err(anyhow!("{} of {} files failed to translate", error_count, subtitle_files.len()));
        }

        Ok(())
    }

    fn block_progress_bar(total_blocks: u64) -> ProgressBar {
        let progress_bar = ProgressBar::new(total_blocks);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} blocks ({percent}%) {eta}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("=> "));
        progress_bar
    }

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
}
