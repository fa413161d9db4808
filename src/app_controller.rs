use anyhow::{anyhow, Context, Result};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::diff::{self, DiffRow};
use crate::file_utils::FileManager;
use crate::pipeline::{ChangeReport, Pipeline};
use crate::stats::{self, SubtitleInfo};
use crate::subtitle_processor::SubtitleDocument;

// @module: Application controller for subtitle processing

/// What happened to one input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Processed output written to this path
    Written(PathBuf),
    /// Nothing changed, nothing written
    Unchanged,
    /// Output already exists and overwriting was not requested
    Skipped(PathBuf),
}

/// Counts for a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub written: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Written(_) => self.written += 1,
            FileOutcome::Unchanged => self.unchanged += 1,
            FileOutcome::Skipped(_) => self.skipped += 1,
        }
    }
}

/// Statistics of a file before and after processing
#[derive(Debug, Clone, PartialEq)]
pub struct InfoComparison {
    pub original: SubtitleInfo,
    pub processed: SubtitleInfo,
    pub report: ChangeReport,
}

/// Main application controller: load, process and write subtitle files
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Pipeline bound to a snapshot of the current plugin configuration
    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(&self.config.plugins)
    }

    /// Read and decode one subtitle file
    pub async fn load_document(path: &Path) -> Result<SubtitleDocument> {
        let bytes = FileManager::read_bytes(path).await?;
        let name = path
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let document = SubtitleDocument::load(name, &bytes)
            .with_context(|| format!("Failed to decode {}", path.display()))?;
        for diagnostic in &document.diagnostics {
            debug!("{}: {}", document.name, diagnostic);
        }
        Ok(document)
    }

    /// Read several files concurrently. Ctrl-C abandons the whole batch.
    pub async fn load_documents(paths: &[PathBuf]) -> Result<Vec<Result<SubtitleDocument>>> {
        let loads = join_all(paths.iter().map(|path| Self::load_document(path)));
        tokio::select! {
            documents = loads => Ok(documents),
            _ = tokio::signal::ctrl_c() => Err(anyhow!("Cancelled while reading input files")),
        }
    }

    /// Write a processed document unless it is unchanged or its output exists
    pub fn write_document(
        &self,
        input_file: &Path,
        document: &SubtitleDocument,
        output_dir: Option<&Path>,
        force_overwrite: bool,
    ) -> Result<FileOutcome> {
        let changed = document.has_changes() || document.encoding != document.original_encoding();
        if self.config.output.only_changed && !changed {
            debug!("{}: no changes, nothing to write", document.name);
            return Ok(FileOutcome::Unchanged);
        }

        let output_path =
            FileManager::generate_output_path(input_file, output_dir, self.config.cyrillic_suffix());
        if output_path.exists() && !force_overwrite {
            warn!(
                "Skipping {}, output already exists (use -f to force overwrite)",
                output_path.display()
            );
            return Ok(FileOutcome::Skipped(output_path));
        }

        let bytes = document
            .to_bytes()
            .with_context(|| format!("Failed to encode {} as {}", document.name, document.encoding))?;
        FileManager::write_bytes(&output_path, &bytes)?;
        info!("Success: {}", output_path.display());
        Ok(FileOutcome::Written(output_path))
    }

    /// Process a single subtitle file
    pub async fn run(
        &self,
        input_file: PathBuf,
        output_dir: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<RunSummary> {
        if !FileManager::file_exists(&input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }
        let mut document = Self::load_document(&input_file).await?;
        self.pipeline().process(&mut document);

        let outcome = self.write_document(&input_file, &document, output_dir.as_deref(), force_overwrite)?;
        let mut summary = RunSummary::default();
        summary.record(&outcome);
        Ok(summary)
    }

    /// Process every subtitle file under a directory
    pub async fn run_folder(
        &self,
        input_dir: PathBuf,
        output_dir: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<RunSummary> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let files = FileManager::find_srt_files(&input_dir)?;
        if files.is_empty() {
            return Err(anyhow!("No subtitle files found in directory: {:?}", input_dir));
        }

        let folder_pb = ProgressBar::new(files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Reading files");

        let documents = Self::load_documents(&files).await?;
        let pipeline = self.pipeline();
        let mut summary = RunSummary::default();

        for (input_file, loaded) in files.iter().zip(documents) {
            let file_name = input_file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            let result = loaded.and_then(|mut document| {
                pipeline.process(&mut document);
                self.write_document(input_file, &document, output_dir.as_deref(), force_overwrite)
            });
            match result {
                Ok(outcome) => summary.record(&outcome),
                Err(e) => {
                    error!("Error processing file {}: {:#}", file_name, e);
                    summary.errors += 1;
                }
            }
            folder_pb.inc(1);
        }

        folder_pb.finish_and_clear();

        info!(
            "Folder processing completed in {}: {} written, {} unchanged, {} skipped, {} errors",
            Self::format_duration(start_time.elapsed()),
            summary.written,
            summary.unchanged,
            summary.skipped,
            summary.errors
        );
        Ok(summary)
    }

    /// Statistics of a file before and after processing
    pub async fn info(&self, input_file: &Path) -> Result<InfoComparison> {
        let mut document = Self::load_document(input_file).await?;
        let report = self.pipeline().process(&mut document);
        Ok(InfoComparison {
            original: stats::compute_sub_info(document.original_entries()),
            processed: stats::compute_sub_info(&document.entries),
            report,
        })
    }

    /// Aligned rows between a file and its processed version
    pub async fn diff(&self, input_file: &Path) -> Result<Vec<DiffRow>> {
        let mut document = Self::load_document(input_file).await?;
        self.pipeline().process(&mut document);
        Ok(diff::diff_document(&document))
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
