//! Batch processing engine.
//!
//! Orchestrates a conversion run: discover monthly files, decode and reduce
//! each one on the blocking pool, write the monthly mean arrays and finish
//! with the catalog table.

pub mod discovery;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::discovery::FileDiscovery;
use self::writer::{monthly_mean_file_name, write_catalog, write_monthly_mean};

use crate::config::ProcessorConfig;
use crate::decoder::decode_file;
use crate::error::{GpcpError, Result};
use crate::models::{FileOutcome, ProcessingStats};
use crate::reducer::monthly_mean;

use colored::*;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::task;
use tracing::{debug, error, info, warn};

/// Decode one file, reduce it and write its monthly mean into `output_dir`
pub fn process_file(source: &Path, output_dir: &Path) -> Result<FileOutcome> {
    let decoded = decode_file(source)?;
    let mean = monthly_mean(&decoded.grid)?;

    let output_file = monthly_mean_file_name(source)?;
    write_monthly_mean(&output_dir.join(&output_file), &mean)?;

    Ok(FileOutcome {
        source: decoded.path,
        output_file,
        metadata: decoded.metadata,
        days: decoded.grid.days(),
    })
}

/// Main processor for 1DD dataset conversion
#[derive(Debug)]
pub struct BatchProcessor {
    config: ProcessorConfig,
    file_discovery: FileDiscovery,
}

impl BatchProcessor {
    /// Create a new batch processor
    pub fn new(config: ProcessorConfig) -> Result<Self> {
        config.validate()?;

        if !config.input_dir.is_dir() {
            return Err(GpcpError::InputNotFound {
                path: config.input_dir.clone(),
            });
        }

        let file_discovery =
            FileDiscovery::new(config.input_dir.clone(), config.file_pattern.clone());

        Ok(Self {
            config,
            file_discovery,
        })
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Main processing entry point
    pub async fn process(&self) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        println!("{}", "Starting GPCP 1DD processing".bright_green().bold());
        println!(
            "  {} {}",
            "Input:".bright_cyan(),
            self.config.input_dir.display()
        );
        println!(
            "  {} {}",
            "Output:".bright_cyan(),
            self.config.output_dir.display()
        );

        // Step 1: Discover input files
        let files = self.file_discovery.discover_files()?;
        info!(
            "Found {} files matching {}",
            files.len(),
            self.config.file_pattern
        );

        // Step 2: Prepare the output directory
        self.prepare_output_dir().await?;

        // Step 3: Decode, reduce and write each file
        let (outcomes, failures) = self.process_files(&files).await;

        let files_failed = failures.len();
        if !self.config.keep_going {
            if let Some(first) = failures.into_iter().next() {
                return Err(first);
            }
        }

        // Step 4: Write the catalog
        let catalog_path = self.config.catalog_path();
        let rows = write_catalog(&catalog_path, &outcomes, &self.config.catalog_columns)?;
        info!("Catalog written to {} ({} rows)", catalog_path.display(), rows);

        let stats = ProcessingStats {
            files_processed: outcomes.len(),
            files_failed,
            output_path: self.config.output_dir.clone(),
            catalog_path: Some(catalog_path),
            processing_time_ms: start_time.elapsed().as_millis(),
        };
        self.report(&stats);

        Ok(stats)
    }

    /// Remove and recreate the output directory, or just ensure it exists
    async fn prepare_output_dir(&self) -> Result<()> {
        let output_dir = &self.config.output_dir;

        if self.config.clean_output && tokio::fs::try_exists(output_dir).await.unwrap_or(false) {
            warn!("Removing existing output directory {}", output_dir.display());
            tokio::fs::remove_dir_all(output_dir)
                .await
                .map_err(|e| GpcpError::io(output_dir, e))?;
        }

        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|e| GpcpError::io(output_dir, e))
    }

    /// Process files concurrently, returning outcomes and failures sorted by path
    ///
    /// Without `keep_going` no new file is started once one has failed. Files
    /// already handed to the blocking pool still finish writing their arrays.
    async fn process_files(&self, files: &[PathBuf]) -> (Vec<FileOutcome>, Vec<GpcpError>) {
        let pb = ProgressBar::new(files.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.set_message("Processing files");

        let workers = self.config.workers.max(1);
        let output_dir = self.config.output_dir.clone();

        let mut results = stream::iter(files.iter().cloned())
            .map(|path| {
                let output_dir = output_dir.clone();
                let pb = pb.clone();
                async move {
                    if let Some(file_name) = path.file_name() {
                        pb.set_message(format!("Processing: {}", file_name.to_string_lossy()));
                    }

                    let task_path = path.clone();
                    let result = task::spawn_blocking(move || process_file(&task_path, &output_dir))
                        .await
                        .unwrap_or_else(|e| {
                            Err(GpcpError::TaskFailed {
                                path: path.clone(),
                                reason: e.to_string(),
                            })
                        });
                    pb.inc(1);
                    (path, result)
                }
            })
            .buffer_unordered(workers);

        let mut outcomes = Vec::with_capacity(files.len());
        let mut failures: Vec<(PathBuf, GpcpError)> = Vec::new();
        while let Some((path, result)) = results.next().await {
            match result {
                Ok(outcome) => {
                    debug!("Successfully processed: {}", path.display());
                    outcomes.push(outcome);
                }
                Err(e) => {
                    error!("Failed to process {}: {}", path.display(), e);
                    failures.push((path, e));
                    if !self.config.keep_going {
                        warn!("Stopping after first failure");
                        break;
                    }
                }
            }
        }
        drop(results);

        if failures.is_empty() {
            pb.finish_with_message("Processing complete");
        } else if self.config.keep_going {
            pb.finish_with_message("Processing complete with failures");
        } else {
            pb.abandon_with_message("Processing aborted");
        }

        outcomes.sort_by(|a, b| a.source.cmp(&b.source));
        failures.sort_by(|a, b| a.0.cmp(&b.0));
        (outcomes, failures.into_iter().map(|(_, e)| e).collect())
    }

    fn report(&self, stats: &ProcessingStats) {
        println!("\n{}", "Processing Summary".bright_green().bold());
        println!(
            "  {} {}ms",
            "Time elapsed:".bright_cyan(),
            stats.processing_time_ms.to_string().bright_white()
        );
        println!(
            "  {} {}",
            "Files processed:".bright_cyan(),
            stats.files_processed.to_string().bright_white()
        );
        if stats.files_failed > 0 {
            println!(
                "  {} {}",
                "Files failed:".bright_red(),
                stats.files_failed.to_string().bright_red().bold()
            );
        }
        if let Some(catalog_path) = &stats.catalog_path {
            println!(
                "  {} {}",
                "Catalog:".bright_cyan(),
                catalog_path.display().to_string().bright_white()
            );
        }
    }
}
