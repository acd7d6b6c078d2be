/*!
 * Application controller orchestrating the translation pipeline.
 *
 * Runs the per-document pipeline (read, parse, detect, flag, plan,
 * translate, reassemble, write) and the folder workflow around it:
 * recursive discovery, skip/force logic, progress reporting, and the
 * combined review log.
 */

use std::path::{Path, PathBuf};
use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::glossary::Glossary;
use crate::phase::{
    AmbiguityFlagger, PhaseBoundary, PhaseBoundaryDetector, PhaseLexicon, ReviewLogBuilder,
};
use crate::providers::Provider;
use crate::subtitle_processor::SubtitleCollection;
use crate::translation::{BatchTranslator, Reassembler, SubtitleDocument};
use crate::translation::planner::{BatchPlanner, PlannerConfig};

/// Per-run options resolved from the CLI
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Explicit output path (single-file runs only)
    pub output: Option<PathBuf>,

    /// Where to write the review log; absent means no log
    pub review_log: Option<PathBuf>,

    /// Run the pure pipeline stages and report the plan without
    /// calling the provider or writing output
    pub dry_run: bool,

    /// Re-translate files whose output already exists
    pub force: bool,

    /// Restrict a directory run to the named file, implying overwrite
    pub reprocess: Option<String>,
}

/// Summary of one processed document
#[derive(Debug, Clone)]
pub struct DocumentReport {
    pub input: PathBuf,
    pub boundary: PhaseBoundary,
    pub window_count: usize,
    pub flag_count: usize,
    pub translated_cues: usize,
    pub failed_windows: Vec<usize>,
}

/// Summary of a whole run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub processed: Vec<DocumentReport>,
    pub skipped: usize,
    pub failed_documents: Vec<(PathBuf, String)>,
}

impl RunReport {
    /// Whether every document and every window succeeded
    pub fn is_clean(&self) -> bool {
        self.failed_documents.is_empty()
            && self.processed.iter().all(|d| d.failed_windows.is_empty())
    }
}

// @struct: Controller
// Owns the pipeline components for a run
pub struct Controller<P: Provider> {
    config: Config,
    glossary: Glossary,
    lexicon: PhaseLexicon,
    translator: Option<BatchTranslator<P>>,
}

impl<P: Provider> Controller<P> {
    /// Create a controller. `translator` is `None` for dry runs, which
    /// never contact a provider.
    pub fn new(
        config: Config,
        glossary: Glossary,
        lexicon: PhaseLexicon,
        translator: Option<BatchTranslator<P>>,
    ) -> Self {
        Self {
            config,
            glossary,
            lexicon,
            translator,
        }
    }

    /// Run on a file or directory
    pub async fn run(&self, input: &Path, options: &RunOptions) -> Result<RunReport> {
        if FileManager::dir_exists(input) {
            self.run_folder(input, options).await
        } else if FileManager::file_exists(input) {
            self.run_single(input, options).await
        } else {
            Err(anyhow!("Input path not found: {}", input.display()))
        }
    }

    async fn run_single(&self, input: &Path, options: &RunOptions) -> Result<RunReport> {
        let mut report = RunReport::default();
        let mut review_sections = Vec::new();

        match self.process_document(input, options).await {
            Ok((doc_report, review)) => {
                review_sections.push((input.to_path_buf(), review));
                report.processed.push(doc_report);
            }
            Err(e) => {
                error!("Failed to process {}: {:#}", input.display(), e);
                report
                    .failed_documents
                    .push((input.to_path_buf(), format!("{:#}", e)));
            }
        }

        self.write_review_log(options, &review_sections)?;
        Ok(report)
    }

    async fn run_folder(&self, input: &Path, options: &RunOptions) -> Result<RunReport> {
        let mut files = FileManager::find_srt_files(input)?;

        if let Some(name) = &options.reprocess {
            files.retain(|f| {
                f.file_name()
                    .map(|n| n.to_string_lossy() == name.as_str())
                    .unwrap_or(false)
            });
            if files.is_empty() {
                return Err(anyhow!(
                    "No subtitle file named '{}' found under {}",
                    name,
                    input.display()
                ));
            }
        }

        let overwrite = options.force || options.reprocess.is_some();
        let mut report = RunReport::default();
        let mut review_sections = Vec::new();

        let progress = ProgressBar::new(files.len() as u64);
        progress.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
        );

        for file in files {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            progress.set_message(name);

            let output = FileManager::output_path_for(&file);
            if !overwrite && FileManager::file_exists(&output) {
                info!("Skipping {} (output exists)", file.display());
                report.skipped += 1;
                progress.inc(1);
                continue;
            }

            match self.process_document(&file, options).await {
                Ok((doc_report, review)) => {
                    review_sections.push((file.clone(), review));
                    report.processed.push(doc_report);
                }
                Err(e) => {
                    error!("Failed to process {}: {:#}", file.display(), e);
                    report.failed_documents.push((file, format!("{:#}", e)));
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        self.write_review_log(options, &review_sections)?;
        Ok(report)
    }

    /// Run the full pipeline on one document
    async fn process_document(
        &self,
        input: &Path,
        options: &RunOptions,
    ) -> Result<(DocumentReport, String)> {
        let content = FileManager::read_subtitle_file(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;
        let entries = SubtitleCollection::parse_srt_string(&content)
            .with_context(|| format!("Malformed subtitle file {}", input.display()))?;

        let detector = PhaseBoundaryDetector::default();
        let (boundary, boundary_flags) = detector.detect(&entries, &self.lexicon);

        let flagger = AmbiguityFlagger::default();
        let ambiguity_flags = flagger.flag(&entries, &self.lexicon);

        let mut review = ReviewLogBuilder::new();
        review.add_flags(boundary_flags.iter().cloned());
        review.add_flags(ambiguity_flags.iter().cloned());

        let collection = SubtitleCollection {
            source_file: input.to_path_buf(),
            entries,
        };
        let mut document = SubtitleDocument::from_collection(&collection);
        document.attach_flags(&boundary_flags);
        document.attach_flags(&ambiguity_flags);

        let planner = BatchPlanner::new(PlannerConfig {
            batch_size: self.config.translation.batch_size,
            overlap: self.config.translation.overlap,
        });
        let windows = planner.plan(&mut document, &boundary)?;

        let review_text = review.build(&boundary);

        if options.dry_run {
            info!(
                "Dry run for {}: boundary {:?} ({}), {} windows, {} flags",
                input.display(),
                boundary.boundary_cue_index,
                boundary.confidence_source,
                windows.len(),
                review.flag_count()
            );
            return Ok((
                DocumentReport {
                    input: input.to_path_buf(),
                    boundary,
                    window_count: windows.len(),
                    flag_count: review.flag_count(),
                    translated_cues: 0,
                    failed_windows: Vec::new(),
                },
                review_text,
            ));
        }

        let translator = self
            .translator
            .as_ref()
            .ok_or_else(|| anyhow!("No translation provider configured"))?;
        let outcome = translator
            .translate_all(&document, &windows, &self.glossary)
            .await;
        let merge = Reassembler::merge(&mut document, windows.len(), &outcome.successes);

        for (index, e) in &outcome.failures {
            warn!("{}: window {} failed: {}", input.display(), index, e);
        }

        let output = options
            .output
            .clone()
            .unwrap_or_else(|| FileManager::output_path_for(input));
        let translated = SubtitleCollection {
            source_file: output.clone(),
            entries: document.to_entries(),
        };
        FileManager::write_atomic(&output, &translated.to_srt_string())
            .with_context(|| format!("Failed to write {}", output.display()))?;

        info!(
            "{}: boundary {:?} ({}), {} windows, {} cues translated, {} flags, {} window failures",
            input.display(),
            boundary.boundary_cue_index,
            boundary.confidence_source,
            windows.len(),
            merge.translated_cues,
            review.flag_count(),
            merge.failed_windows.len()
        );

        Ok((
            DocumentReport {
                input: input.to_path_buf(),
                boundary,
                window_count: windows.len(),
                flag_count: review.flag_count(),
                translated_cues: merge.translated_cues,
                failed_windows: merge.failed_windows,
            },
            review_text,
        ))
    }

    /// Write the combined review log: one titled section per document
    fn write_review_log(
        &self,
        options: &RunOptions,
        sections: &[(PathBuf, String)],
    ) -> Result<()> {
        let Some(path) = &options.review_log else {
            return Ok(());
        };
        if sections.is_empty() {
            return Ok(());
        }

        let mut content = String::new();
        for (file, section) in sections {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| file.display().to_string());
            content.push_str(&format!("--- {} ---\n", name));
            content.push_str(section);
            content.push('\n');
        }

        FileManager::write_to_file(path, &content)
            .with_context(|| format!("Failed to write review log {}", path.display()))?;
        info!("Review log written to {}", path.display());
        Ok(())
    }
}
