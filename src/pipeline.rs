/*!
 * Batch pipeline: directory in, one spreadsheet per claimant out
 *
 * Scans an input directory for `.xlsx` exports, classifies each file by
 * name, extracts and normalizes the matched ones, and emits one output
 * file per claimant group. A file-shaped problem skips that file with a
 * notice and never fails the batch; only configuration defects abort.
 */

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::ClaimsConfig;
use crate::constants::{INPUT_EXTENSION, TEMP_FILE_MARKER};
use crate::data_types::ClaimantIdentity;
use crate::error::Result;
use crate::export::{emit, CsvSink, TabularSink};
use crate::extract::FieldExtractor;
use crate::group::process;
use crate::profiles::{Classification, ProfileRegistry, ProviderProfile};
use crate::reader::WorkbookSource;

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

/// Outcome counters for one batch run
#[derive(Debug, Default, Clone)]
pub struct BatchSummary {
    /// Spreadsheet files found in the input directory
    pub files_seen: usize,
    /// Files that matched a profile and produced output
    pub files_processed: usize,
    /// Files skipped: unmatched names plus recoverable per-file errors
    pub files_skipped: usize,
    /// Paths written, in emission order
    pub outputs: Vec<PathBuf>,
}

/// The batch pipeline, assembled with a builder
pub struct ClaimsPipeline {
    input_dir: PathBuf,
    registry: ProfileRegistry,
    sink: Box<dyn TabularSink>,
    config: ClaimsConfig,
}

impl ClaimsPipeline {
    /// Pipeline over `input_dir` with the shipped profiles and CSV sink
    pub fn new<P: AsRef<Path>>(input_dir: P) -> Result<Self> {
        Ok(Self {
            input_dir: input_dir.as_ref().to_path_buf(),
            registry: ProfileRegistry::standard()?,
            sink: Box::new(CsvSink::new()),
            config: ClaimsConfig::load(),
        })
    }

    /// Replace the profile registry
    pub fn with_registry(mut self, registry: ProfileRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the output sink
    pub fn with_sink(mut self, sink: Box<dyn TabularSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: ClaimsConfig) -> Self {
        self.config = config;
        self
    }

    /// Where outputs land: the configured directory, resolved against the
    /// input directory when relative
    pub fn output_dir(&self) -> PathBuf {
        if self.config.output_dir.is_absolute() {
            self.config.output_dir.clone()
        } else {
            self.input_dir.join(&self.config.output_dir)
        }
    }

    /// Run the whole batch
    pub fn run(&mut self) -> Result<BatchSummary> {
        let inputs = self.scan_input_dir()?;
        let output_dir = self.output_dir();
        std::fs::create_dir_all(&output_dir)?;

        let mut summary = BatchSummary {
            files_seen: inputs.len(),
            ..BatchSummary::default()
        };
        // Stems already written this run, for collision suffixing
        let mut used_stems: HashMap<String, usize> = HashMap::new();

        #[cfg(feature = "progress")]
        let progress_bar = if self.config.enable_progress_bar {
            let pb = ProgressBar::new(inputs.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap()
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        for path in &inputs {
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();

            #[cfg(feature = "progress")]
            if let Some(pb) = &progress_bar {
                pb.set_message(file_name.to_string());
            }

            match self.registry.classify(file_name) {
                Classification::Skip => {
                    if self.config.verbose_skips {
                        println!("Ignoring invalid file: {}", file_name);
                    }
                    summary.files_skipped += 1;
                }
                Classification::Matched(profile) => {
                    let profile = profile.clone();
                    match self.process_file(path, &profile, &output_dir, &mut used_stems) {
                        Ok(outputs) => {
                            summary.files_processed += 1;
                            summary.outputs.extend(outputs);
                        }
                        Err(e) if e.is_recoverable() && !self.config.halt_on_file_error => {
                            eprintln!("Ignoring invalid file: {} ({})", file_name, e);
                            summary.files_skipped += 1;
                        }
                        Err(e) => return Err(e),
                    }
                }
            }

            #[cfg(feature = "progress")]
            if let Some(pb) = &progress_bar {
                pb.inc(1);
            }
        }

        #[cfg(feature = "progress")]
        if let Some(pb) = &progress_bar {
            pb.finish_and_clear();
        }

        println!(
            "Processed {} of {} file(s), {} skipped, {} output file(s) written to {}",
            summary.files_processed,
            summary.files_seen,
            summary.files_skipped,
            summary.outputs.len(),
            output_dir.display()
        );

        Ok(summary)
    }

    /// Spreadsheet files in the input directory, sorted by name so runs
    /// are deterministic. Editor lock files (`~$` prefix) and
    /// subdirectories are ignored.
    fn scan_input_dir(&self) -> Result<Vec<PathBuf>> {
        if !self.input_dir.is_dir() {
            return Err(crate::ClaimsError::file_not_found(self.input_dir.clone()));
        }

        let mut inputs: Vec<PathBuf> = Vec::new();
        for entry in std::fs::read_dir(&self.input_dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.starts_with(TEMP_FILE_MARKER) {
                continue;
            }
            if path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case(INPUT_EXTENSION))
                .unwrap_or(false)
            {
                inputs.push(path);
            }
        }
        inputs.sort();
        Ok(inputs)
    }

    /// Normalize one matched file and emit its claimant groups.
    ///
    /// Errors returned here are file-scoped; the caller decides whether
    /// they skip the file or halt the batch.
    fn process_file(
        &self,
        path: &Path,
        profile: &ProviderProfile,
        output_dir: &Path,
        used_stems: &mut HashMap<String, usize>,
    ) -> Result<Vec<PathBuf>> {
        let mut source = WorkbookSource::open(path)?;
        let records = FieldExtractor::new().extract(&mut source, profile)?;
        let groups = process(records, &profile.provider_name);

        if groups.is_empty() {
            println!(
                "No claims with a claim number in {}; nothing to write",
                path.display()
            );
            return Ok(Vec::new());
        }

        let mut outputs = Vec::with_capacity(groups.len());
        for group in &groups {
            let identity = self.disambiguate(&group.identity, used_stems);
            let output = emit(
                self.sink.as_ref(),
                output_dir,
                &identity,
                &profile.sheet_name,
                &group.records,
            )?;
            outputs.push(output);
        }
        Ok(outputs)
    }

    /// Resolve output-name collisions across the batch: the first claimant
    /// keeps the plain stem, later identical stems get `_2`, `_3`, ...
    fn disambiguate(
        &self,
        identity: &ClaimantIdentity,
        used_stems: &mut HashMap<String, usize>,
    ) -> ClaimantIdentity {
        let stem = identity.file_stem();
        let count = used_stems.entry(stem).or_insert(0);
        *count += 1;

        if *count == 1 {
            identity.clone()
        } else {
            let mut identity = identity.clone();
            identity.last_name = format!("{}_{}", identity.last_name, count);
            identity
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::RenderedTable;
    use std::sync::{Arc, Mutex};

    /// Sink that records what it was asked to write
    #[derive(Clone, Default)]
    struct RecordingSink {
        writes: Arc<Mutex<Vec<(PathBuf, String, usize)>>>,
    }

    impl TabularSink for RecordingSink {
        fn write_sheet(
            &self,
            path: &Path,
            sheet_name: &str,
            table: &RenderedTable,
            _column_widths: &[usize],
        ) -> Result<()> {
            self.writes.lock().unwrap().push((
                path.to_path_buf(),
                sheet_name.to_string(),
                table.rows.len(),
            ));
            Ok(())
        }

        fn extension(&self) -> &'static str {
            "csv"
        }
    }

    fn quiet_config() -> ClaimsConfig {
        crate::config::ConfigBuilder::new()
            .progress_bar(false)
            .verbose_skips(false)
            .build()
    }

    #[test]
    fn test_scan_skips_lock_files_and_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("DOE_jan.xlsx"), b"").unwrap();
        std::fs::write(dir.path().join("~$DOE_jan.xlsx"), b"").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"").unwrap();
        std::fs::create_dir(dir.path().join("archive.xlsx")).unwrap();

        let pipeline = ClaimsPipeline::new(dir.path())
            .unwrap()
            .with_config(quiet_config());
        let inputs = pipeline.scan_input_dir().unwrap();
        assert_eq!(inputs.len(), 1);
        assert!(inputs[0].ends_with("DOE_jan.xlsx"));
    }

    #[test]
    fn test_unmatched_files_are_skipped_not_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("random_export.xlsx"), b"").unwrap();

        let summary = ClaimsPipeline::new(dir.path())
            .unwrap()
            .with_config(quiet_config())
            .run()
            .unwrap();
        assert_eq!(summary.files_seen, 1);
        assert_eq!(summary.files_skipped, 1);
        assert_eq!(summary.files_processed, 0);
        assert!(summary.outputs.is_empty());
    }

    #[test]
    fn test_unreadable_matched_file_is_a_recoverable_skip() {
        let dir = tempfile::tempdir().unwrap();
        // Matches the PRACTICE token but is not a real workbook.
        std::fs::write(dir.path().join("DOE_jan.xlsx"), b"not a workbook").unwrap();

        let summary = ClaimsPipeline::new(dir.path())
            .unwrap()
            .with_config(quiet_config())
            .run()
            .unwrap();
        assert_eq!(summary.files_skipped, 1);
        assert_eq!(summary.files_processed, 0);
    }

    #[test]
    fn test_halt_on_file_error_propagates() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("DOE_jan.xlsx"), b"not a workbook").unwrap();

        let config = crate::config::ConfigBuilder::new()
            .progress_bar(false)
            .halt_on_file_error(true)
            .build();
        let result = ClaimsPipeline::new(dir.path())
            .unwrap()
            .with_config(config)
            .run();
        assert!(result.is_err());
    }

    #[test]
    fn test_output_dir_resolves_under_input_dir() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = ClaimsPipeline::new(dir.path())
            .unwrap()
            .with_config(quiet_config());
        assert_eq!(pipeline.output_dir(), dir.path().join("Output"));
    }

    #[test]
    fn test_disambiguate_suffixes_second_and_third_use() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = ClaimsPipeline::new(dir.path())
            .unwrap()
            .with_config(quiet_config());
        let identity = ClaimantIdentity {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            provider: "PRACTICE".into(),
        };
        let mut used = HashMap::new();

        assert_eq!(
            pipeline.disambiguate(&identity, &mut used).file_stem(),
            "PRACTICE_Jane_Doe"
        );
        assert_eq!(
            pipeline.disambiguate(&identity, &mut used).file_stem(),
            "PRACTICE_Jane_Doe_2"
        );
        assert_eq!(
            pipeline.disambiguate(&identity, &mut used).file_stem(),
            "PRACTICE_Jane_Doe_3"
        );
    }

    #[test]
    fn test_run_creates_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        ClaimsPipeline::new(dir.path())
            .unwrap()
            .with_config(quiet_config())
            .with_sink(Box::new(RecordingSink::default()))
            .run()
            .unwrap();
        assert!(dir.path().join("Output").is_dir());
    }
}
