//! Conversion of a whole directory of RFC text files.
//!
//! Every `rfc<number>.txt` in the input directory becomes
//! `rfc<zero-padded number>.pdf` in the output directory. Files are converted
//! in parallel; a failing file is reported and never stops the others.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use rayon::prelude::*;

use crate::builder::RfcPdfBuilder;
use crate::error::ConvertError;
use crate::index::{pad_rfc_name, RfcIndex, PADDED_NAME_LEN};

/// A single file scheduled for conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchJob {
    /// RFC text file.
    pub input: PathBuf,
    /// PDF file to create.
    pub output: PathBuf,
    /// Padded name, e.g. `rfc0013`.
    pub name: String,
}

/// Files found in the input directory, split into work and skipped files.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchPlan {
    /// Files to convert, sorted by input path.
    pub jobs: Vec<BatchJob>,
    /// Input files that are not RFCs, whose PDF already exists, or whose PDF
    /// another input already produces.
    pub skipped: Vec<PathBuf>,
}

/// A file that could not be converted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchFailure {
    /// RFC text file.
    pub input: PathBuf,
    /// Description of the error.
    pub reason: String,
}

/// Outcome of a batch run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// PDFs written.
    pub converted: Vec<PathBuf>,
    /// Input files left alone.
    pub skipped: Vec<PathBuf>,
    /// Files that failed.
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    /// Whether every scheduled file was converted.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Returns the file stem of an RFC text file name (`rfc13.txt` gives
/// `rfc13`), or `None` when the name does not match `rfc*.txt`.
fn rfc_stem(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(".txt")
        .filter(|stem| stem.starts_with("rfc"))
}

/// Whether `stem` names a single numbered RFC, like `rfc13` or `rfc9876`.
///
/// Longer stems such as `rfc12345` or `rfc1234a` are other files that happen
/// to share the prefix.
pub fn is_rfc_stem(stem: &str) -> bool {
    let Some(number) = stem.strip_prefix("rfc") else {
        return false;
    };
    stem.len() <= PADDED_NAME_LEN
        && !number.is_empty()
        && number.chars().all(|ch| ch.is_ascii_digit())
}

/// Scans `input_dir` for RFC text files and decides which to convert.
pub fn plan(input_dir: &Path, output_dir: &Path) -> Result<BatchPlan, ConvertError> {
    let entries = fs::read_dir(input_dir).map_err(|source| ConvertError::io(input_dir, source))?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ConvertError::io(input_dir, source))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(stem) = entry.file_name().to_str().and_then(rfc_stem).map(str::to_owned) else {
            continue;
        };
        candidates.push((path, stem));
    }
    candidates.sort();

    let mut plan = BatchPlan::default();
    let mut scheduled = HashSet::new();
    for (input, stem) in candidates {
        if !is_rfc_stem(&stem) {
            info!("Skipping {}", input.display());
            plan.skipped.push(input);
            continue;
        }

        let name = pad_rfc_name(&stem);
        let output = output_dir.join(format!("{name}.pdf"));
        if output.exists() {
            info!("Skipping existing file {}", output.display());
            plan.skipped.push(input);
            continue;
        }

        // `rfc13.txt` and `rfc013.txt` both become `rfc0013.pdf`.
        if !scheduled.insert(output.clone()) {
            warn!(
                "Skipping {}: {} is already produced from another file",
                input.display(),
                output.display()
            );
            plan.skipped.push(input);
            continue;
        }

        plan.jobs.push(BatchJob {
            input,
            output,
            name,
        });
    }

    Ok(plan)
}

fn convert_job(
    job: &BatchJob,
    builder: &RfcPdfBuilder,
    index: Option<&RfcIndex>,
) -> Result<(), String> {
    let builder = match index {
        Some(index) => {
            let entry = index
                .get(&job.name)
                .ok_or_else(|| format!("{} is not listed in the RFC index", job.name.to_uppercase()))?;
            builder.clone().with_metadata(entry.metadata())
        }
        None => builder.clone(),
    };

    builder
        .convert_file(&job.input, &job.output)
        .map(|_| ())
        .map_err(|err| err.to_string())
}

/// Converts every RFC in `input_dir` into `output_dir`.
///
/// `builder` supplies the options shared by all files. When `index` is given,
/// each PDF gets the title, authors and keywords listed there. `jobs` limits
/// the number of worker threads; by default one per CPU is used.
pub fn convert_directory(
    input_dir: &Path,
    output_dir: &Path,
    builder: &RfcPdfBuilder,
    index: Option<&RfcIndex>,
    jobs: Option<usize>,
) -> Result<BatchReport, ConvertError> {
    builder.options().validate()?;
    fs::create_dir_all(output_dir).map_err(|source| ConvertError::io(output_dir, source))?;

    let plan = plan(input_dir, output_dir)?;
    info!(
        "Converting {} RFCs from {} ({} skipped)",
        plan.jobs.len(),
        input_dir.display(),
        plan.skipped.len()
    );

    let run = || -> Vec<(PathBuf, Result<(), String>)> {
        plan.jobs
            .par_iter()
            .map(|job| {
                info!("Processing {}", job.input.display());
                (job.output.clone(), convert_job(job, builder, index))
            })
            .collect()
    };

    let outcomes = match jobs {
        Some(threads) if threads > 0 => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|err| ConvertError::InvalidConfig(format!("cannot start worker threads: {err}")))?
            .install(run),
        _ => run(),
    };

    let mut report = BatchReport {
        skipped: plan.skipped,
        ..BatchReport::default()
    };
    for (job, (output, outcome)) in plan.jobs.iter().zip(outcomes) {
        match outcome {
            Ok(()) => report.converted.push(output),
            Err(reason) => {
                warn!(
                    "There was an error with {} and the PDF couldn't be generated: {}",
                    job.input.display(),
                    reason
                );
                report.failed.push(BatchFailure {
                    input: job.input.clone(),
                    reason,
                });
            }
        }
    }

    info!(
        "Batch finished: {} converted, {} skipped, {} failed",
        report.converted.len(),
        report.skipped.len(),
        report.failed.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::write(path, "x\n").unwrap();
    }

    #[test]
    fn recognises_rfc_stems() {
        assert_eq!(rfc_stem("rfc13.txt"), Some("rfc13"));
        assert_eq!(rfc_stem("rfc13.pdf"), None);
        assert_eq!(rfc_stem("notes.txt"), None);

        assert!(is_rfc_stem("rfc1"));
        assert!(is_rfc_stem("rfc9876"));
        assert!(!is_rfc_stem("rfc12345"));
        assert!(!is_rfc_stem("rfc12a"));
        assert!(!is_rfc_stem("rfc"));
        assert!(!is_rfc_stem("rfc-index"));
    }

    #[test]
    fn plan_pads_names_and_skips() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        for name in ["rfc13.txt", "rfc9876.txt", "rfc12345.txt", "rfc-index.txt", "README.txt"] {
            touch(&input.path().join(name));
        }
        touch(&output.path().join("rfc9876.pdf"));

        let plan = plan(input.path(), output.path()).unwrap();

        assert_eq!(
            plan.jobs,
            vec![BatchJob {
                input: input.path().join("rfc13.txt"),
                output: output.path().join("rfc0013.pdf"),
                name: "rfc0013".to_string(),
            }]
        );
        assert_eq!(
            plan.skipped,
            vec![
                input.path().join("rfc-index.txt"),
                input.path().join("rfc12345.txt"),
                input.path().join("rfc9876.txt"),
            ]
        );
    }

    #[test]
    fn plan_schedules_each_output_once() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        for name in ["rfc13.txt", "rfc013.txt", "rfc0013.txt"] {
            touch(&input.path().join(name));
        }

        let plan = plan(input.path(), output.path()).unwrap();

        assert_eq!(
            plan.jobs,
            vec![BatchJob {
                input: input.path().join("rfc0013.txt"),
                output: output.path().join("rfc0013.pdf"),
                name: "rfc0013".to_string(),
            }]
        );
        assert_eq!(
            plan.skipped,
            vec![input.path().join("rfc013.txt"), input.path().join("rfc13.txt")]
        );
    }

    #[test]
    fn missing_index_entry_fails_only_that_file() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        touch(&input.path().join("rfc13.txt"));

        let index = RfcIndex::parse("<rfc-index></rfc-index>").unwrap();
        let report = convert_directory(
            input.path(),
            &output.path().join("pdf"),
            &RfcPdfBuilder::new(),
            Some(&index),
            Some(1),
        )
        .unwrap();

        assert!(report.converted.is_empty());
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].reason.contains("RFC0013"));
        assert!(output.path().join("pdf").is_dir());
    }

    #[test]
    fn unreadable_input_directory_is_an_io_error() {
        let output = tempfile::tempdir().unwrap();
        let err = plan(&output.path().join("missing"), output.path()).unwrap_err();
        assert!(matches!(err, ConvertError::Io { .. }));
    }
}
