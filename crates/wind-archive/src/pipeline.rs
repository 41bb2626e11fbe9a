//! End-to-end merge: scan, adapt, accumulate, write.

use std::path::{Path, PathBuf};

use netcdf_store::NetcdfSource;
use tracing::info;

use crate::accumulate::Accumulator;
use crate::archive::{ArchiveSource, SourceRecord, VariableNames};
use crate::error::{ArchiveError, Result};
use crate::scan::list_input_files;
use crate::time::BaseDate;
use crate::writer::{write_sflux, DEFAULT_OUTPUT};

/// Default input file extension.
pub const DEFAULT_EXTENSION: &str = "nc";

/// One merge run.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeJob {
    pub source: ArchiveSource,
    pub variables: VariableNames,
    pub input_dir: PathBuf,
    pub extension: String,
    pub output: PathBuf,
}

impl MergeJob {
    /// A job reading `*.nc` from the current directory into `sflux_air.ww3.nc`.
    pub fn new(source: ArchiveSource) -> Self {
        Self {
            source,
            variables: source.default_variables(),
            input_dir: PathBuf::from("."),
            extension: DEFAULT_EXTENSION.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }

    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = dir.into();
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_variables(mut self, variables: VariableNames) -> Self {
        self.variables = variables;
        self
    }
}

/// Outcome of a successful merge.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeSummary {
    pub output: PathBuf,
    pub files: Vec<String>,
    pub time_steps: usize,
    pub rows: usize,
    pub cols: usize,
    /// Base date written to the output (always in 1900).
    pub base_date: BaseDate,
}

/// Run a merge job.
///
/// Any failure aborts the whole batch; the output path is only replaced after
/// every input has been read and the new file is complete.
pub fn run(job: &MergeJob) -> Result<MergeSummary> {
    info!(archive = %job.source, "Converting wind data from {} archive", job.source);

    let files = list_input_files(&job.input_dir, &job.extension, Some(&job.output))?;
    if files.is_empty() {
        return Err(ArchiveError::NoInputFiles {
            dir: job.input_dir.clone(),
            extension: job.extension.clone(),
        });
    }
    info!(count = files.len(), dir = %job.input_dir.display(), "Found input files");

    let mut accumulator = Accumulator::new();
    for path in &files {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let record = read_record(job, path, &filename).map_err(|e| e.in_file(&filename))?;
        info!(
            file = %filename,
            time_steps = record.time_steps(),
            base_date = %record.base_date(),
            "Read input file"
        );
        accumulator.push(record).map_err(|e| e.in_file(&filename))?;
    }

    let series = accumulator.finish().ok_or_else(|| ArchiveError::NoInputFiles {
        dir: job.input_dir.clone(),
        extension: job.extension.clone(),
    })?;
    let written = write_sflux(&job.output, &series)?;

    Ok(MergeSummary {
        output: written.path,
        files: series.files().to_vec(),
        time_steps: written.time_steps,
        rows: series.grid().rows(),
        cols: series.grid().cols(),
        base_date: written.base_date,
    })
}

/// Open, extract and close one input file.
fn read_record(job: &MergeJob, path: &Path, filename: &str) -> Result<SourceRecord> {
    let source = NetcdfSource::open(path)?;
    job.source.extract(filename, &source, &job.variables)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_defaults() {
        let job = MergeJob::new(ArchiveSource::Gfs);
        assert_eq!(job.input_dir, PathBuf::from("."));
        assert_eq!(job.extension, "nc");
        assert_eq!(job.output, PathBuf::from("sflux_air.ww3.nc"));
        assert_eq!(job.variables, ArchiveSource::Gfs.default_variables());
    }

    #[test]
    fn test_empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let job = MergeJob::new(ArchiveSource::Era5)
            .with_input_dir(dir.path())
            .with_output(dir.path().join(DEFAULT_OUTPUT));
        let err = run(&job).unwrap_err();
        assert!(matches!(err, ArchiveError::NoInputFiles { .. }));
        assert!(!dir.path().join(DEFAULT_OUTPUT).exists());
    }
}
