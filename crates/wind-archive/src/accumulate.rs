//! Time-axis concatenation of per-file records.

use tracing::debug;

use crate::archive::SourceRecord;
use crate::error::{ArchiveError, Result};
use crate::grid::LatLonGrid;
use crate::time::BaseDate;

/// Merged wind series over all processed files.
///
/// `uwind`/`vwind` are `(time, lat, lon)` in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct AccumulatedSeries {
    base_date: BaseDate,
    grid: LatLonGrid,
    time: Vec<f64>,
    uwind: Vec<f32>,
    vwind: Vec<f32>,
    files: Vec<String>,
}

impl AccumulatedSeries {
    /// Build a series directly from merged arrays.
    pub fn new(
        base_date: BaseDate,
        grid: LatLonGrid,
        time: Vec<f64>,
        uwind: Vec<f32>,
        vwind: Vec<f32>,
    ) -> Result<Self> {
        let expected = time.len() * grid.len();
        if uwind.len() != expected || vwind.len() != expected {
            return Err(ArchiveError::ShapeMismatch(format!(
                "{} time steps on a {}x{} grid need {} values, got u={} v={}",
                time.len(),
                grid.rows(),
                grid.cols(),
                expected,
                uwind.len(),
                vwind.len()
            )));
        }
        Ok(Self {
            base_date,
            grid,
            time,
            uwind,
            vwind,
            files: Vec::new(),
        })
    }

    pub fn base_date(&self) -> BaseDate {
        self.base_date
    }

    pub fn grid(&self) -> &LatLonGrid {
        &self.grid
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn time_steps(&self) -> usize {
        self.time.len()
    }

    pub fn uwind(&self) -> &[f32] {
        &self.uwind
    }

    pub fn vwind(&self) -> &[f32] {
        &self.vwind
    }

    /// Input files folded in, in processing order.
    pub fn files(&self) -> &[String] {
        &self.files
    }
}

/// Folds [`SourceRecord`]s into an [`AccumulatedSeries`] in the order pushed.
///
/// The first record fixes the base date and grid; later records must agree on
/// both. Concatenation is purely positional: no sorting, overlap or gap checks.
#[derive(Debug, Default)]
pub struct Accumulator {
    series: Option<AccumulatedSeries>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: SourceRecord) -> Result<()> {
        let (filename, base_date, time, grid, uwind, vwind) = record.into_parts();

        let Some(series) = self.series.as_mut() else {
            debug!(file = %filename, time_steps = time.len(), "Starting series");
            self.series = Some(AccumulatedSeries {
                base_date,
                grid,
                time,
                uwind,
                vwind,
                files: vec![filename],
            });
            return Ok(());
        };

        if base_date != series.base_date {
            return Err(ArchiveError::BaseDateMismatch {
                expected: series.base_date,
                found: base_date,
            });
        }
        if grid.shape() != series.grid.shape() {
            return Err(ArchiveError::ShapeMismatch(format!(
                "grid is {}x{}, earlier files are {}x{}",
                grid.rows(),
                grid.cols(),
                series.grid.rows(),
                series.grid.cols()
            )));
        }

        debug!(
            file = %filename,
            time_steps = time.len(),
            total = series.time.len() + time.len(),
            "Appending to series"
        );
        series.time.extend(time);
        series.uwind.extend(uwind);
        series.vwind.extend(vwind);
        series.files.push(filename);
        Ok(())
    }

    /// Number of records pushed so far.
    pub fn file_count(&self) -> usize {
        self.series.as_ref().map_or(0, |s| s.files.len())
    }

    /// The merged series, or `None` if nothing was pushed.
    pub fn finish(self) -> Option<AccumulatedSeries> {
        self.series
    }
}
