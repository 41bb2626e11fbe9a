//! Merge surface-wind archives into a WAVEWATCH III `sflux_air` forcing file.
//!
//! # Pipeline
//!
//! 1. [`scan::list_input_files`] lists `*.nc` files in name order
//! 2. an [`ArchiveSource`] adapter turns each file into a [`SourceRecord`]
//! 3. the [`Accumulator`] concatenates records along time
//! 4. [`write_sflux`] writes the merged series, moving the time axis onto the
//!    1900-01-01 epoch when needed
//!
//! [`pipeline::run`] chains the four steps for a [`MergeJob`].
//!
//! File names must sort chronologically: processing order is name order and
//! concatenation does not look at the time values.

pub mod accumulate;
pub mod archive;
pub mod error;
pub mod grid;
pub mod pipeline;
pub mod scan;
pub mod time;
pub mod writer;

// Re-exports
pub use accumulate::{AccumulatedSeries, Accumulator};
pub use archive::{ArchiveSource, SourceRecord, VariableNames, VariableOverrides};
pub use error::{ArchiveError, Result};
pub use grid::LatLonGrid;
pub use pipeline::{run, MergeJob, MergeSummary};
pub use time::{time_to_julian, BaseDate, TimeUnits};
pub use writer::{write_sflux, SfluxOutput, DEFAULT_OUTPUT};
