//! GFS files with time in seconds since 1970-01-01 and 1-D coordinates.

use netcdf_store::GridSource;

use super::{read_grid, read_time_axis, read_winds, SourceRecord, VariableNames};
use crate::error::Result;
use crate::time::{BaseDate, TimeUnit};

pub(super) fn extract(
    filename: &str,
    source: &dyn GridSource,
    variables: &VariableNames,
) -> Result<SourceRecord> {
    let per_day = TimeUnit::Seconds.per_day();
    let time: Vec<f64> = read_time_axis(source, &variables.time)?
        .into_iter()
        .map(|seconds| seconds / per_day)
        .collect();

    let grid = read_grid(source, variables)?;
    let (uwind, vwind) = read_winds(source, variables, time.len(), &grid)?;

    SourceRecord::new(filename, BaseDate::unix_epoch(), time, grid, uwind, vwind)
}
