//! CFSR/CFSv2 files with packed `YYYYMMDDHH` valid times and 1-D coordinates.

use netcdf_store::GridSource;
use tracing::debug;

use super::{read_grid, read_winds, SourceRecord, VariableNames};
use crate::error::Result;
use crate::time::{days_since, parse_packed_timestamp, BaseDate};

pub(super) fn extract(
    filename: &str,
    source: &dyn GridSource,
    variables: &VariableNames,
) -> Result<SourceRecord> {
    let epoch = BaseDate::julian_epoch();
    let time = source
        .read_text_records(&variables.time)?
        .iter()
        .map(|stamp| parse_packed_timestamp(stamp).map(|dt| days_since(dt, epoch)))
        .collect::<Result<Vec<f64>>>()?;

    if let Some(first) = time.first() {
        debug!(file = filename, first_time = first, "First CFSR time step");
    }

    let grid = read_grid(source, variables)?;
    let (uwind, vwind) = read_winds(source, variables, time.len(), &grid)?;

    SourceRecord::new(filename, epoch, time, grid, uwind, vwind)
}
