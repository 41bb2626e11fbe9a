//! ERA5 files pre-converted to sflux variable names.
//!
//! The time axis carries its own origin in the `units` attribute
//! (`"days since 2020-01-01"`); no calendar conversion happens here.

use netcdf_store::GridSource;
use tracing::debug;

use super::{read_grid, read_time_axis, read_winds, SourceRecord, VariableNames};
use crate::error::{ArchiveError, Result};
use crate::time::TimeUnits;

pub(super) fn extract(
    filename: &str,
    source: &dyn GridSource,
    variables: &VariableNames,
) -> Result<SourceRecord> {
    let units_text = source
        .attribute_text(&variables.time, "units")?
        .ok_or_else(|| ArchiveError::InvalidUnits {
            units: String::new(),
            reason: format!("time variable '{}' has no units attribute", variables.time),
        })?;
    let units = TimeUnits::parse(&units_text)?;

    // The day-count normalization only sees the date, so a reference hour is
    // moved into the time values and the record starts at midnight.
    let hour_offset = units.base.hour_fraction();
    let time: Vec<f64> = units
        .to_days(&read_time_axis(source, &variables.time)?)
        .into_iter()
        .map(|t| t + hour_offset)
        .collect();
    let base_date = units.base.at_midnight();

    let grid = read_grid(source, variables)?;
    let (uwind, vwind) = read_winds(source, variables, time.len(), &grid)?;

    debug!(
        file = filename,
        units = %units_text,
        time_steps = time.len(),
        "Read ERA5 file"
    );

    SourceRecord::new(filename, base_date, time, grid, uwind, vwind)
}
