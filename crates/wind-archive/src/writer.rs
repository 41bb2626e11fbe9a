//! Writer for the merged WAVEWATCH III `sflux_air` forcing file.
//!
//! # Output layout
//!
//! ```text
//! :Conventions = "CF-1.0"
//! dimensions: time, lon, lat
//! double time(time)        long_name, standard_name, units, base_date, calendar
//! float  lon(lat, lon)     long_name, standard_name, units
//! float  lat(lat, lon)     long_name, standard_name, units
//! float  uwind(time, lat, lon)
//! float  vwind(time, lat, lon)
//! ```
//!
//! The file is written under a temporary name next to the destination and
//! renamed into place once closed, so a failed run never clobbers an earlier
//! output.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::accumulate::AccumulatedSeries;
use crate::error::{ArchiveError, Result};
use crate::grid::LatLonGrid;
use crate::time::{time_to_julian, BaseDate};

/// Default output file name.
pub const DEFAULT_OUTPUT: &str = "sflux_air.ww3.nc";

/// Metadata of a written forcing file.
#[derive(Debug, Clone, PartialEq)]
pub struct SfluxOutput {
    pub path: PathBuf,
    /// Base date of the written time axis.
    pub base_date: BaseDate,
    pub time_steps: usize,
}

struct VariableMeta {
    name: &'static str,
    long_name: &'static str,
    standard_name: &'static str,
    units: &'static str,
}

const LON: VariableMeta = VariableMeta {
    name: "lon",
    long_name: "Longitude",
    standard_name: "longitude",
    units: "degrees_east",
};

const LAT: VariableMeta = VariableMeta {
    name: "lat",
    long_name: "Latitude",
    standard_name: "latitude",
    units: "degrees_north",
};

const UWIND: VariableMeta = VariableMeta {
    name: "uwind",
    long_name: "Surface Eastward Air Velocity (10m AGL)",
    standard_name: "eastward_wind",
    units: "m/s",
};

const VWIND: VariableMeta = VariableMeta {
    name: "vwind",
    long_name: "Surface Northward Air Velocity (10m AGL)",
    standard_name: "northward_wind",
    units: "m/s",
};

/// Write `series` to `path`, replacing any existing file.
///
/// A base date outside 1900 is first shifted onto the 1900-01-01 epoch with
/// [`time_to_julian`]. An empty series is refused: netCDF treats a zero-length
/// dimension as unlimited.
pub fn write_sflux<P: AsRef<Path>>(path: P, series: &AccumulatedSeries) -> Result<SfluxOutput> {
    let path = path.as_ref();
    if series.time_steps() == 0 {
        return Err(ArchiveError::EmptySeries);
    }

    let (time, base_date) = if series.base_date().year() != 1900 {
        // time_to_julian counts whole days, so the base hour goes into the values first
        let hour = series.base_date().hour_fraction();
        let from_midnight: Vec<f64> = series.time().iter().map(|t| t + hour).collect();
        let (time, epoch) = time_to_julian(&from_midnight, series.base_date());
        info!(
            from = %series.base_date(),
            to = %epoch,
            day_offset = series.base_date().days_after(&epoch),
            "Changing dates"
        );
        (time, epoch)
    } else {
        (series.time().to_vec(), series.base_date())
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut builder = tempfile::Builder::new();
    builder.prefix(".sflux_air.").suffix(".partial");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Masked by the umask like any newly created file, instead of 0600.
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let temp = builder
        .tempfile_in(dir)
        .map_err(|e| write_error(path, e))?
        .into_temp_path();
    debug!(temp = %temp.display(), "Writing to temporary file");

    write_contents(&temp, base_date, &time, series.grid(), series.uwind(), series.vwind())
        .map_err(|e| write_error(path, e))?;

    temp.persist(path).map_err(|e| write_error(path, e.error))?;

    info!(
        path = %path.display(),
        time_steps = time.len(),
        rows = series.grid().rows(),
        cols = series.grid().cols(),
        base_date = %base_date,
        "Wrote sflux file"
    );

    Ok(SfluxOutput {
        path: path.to_path_buf(),
        base_date,
        time_steps: time.len(),
    })
}

fn write_error(path: &Path, err: impl std::fmt::Display) -> ArchiveError {
    ArchiveError::Write {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn write_contents(
    path: &Path,
    base_date: BaseDate,
    time: &[f64],
    grid: &LatLonGrid,
    uwind: &[f32],
    vwind: &[f32],
) -> std::result::Result<(), netcdf::Error> {
    let mut file = netcdf::create(path)?;
    file.add_attribute("Conventions", "CF-1.0")?;

    file.add_dimension("time", time.len())?;
    file.add_dimension("lon", grid.cols())?;
    file.add_dimension("lat", grid.rows())?;

    {
        let mut var = file.add_variable::<f64>("time", &["time"])?;
        if !time.is_empty() {
            var.put_values(time, ..)?;
        }
        var.put_attribute("long_name", "Time")?;
        var.put_attribute("standard_name", "time")?;
        var.put_attribute("units", base_date.days_since_units().as_str())?;
        var.put_attribute("base_date", base_date.to_array().to_vec())?;
        var.put_attribute("calendar", "julian")?;
    }

    let lon: Vec<f32> = grid.lon().iter().map(|&v| v as f32).collect();
    let lat: Vec<f32> = grid.lat().iter().map(|&v| v as f32).collect();
    put_float(&mut file, &LON, &["lat", "lon"], &lon)?;
    put_float(&mut file, &LAT, &["lat", "lon"], &lat)?;
    put_float(&mut file, &UWIND, &["time", "lat", "lon"], uwind)?;
    put_float(&mut file, &VWIND, &["time", "lat", "lon"], vwind)?;

    // File is flushed and closed on drop, before the rename.
    drop(file);
    Ok(())
}

fn put_float(
    file: &mut netcdf::FileMut,
    meta: &VariableMeta,
    dims: &[&str],
    values: &[f32],
) -> std::result::Result<(), netcdf::Error> {
    let mut var = file.add_variable::<f32>(meta.name, dims)?;
    if !values.is_empty() {
        var.put_values(values, ..)?;
    }
    var.put_attribute("long_name", meta.long_name)?;
    var.put_attribute("standard_name", meta.standard_name)?;
    var.put_attribute("units", meta.units)?;
    Ok(())
}
