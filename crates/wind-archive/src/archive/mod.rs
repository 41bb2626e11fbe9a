//! Archive adapters.
//!
//! Each supported archive family stores time, coordinates and 10 m wind
//! differently. An adapter reads one open file through [`GridSource`] and
//! produces a [`SourceRecord`]: days since a base date, a 2-D grid, and u/v
//! fields shaped `(time, lat, lon)`.
//!
//! | Archive | Time | Base date | Coordinates |
//! |---------|------|-----------|-------------|
//! | era5 | `units` attribute of the time variable | from units | 2-D (1-D also accepted) |
//! | cfsr | `YYYYMMDDHH` character records | 1900-01-01 | 1-D, expanded |
//! | gfs | seconds | 1970-01-01 | 1-D, expanded |

mod cfsr;
mod era5;
mod gfs;

use std::fmt;
use std::str::FromStr;

use netcdf_store::GridSource;
use serde::{Deserialize, Serialize};

use crate::error::{ArchiveError, Result};
use crate::grid::LatLonGrid;
use crate::time::BaseDate;

/// Supported surface-wind archive families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveSource {
    Era5,
    Cfsr,
    Gfs,
}

impl ArchiveSource {
    pub const ALL: [ArchiveSource; 3] = [ArchiveSource::Era5, ArchiveSource::Cfsr, ArchiveSource::Gfs];

    pub fn name(&self) -> &'static str {
        match self {
            ArchiveSource::Era5 => "era5",
            ArchiveSource::Cfsr => "cfsr",
            ArchiveSource::Gfs => "gfs",
        }
    }

    /// Variable names used by files of this archive.
    pub fn default_variables(&self) -> VariableNames {
        match self {
            ArchiveSource::Era5 => VariableNames::new("time", "lat", "lon", "uwind", "vwind"),
            ArchiveSource::Cfsr => VariableNames::new(
                "valid_date_time",
                "lat",
                "lon",
                "U_GRD_L103",
                "V_GRD_L103",
            ),
            ArchiveSource::Gfs => VariableNames::new(
                "time",
                "latitude",
                "longitude",
                "UGRD_10maboveground",
                "VGRD_10maboveground",
            ),
        }
    }

    /// Read one file of this archive.
    pub fn extract(
        &self,
        filename: &str,
        source: &dyn GridSource,
        variables: &VariableNames,
    ) -> Result<SourceRecord> {
        match self {
            ArchiveSource::Era5 => era5::extract(filename, source, variables),
            ArchiveSource::Cfsr => cfsr::extract(filename, source, variables),
            ArchiveSource::Gfs => gfs::extract(filename, source, variables),
        }
    }
}

impl FromStr for ArchiveSource {
    type Err = ArchiveError;

    fn from_str(s: &str) -> Result<Self> {
        ArchiveSource::ALL
            .into_iter()
            .find(|source| source.name() == s)
            .ok_or_else(|| ArchiveError::UnknownSource(s.to_string()))
    }
}

impl fmt::Display for ArchiveSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Names of the five variables an adapter reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableNames {
    pub time: String,
    pub lat: String,
    pub lon: String,
    pub uwind: String,
    pub vwind: String,
}

impl VariableNames {
    pub fn new(time: &str, lat: &str, lon: &str, uwind: &str, vwind: &str) -> Self {
        Self {
            time: time.to_string(),
            lat: lat.to_string(),
            lon: lon.to_string(),
            uwind: uwind.to_string(),
            vwind: vwind.to_string(),
        }
    }

    /// Replace the names set in `overrides`, keep the rest.
    pub fn with_overrides(mut self, overrides: &VariableOverrides) -> Self {
        let slots = [
            (&mut self.time, &overrides.time),
            (&mut self.lat, &overrides.lat),
            (&mut self.lon, &overrides.lon),
            (&mut self.uwind, &overrides.uwind),
            (&mut self.vwind, &overrides.vwind),
        ];
        for (slot, value) in slots {
            if let Some(value) = value {
                *slot = value.clone();
            }
        }
        self
    }
}

/// Partial variable-name settings, as found in a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableOverrides {
    pub time: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub uwind: Option<String>,
    pub vwind: Option<String>,
}

/// Everything read from one input file.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord {
    filename: String,
    base_date: BaseDate,
    time: Vec<f64>,
    grid: LatLonGrid,
    uwind: Vec<f32>,
    vwind: Vec<f32>,
}

impl SourceRecord {
    /// Assemble a record, checking that u and v hold one grid per time step.
    pub fn new(
        filename: &str,
        base_date: BaseDate,
        time: Vec<f64>,
        grid: LatLonGrid,
        uwind: Vec<f32>,
        vwind: Vec<f32>,
    ) -> Result<Self> {
        let expected = time.len() * grid.len();
        for (name, field) in [("uwind", &uwind), ("vwind", &vwind)] {
            if field.len() != expected {
                return Err(ArchiveError::ShapeMismatch(format!(
                    "{} has {} values, expected {} time steps x {}x{} grid = {}",
                    name,
                    field.len(),
                    time.len(),
                    grid.rows(),
                    grid.cols(),
                    expected
                )));
            }
        }

        Ok(Self {
            filename: filename.to_string(),
            base_date,
            time,
            grid,
            uwind,
            vwind,
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn base_date(&self) -> BaseDate {
        self.base_date
    }

    /// Days since [`Self::base_date`].
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn time_steps(&self) -> usize {
        self.time.len()
    }

    pub fn grid(&self) -> &LatLonGrid {
        &self.grid
    }

    pub fn uwind(&self) -> &[f32] {
        &self.uwind
    }

    pub fn vwind(&self) -> &[f32] {
        &self.vwind
    }

    pub(crate) fn into_parts(self) -> (String, BaseDate, Vec<f64>, LatLonGrid, Vec<f32>, Vec<f32>) {
        (
            self.filename,
            self.base_date,
            self.time,
            self.grid,
            self.uwind,
            self.vwind,
        )
    }
}

/// Read a 1-D time axis.
fn read_time_axis(source: &dyn GridSource, name: &str) -> Result<Vec<f64>> {
    let field = source.read_field(name)?;
    if field.rank() != 1 {
        return Err(ArchiveError::ShapeMismatch(format!(
            "time variable '{}' should be 1-D, found shape {:?}",
            name,
            field.shape()
        )));
    }
    Ok(field.into_values())
}

/// Read the latitude/longitude variables into a 2-D grid.
fn read_grid(source: &dyn GridSource, variables: &VariableNames) -> Result<LatLonGrid> {
    let lat = source.read_field(&variables.lat)?;
    let lon = source.read_field(&variables.lon)?;
    LatLonGrid::from_fields(&lat, &lon)
}

/// Read a wind component shaped `(time, lat, lon)`.
fn read_wind(
    source: &dyn GridSource,
    name: &str,
    time_steps: usize,
    grid: &LatLonGrid,
) -> Result<Vec<f32>> {
    let field = source.read_field(name)?;
    let expected = [time_steps, grid.rows(), grid.cols()];
    if field.shape() != expected {
        return Err(ArchiveError::ShapeMismatch(format!(
            "'{}' has shape {:?}, expected {:?} (time, lat, lon)",
            name,
            field.shape(),
            expected
        )));
    }
    Ok(field.values().iter().map(|&v| v as f32).collect())
}

/// Read u and v for an already-known time axis and grid.
fn read_winds(
    source: &dyn GridSource,
    variables: &VariableNames,
    time_steps: usize,
    grid: &LatLonGrid,
) -> Result<(Vec<f32>, Vec<f32>)> {
    let uwind = read_wind(source, &variables.uwind, time_steps, grid)?;
    let vwind = read_wind(source, &variables.vwind, time_steps, grid)?;
    Ok((uwind, vwind))
}
