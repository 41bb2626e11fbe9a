//! Sample archive files in each supported layout.
//!
//! Every writer takes a [`WindSample`] plus the archive-specific time encoding
//! and produces a file with the variable names the adapters expect by default.

use std::path::Path;

use crate::generators::WindSample;

/// Write an ERA5-style file: time with a units attribute, 2-D `lat`/`lon`,
/// `uwind`/`vwind`.
pub fn write_era5_file(
    path: &Path,
    time: &[f64],
    units: &str,
    sample: &WindSample,
) -> Result<(), netcdf::Error> {
    let mut file = netcdf::create(path)?;
    file.add_dimension("time", time.len())?;
    file.add_dimension("lat", sample.lat.len())?;
    file.add_dimension("lon", sample.lon.len())?;

    {
        let mut var = file.add_variable::<f64>("time", &["time"])?;
        var.put_values(time, ..)?;
        var.put_attribute("units", units)?;
    }
    {
        let mut var = file.add_variable::<f64>("lat", &["lat", "lon"])?;
        var.put_values(&sample.lat_grid(), ..)?;
    }
    {
        let mut var = file.add_variable::<f64>("lon", &["lat", "lon"])?;
        var.put_values(&sample.lon_grid(), ..)?;
    }
    put_winds(&mut file, "uwind", "vwind", sample)
}

/// Write a CFSR-style file: `valid_date_time` as a NUL-padded `char` array of
/// `YYYYMMDDHH` records, 1-D `lat`/`lon`, `U_GRD_L103`/`V_GRD_L103`.
pub fn write_cfsr_file(
    path: &Path,
    stamps: &[&str],
    sample: &WindSample,
) -> Result<(), netcdf::Error> {
    let width = stamps.iter().map(|s| s.len()).max().unwrap_or(10);
    let mut file = netcdf::create(path)?;
    file.add_dimension("time", stamps.len())?;
    file.add_dimension("date_len", width)?;
    file.add_dimension("lat", sample.lat.len())?;
    file.add_dimension("lon", sample.lon.len())?;

    {
        let mut bytes = Vec::with_capacity(stamps.len() * width);
        for stamp in stamps {
            bytes.extend_from_slice(stamp.as_bytes());
            bytes.extend(std::iter::repeat(0u8).take(width - stamp.len()));
        }
        let mut var = file.add_variable_with_type(
            "valid_date_time",
            &["time", "date_len"],
            &netcdf::types::NcVariableType::Char,
        )?;
        // SAFETY: NC_CHAR elements are single bytes with no heap allocations.
        #[allow(unused_unsafe)]
        let written = unsafe { var.put_raw_values(&bytes, ..) };
        written?;
    }
    {
        let mut var = file.add_variable::<f64>("lat", &["lat"])?;
        var.put_values(&sample.lat, ..)?;
    }
    {
        let mut var = file.add_variable::<f64>("lon", &["lon"])?;
        var.put_values(&sample.lon, ..)?;
    }
    put_winds(&mut file, "U_GRD_L103", "V_GRD_L103", sample)
}

/// Write a GFS-style file: time in seconds since 1970, 1-D
/// `latitude`/`longitude`, `UGRD_10maboveground`/`VGRD_10maboveground`.
pub fn write_gfs_file(
    path: &Path,
    seconds: &[f64],
    sample: &WindSample,
) -> Result<(), netcdf::Error> {
    let mut file = netcdf::create(path)?;
    file.add_dimension("time", seconds.len())?;
    file.add_dimension("latitude", sample.lat.len())?;
    file.add_dimension("longitude", sample.lon.len())?;

    {
        let mut var = file.add_variable::<f64>("time", &["time"])?;
        var.put_values(seconds, ..)?;
        var.put_attribute("units", "seconds since 1970-01-01 00:00:00.0 0:00")?;
    }
    {
        let mut var = file.add_variable::<f64>("latitude", &["latitude"])?;
        var.put_values(&sample.lat, ..)?;
    }
    {
        let mut var = file.add_variable::<f64>("longitude", &["longitude"])?;
        var.put_values(&sample.lon, ..)?;
    }

    for (name, values) in [
        ("UGRD_10maboveground", &sample.uwind),
        ("VGRD_10maboveground", &sample.vwind),
    ] {
        let mut var = file.add_variable::<f32>(name, &["time", "latitude", "longitude"])?;
        var.put_values(values, ..)?;
    }
    Ok(())
}

fn put_winds(
    file: &mut netcdf::FileMut,
    u_name: &str,
    v_name: &str,
    sample: &WindSample,
) -> Result<(), netcdf::Error> {
    {
        let mut var = file.add_variable::<f32>(u_name, &["time", "lat", "lon"])?;
        var.put_values(&sample.uwind, ..)?;
    }
    let mut var = file.add_variable::<f32>(v_name, &["time", "lat", "lon"])?;
    var.put_values(&sample.vwind, ..)?;
    Ok(())
}
