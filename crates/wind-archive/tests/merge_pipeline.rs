//! End-to-end merges over sample archive files written to a temp directory.

use std::path::Path;

use netcdf_store::{GridSource, NetcdfSource};
use test_utils::{
    assert_slice_approx_eq, wind_sample, write_cfsr_file, write_era5_file, write_gfs_file,
};
use wind_archive::{run, ArchiveError, ArchiveSource, BaseDate, MergeJob, VariableNames};

fn text_attr(var: &netcdf::Variable, name: &str) -> String {
    match var.attribute_value(name) {
        Some(Ok(netcdf::AttributeValue::Str(s))) => s,
        other => panic!("attribute {} is not text: {:?}", name, other),
    }
}

fn int_attr(var: &netcdf::Variable, name: &str) -> Vec<i64> {
    match var.attribute_value(name) {
        Some(Ok(netcdf::AttributeValue::Ints(v))) => v.into_iter().map(i64::from).collect(),
        Some(Ok(netcdf::AttributeValue::Longlongs(v))) => v,
        other => panic!("attribute {} is not an integer array: {:?}", name, other),
    }
}

fn job(source: ArchiveSource, dir: &Path) -> MergeJob {
    MergeJob::new(source)
        .with_input_dir(dir)
        .with_output(dir.join("sflux_air.ww3.nc"))
}

#[test]
fn test_two_era5_files_merge_in_order() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let first = wind_sample(3, 2, 2, 1);
    let second = wind_sample(3, 2, 2, 2);
    write_era5_file(
        &dir.path().join("era5_2020_01a.nc"),
        &[0.0, 1.0, 2.0],
        "days since 2020-01-01",
        &first,
    )
    .unwrap();
    write_era5_file(
        &dir.path().join("era5_2020_01b.nc"),
        &[3.0, 4.0, 5.0],
        "days since 2020-01-01",
        &second,
    )
    .unwrap();

    let summary = run(&job(ArchiveSource::Era5, dir.path())).expect("merge failed");
    assert_eq!(summary.files, vec!["era5_2020_01a.nc", "era5_2020_01b.nc"]);
    assert_eq!(summary.time_steps, 6);
    assert_eq!((summary.rows, summary.cols), (2, 2));
    assert_eq!(summary.base_date, BaseDate::julian_epoch());

    // 2020-01-01 is 43829 days after 1900-01-01
    let output = NetcdfSource::open(&summary.output).unwrap();
    let time = output.read_field("time").unwrap();
    assert_eq!(time.shape(), &[6]);
    let expected: Vec<f64> = (0..6).map(|d| 43829.0 + d as f64).collect();
    assert_eq!(time.values(), expected.as_slice());

    let uwind = output.read_field("uwind").unwrap();
    assert_eq!(uwind.shape(), &[6, 2, 2]);
    let mut stacked: Vec<f32> = first.uwind.clone();
    stacked.extend(&second.uwind);
    assert_slice_approx_eq!(uwind.values(), stacked, 0.0);

    let vwind = output.read_field("vwind").unwrap();
    assert_eq!(vwind.values()[12] as f32, second.vwind[0]);
}

#[test]
fn test_era5_reference_hour_survives_normalization() {
    let dir = tempfile::tempdir().unwrap();
    let sample = wind_sample(2, 1, 2, 0);
    write_era5_file(
        &dir.path().join("era5_06z.nc"),
        &[0.0, 6.0],
        "hours since 2020-01-01 06:00:00",
        &sample,
    )
    .unwrap();

    let summary = run(&job(ArchiveSource::Era5, dir.path())).unwrap();
    assert_eq!(summary.base_date, BaseDate::julian_epoch());

    let output = NetcdfSource::open(&summary.output).unwrap();
    assert_eq!(output.read_field("time").unwrap().values(), &[43829.25, 43829.5]);
}

#[test]
fn test_output_schema() {
    let dir = tempfile::tempdir().unwrap();
    let sample = wind_sample(2, 3, 4, 0);
    write_era5_file(
        &dir.path().join("a.nc"),
        &[0.5, 1.5],
        "days since 1900-01-01",
        &sample,
    )
    .unwrap();

    let summary = run(&job(ArchiveSource::Era5, dir.path())).unwrap();
    let file = netcdf::open(&summary.output).unwrap();

    match file.attribute("Conventions").map(|a| a.value()) {
        Some(Ok(netcdf::AttributeValue::Str(s))) => assert_eq!(s, "CF-1.0"),
        other => panic!("unexpected Conventions: {:?}", other),
    }
    assert_eq!(file.dimension("time").unwrap().len(), 2);
    assert_eq!(file.dimension("lat").unwrap().len(), 3);
    assert_eq!(file.dimension("lon").unwrap().len(), 4);

    let time = file.variable("time").unwrap();
    assert_eq!(text_attr(&time, "long_name"), "Time");
    assert_eq!(text_attr(&time, "standard_name"), "time");
    assert_eq!(text_attr(&time, "units"), "days since 1900-01-01 00:00:00");
    assert_eq!(text_attr(&time, "calendar"), "julian");
    assert_eq!(int_attr(&time, "base_date"), vec![1900, 1, 1, 0]);

    let expected = [
        ("lon", "Longitude", "longitude", "degrees_east", vec!["lat", "lon"]),
        ("lat", "Latitude", "latitude", "degrees_north", vec!["lat", "lon"]),
        (
            "uwind",
            "Surface Eastward Air Velocity (10m AGL)",
            "eastward_wind",
            "m/s",
            vec!["time", "lat", "lon"],
        ),
        (
            "vwind",
            "Surface Northward Air Velocity (10m AGL)",
            "northward_wind",
            "m/s",
            vec!["time", "lat", "lon"],
        ),
    ];
    for (name, long_name, standard_name, units, dims) in expected {
        let var = file.variable(name).unwrap();
        assert_eq!(text_attr(&var, "long_name"), long_name);
        assert_eq!(text_attr(&var, "standard_name"), standard_name);
        assert_eq!(text_attr(&var, "units"), units);
        let names: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
        assert_eq!(names, dims, "dimensions of {}", name);
    }

    // Round trip of coordinates and time values
    let output = NetcdfSource::open(&summary.output).unwrap();
    assert_eq!(output.read_field("time").unwrap().values(), &[0.5, 1.5]);
    assert_slice_approx_eq!(output.read_field("lat").unwrap().values(), sample.lat_grid(), 1e-6);
    assert_slice_approx_eq!(output.read_field("lon").unwrap().values(), sample.lon_grid(), 1e-6);
}

#[test]
fn test_output_reads_back_as_era5() {
    let dir = tempfile::tempdir().unwrap();
    let sample = wind_sample(2, 2, 3, 4);
    write_gfs_file(&dir.path().join("gfs.nc"), &[0.0, 43_200.0], &sample).unwrap();
    let summary = run(&job(ArchiveSource::Gfs, dir.path())).unwrap();

    let output = NetcdfSource::open(&summary.output).unwrap();
    let record = ArchiveSource::Era5
        .extract("sflux_air.ww3.nc", &output, &ArchiveSource::Era5.default_variables())
        .unwrap();
    assert_eq!(record.base_date(), BaseDate::julian_epoch());
    assert_eq!(record.time(), &[25567.0, 25567.5]);
    assert_eq!(record.uwind(), sample.uwind.as_slice());
    assert_eq!(record.vwind(), sample.vwind.as_slice());
}

#[test]
fn test_cfsr_merge_expands_grid() {
    let dir = tempfile::tempdir().unwrap();
    let sample = wind_sample(2, 3, 2, 0);
    write_cfsr_file(&dir.path().join("cfsr_01.nc"), &["2011040100", "2011040106"], &sample)
        .unwrap();
    write_cfsr_file(&dir.path().join("cfsr_02.nc"), &["2011040112", "2011040118"], &sample)
        .unwrap();

    let summary = run(&job(ArchiveSource::Cfsr, dir.path())).unwrap();
    assert_eq!(summary.time_steps, 4);
    assert_eq!((summary.rows, summary.cols), (3, 2));

    let output = NetcdfSource::open(&summary.output).unwrap();
    // 2011-04-01 is 40632 days after 1900-01-01
    assert_eq!(
        output.read_field("time").unwrap().values(),
        &[40632.0, 40632.25, 40632.5, 40632.75]
    );
    let lat = output.read_field("lat").unwrap();
    assert_eq!(lat.shape(), &[3, 2]);
    assert_slice_approx_eq!(lat.values(), [40.0, 40.0, 40.25, 40.25, 40.5, 40.5], 1e-6);
    let lon = output.read_field("lon").unwrap();
    assert_slice_approx_eq!(lon.values(), [-10.0, -9.75, -10.0, -9.75, -10.0, -9.75], 1e-6);
}

#[test]
fn test_variable_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let sample = wind_sample(1, 1, 1, 0);
    // u and v names swapped: each source field lands in the other output variable
    write_gfs_file(&dir.path().join("renamed.nc"), &[86_400.0], &sample).unwrap();

    let job = job(ArchiveSource::Gfs, dir.path()).with_variables(VariableNames::new(
        "time",
        "latitude",
        "longitude",
        "VGRD_10maboveground",
        "UGRD_10maboveground",
    ));
    let summary = run(&job).unwrap();
    let output = NetcdfSource::open(&summary.output).unwrap();
    assert_eq!(output.read_field("uwind").unwrap().values()[0] as f32, sample.vwind[0]);
    assert_eq!(output.read_field("time").unwrap().values(), &[25568.0]);
}

#[test]
fn test_base_date_mismatch_aborts_and_keeps_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let sample = wind_sample(1, 2, 2, 0);
    write_era5_file(&dir.path().join("a.nc"), &[0.0], "days since 2020-01-01", &sample).unwrap();
    write_era5_file(&dir.path().join("b.nc"), &[0.0], "days since 2020-02-01", &sample).unwrap();

    let output = dir.path().join("sflux_air.ww3.nc");
    std::fs::write(&output, b"previous run").unwrap();

    let err = run(&job(ArchiveSource::Era5, dir.path())).unwrap_err();
    assert!(matches!(err, ArchiveError::InFile { ref file, .. } if file == "b.nc"));
    assert!(matches!(err.root(), ArchiveError::BaseDateMismatch { .. }));
    assert_eq!(std::fs::read(&output).unwrap(), b"previous run");
}

#[test]
fn test_grid_mismatch_aborts() {
    let dir = tempfile::tempdir().unwrap();
    write_gfs_file(&dir.path().join("a.nc"), &[0.0], &wind_sample(1, 2, 2, 0)).unwrap();
    write_gfs_file(&dir.path().join("b.nc"), &[3600.0], &wind_sample(1, 3, 2, 0)).unwrap();

    let err = run(&job(ArchiveSource::Gfs, dir.path())).unwrap_err();
    assert!(matches!(err.root(), ArchiveError::ShapeMismatch(_)));
    assert!(!dir.path().join("sflux_air.ww3.nc").exists());
}

#[test]
fn test_wrong_archive_selector_for_files() {
    let dir = tempfile::tempdir().unwrap();
    write_gfs_file(&dir.path().join("a.nc"), &[0.0], &wind_sample(1, 1, 1, 0)).unwrap();

    let err = run(&job(ArchiveSource::Cfsr, dir.path())).unwrap_err();
    assert!(matches!(err.root(), ArchiveError::Store(_)));
    assert!(err.to_string().contains("a.nc"));
    assert!(err.to_string().contains("valid_date_time"));
}

#[test]
fn test_previous_output_is_not_an_input() {
    let dir = tempfile::tempdir().unwrap();
    let sample = wind_sample(2, 1, 1, 0);
    write_era5_file(&dir.path().join("a.nc"), &[0.0, 1.0], "days since 1900-01-01", &sample)
        .unwrap();

    let first = run(&job(ArchiveSource::Era5, dir.path())).unwrap();
    assert_eq!(first.time_steps, 2);
    // The first output is an ERA5-shaped .nc file in the input directory.
    let second = run(&job(ArchiveSource::Era5, dir.path())).unwrap();
    assert_eq!(second.files, vec!["a.nc"]);
    assert_eq!(second.time_steps, 2);
}
