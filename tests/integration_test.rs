use ndarray::{Array1, Array3, ArrayD, IxDyn};
use netcdf::{create, open, AttributeValue};
use ru_clim::calendar::Calendar;
use ru_clim::errors::{Result, RuClimError};
use ru_clim::labeled_array::{Coordinate, LabeledArray, TimeAxis};
use ru_clim::matching::match_coord;
use ru_clim::netcdf_io::{open_labeled_array, write_labeled_array};
use ru_clim::{annual_climatology, climatology_mean};
use serde_json::json;
use std::path::Path;
use tempfile::tempdir;

/// Writes a packed monthly `tas(time, lat, lon)` file in the noleap calendar
fn create_packed_monthly_file(path: &Path) -> Result<()> {
    let mut file = create(path)?;
    file.add_dimension("time", 24)?;
    file.add_dimension("lat", 2)?;
    file.add_dimension("lon", 3)?;

    let mut time = file.add_variable::<f64>("time", &["time"])?;
    time.put_attribute("units", "days since 2000-01-01 00:00:00")?;
    time.put_attribute("calendar", "noleap")?;
    time.put_attribute("standard_name", "time")?;
    let month_lengths = [31.0, 28.0, 31.0, 30.0, 31.0, 30.0, 31.0, 31.0, 30.0, 31.0, 30.0, 31.0];
    let mut offsets = Vec::with_capacity(24);
    let mut day = 0.0;
    for i in 0..24 {
        // mid-month stamps, decoded to the day they fall on
        offsets.push(day + 14.5);
        day += month_lengths[i % 12];
    }
    time.put_values(&offsets, ..)?;

    let mut lat = file.add_variable::<f64>("lat", &["lat"])?;
    lat.put_attribute("units", "degrees_north")?;
    lat.put_values(&[45.0, 50.0], ..)?;

    let mut lon = file.add_variable::<f64>("lon", &["lon"])?;
    lon.put_attribute("units", "degrees_east")?;
    lon.put_values(&[5.0, 10.0, 15.0], ..)?;

    // Stored value s decodes to 0.5 * s + 250
    let mut packed: Vec<i16> = (0..24 * 6).map(|i| (i / 6) as i16 * 2).collect();
    packed[0] = -32767;
    let mut tas = file.add_variable::<i16>("tas", &["time", "lat", "lon"])?;
    tas.put_attribute("_FillValue", -32767i16)?;
    tas.put_attribute("scale_factor", 0.5f64)?;
    tas.put_attribute("add_offset", 250.0f64)?;
    tas.put_attribute("units", "K")?;
    tas.put_attribute("long_name", "Near-Surface Air Temperature")?;
    let data = Array3::from_shape_vec((24, 2, 3), packed)?;
    tas.put(data.view(), ..)?;

    file.add_attribute("title", "Packed test data")?;
    Ok(())
}

#[test]
fn test_read_decodes_cf_encoding() -> Result<()> {
    let temp_dir = tempdir()?;
    let path = temp_dir.path().join("packed.nc");
    create_packed_monthly_file(&path)?;

    let tas = open_labeled_array(&path, "tas")?;
    assert_eq!(tas.dims(), &["time".to_string(), "lat".to_string(), "lon".to_string()]);
    assert_eq!(tas.shape(), &[24, 2, 3]);

    // Fill value masked, others unpacked
    assert!(tas.data()[[0, 0, 0]].is_nan());
    assert_eq!(tas.data()[[0, 0, 1]], 250.0);
    assert_eq!(tas.data()[[1, 0, 0]], 251.0);
    assert_eq!(tas.data()[[23, 1, 2]], 273.0);

    // Encoding attributes are consumed, the rest kept
    assert_eq!(tas.attrs().get("units"), Some(&json!("K")));
    assert!(!tas.attrs().contains_key("_FillValue"));
    assert!(!tas.attrs().contains_key("scale_factor"));

    let time = tas.time_axis()?;
    assert_eq!(time.calendar(), Calendar::NoLeap);
    assert_eq!(time.dates()[0].to_string(), "2000-01-15");
    assert_eq!(time.dates()[1].to_string(), "2000-02-15");
    assert_eq!(time.dates()[23].to_string(), "2001-12-15");
    assert_eq!(
        tas.coord("time").and_then(|c| c.attrs.get("standard_name")),
        Some(&json!("time"))
    );
    assert_eq!(tas.numeric_coord("lat")?, &[45.0, 50.0]);

    assert!(matches!(
        open_labeled_array(&path, "pr"),
        Err(RuClimError::VariableNotFound { ref var }) if var == "pr"
    ));
    Ok(())
}

#[test]
fn test_climatology_from_file_to_file() -> Result<()> {
    let temp_dir = tempdir()?;
    let input = temp_dir.path().join("packed.nc");
    let output = temp_dir.path().join("seasonal.nc");
    create_packed_monthly_file(&input)?;

    let tas = open_labeled_array(&input, "tas")?;
    let monthly = climatology_mean(&tas, "month")?;
    // January: 2000 is masked at [0, 0, 0] and contributes nothing
    assert_eq!(monthly.data()[[0, 0, 0]], 0.5 * 262.0);
    assert_eq!(monthly.data()[[0, 0, 1]], 0.5 * (250.0 + 262.0));

    let seasonal = climatology_mean(&tas, "season")?;
    write_labeled_array(&seasonal, &output)?;

    let file = open(&output)?;
    let var = file.variable("tas").expect("tas written");
    let dims: Vec<String> = var.dimensions().iter().map(|d| d.name().to_string()).collect();
    assert_eq!(dims, ["season", "lat", "lon"]);

    let season = file.variable("season").expect("season coordinate written");
    match season.attribute_value("flag_meanings") {
        Some(Ok(AttributeValue::Str(meanings))) => assert_eq!(meanings, "DJF JJA MAM SON"),
        other => panic!("Expected flag_meanings, got {other:?}"),
    }
    match file.attribute("history").map(|a| a.value()) {
        Some(Ok(AttributeValue::Str(history))) => assert!(history.starts_with("Created by RuClim on")),
        other => panic!("Expected history attribute, got {other:?}"),
    }

    // Seasons read back as labels
    let reread = open_labeled_array(&output, "tas")?;
    let labels = reread
        .coord("season")
        .and_then(|c| c.values.as_labels())
        .expect("season labels");
    assert_eq!(labels, &["DJF", "JJA", "MAM", "SON"]);
    assert_eq!(reread.attrs(), seasonal.attrs());
    for (a, b) in reread.data().iter().zip(seasonal.data()) {
        assert!((a - b).abs() < 1e-9);
    }

    let annual = annual_climatology(&tas)?;
    assert_eq!(annual.dims(), &["lat".to_string(), "lon".to_string()]);
    Ok(())
}

#[test]
fn test_round_trip_preserves_array() -> Result<()> {
    let temp_dir = tempdir()?;
    let path = temp_dir.path().join("round_trip.nc");

    let time = TimeAxis::monthly(Calendar::Day360, 1990, 3, 6)?;
    let values: Vec<f64> = (0..12).map(|i| if i == 4 { f64::NAN } else { f64::from(i) * 1.5 }).collect();
    let data = ArrayD::from_shape_vec(IxDyn(&[6, 2]), values)?;
    let mut array = LabeledArray::new("pr", data, vec!["time".to_string(), "station".to_string()])?
        .with_coord("time", Coordinate::time(time.clone()))?
        .with_coord("station", Coordinate::numeric(vec![101.0, 205.0]))?;
    array.set_attr("units", "mm/day");
    array.set_attr("valid_range", json!([0.0, 500.0]));
    array.set_attr("ensemble_member", 3);

    write_labeled_array(&array, &path)?;
    // Overwriting an existing output replaces it
    write_labeled_array(&array, &path)?;

    let reread = open_labeled_array(&path, "pr")?;
    assert_eq!(reread.dims(), array.dims());
    assert_eq!(reread.attrs(), array.attrs());
    assert_eq!(reread.time_axis()?.dates(), time.dates());
    assert_eq!(reread.time_axis()?.calendar(), Calendar::Day360);
    assert_eq!(reread.numeric_coord("station")?, &[101.0, 205.0]);

    for (a, b) in reread.data().iter().zip(array.data()) {
        assert!((a.is_nan() && b.is_nan()) || a == b);
    }
    Ok(())
}

#[test]
fn test_match_coord_between_files() -> Result<()> {
    let temp_dir = tempdir()?;
    let source_path = temp_dir.path().join("source.nc");
    let reference_path = temp_dir.path().join("reference.nc");

    {
        let mut file = create(&source_path)?;
        file.add_dimension("lat", 3)?;
        file.add_dimension("lon", 3)?;
        let mut lat = file.add_variable::<f64>("lat", &["lat"])?;
        lat.put_values(&[40.0, 45.0, 50.0], ..)?;
        let mut lon = file.add_variable::<f64>("lon", &["lon"])?;
        lon.put_values(&[0.0, 5.0, 10.0], ..)?;
        let mut tas = file.add_variable::<f64>("tas", &["lat", "lon"])?;
        let field = Array1::from_iter((0..9).map(f64::from)).into_shape((3, 3))?;
        tas.put(field.view(), ..)?;
    }
    {
        let mut file = create(&reference_path)?;
        file.add_dimension("rlat", 2)?;
        file.add_dimension("rlon", 2)?;
        let mut rlat = file.add_variable::<f64>("rlat", &["rlat"])?;
        rlat.put_attribute("standard_name", "grid_latitude")?;
        rlat.put_values(&[42.5, 47.5], ..)?;
        let mut rlon = file.add_variable::<f64>("rlon", &["rlon"])?;
        rlon.put_values(&[2.5, 7.5], ..)?;
        let mut pr = file.add_variable::<f64>("pr", &["rlat", "rlon"])?;
        pr.put_values(&[0.0; 4], ..)?;
    }

    let source = open_labeled_array(&source_path, "tas")?;
    let reference = open_labeled_array(&reference_path, "pr")?;
    let matched = match_coord(&source, &reference, "linear")?;

    assert_eq!(matched.shape(), &[2, 2]);
    assert_eq!(matched.numeric_coord("lat")?, &[42.5, 47.5]);
    // field = 3 * row + col, so the cell centres average four neighbours
    assert!((matched.data()[[0, 0]] - 2.0).abs() < 1e-12);
    assert!((matched.data()[[1, 1]] - 6.0).abs() < 1e-12);
    Ok(())
}

#[test]
fn test_scalar_annual_climatology_round_trip() -> Result<()> {
    let temp_dir = tempdir()?;
    let path = temp_dir.path().join("annual.nc");

    let time = TimeAxis::monthly(Calendar::NoLeap, 2000, 1, 24)?;
    let values: Vec<f64> = (1..=24).map(f64::from).collect();
    let data = ArrayD::from_shape_vec(IxDyn(&[24]), values)?;
    let mut series = LabeledArray::new("tas", data, vec!["time".to_string()])?
        .with_coord("time", Coordinate::time(time))?;
    series.set_attr("units", "K");

    let annual = annual_climatology(&series)?;
    assert_eq!(annual.data().ndim(), 0);
    write_labeled_array(&annual, &path)?;

    let file = open(&path)?;
    let var = file.variable("tas").expect("tas written");
    assert!(var.dimensions().is_empty());
    assert!(file.variable("time").is_none());

    let reread = open_labeled_array(&path, "tas")?;
    assert!(reread.dims().is_empty());
    assert_eq!(reread.attrs(), annual.attrs());
    // Equal-length years: every month averages m + 6
    let value = reread.data()[IxDyn(&[])];
    assert!((value - 12.5).abs() < 1e-12, "got {value}");
    Ok(())
}

#[test]
fn test_unsupported_attributes_are_skipped_on_write() -> Result<()> {
    let temp_dir = tempdir()?;
    let path = temp_dir.path().join("nested.nc");

    let data = ArrayD::from_shape_vec(IxDyn(&[2]), vec![1.0, 2.0])?;
    let mut array = LabeledArray::new("tas", data, vec!["station".to_string()])?;
    array.set_attr("units", "K");
    array.set_attr("provenance", json!({ "model": "rcm", "run": 2 }));
    array.set_attr("comment", json!(null));

    write_labeled_array(&array, &path)?;

    let reread = open_labeled_array(&path, "tas")?;
    assert_eq!(reread.attrs().get("units"), Some(&json!("K")));
    assert!(!reread.attrs().contains_key("provenance"));
    assert!(!reread.attrs().contains_key("comment"));
    Ok(())
}
