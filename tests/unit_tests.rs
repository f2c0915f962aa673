//! Unit tests for the supporting RuClim modules
//!
//! Calendars and CF time units, the labeled array type, axis reductions,
//! summaries, thread pool configuration and error reporting.

use chrono::NaiveDate;
use ndarray::{arr2, ArrayD, IxDyn};
use ru_clim::{
    axis_weights::{AxisWeights, NanPolicy, WeightRow},
    calendar::{Calendar, CalendarDate, CfTimeUnits, TimeUnit},
    errors::{Result, RuClimError},
    labeled_array::{Coordinate, LabeledArray, TimeAxis},
    metadata::ArraySummary,
    parallel::{ParallelConfig, ParallelInfo},
    statistics::{groupby_coordinate, reduce_dimension, StatOperation, StatisticalReduction},
};

#[test]
fn test_error_types() {
    let netcdf_err = RuClimError::NetCDFError(netcdf::Error::NotFound("test".to_string()));
    assert!(format!("{}", netcdf_err).contains("NetCDF error"));

    let generic_err = RuClimError::Generic("Test error".to_string());
    assert_eq!(format!("{}", generic_err), "Test error");

    let coord_err = RuClimError::MissingCoordinate {
        array: "tas".to_string(),
        coord: "rlat".to_string(),
    };
    assert_eq!(format!("{}", coord_err), "Coordinate 'rlat' not found in array 'tas'");

    let period_err = RuClimError::InvalidPeriod {
        period: "decade".to_string(),
    };
    assert!(format!("{}", period_err).contains("'decade'"));

    let method_err = RuClimError::UnsupportedMethod {
        method: "bogus".to_string(),
    };
    assert!(format!("{}", method_err).contains("'bogus'"));

    let weights_err = RuClimError::InvariantViolation {
        group: "DJF".to_string(),
        sum: 0.5,
    };
    assert!(format!("{}", weights_err).contains("DJF"));

    let from_str: RuClimError = "boom".into();
    assert!(matches!(from_str, RuClimError::Generic(ref m) if m == "boom"));
}

#[test]
fn test_parallel_config() {
    let default_config = ParallelConfig::default();
    assert!(default_config.num_threads.is_none());
    assert_eq!(default_config, ParallelConfig::new(None));

    let config_4 = ParallelConfig::with_threads(4);
    assert_eq!(config_4.num_threads, Some(4));

    let all_cores_config = ParallelConfig::all_cores();
    assert!(all_cores_config.num_threads.is_some_and(|n| n > 0));

    assert!(default_config.current_threads() > 0);

    // Leaving the pool alone always succeeds
    assert!(default_config.setup_global_pool().is_ok());
    assert!(matches!(
        ParallelConfig::with_threads(0).setup_global_pool(),
        Err(RuClimError::ThreadPoolError(_))
    ));
}

#[test]
fn test_parallel_info() {
    let info = ParallelInfo::collect();
    assert!(info.current_threads > 0);
    assert!(info.available_cores > 0);
    assert!(info.available_parallelism > 0);

    info.print_info();
}

#[test]
fn test_days_in_month_per_calendar() {
    assert_eq!(Calendar::Standard.days_in_month(2000, 2), 29);
    assert_eq!(Calendar::Standard.days_in_month(1900, 2), 28);
    assert_eq!(Calendar::Standard.days_in_month(2001, 2), 28);
    assert_eq!(Calendar::Julian.days_in_month(1900, 2), 29);
    assert_eq!(Calendar::NoLeap.days_in_month(2000, 2), 28);
    assert_eq!(Calendar::AllLeap.days_in_month(2001, 2), 29);
    assert_eq!(Calendar::Day360.days_in_month(2000, 1), 30);
    assert_eq!(Calendar::Day360.days_in_month(2000, 2), 30);
    assert_eq!(Calendar::Standard.days_in_month(2000, 13), 0);

    assert_eq!(Calendar::Standard.days_in_year(2000), 366);
    assert_eq!(Calendar::NoLeap.days_in_year(2000), 365);
    assert_eq!(Calendar::Day360.days_in_year(2000), 360);
}

#[test]
fn test_calendar_names() -> Result<()> {
    assert_eq!("gregorian".parse::<Calendar>()?, Calendar::Standard);
    assert_eq!("365_day".parse::<Calendar>()?, Calendar::NoLeap);
    assert_eq!("366_day".parse::<Calendar>()?, Calendar::AllLeap);
    assert_eq!("360_day".parse::<Calendar>()?, Calendar::Day360);
    assert_eq!("Proleptic_Gregorian".parse::<Calendar>()?, Calendar::ProlepticGregorian);
    assert!(matches!(
        "lunar".parse::<Calendar>(),
        Err(RuClimError::InvalidTime { .. })
    ));
    Ok(())
}

#[test]
fn test_calendar_dates() -> Result<()> {
    assert!(CalendarDate::new(Calendar::NoLeap, 2000, 2, 29).is_err());
    assert!(CalendarDate::new(Calendar::Day360, 2001, 2, 30).is_ok());
    assert!(CalendarDate::new(Calendar::Standard, 2001, 13, 1).is_err());

    let date = CalendarDate::new(Calendar::Standard, 1999, 12, 31)?;
    assert_eq!(date.add_days(Calendar::Standard, 1).to_string(), "2000-01-01");
    assert_eq!(date.add_days(Calendar::Standard, 60).to_string(), "2000-02-29");

    let date = CalendarDate::new(Calendar::Day360, 2000, 2, 30)?;
    assert_eq!(date.add_days(Calendar::Day360, 1).to_string(), "2000-03-01");

    let naive = NaiveDate::from_ymd_opt(1850, 1, 1).expect("valid date");
    assert_eq!(CalendarDate::from(naive), CalendarDate::new(Calendar::Standard, 1850, 1, 1)?);

    // Every ordinal maps back onto itself
    for calendar in [Calendar::Standard, Calendar::Julian, Calendar::NoLeap, Calendar::Day360] {
        for ordinal in (700_000..702_000).step_by(7) {
            let date = CalendarDate::from_ordinal(calendar, ordinal);
            assert_eq!(date.ordinal(calendar), ordinal, "{calendar} {date}");
        }
    }
    Ok(())
}

#[test]
fn test_cf_time_decoding() -> Result<()> {
    let units = CfTimeUnits::parse("days since 2000-01-01", Calendar::Standard)?;
    assert_eq!(units.unit(), TimeUnit::Days);
    let dates = units.decode(&[0.0, 31.0, 59.5, 60.0, 366.0], Calendar::Standard)?;
    let text: Vec<String> = dates.iter().map(ToString::to_string).collect();
    assert_eq!(text, ["2000-01-01", "2000-02-01", "2000-02-29", "2000-03-01", "2001-01-01"]);

    let units = CfTimeUnits::parse("days since 2000-01-01 00:00:00", Calendar::NoLeap)?;
    let dates = units.decode(&[59.0, 365.0], Calendar::NoLeap)?;
    assert_eq!(dates[0].to_string(), "2000-03-01");
    assert_eq!(dates[1].to_string(), "2001-01-01");

    let units = CfTimeUnits::parse("hours since 1979-01-01T12:00:00", Calendar::Day360)?;
    let dates = units.decode(&[12.0, 30.0 * 24.0], Calendar::Day360)?;
    assert_eq!(dates[0].to_string(), "1979-01-02");
    assert_eq!(dates[1].to_string(), "1979-02-01");

    assert!(CfTimeUnits::parse("months of 2000", Calendar::Standard).is_err());
    assert!(CfTimeUnits::parse("days since 2000-02-30", Calendar::Standard).is_err());
    assert!(units.decode(&[f64::NAN], Calendar::Day360).is_err());
    Ok(())
}

#[test]
fn test_cf_time_encode_decode_consistency() -> Result<()> {
    let time = TimeAxis::monthly(Calendar::Julian, 1899, 11, 30)?;
    let units = CfTimeUnits::parse("days since 1850-01-01", Calendar::Julian)?;
    let offsets = units.encode(time.dates(), Calendar::Julian);
    assert_eq!(units.decode(&offsets, Calendar::Julian)?, time.dates());

    let minutes = CfTimeUnits::parse("minutes since 1900-01-01 06:00", Calendar::Standard)?;
    let dates = [CalendarDate::new(Calendar::Standard, 1900, 1, 2)?];
    assert_eq!(minutes.encode(&dates, Calendar::Standard), vec![18.0 * 60.0]);
    assert_eq!(minutes.to_string(), "minutes since 1900-01-01 06:00:00");

    // Fractional reference seconds never print past the end of the day
    let late = CfTimeUnits::parse("hours since 2000-01-01 23:59:59.6", Calendar::Standard)?;
    let printed = late.to_string();
    assert_eq!(printed, "hours since 2000-01-01 23:59:59");
    assert!(CfTimeUnits::parse(&printed, Calendar::Standard).is_ok());
    Ok(())
}

#[test]
fn test_time_axis_days_in_month() -> Result<()> {
    let time = TimeAxis::monthly(Calendar::Standard, 1999, 11, 4)?;
    assert_eq!(time.len(), 4);
    assert_eq!(time.days_in_month(), vec![30.0, 31.0, 31.0, 29.0]);
    assert_eq!(time.dates()[3].to_string(), "2000-02-01");
    assert!(TimeAxis::monthly(Calendar::Standard, 2000, 13, 1).is_err());
    Ok(())
}

#[test]
fn test_labeled_array_validation() -> Result<()> {
    let data = ArrayD::zeros(IxDyn(&[2, 3]));

    assert!(matches!(
        LabeledArray::new("a", data.clone(), vec!["x".to_string()]),
        Err(RuClimError::InvalidArray { .. })
    ));
    assert!(matches!(
        LabeledArray::new("a", data.clone(), vec!["x".to_string(), "x".to_string()]),
        Err(RuClimError::InvalidArray { .. })
    ));

    let array = LabeledArray::new("a", data, vec!["x".to_string(), "y".to_string()])?;
    assert_eq!(array.axis_index("y")?, 1);
    assert!(array.has_dim("x"));
    assert!(matches!(
        array.clone().with_coord("y", Coordinate::numeric(vec![0.0, 1.0])),
        Err(RuClimError::InvalidArray { .. })
    ));
    assert!(matches!(
        array.clone().with_coord("z", Coordinate::numeric(vec![0.0])),
        Err(RuClimError::MissingCoordinate { .. })
    ));
    assert!(matches!(
        array.numeric_coord("x"),
        Err(RuClimError::MissingCoordinate { .. })
    ));

    let labeled = array.with_coord("x", Coordinate::labels(vec!["a".to_string(), "b".to_string()]))?;
    let repr = labeled.to_string();
    assert!(repr.contains("<LabeledArray 'a' (x: 2, y: 3)>"));
    Ok(())
}

#[test]
fn test_stat_operation() -> Result<()> {
    assert_eq!("mean".parse::<StatOperation>()?, StatOperation::Mean);
    assert_eq!("Max".parse::<StatOperation>()?, StatOperation::Max);
    assert_eq!("minimum".parse::<StatOperation>()?, StatOperation::Min);
    assert!("median".parse::<StatOperation>().is_err());
    Ok(())
}

#[test]
fn test_reductions_skip_nan() -> Result<()> {
    let data = arr2(&[[1.0, f64::NAN, 3.0], [f64::NAN, f64::NAN, f64::NAN]]).into_dyn();

    let mean = data.reduce_along_axis(1, StatOperation::Mean)?;
    assert_eq!(mean[[0]], 2.0);
    assert!(mean[[1]].is_nan());

    let sum = data.reduce_along_axis(1, StatOperation::Sum)?;
    assert_eq!(sum[[0]], 4.0);
    assert_eq!(sum[[1]], 0.0);

    let min = data.reduce_along_axis(0, StatOperation::Min)?;
    assert_eq!(min[[0]], 1.0);
    assert!(min[[1]].is_nan());

    let max = data.reduce_along_axis(1, StatOperation::Max)?;
    assert_eq!(max[[0]], 3.0);

    assert!(data.reduce_along_axis(2, StatOperation::Mean).is_err());
    Ok(())
}

#[test]
fn test_reduce_and_group_labeled_arrays() -> Result<()> {
    let data = arr2(&[[1.0, 2.0, 3.0, 4.0], [5.0, 6.0, 7.0, 8.0]]).into_dyn();
    let array = LabeledArray::new("v", data, vec!["row".to_string(), "col".to_string()])?
        .with_coord("row", Coordinate::numeric(vec![10.0, 20.0]))?
        .with_coord("col", Coordinate::numeric(vec![2.0, 1.0, 2.0, 1.0]))?;

    let reduced = reduce_dimension(&array, "row", StatOperation::Sum)?;
    assert_eq!(reduced.dims(), &["col".to_string()]);
    assert_eq!(reduced.data().as_slice(), Some(&[6.0, 8.0, 10.0, 12.0][..]));

    let grouped = groupby_coordinate(&array, "col", StatOperation::Mean)?;
    assert_eq!(grouped.shape(), &[2, 2]);
    assert_eq!(grouped.numeric_coord("col")?, &[1.0, 2.0]);
    assert_eq!(grouped.numeric_coord("row")?, &[10.0, 20.0]);
    // col label 1 holds columns 1 and 3
    assert_eq!(grouped.data()[[0, 0]], 3.0);
    assert_eq!(grouped.data()[[1, 1]], 6.0);

    assert!(matches!(
        reduce_dimension(&array, "depth", StatOperation::Mean),
        Err(RuClimError::MissingCoordinate { .. })
    ));
    Ok(())
}

#[test]
fn test_axis_weights_nan_policy() -> Result<()> {
    let weights = AxisWeights::new(3, vec![
        WeightRow::Terms(vec![(0, 0.5), (1, 0.5)]),
        WeightRow::Fill(-1.0),
    ])?;
    assert_eq!(weights.target_len(), 2);

    let data = arr2(&[[2.0, f64::NAN, 4.0]]).into_dyn();
    let skipped = weights.apply(&data, 1, NanPolicy::Skip)?;
    assert_eq!(skipped[[0, 0]], 1.0);
    assert_eq!(skipped[[0, 1]], -1.0);

    let propagated = weights.apply(&data, 1, NanPolicy::Propagate)?;
    assert!(propagated[[0, 0]].is_nan());

    assert!(weights.apply(&data, 0, NanPolicy::Skip).is_err());
    assert!(AxisWeights::new(1, vec![WeightRow::Terms(vec![(1, 1.0)])]).is_err());
    Ok(())
}

#[test]
fn test_array_summary() -> Result<()> {
    let data = ArrayD::from_shape_vec(IxDyn(&[5]), vec![1.0, 2.0, f64::NAN, 3.0, f64::INFINITY])?;
    let array = LabeledArray::new("v", data, vec!["x".to_string()])?;

    let summary = ArraySummary::of(&array);
    assert_eq!(summary.valid, 3);
    assert_eq!(summary.total, 5);
    assert_eq!(summary.min, 1.0);
    assert_eq!(summary.max, 3.0);
    assert_eq!(summary.mean, 2.0);
    assert!((summary.std_dev - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);

    let empty = LabeledArray::new("e", ArrayD::from_elem(IxDyn(&[2]), f64::NAN), vec!["x".to_string()])?;
    assert!(ArraySummary::of(&empty).mean.is_nan());
    Ok(())
}
