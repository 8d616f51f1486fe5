use approx::assert_abs_diff_eq;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::rstest;
use sales_forecast::engine::{forecast, ForecastEngine};
use sales_forecast::{
    run_forecast, ForecastConfig, ForecastError, ModelOrder, Month, Notice, RawEntry,
    SalesObservation, SalesSeries,
};

fn month(year: i32, m: u32) -> Month {
    Month::new(year, m).unwrap()
}

fn series(start: Month, values: &[f64]) -> SalesSeries {
    SalesSeries::from_values(start, values).unwrap()
}

#[test]
fn test_increasing_series_uses_fallback() {
    sales_forecast::logging::init_test();
    let data = series(month(2024, 1), &[10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);

    let result = forecast(&data, "Amoxicillin").unwrap();

    assert!(result.degenerate_fallback_used);
    assert!((result.predicted_value - 60.0).abs() > 1e-6);
    assert_abs_diff_eq!(result.predicted_value, 70.0, epsilon = 1e-9);
    assert_eq!(result.order_used, ModelOrder::monthly().with_d(2));
    assert_eq!(result.target_period, month(2024, 7));
    assert!(!result.clamped_to_zero);
}

#[test]
fn test_constant_series_is_not_degenerate() {
    let data = series(month(2024, 1), &[100.0; 5]);

    let result = forecast(&data, "Ibuprofen").unwrap();

    assert!(!result.degenerate_fallback_used);
    assert_abs_diff_eq!(result.predicted_value, 100.0, epsilon = 1e-9);
    assert_eq!(result.order_used, ModelOrder::monthly());
}

#[rstest]
#[case(2024, 11, 2024, 12)]
#[case(2024, 12, 2025, 1)]
#[case(2023, 2, 2023, 3)]
fn test_target_period_is_next_month(
    #[case] last_year: i32,
    #[case] last_month: u32,
    #[case] target_year: i32,
    #[case] target_month: u32,
) {
    let last = month(last_year, last_month);
    let start = month(last_year - 1, last_month).succ().unwrap().succ().unwrap();
    // Four observations ending at `last`, not necessarily consecutive.
    let observations = [
        (start, 12.0),
        (start.succ().unwrap(), 15.0),
        (last.pred().unwrap(), 11.0),
        (last, 14.0),
    ];
    let data = SalesSeries::new(
        observations
            .iter()
            .map(|&(month, value)| SalesObservation { month, value })
            .collect(),
    )
    .unwrap();

    let result = forecast(&data, "").unwrap();

    assert_eq!(result.target_period, month(target_year, target_month));
    assert_eq!(result.target_period.first_day().to_string().get(8..), Some("01"));
}

#[test]
fn test_negative_forecast_clamped() {
    let data = series(month(2024, 1), &[100.0, 80.0, 60.0, 40.0, 20.0, 5.0]);

    let result = forecast(&data, "Cough syrup").unwrap();

    // Baseline repeats 5, the trend re-fit extrapolates to -10.
    assert!(result.degenerate_fallback_used);
    assert!(result.clamped_to_zero);
    assert_eq!(result.predicted_value, 0.0);
    assert_eq!(result.notices, vec![Notice::NegativeForecastClamped { raw: -10.0 }]);
}

#[test]
fn test_seasonal_pattern_continued() {
    let pattern = |t: usize| {
        100.0 + 20.0 * (2.0 * std::f64::consts::PI * t as f64 / 12.0).sin() + 2.0 * t as f64
    };
    let values: Vec<f64> = (0..36).map(pattern).collect();
    let data = series(month(2021, 1), &values);

    let result = forecast(&data, "Antihistamine").unwrap();

    assert!(!result.degenerate_fallback_used);
    assert_abs_diff_eq!(result.predicted_value, pattern(36), epsilon = 1e-6);
    assert_eq!(result.target_period, month(2024, 1));
}

#[test]
fn test_forecast_is_reproducible() {
    let mut rng = StdRng::seed_from_u64(42);
    let values: Vec<f64> = (0..30)
        .map(|t| {
            let season = 15.0 * (2.0 * std::f64::consts::PI * t as f64 / 12.0).cos();
            200.0 + season + 1.5 * t as f64 + rng.gen_range(-5.0..5.0)
        })
        .collect();
    let data = series(month(2022, 1), &values);
    let engine = ForecastEngine::default();

    let first = engine.forecast(&data, "Insulin").unwrap();
    let second = engine.forecast(&data, "Insulin").unwrap();

    assert_eq!(first, second);
    assert!(first.predicted_value.is_finite());
    assert!(first.predicted_value >= 0.0);
}

#[test]
fn test_numerical_failure_is_fit_error() {
    let values: Vec<f64> = (0..16).map(|t| ((t * t) as f64 + 1.0) * 1e200).collect();
    let data = series(month(2020, 1), &values);

    match forecast(&data, "Overflow") {
        Err(ForecastError::FitError(cause)) => assert!(!cause.is_empty()),
        other => panic!("expected FitError, got {:?}", other),
    }
}

#[test]
fn test_invalid_config_rejected() {
    let config = ForecastConfig {
        max_iterations: 0,
        ..ForecastConfig::default()
    };

    assert!(matches!(
        ForecastEngine::new(config),
        Err(ForecastError::InvalidParameter(_))
    ));
}

#[test]
fn test_run_forecast_merges_notices() {
    let rows = vec![
        RawEntry::new("Jan 2024", "120"),
        RawEntry::new("Feb 2024", "135"),
        RawEntry::new("Feb 2024", "0"),
        RawEntry::new("Mar 2024", "100"),
        RawEntry::new("Mar 2024", "50"),
    ];

    let result = run_forecast(&rows, "Paracetamol", &ForecastConfig::default()).unwrap();

    // Series is 120, 135, 150: baseline repeats 150, re-fit gives 165.
    assert!(result.degenerate_fallback_used);
    assert_abs_diff_eq!(result.predicted_value, 165.0, epsilon = 1e-9);
    assert_eq!(result.target_period, month(2024, 4));
    assert_eq!(
        result.notices,
        vec![Notice::DuplicatesAggregated {
            months: vec![month(2024, 3)]
        }]
    );
}

#[test]
fn test_run_forecast_fails_fast_on_bad_input() {
    let rows = vec![RawEntry::new("Jan 2024", "120")];

    assert!(matches!(
        run_forecast(&rows, "", &ForecastConfig::default()),
        Err(ForecastError::InsufficientData { found: 1, .. })
    ));
}
