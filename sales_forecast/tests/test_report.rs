use pretty_assertions::assert_eq;
use rstest::rstest;
use sales_forecast::report::format_units;
use sales_forecast::{ForecastReport, ForecastResult, ModelOrder, Month, Notice};

fn result(value: f64) -> ForecastResult {
    ForecastResult {
        target_period: Month::new(2024, 12).unwrap(),
        predicted_value: value,
        degenerate_fallback_used: true,
        clamped_to_zero: false,
        order_used: ModelOrder::monthly().with_d(2),
        notices: vec![Notice::DuplicatesAggregated {
            months: vec![Month::new(2024, 3).unwrap()],
        }],
    }
}

#[rstest]
#[case(0.0, "0")]
#[case(12.0, "12")]
#[case(999.0, "999")]
#[case(1234.4, "1,234")]
#[case(1234567.8, "1,234,568")]
#[case(-4321.0, "-4,321")]
fn test_format_units(#[case] value: f64, #[case] expected: &str) {
    assert_eq!(format_units(value), expected);
}

#[test]
fn test_report_fields() {
    let report = ForecastReport::new(&result(1234.6), "  Paracetamol ");

    assert_eq!(report.product, "Paracetamol");
    assert_eq!(report.target_period, "December 2024");
    assert_eq!(report.predicted_value, 1235.0);
    assert!(report.used_fallback);
    assert_eq!(report.notices.len(), 1);
}

#[test]
fn test_report_message() {
    let report = ForecastReport::new(&result(1234.6), "Paracetamol");
    assert_eq!(
        report.to_string(),
        "The predicted sales for Paracetamol in December 2024 is 1,235 units."
    );

    let unnamed = ForecastReport::new(&result(40.2), "");
    assert_eq!(
        unnamed.to_string(),
        "The predicted sales for this product in December 2024 is 40 units."
    );
}

#[test]
fn test_report_json() {
    let json = ForecastReport::new(&result(88.0), "Aspirin").to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["target_period"], "December 2024");
    assert_eq!(value["predicted_value"], 88.0);
    assert_eq!(value["used_fallback"], true);
}

#[test]
fn test_result_serializes_months_as_labels() {
    let json = serde_json::to_value(result(10.0)).unwrap();

    assert_eq!(json["target_period"], "Dec 2024");
    assert_eq!(json["notices"][0]["kind"], "duplicates_aggregated");
    assert_eq!(json["notices"][0]["months"][0], "Mar 2024");
}
