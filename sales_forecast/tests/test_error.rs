use sales_forecast::data::Month;
use sales_forecast::error::{ForecastError, Notice};
use std::io;

#[test]
fn test_error_conversion() {
    // Test IO error conversion
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let forecast_error = ForecastError::from(io_error);

    assert!(matches!(forecast_error, ForecastError::IoError(_)));
    assert!(!forecast_error.is_recoverable());

    // Test JSON error conversion
    let json_error = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
    let forecast_error = ForecastError::from(json_error);

    assert!(matches!(forecast_error, ForecastError::ParseError(_)));
}

#[test]
fn test_error_display() {
    let error = ForecastError::InsufficientData {
        found: 2,
        required: 3,
    };
    assert_eq!(
        error.to_string(),
        "Please enter at least 3 valid sales data points (found 2)."
    );

    let error = ForecastError::InvalidDate("13/2024".to_string());
    assert_eq!(error.to_string(), "Invalid date format: 13/2024");

    let error = ForecastError::FitError("objective is not finite".to_string());
    assert!(error.to_string().contains("SARIMA"));
    assert!(error.to_string().contains("objective is not finite"));

    let error = ForecastError::MonthGap {
        missing: vec!["Feb 2024".to_string(), "Mar 2024".to_string()],
    };
    assert_eq!(
        error.to_string(),
        "Sales history skips 2 month(s): Feb 2024, Mar 2024"
    );
}

#[test]
fn test_error_kinds() {
    let cases = [
        (
            ForecastError::InsufficientData {
                found: 0,
                required: 3,
            },
            "InsufficientData",
        ),
        (ForecastError::InvalidDate("x".to_string()), "InvalidDate"),
        (ForecastError::FitError("x".to_string()), "FitError"),
        (
            ForecastError::InvalidParameter("x".to_string()),
            "InvalidParameter",
        ),
    ];

    for (error, kind) in cases {
        assert_eq!(error.kind(), kind);
        assert!(error.is_recoverable());
    }
}

#[test]
fn test_notice_display() {
    let jan = Month::new(2024, 1).unwrap();
    let notice = Notice::DuplicatesAggregated { months: vec![jan] };
    assert!(notice.to_string().starts_with("Duplicate dates found."));
    assert!(notice.to_string().contains("Jan 2024"));

    let notice = Notice::NegativeForecastClamped { raw: -10.0 };
    assert!(notice.to_string().contains("-10.00"));
}
