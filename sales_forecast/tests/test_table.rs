use pretty_assertions::assert_eq;
use sales_forecast::table::{date_options, SalesTable, MIN_ROWS};
use sales_forecast::{normalize, ForecastError, Month, RawValue};

fn month(year: i32, m: u32) -> Month {
    Month::new(year, m).unwrap()
}

fn labels(table: &SalesTable) -> Vec<String> {
    table.rows().iter().map(|row| row.month.label()).collect()
}

#[test]
fn test_new_table_has_three_blank_rows() {
    let table = SalesTable::new(month(2024, 11)).unwrap();

    assert_eq!(table.len(), MIN_ROWS);
    assert_eq!(labels(&table), vec!["Nov 2024", "Dec 2024", "Jan 2025"]);
    assert!(table.rows().iter().all(|row| row.sales.is_empty()));
    assert_eq!(table.valid_count(), 0);
}

#[test]
fn test_add_and_remove_rows() {
    let mut table = SalesTable::new(month(2024, 1)).unwrap();

    assert_eq!(table.add_row().unwrap(), month(2024, 4));
    assert_eq!(table.len(), 4);

    let removed = table.remove_row(1).unwrap();
    assert_eq!(removed.month, month(2024, 2));
    assert_eq!(labels(&table), vec!["Jan 2024", "Mar 2024", "Apr 2024"]);

    // Three rows left: removal refused.
    assert!(matches!(
        table.remove_row(0),
        Err(ForecastError::InvalidParameter(_))
    ));
    assert!(table.set_sales(7, 1.0).is_err());
}

#[test]
fn test_start_month_relabels_all_rows() {
    let mut table = SalesTable::new(month(2024, 1)).unwrap();
    table.add_row().unwrap();
    table.set_sales(0, "12").unwrap();
    table.set_sales(3, 18.0).unwrap();

    table.set_start_label("Oct 2023").unwrap();

    assert_eq!(labels(&table), vec!["Oct 2023", "Nov 2023", "Dec 2023", "Jan 2024"]);
    assert_eq!(table.rows()[0].sales, RawValue::Text("12".to_string()));
    assert_eq!(table.rows()[3].sales, RawValue::Number(18.0));

    assert!(matches!(
        table.set_start_label("Month 13"),
        Err(ForecastError::InvalidDate(_))
    ));
    assert_eq!(labels(&table)[0], "Oct 2023");
}

#[test]
fn test_clear_resets_rows() {
    let mut table = SalesTable::new(month(2024, 1)).unwrap();
    table.add_row().unwrap();
    table.add_row().unwrap();
    table.set_sales(2, 5.0).unwrap();

    table.clear(month(2025, 6)).unwrap();

    assert_eq!(labels(&table), vec!["Jun 2025", "Jul 2025", "Aug 2025"]);
    assert_eq!(table.valid_count(), 0);
}

#[test]
fn test_entries_feed_normalizer() {
    let mut table = SalesTable::new(month(2024, 1)).unwrap();
    table.add_row().unwrap();
    table.set_sales(0, "100").unwrap();
    table.set_sales(1, "0").unwrap();
    table.set_sales(2, 120.0).unwrap();
    table.set_sales(3, "130").unwrap();

    assert_eq!(table.valid_count(), 3);

    let entries = table.entries();
    assert_eq!(entries[0].date_label, "Jan 2024");

    let normalized = normalize(&entries).unwrap();
    assert_eq!(normalized.series.values(), vec![100.0, 120.0, 130.0]);
}

#[test]
fn test_date_options_go_backwards() {
    let options = date_options(month(2024, 2), 60);

    assert_eq!(options.len(), 60);
    assert_eq!(options[0], "Feb 2024");
    assert_eq!(options[1], "Jan 2024");
    assert_eq!(options[2], "Dec 2023");
    assert_eq!(options[59], "Mar 2019");
}
