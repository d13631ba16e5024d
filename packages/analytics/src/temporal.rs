//! Temporal aggregation: summed measure per report date.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use engagement_analytics_models::{GroupKey, TimeSeries};
use engagement_table_models::dates::parse_date;
use engagement_table_models::{Table, Value};

use crate::{AnalyticsError, column_index, numeric_column_index};

/// Normalizes a date cell to its calendar date.
fn normalize_date(column: &str, value: &Value) -> Result<NaiveDate, AnalyticsError> {
    let date = match value {
        Value::Date(d) => Some(*d),
        Value::Text(s) => parse_date(s),
        Value::Number(_) => None,
    };
    date.ok_or_else(|| AnalyticsError::InvalidDate {
        column: column.to_string(),
        value: value.to_string(),
    })
}

/// Sums `measure_column` per date of `date_column`, ascending by date.
///
/// Rows sharing a date are summed into one point.
///
/// # Errors
///
/// Returns [`AnalyticsError::UnknownColumn`] if either column is missing,
/// [`AnalyticsError::NonNumericColumn`] if the measure is not numeric, or
/// [`AnalyticsError::InvalidDate`] if any date cannot be normalized.
pub fn time_series(
    table: &Table,
    date_column: &str,
    measure_column: &str,
) -> Result<TimeSeries, AnalyticsError> {
    let date_idx = column_index(table, date_column)?;
    let measure_idx = numeric_column_index(table, measure_column)?;

    let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for row in table.rows() {
        let date = normalize_date(date_column, &row[date_idx])?;
        *buckets.entry(date).or_default() += row[measure_idx].as_number().unwrap_or_default();
    }

    log::debug!(
        "time_series({date_column}, {measure_column}): {} rows in {} dates",
        table.len(),
        buckets.len()
    );

    Ok(buckets.into())
}

/// Like [`time_series`], but computes one independent series per distinct
/// value of `split_column`, each over only that value's rows.
///
/// # Errors
///
/// Same as [`time_series`], plus [`AnalyticsError::UnknownColumn`] if
/// `split_column` is missing.
pub fn time_series_by(
    table: &Table,
    date_column: &str,
    measure_column: &str,
    split_column: &str,
) -> Result<BTreeMap<GroupKey, TimeSeries>, AnalyticsError> {
    let date_idx = column_index(table, date_column)?;
    let measure_idx = numeric_column_index(table, measure_column)?;
    let split_idx = column_index(table, split_column)?;

    let mut splits: BTreeMap<GroupKey, BTreeMap<NaiveDate, f64>> = BTreeMap::new();
    for row in table.rows() {
        let date = normalize_date(date_column, &row[date_idx])?;
        *splits
            .entry(GroupKey::from(&row[split_idx]))
            .or_default()
            .entry(date)
            .or_default() += row[measure_idx].as_number().unwrap_or_default();
    }

    log::debug!(
        "time_series_by({date_column}, {measure_column}, {split_column}): {} series",
        splits.len()
    );

    Ok(splits
        .into_iter()
        .map(|(key, buckets)| (key, buckets.into()))
        .collect())
}

#[cfg(test)]
mod tests {
    use engagement_table_models::{
        AGE_GROUP, CITYWIDE_COUNT, ColumnDef, ColumnType, ENGAGEMENT_CATEGORY, REPORT_DATE, Schema,
    };

    use super::*;
    use crate::fixtures::engagement_table;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn text_dated_table(dates: &[(&str, f64)]) -> Table {
        let schema = Schema::new(vec![
            ColumnDef::new("DATE", ColumnType::Text),
            ColumnDef::new("N", ColumnType::Number),
        ])
        .unwrap();
        let rows = dates
            .iter()
            .map(|(d, n)| vec![Value::from(*d), Value::from(*n)])
            .collect();
        Table::from_rows(schema, rows).unwrap()
    }

    #[test]
    fn sums_per_date_in_ascending_order() {
        let series = time_series(&engagement_table(), REPORT_DATE, CITYWIDE_COUNT).unwrap();
        let points: Vec<_> = series.points().iter().map(|p| (p.date, p.value)).collect();
        assert_eq!(
            points,
            vec![
                (ymd(2023, 1, 31), 14.0),
                (ymd(2023, 2, 28), 14.0),
                (ymd(2023, 3, 31), 7.0),
            ]
        );
        assert!((series.total() - 35.0).abs() < 1e-9);
    }

    #[test]
    fn parses_textual_dates_and_merges_same_day() {
        let table = text_dated_table(&[
            ("03/01/2023", 1.0),
            ("2023-01-15T10:00:00", 2.0),
            ("01/15/2023 12:00:00 AM", 3.0),
        ]);
        let series = time_series(&table, "DATE", "N").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.points()[0].date, ymd(2023, 1, 15));
        assert!((series.points()[0].value - 5.0).abs() < f64::EPSILON);
        assert!(series.points().windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn unparsable_date_is_rejected() {
        let table = text_dated_table(&[("2023-01-15", 1.0), ("someday", 2.0)]);
        assert_eq!(
            time_series(&table, "DATE", "N").unwrap_err(),
            AnalyticsError::InvalidDate {
                column: "DATE".to_string(),
                value: "someday".to_string()
            }
        );
    }

    #[test]
    fn number_column_is_not_a_date() {
        assert!(matches!(
            time_series(&engagement_table(), CITYWIDE_COUNT, CITYWIDE_COUNT),
            Err(AnalyticsError::InvalidDate { .. })
        ));
    }

    #[test]
    fn splits_into_independent_series() {
        let table = engagement_table();
        let by_age = time_series_by(&table, REPORT_DATE, CITYWIDE_COUNT, AGE_GROUP).unwrap();

        assert_eq!(by_age.len(), 3);
        let young = &by_age["18-24"];
        let points: Vec<_> = young.points().iter().map(|p| (p.date, p.value)).collect();
        assert_eq!(
            points,
            vec![(ymd(2023, 1, 31), 9.0), (ymd(2023, 2, 28), 10.0)]
        );
        assert_eq!(by_age["14-17"].len(), 1);

        let total: f64 = by_age.values().map(TimeSeries::total).sum();
        assert!((total - 35.0).abs() < 1e-9);
    }

    #[test]
    fn split_on_unknown_column_is_rejected() {
        assert!(matches!(
            time_series_by(&engagement_table(), REPORT_DATE, CITYWIDE_COUNT, "BOROUGH"),
            Err(AnalyticsError::UnknownColumn { .. })
        ));
        assert!(matches!(
            time_series_by(&engagement_table(), REPORT_DATE, ENGAGEMENT_CATEGORY, AGE_GROUP),
            Err(AnalyticsError::NonNumericColumn { .. })
        ));
    }
}
