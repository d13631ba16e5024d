//! Exact-match row selection ahead of aggregation.

use engagement_table_models::{Table, Value};

use crate::{AnalyticsError, column_index};

/// Returns the rows whose `column` equals `value`.
///
/// Text compares case-sensitively, numbers and dates by value. A cell of a
/// different kind than `value` never matches. No match yields an empty
/// table with the same schema.
///
/// # Errors
///
/// Returns [`AnalyticsError::UnknownColumn`] if `column` is not in the
/// schema.
pub fn filter_eq(
    table: &Table,
    column: &str,
    value: impl Into<Value>,
) -> Result<Table, AnalyticsError> {
    let idx = column_index(table, column)?;
    let value = value.into();

    let filtered = table.select_rows(|row| row[idx] == value);

    log::debug!(
        "filter_eq({column} == {value}): kept {} of {} rows",
        filtered.len(),
        table.len()
    );

    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use engagement_table_models::{AGE_GROUP, CITYWIDE_COUNT, ENGAGEMENT_CATEGORY, REPORT_DATE};

    use super::*;
    use crate::fixtures::engagement_table;
    use crate::{AnalyticsError, count_by, one_way_anova, sum_by, summarize, time_series};

    #[test]
    fn keeps_matching_rows_only() {
        let table = engagement_table();
        let employment = filter_eq(&table, ENGAGEMENT_CATEGORY, "EMPLOYMENT-BUDGETED").unwrap();
        assert_eq!(employment.len(), 2);
        assert!(employment.rows().all(|row| row[1] == Value::from("EMPLOYMENT-BUDGETED")));
    }

    #[test]
    fn match_is_case_sensitive() {
        let table = engagement_table();
        let lower = filter_eq(&table, ENGAGEMENT_CATEGORY, "employment-budgeted").unwrap();
        assert!(lower.is_empty());
    }

    #[test]
    fn filters_numbers_and_dates_by_value() {
        let table = engagement_table();
        assert_eq!(filter_eq(&table, CITYWIDE_COUNT, 10.0).unwrap().len(), 1);
        let date = chrono::NaiveDate::from_ymd_opt(2023, 1, 31).unwrap();
        assert_eq!(filter_eq(&table, REPORT_DATE, date).unwrap().len(), 3);
        // A text value never matches a number column.
        assert!(filter_eq(&table, CITYWIDE_COUNT, "10").unwrap().is_empty());
    }

    #[test]
    fn unknown_column_is_rejected() {
        assert!(matches!(
            filter_eq(&engagement_table(), "BOROUGH", "BRONX"),
            Err(AnalyticsError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn empty_filter_result_flows_through_aggregators() {
        let table = engagement_table();
        let none = filter_eq(&table, ENGAGEMENT_CATEGORY, "VOLUNTEERING").unwrap();
        assert!(none.is_empty());
        assert_eq!(none.schema(), table.schema());

        assert!(count_by(&none, AGE_GROUP).unwrap().is_empty());
        assert!(sum_by(&none, AGE_GROUP, CITYWIDE_COUNT).unwrap().is_empty());
        assert!(time_series(&none, REPORT_DATE, CITYWIDE_COUNT).unwrap().is_empty());
        assert_eq!(summarize(&none).unwrap_err(), AnalyticsError::EmptyTable);
        assert_eq!(
            one_way_anova(&none, AGE_GROUP, CITYWIDE_COUNT).unwrap_err(),
            AnalyticsError::InsufficientGroups { found: 0 }
        );
    }
}
