//! Categorical aggregation: frequency and summed measure per group.

use std::collections::BTreeMap;

use engagement_analytics_models::{CountResult, GroupKey, SumResult};
use engagement_table_models::Table;

use crate::{AnalyticsError, column_index, numeric_column_index};

/// Counts the rows holding each distinct value of `column`.
///
/// # Errors
///
/// Returns [`AnalyticsError::UnknownColumn`] if `column` is not in the
/// schema.
pub fn count_by(table: &Table, column: &str) -> Result<CountResult, AnalyticsError> {
    let idx = column_index(table, column)?;

    let mut groups: BTreeMap<GroupKey, u64> = BTreeMap::new();
    for value in table.column_values(idx) {
        *groups.entry(GroupKey::from(value)).or_default() += 1;
    }

    log::debug!(
        "count_by({column}): {} rows in {} groups",
        table.len(),
        groups.len()
    );

    Ok(groups.into())
}

/// Sums `measure_column` for each distinct value of `group_column`.
///
/// # Errors
///
/// Returns [`AnalyticsError::UnknownColumn`] if either column is not in the
/// schema, or [`AnalyticsError::NonNumericColumn`] if `measure_column` does
/// not hold numbers.
pub fn sum_by(
    table: &Table,
    group_column: &str,
    measure_column: &str,
) -> Result<SumResult, AnalyticsError> {
    let group_idx = column_index(table, group_column)?;
    let measure_idx = numeric_column_index(table, measure_column)?;

    let mut groups: BTreeMap<GroupKey, f64> = BTreeMap::new();
    for row in table.rows() {
        let measure = row[measure_idx].as_number().unwrap_or_default();
        *groups.entry(GroupKey::from(&row[group_idx])).or_default() += measure;
    }

    log::debug!(
        "sum_by({group_column}, {measure_column}): {} rows in {} groups",
        table.len(),
        groups.len()
    );

    Ok(groups.into())
}

#[cfg(test)]
mod tests {
    use engagement_table_models::{
        AGE_GROUP, CITYWIDE_COUNT, ColumnDef, ColumnType, ENGAGEMENT_CATEGORY, REPORT_DATE, Schema,
        Value,
    };

    use super::*;
    use crate::fixtures::{engagement_table, record};

    #[test]
    fn counts_and_sums_example_rows() {
        let table = Table::from_records([
            record("18-24", "SPORTS", 10.0, "2023-01-31"),
            record("25-34", "SPORTS", 5.0, "2023-01-31"),
            record("18-24", "SPORTS", 3.0, "2023-01-31"),
        ]);

        let counts = count_by(&table, AGE_GROUP).unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.get("18-24"), Some(&2));
        assert_eq!(counts.get("25-34"), Some(&1));

        let sums = sum_by(&table, AGE_GROUP, CITYWIDE_COUNT).unwrap();
        assert_eq!(sums.len(), 2);
        assert!((sums.get("18-24").unwrap() - 13.0).abs() < f64::EPSILON);
        assert!((sums.get("25-34").unwrap() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn every_row_counted_once() {
        let table = engagement_table();
        for column in [AGE_GROUP, ENGAGEMENT_CATEGORY, CITYWIDE_COUNT, REPORT_DATE] {
            let counts = count_by(&table, column).unwrap();
            assert_eq!(counts.total(), table.len() as u64, "column {column}");
        }
    }

    #[test]
    fn sum_conserves_total() {
        let table = engagement_table();
        let expected: f64 = table
            .column_values(table.schema().index_of(CITYWIDE_COUNT).unwrap())
            .filter_map(Value::as_number)
            .sum();
        for group in [AGE_GROUP, ENGAGEMENT_CATEGORY, REPORT_DATE] {
            let sums = sum_by(&table, group, CITYWIDE_COUNT).unwrap();
            assert!((sums.total() - expected).abs() < 1e-9, "group {group}");
        }
    }

    #[test]
    fn groups_by_date_use_iso_keys() {
        let counts = count_by(&engagement_table(), REPORT_DATE).unwrap();
        assert_eq!(counts.get("2023-01-31"), Some(&3));
        assert_eq!(counts.get("2023-02-28"), Some(&2));
        assert_eq!(counts.get("2023-03-31"), Some(&1));
    }

    #[test]
    fn unknown_column_is_rejected() {
        let table = engagement_table();
        assert_eq!(
            count_by(&table, "BOROUGH").unwrap_err(),
            AnalyticsError::UnknownColumn {
                column: "BOROUGH".to_string()
            }
        );
        assert!(matches!(
            sum_by(&table, AGE_GROUP, "MISSING"),
            Err(AnalyticsError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn text_measure_is_rejected() {
        assert_eq!(
            sum_by(&engagement_table(), AGE_GROUP, ENGAGEMENT_CATEGORY).unwrap_err(),
            AnalyticsError::NonNumericColumn {
                column: ENGAGEMENT_CATEGORY.to_string()
            }
        );
    }

    #[test]
    fn empty_table_gives_empty_result() {
        let table = Table::empty(Schema::engagement());
        assert!(count_by(&table, AGE_GROUP).unwrap().is_empty());
        assert!(sum_by(&table, AGE_GROUP, CITYWIDE_COUNT).unwrap().is_empty());
    }

    #[test]
    fn numeric_group_column_keys_by_value() {
        let schema = Schema::new(vec![ColumnDef::new("N", ColumnType::Number)]).unwrap();
        let table = Table::from_rows(
            schema,
            vec![
                vec![Value::from(1.5)],
                vec![Value::from(1.5)],
                vec![Value::from(2)],
            ],
        )
        .unwrap();
        let counts = count_by(&table, "N").unwrap();
        assert_eq!(counts.get("1.5"), Some(&2));
        assert_eq!(counts.get("2"), Some(&1));
    }

    #[test]
    fn signed_zeros_form_one_group() {
        let schema = Schema::new(vec![ColumnDef::new("N", ColumnType::Number)]).unwrap();
        let table = Table::from_rows(
            schema,
            vec![vec![Value::from(-0.0)], vec![Value::from(0.0)]],
        )
        .unwrap();
        let counts = count_by(&table, "N").unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get("0"), Some(&2));
        assert_eq!(
            crate::filter_eq(&table, "N", 0.0).unwrap().len() as u64,
            counts.total()
        );
    }

    #[test]
    fn repeated_calls_are_identical() {
        let table = engagement_table();
        let before = table.clone();
        let first = sum_by(&table, ENGAGEMENT_CATEGORY, CITYWIDE_COUNT).unwrap();
        let second = sum_by(&table, ENGAGEMENT_CATEGORY, CITYWIDE_COUNT).unwrap();
        assert_eq!(first, second);
        assert_eq!(table, before);
    }
}
