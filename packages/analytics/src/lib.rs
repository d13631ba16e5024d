#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation, filtering, summary and inference core for engagement data.
//!
//! Every operation is a pure function over a borrowed [`Table`]: nothing is
//! mutated, nothing is cached, and every failure is returned to the caller
//! as an [`AnalyticsError`] at the point it is detected. The [`insights`]
//! module composes these operations into the questions the toolkit answers.

pub mod aggregate;
pub mod filter;
pub mod inference;
pub mod insights;
pub mod summary;
pub mod temporal;

pub use aggregate::{count_by, sum_by};
pub use filter::filter_eq;
pub use inference::{group_values, one_way_anova};
pub use summary::summarize;
pub use temporal::{time_series, time_series_by};

use engagement_table_models::{ColumnType, Table};
use thiserror::Error;

/// Errors that can occur during analytics operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyticsError {
    /// Summary statistics were requested on a table with no rows.
    #[error("Cannot summarize an empty table")]
    EmptyTable,

    /// A referenced column is not part of the table's schema.
    #[error("Unknown column '{column}'")]
    UnknownColumn {
        /// The missing column name.
        column: String,
    },

    /// A measure column does not hold numbers.
    #[error("Column '{column}' is not numeric")]
    NonNumericColumn {
        /// The offending column name.
        column: String,
    },

    /// A date column value could not be normalized to a calendar date.
    #[error("Invalid date '{value}' in column '{column}'")]
    InvalidDate {
        /// Column being normalized.
        column: String,
        /// The unparsable value.
        value: String,
    },

    /// Fewer than two non-empty groups were available for comparison.
    #[error("At least 2 non-empty groups are required, found {found}")]
    InsufficientGroups {
        /// Number of non-empty groups found.
        found: usize,
    },

    /// No within-group degrees of freedom remain (every group has a single
    /// observation).
    #[error("{observations} observations in {groups} groups leave no within-group degrees of freedom")]
    InsufficientObservations {
        /// Total number of observations.
        observations: usize,
        /// Number of groups.
        groups: usize,
    },

    /// The test distribution could not be built for the given degrees of
    /// freedom.
    #[error("Invalid test distribution: {message}")]
    InvalidDistribution {
        /// Reason reported by the distribution.
        message: String,
    },
}

/// Resolves a column name to its index in the table's schema.
fn column_index(table: &Table, column: &str) -> Result<usize, AnalyticsError> {
    table
        .schema()
        .index_of(column)
        .ok_or_else(|| AnalyticsError::UnknownColumn {
            column: column.to_string(),
        })
}

/// Resolves a column name and checks that it holds numbers.
fn numeric_column_index(table: &Table, column: &str) -> Result<usize, AnalyticsError> {
    let idx = column_index(table, column)?;
    if table.schema().columns()[idx].column_type == ColumnType::Number {
        Ok(idx)
    } else {
        Err(AnalyticsError::NonNumericColumn {
            column: column.to_string(),
        })
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;
    use engagement_table_models::{Record, Table};

    pub fn record(age: &str, category: &str, count: f64, date: &str) -> Record {
        Record {
            age_group: age.to_string(),
            engagement_category: category.to_string(),
            citywide_count: count,
            report_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        }
    }

    /// Small engagement table covering three dates, three age groups and
    /// three categories.
    pub fn engagement_table() -> Table {
        Table::from_records([
            record("18-24", "EMPLOYMENT-BUDGETED", 10.0, "2023-02-28"),
            record("25-34", "EMPLOYMENT-BUDGETED", 5.0, "2023-01-31"),
            record("18-24", "SPORTS", 3.0, "2023-01-31"),
            record("14-17", "SPORTS", 7.0, "2023-03-31"),
            record("25-34", "ARTS", 4.0, "2023-02-28"),
            record("18-24", "ARTS", 6.0, "2023-01-31"),
        ])
    }
}
