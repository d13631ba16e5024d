//! The questions the toolkit answers, one function per question.
//!
//! Each insight composes the core operations over the standard engagement
//! columns. Rendering is left to the caller.

use std::collections::BTreeMap;

use engagement_analytics_models::{
    CategoryDifference, CountResult, GroupKey, InsightKind, InsightOutput, SumResult,
    SummaryReport, TimeSeries,
};
use engagement_table_models::{AGE_GROUP, CITYWIDE_COUNT, ENGAGEMENT_CATEGORY, REPORT_DATE, Table};

use crate::{
    AnalyticsError, count_by, filter_eq, group_values, inference, sum_by, summarize, time_series,
    time_series_by,
};

/// Engagement category examined by [`employment_age_distribution`].
pub const EMPLOYMENT_BUDGETED: &str = "EMPLOYMENT-BUDGETED";

/// Descriptive statistics of every numeric column.
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptyTable`] if the table has no rows.
pub fn describe(table: &Table) -> Result<SummaryReport, AnalyticsError> {
    summarize(table)
}

/// Number of records per age group.
///
/// # Errors
///
/// Returns [`AnalyticsError::UnknownColumn`] if the table lacks `AGE_GROUP`.
pub fn age_group_frequency(table: &Table) -> Result<CountResult, AnalyticsError> {
    count_by(table, AGE_GROUP)
}

/// Total citywide count per engagement category.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the engagement columns are missing or
/// mistyped.
pub fn citywide_by_category(table: &Table) -> Result<SumResult, AnalyticsError> {
    sum_by(table, ENGAGEMENT_CATEGORY, CITYWIDE_COUNT)
}

/// Total citywide count per report date.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the engagement columns are missing or
/// mistyped, or a report date cannot be parsed.
pub fn citywide_over_time(table: &Table) -> Result<TimeSeries, AnalyticsError> {
    time_series(table, REPORT_DATE, CITYWIDE_COUNT)
}

/// Tests whether citywide counts differ between engagement categories.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the engagement columns are missing or
/// mistyped, or the table has too few categories or observations.
pub fn category_difference(table: &Table) -> Result<CategoryDifference, AnalyticsError> {
    let groups = group_values(table, ENGAGEMENT_CATEGORY, CITYWIDE_COUNT)?;
    let inference = inference::anova(&groups)?;
    Ok(CategoryDifference { inference, groups })
}

/// Citywide count per age group within [`EMPLOYMENT_BUDGETED`].
///
/// Empty when the category does not occur.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the engagement columns are missing or
/// mistyped.
pub fn employment_age_distribution(table: &Table) -> Result<SumResult, AnalyticsError> {
    let employment = filter_eq(table, ENGAGEMENT_CATEGORY, EMPLOYMENT_BUDGETED)?;
    sum_by(&employment, AGE_GROUP, CITYWIDE_COUNT)
}

/// Citywide count per report date, one series per age group.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the engagement columns are missing or
/// mistyped, or a report date cannot be parsed.
pub fn engagement_by_age_over_time(
    table: &Table,
) -> Result<BTreeMap<GroupKey, TimeSeries>, AnalyticsError> {
    time_series_by(table, REPORT_DATE, CITYWIDE_COUNT, AGE_GROUP)
}

/// Runs the insight named by `kind`.
///
/// # Errors
///
/// Returns the error of the underlying insight.
pub fn run(kind: InsightKind, table: &Table) -> Result<InsightOutput, AnalyticsError> {
    log::info!("Running insight '{kind}' over {} rows", table.len());

    Ok(match kind {
        InsightKind::Describe => InsightOutput::Summary(describe(table)?),
        InsightKind::AgeGroupFrequency => InsightOutput::Counts(age_group_frequency(table)?),
        InsightKind::CitywideByCategory => InsightOutput::Totals(citywide_by_category(table)?),
        InsightKind::CitywideOverTime => InsightOutput::Trend(citywide_over_time(table)?),
        InsightKind::CategoryDifference => {
            InsightOutput::Difference(category_difference(table)?)
        }
        InsightKind::EmploymentAgeDistribution => {
            InsightOutput::Totals(employment_age_distribution(table)?)
        }
        InsightKind::EngagementByAgeOverTime => {
            InsightOutput::Trends(engagement_by_age_over_time(table)?)
        }
    })
}
