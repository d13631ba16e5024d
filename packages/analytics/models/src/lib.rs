#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types produced by the engagement analytics core.
//!
//! Everything here is derived data: created fresh by an aggregation or
//! test, owned by the caller, and handed on to a chart sink or printed.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use engagement_table_models::Value;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// p-value threshold below which a test result is reported as significant.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// One distinct value of a grouping column, in canonical string form.
///
/// Numbers use the shortest round-trip representation and dates use
/// `YYYY-MM-DD`, so two cells map to the same key exactly when they are
/// equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(String);

impl GroupKey {
    /// Creates a key from its canonical string.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The canonical string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&Value> for GroupKey {
    /// Negative zero maps to the same key as zero, matching numeric
    /// equality.
    fn from(value: &Value) -> Self {
        match value {
            Value::Number(n) if *n == 0.0 => Self("0".to_string()),
            _ => Self(value.to_string()),
        }
    }
}

impl From<&str> for GroupKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Borrow<str> for GroupKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mapping from each distinct group to its measure.
///
/// Keys are exactly the distinct values seen in the grouping column; groups
/// with no rows never appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateResult<M> {
    groups: BTreeMap<GroupKey, M>,
}

/// Row count per group.
pub type CountResult = AggregateResult<u64>;

/// Summed measure per group.
pub type SumResult = AggregateResult<f64>;

impl<M> Default for AggregateResult<M> {
    fn default() -> Self {
        Self {
            groups: BTreeMap::new(),
        }
    }
}

impl<M> From<BTreeMap<GroupKey, M>> for AggregateResult<M> {
    fn from(groups: BTreeMap<GroupKey, M>) -> Self {
        Self { groups }
    }
}

impl<M> AggregateResult<M> {
    /// Returns the measure of the given group.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&M> {
        self.groups.get(key)
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether there are no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterates over `(group, measure)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &M)> {
        self.groups.iter()
    }

    /// Iterates over measures in key order.
    pub fn values(&self) -> impl Iterator<Item = &M> {
        self.groups.values()
    }

    /// Borrows the underlying map.
    #[must_use]
    pub const fn as_map(&self) -> &BTreeMap<GroupKey, M> {
        &self.groups
    }
}

impl<M: Copy + PartialOrd> AggregateResult<M> {
    /// Returns the groups ordered by descending measure, ties broken by key.
    #[must_use]
    pub fn ranked(&self) -> Vec<(GroupKey, M)> {
        let mut ranked: Vec<(GroupKey, M)> =
            self.groups.iter().map(|(k, v)| (k.clone(), *v)).collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked
    }
}

impl<M: Copy + std::iter::Sum<M>> AggregateResult<M> {
    /// Sum of all group measures.
    #[must_use]
    pub fn total(&self) -> M {
        self.groups.values().copied().sum()
    }
}

/// One point of a [`TimeSeries`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    /// Calendar date of the bucket.
    pub date: NaiveDate,
    /// Summed measure for that date.
    pub value: f64,
}

/// Date-ordered series with at most one point per date.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSeries {
    points: Vec<TimeSeriesPoint>,
}

impl From<BTreeMap<NaiveDate, f64>> for TimeSeries {
    fn from(buckets: BTreeMap<NaiveDate, f64>) -> Self {
        Self {
            points: buckets
                .into_iter()
                .map(|(date, value)| TimeSeriesPoint { date, value })
                .collect(),
        }
    }
}

impl TimeSeries {
    /// Points sorted ascending by date.
    #[must_use]
    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of all point values.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }
}

/// Descriptive statistics of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSummary {
    /// Column name.
    pub column: String,
    /// Number of observations.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation; undefined for a single observation.
    pub std: Option<f64>,
    /// Smallest value.
    pub min: f64,
    /// 25th percentile.
    pub p25: f64,
    /// Median.
    pub p50: f64,
    /// 75th percentile.
    pub p75: f64,
    /// Largest value.
    pub max: f64,
}

/// Descriptive statistics for every numeric column of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    /// Number of rows summarized.
    pub rows: usize,
    /// One entry per numeric column, in schema order.
    pub columns: Vec<ColumnSummary>,
}

impl SummaryReport {
    /// Returns the summary of the named column.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.column == name)
    }
}

/// Outcome of a one-way ANOVA.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceResult {
    /// F statistic.
    pub statistic: f64,
    /// Probability of an F at least this large under the null hypothesis.
    pub p_value: f64,
    /// `p_value < SIGNIFICANCE_LEVEL`.
    pub significant: bool,
    /// Between-group degrees of freedom (`k - 1`).
    pub df_between: usize,
    /// Within-group degrees of freedom (`N - k`).
    pub df_within: usize,
}

impl InferenceResult {
    /// Creates a result, deriving `significant` from `p_value`.
    #[must_use]
    pub fn new(statistic: f64, p_value: f64, df_between: usize, df_within: usize) -> Self {
        Self {
            statistic,
            p_value,
            significant: p_value < SIGNIFICANCE_LEVEL,
            df_between,
            df_within,
        }
    }

    /// Number of groups compared.
    #[must_use]
    pub const fn groups(&self) -> usize {
        self.df_between + 1
    }

    /// Total number of observations.
    #[must_use]
    pub const fn observations(&self) -> usize {
        self.df_between + 1 + self.df_within
    }

    /// Human-readable interpretation of the p-value.
    #[must_use]
    pub fn verdict(&self) -> String {
        if self.significant {
            format!(
                "The p-value is {} which is less than {SIGNIFICANCE_LEVEL}. Therefore, there is a \
                 statistically significant difference in engagement between categories.",
                self.p_value
            )
        } else {
            format!(
                "The p-value is {} which is greater than or equal to {SIGNIFICANCE_LEVEL}. \
                 Therefore, there is no statistically significant difference in engagement \
                 between categories.",
                self.p_value
            )
        }
    }
}

/// Measure values of one group, in row order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupValues {
    /// Group the values belong to.
    pub key: GroupKey,
    /// Measure values.
    pub values: Vec<f64>,
}

/// ANOVA outcome together with the distributions it compared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDifference {
    /// Test outcome.
    pub inference: InferenceResult,
    /// Compared groups, in first-seen order.
    pub groups: Vec<GroupValues>,
}

/// Result of running one [`InsightKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "result", rename_all = "camelCase")]
pub enum InsightOutput {
    /// Descriptive statistics.
    Summary(SummaryReport),
    /// Row count per group.
    Counts(CountResult),
    /// Summed measure per group.
    Totals(SumResult),
    /// One date-ordered series.
    Trend(TimeSeries),
    /// One date-ordered series per split value.
    Trends(BTreeMap<GroupKey, TimeSeries>),
    /// ANOVA outcome with the compared distributions.
    Difference(CategoryDifference),
}

/// Questions the toolkit answers about an engagement dataset.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum InsightKind {
    /// Descriptive statistics of numeric columns.
    Describe,
    /// How many records fall in each age group.
    AgeGroupFrequency,
    /// Total citywide count per engagement category.
    CitywideByCategory,
    /// Total citywide count per report date.
    CitywideOverTime,
    /// Whether citywide counts differ between engagement categories.
    CategoryDifference,
    /// Age-group totals within the budgeted employment category.
    EmploymentAgeDistribution,
    /// Citywide count per report date, one series per age group.
    EngagementByAgeOverTime,
}

impl InsightKind {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Describe,
            Self::AgeGroupFrequency,
            Self::CitywideByCategory,
            Self::CitywideOverTime,
            Self::CategoryDifference,
            Self::EmploymentAgeDistribution,
            Self::EngagementByAgeOverTime,
        ]
    }

    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Describe => "Describe numeric columns",
            Self::AgeGroupFrequency => "Frequency of age groups",
            Self::CitywideByCategory => "Citywide count by engagement category",
            Self::CitywideOverTime => "Citywide count over time",
            Self::CategoryDifference => "Compare engagement categories (one-way ANOVA)",
            Self::EmploymentAgeDistribution => "Age groups in EMPLOYMENT-BUDGETED",
            Self::EngagementByAgeOverTime => "Engagement by age group over time",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, u64)]) -> CountResult {
        pairs
            .iter()
            .map(|(k, v)| (GroupKey::from(*k), *v))
            .collect::<BTreeMap<_, _>>()
            .into()
    }

    #[test]
    fn ranked_orders_by_measure_then_key() {
        let result = counts(&[("a", 1), ("b", 3), ("c", 3)]);
        let ranked: Vec<_> = result
            .ranked()
            .into_iter()
            .map(|(k, v)| (k.as_str().to_string(), v))
            .collect();
        assert_eq!(
            ranked,
            vec![
                ("b".to_string(), 3),
                ("c".to_string(), 3),
                ("a".to_string(), 1)
            ]
        );
    }

    #[test]
    fn lookup_by_str() {
        let result = counts(&[("18-24", 2)]);
        assert_eq!(result.get("18-24"), Some(&2));
        assert_eq!(result.get("25-34"), None);
        assert_eq!(result.total(), 2);
    }

    #[test]
    fn group_key_from_number_value() {
        assert_eq!(GroupKey::from(&Value::Number(10.0)).as_str(), "10");
    }

    #[test]
    fn negative_zero_shares_the_zero_key() {
        assert_eq!(
            GroupKey::from(&Value::Number(-0.0)),
            GroupKey::from(&Value::Number(0.0))
        );
        assert_eq!(GroupKey::from(&Value::Number(-0.0)).as_str(), "0");
    }

    #[test]
    fn significance_threshold_is_strict() {
        assert!(!InferenceResult::new(1.0, SIGNIFICANCE_LEVEL, 1, 4).significant);
        assert!(InferenceResult::new(9.0, 0.049, 1, 4).significant);
    }

    #[test]
    fn verdict_mentions_outcome() {
        let yes = InferenceResult::new(12.0, 0.001, 2, 9);
        assert!(yes.verdict().contains("is a statistically significant"));
        let no = InferenceResult::new(0.1, 0.9, 2, 9);
        assert!(no.verdict().contains("no statistically significant"));
        assert_eq!(no.groups(), 3);
        assert_eq!(no.observations(), 12);
    }

    #[test]
    fn insight_names_are_kebab_case() {
        assert_eq!(
            InsightKind::EmploymentAgeDistribution.to_string(),
            "employment-age-distribution"
        );
        for kind in InsightKind::all() {
            let parsed: InsightKind = kind.as_ref().parse().unwrap();
            assert_eq!(parsed, *kind);
        }
    }

    #[test]
    fn aggregate_serializes_as_plain_map() {
        let json = serde_json::to_string(&counts(&[("18-24", 2), ("25-34", 1)])).unwrap();
        assert_eq!(json, r#"{"18-24":2,"25-34":1}"#);
    }
}
