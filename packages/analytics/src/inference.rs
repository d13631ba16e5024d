//! One-way analysis of variance across the groups of a categorical column.

use engagement_analytics_models::{GroupKey, GroupValues, InferenceResult};
use engagement_table_models::Table;
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

use crate::{AnalyticsError, column_index, numeric_column_index};

/// Partitions `measure_column` by the distinct values of `group_column`.
///
/// Groups appear in the order their key is first seen; values keep row
/// order.
///
/// # Errors
///
/// Returns [`AnalyticsError::UnknownColumn`] if either column is missing or
/// [`AnalyticsError::NonNumericColumn`] if the measure is not numeric.
pub fn group_values(
    table: &Table,
    group_column: &str,
    measure_column: &str,
) -> Result<Vec<GroupValues>, AnalyticsError> {
    let group_idx = column_index(table, group_column)?;
    let measure_idx = numeric_column_index(table, measure_column)?;

    let mut groups: Vec<GroupValues> = Vec::new();
    for row in table.rows() {
        let key = GroupKey::from(&row[group_idx]);
        let value = row[measure_idx].as_number().unwrap_or_default();
        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => group.values.push(value),
            None => groups.push(GroupValues {
                key,
                values: vec![value],
            }),
        }
    }

    Ok(groups)
}

/// Runs a one-way ANOVA of `measure_column` across the groups of
/// `group_column`.
///
/// The F statistic is the between-group mean square over the within-group
/// mean square, and the p-value is the upper tail of the F distribution with
/// `(k - 1, N - k)` degrees of freedom.
///
/// When every group is constant the within-group mean square is zero: the
/// statistic is then `0` with p-value `1` if all group means agree, and
/// `+inf` with p-value `0` otherwise.
///
/// # Errors
///
/// Returns [`AnalyticsError::InsufficientGroups`] for fewer than two groups,
/// [`AnalyticsError::InsufficientObservations`] when every group has a
/// single observation, and the column errors of [`group_values`].
pub fn one_way_anova(
    table: &Table,
    group_column: &str,
    measure_column: &str,
) -> Result<InferenceResult, AnalyticsError> {
    let groups = group_values(table, group_column, measure_column)?;
    let result = anova(&groups)?;

    log::debug!(
        "one_way_anova({group_column}, {measure_column}): F={} p={} over {} groups",
        result.statistic,
        result.p_value,
        groups.len()
    );

    Ok(result)
}

/// One-way ANOVA over pre-partitioned groups.
///
/// Constant groups are detected by exact comparison before any mean is
/// taken, so equal constants compare as identical regardless of how they
/// round. Sums of squares are computed relative to the first observation.
///
/// # Errors
///
/// See [`one_way_anova`]. Also returns
/// [`AnalyticsError::InvalidDistribution`] if the F distribution cannot be
/// built for the degrees of freedom.
#[allow(clippy::cast_precision_loss, clippy::float_cmp)]
pub fn anova(groups: &[GroupValues]) -> Result<InferenceResult, AnalyticsError> {
    let samples: Vec<&[f64]> = groups
        .iter()
        .map(|g| g.values.as_slice())
        .filter(|values| !values.is_empty())
        .collect();

    let k = samples.len();
    if k < 2 {
        return Err(AnalyticsError::InsufficientGroups { found: k });
    }

    let n: usize = samples.iter().map(|values| values.len()).sum();
    if n <= k {
        return Err(AnalyticsError::InsufficientObservations {
            observations: n,
            groups: k,
        });
    }

    let df_between = k - 1;
    let df_within = n - k;

    if samples
        .iter()
        .all(|values| values.iter().all(|v| *v == values[0]))
    {
        let first = samples[0][0];
        return Ok(if samples.iter().all(|values| values[0] == first) {
            InferenceResult::new(0.0, 1.0, df_between, df_within)
        } else {
            InferenceResult::new(f64::INFINITY, 0.0, df_between, df_within)
        });
    }

    let offset = samples[0][0];
    let grand_mean = samples
        .iter()
        .flat_map(|values| values.iter())
        .map(|v| v - offset)
        .sum::<f64>()
        / n as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for values in &samples {
        let size = values.len() as f64;
        let mean = values.iter().map(|v| v - offset).sum::<f64>() / size;
        ss_between += size * (mean - grand_mean).powi(2);
        ss_within += values
            .iter()
            .map(|v| (v - offset - mean).powi(2))
            .sum::<f64>();
    }

    let statistic = (ss_between / df_between as f64) / (ss_within / df_within as f64);
    let dist = FisherSnedecor::new(df_between as f64, df_within as f64).map_err(|e| {
        AnalyticsError::InvalidDistribution {
            message: e.to_string(),
        }
    })?;
    let p_value = dist.sf(statistic).clamp(0.0, 1.0);

    Ok(InferenceResult::new(
        statistic, p_value, df_between, df_within,
    ))
}
