//! Descriptive statistics over every numeric column.

use engagement_analytics_models::{ColumnSummary, SummaryReport};
use engagement_table_models::{ColumnType, Table, Value};

use crate::AnalyticsError;

/// Computes count, mean, sample standard deviation, min, quartiles and max
/// for each numeric column, in schema order.
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptyTable`] if the table has no rows.
pub fn summarize(table: &Table) -> Result<SummaryReport, AnalyticsError> {
    if table.is_empty() {
        return Err(AnalyticsError::EmptyTable);
    }

    let columns = table
        .schema()
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, def)| def.column_type == ColumnType::Number)
        .map(|(idx, def)| {
            let mut values: Vec<f64> =
                table.column_values(idx).filter_map(Value::as_number).collect();
            summarize_column(&def.name, &mut values)
        })
        .collect::<Vec<_>>();

    log::debug!(
        "summarize: {} numeric columns over {} rows",
        columns.len(),
        table.len()
    );

    Ok(SummaryReport {
        rows: table.len(),
        columns,
    })
}

/// Summarizes one non-empty column. Sorts `values` in place.
#[allow(clippy::cast_precision_loss)]
fn summarize_column(name: &str, values: &mut [f64]) -> ColumnSummary {
    values.sort_by(f64::total_cmp);

    let count = values.len();
    let n = count as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std = (count > 1).then(|| {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1.0)).sqrt()
    });

    ColumnSummary {
        column: name.to_string(),
        count,
        mean,
        std,
        min: values[0],
        p25: percentile(values, 0.25),
        p50: percentile(values, 0.5),
        p75: percentile(values, 0.75),
        max: values[count - 1],
    }
}

/// Linear interpolation between the closest ranks of a sorted, non-empty
/// slice. `q` is in `[0, 1]`.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let pos = (sorted.len() - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
