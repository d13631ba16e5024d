//! Builds chart requests from insight outputs.
//!
//! Each insight has fixed labels and default styling; the caller's
//! [`ChartStyle`] picks the backend and may override theme and palette.

use engagement_analytics_models::{GroupKey, InsightKind, InsightOutput, TimeSeries};
use engagement_chart_models::{
    CategoryPoint, ChartBackend, ChartData, ChartKind, ChartOptions, ChartRequest, ChartStyle,
    Distribution, NamedSeries, Orientation, SeriesPoint,
};

const DEFAULT_THEME: &str = "whitegrid";

/// Returns the chart for an insight's output, or `None` for insights that
/// are not charted (descriptive statistics) or outputs that do not belong
/// to `kind`.
#[must_use]
pub fn chart_for(
    kind: InsightKind,
    output: &InsightOutput,
    style: &ChartStyle,
) -> Option<ChartRequest> {
    let request = match (kind, output) {
        (InsightKind::AgeGroupFrequency, InsightOutput::Counts(counts)) => ChartRequest {
            kind: ChartKind::Bar,
            data: ChartData::Categories(
                counts
                    .ranked()
                    .into_iter()
                    .map(|(key, count)| category(&key, count_as_f64(count)))
                    .collect(),
            ),
            options: ChartOptions {
                title: "Bar Plot of Age Groups".to_string(),
                x_label: "Age Group".to_string(),
                y_label: "Frequency".to_string(),
                color: Some("blue".to_string()),
                size: Some((8.0, 6.0)),
                ..ChartOptions::default()
            },
        },
        (InsightKind::CitywideByCategory, InsightOutput::Totals(totals)) => ChartRequest {
            kind: ChartKind::Bar,
            data: ChartData::Categories(totals.iter().map(|(k, v)| category(k, *v)).collect()),
            options: ChartOptions {
                title: "Citywide Count by Engagement Category".to_string(),
                x_label: "Engagement Category".to_string(),
                y_label: "Citywide Count".to_string(),
                color: Some("skyblue".to_string()),
                palette: Some("pastel".to_string()),
                label_rotation: Some(45),
                size: Some((12.0, 6.0)),
                ..ChartOptions::default()
            },
        },
        (InsightKind::CitywideOverTime, InsightOutput::Trend(series)) => ChartRequest {
            kind: ChartKind::Line,
            data: ChartData::Series(vec![named_series("Citywide Count", series)]),
            options: ChartOptions {
                title: "Citywide Count Over Time".to_string(),
                x_label: "Report Date".to_string(),
                y_label: "Citywide Count".to_string(),
                color: Some("green".to_string()),
                label_rotation: Some(45),
                size: Some((12.0, 6.0)),
                ..ChartOptions::default()
            },
        },
        (InsightKind::CategoryDifference, InsightOutput::Difference(diff)) => ChartRequest {
            kind: ChartKind::Box,
            data: ChartData::Distributions(
                diff.groups
                    .iter()
                    .map(|g| Distribution {
                        label: g.key.to_string(),
                        values: g.values.clone(),
                    })
                    .collect(),
            ),
            options: ChartOptions {
                title: "Box Plot of Citywide Count by Engagement Category".to_string(),
                x_label: "Category".to_string(),
                y_label: "Citywide Count".to_string(),
                size: Some((10.0, 6.0)),
                ..ChartOptions::default()
            },
        },
        (InsightKind::EmploymentAgeDistribution, InsightOutput::Totals(totals)) => ChartRequest {
            kind: ChartKind::Bar,
            data: ChartData::Categories(totals.iter().map(|(k, v)| category(k, *v)).collect()),
            options: ChartOptions {
                title: "Distribution of Age Groups in EMPLOYMENT-BUDGETED".to_string(),
                x_label: "Count".to_string(),
                y_label: "Age Group".to_string(),
                orientation: Orientation::Horizontal,
                color: Some("purple".to_string()),
                palette: Some("viridis".to_string()),
                size: Some((10.0, 8.0)),
                ..ChartOptions::default()
            },
        },
        (InsightKind::EngagementByAgeOverTime, InsightOutput::Trends(by_age)) => ChartRequest {
            kind: ChartKind::Line,
            data: ChartData::Series(
                by_age
                    .iter()
                    .map(|(age, series)| named_series(&format!("Age Group {age}"), series))
                    .collect(),
            ),
            options: ChartOptions {
                title: "Evolution of Youth Engagement by Age Group Over Time".to_string(),
                x_label: "Report Date".to_string(),
                y_label: "Total Engagement Count".to_string(),
                palette: Some("husl".to_string()),
                size: Some((12.0, 8.0)),
                ..ChartOptions::default()
            },
        },
        _ => return None,
    };

    Some(apply_style(request, style))
}

fn apply_style(mut request: ChartRequest, style: &ChartStyle) -> ChartRequest {
    let options = &mut request.options;
    options.backend = style.backend;
    if let Some(palette) = &style.palette {
        options.palette = Some(palette.clone());
    }
    if style.label_rotation.is_some() {
        options.label_rotation = style.label_rotation;
    }
    options.style = style.theme.clone().or_else(|| {
        (style.backend == ChartBackend::Alternate).then(|| DEFAULT_THEME.to_string())
    });
    request
}

fn category(key: &GroupKey, value: f64) -> CategoryPoint {
    CategoryPoint {
        label: key.to_string(),
        value,
    }
}

#[allow(clippy::cast_precision_loss)]
fn count_as_f64(count: u64) -> f64 {
    count as f64
}

fn named_series(name: &str, series: &TimeSeries) -> NamedSeries {
    NamedSeries {
        name: name.to_string(),
        points: series
            .points()
            .iter()
            .map(|p| SeriesPoint {
                x: p.date.format("%Y-%m-%d").to_string(),
                y: p.value,
            })
            .collect(),
    }
}
