#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Chart request and styling types handed to chart sinks.
//!
//! A [`ChartRequest`] is everything a renderer needs: already-computed data,
//! the kind of chart, and the styling to apply. Styling always travels with
//! the request; there is no process-wide plot state.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Kind of chart to draw.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChartKind {
    /// Bars, one per category.
    Bar,
    /// Lines, one per series.
    Line,
    /// Box plots, one per distribution.
    Box,
}

/// Rendering backend the sink should use.
///
/// Both backends draw the same data; they differ only in visual style.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChartBackend {
    /// Plain figure styling.
    #[default]
    Primary,
    /// Statistical-graphics styling with themes and palettes.
    Alternate,
}

/// Direction bars are drawn in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Orientation {
    /// Categories along the x axis.
    #[default]
    Vertical,
    /// Categories along the y axis.
    Horizontal,
}

/// Styling passed to the sink alongside the data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartOptions {
    /// Backend to render with.
    pub backend: ChartBackend,
    /// Chart title.
    pub title: String,
    /// X axis label.
    pub x_label: String,
    /// Y axis label.
    pub y_label: String,
    /// Bar direction.
    pub orientation: Orientation,
    /// Fixed color for single-series charts (e.g. `"skyblue"`).
    pub color: Option<String>,
    /// Theme name (e.g. `"whitegrid"`).
    pub style: Option<String>,
    /// Palette name for multi-series charts (e.g. `"husl"`).
    pub palette: Option<String>,
    /// Rotation of category tick labels in degrees.
    pub label_rotation: Option<u16>,
    /// Figure width and height in inches.
    pub size: Option<(f32, f32)>,
}

/// Caller-chosen styling applied on top of each insight's defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct ChartStyle {
    /// Backend every chart is rendered with.
    pub backend: ChartBackend,
    /// Theme override.
    pub theme: Option<String>,
    /// Palette override.
    pub palette: Option<String>,
    /// Tick label rotation override, in degrees.
    pub label_rotation: Option<u16>,
}

/// One labelled bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPoint {
    /// Category label.
    pub label: String,
    /// Bar height.
    pub value: f64,
}

/// One point on a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    /// X value (an ISO date for time series).
    pub x: String,
    /// Y value.
    pub y: f64,
}

/// One named line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedSeries {
    /// Legend entry.
    pub name: String,
    /// Points in x order.
    pub points: Vec<SeriesPoint>,
}

/// Raw observations of one box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    /// Box label.
    pub label: String,
    /// Observations.
    pub values: Vec<f64>,
}

/// Data to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "items", rename_all = "camelCase")]
pub enum ChartData {
    /// Bars in display order.
    Categories(Vec<CategoryPoint>),
    /// Lines in legend order.
    Series(Vec<NamedSeries>),
    /// Boxes in display order.
    Distributions(Vec<Distribution>),
}

impl ChartData {
    /// Whether there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Categories(items) => items.is_empty(),
            Self::Series(items) => items.is_empty(),
            Self::Distributions(items) => items.is_empty(),
        }
    }
}

/// A complete request to a chart sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRequest {
    /// Kind of chart.
    pub kind: ChartKind,
    /// Data to draw.
    pub data: ChartData,
    /// Styling.
    pub options: ChartOptions,
}
