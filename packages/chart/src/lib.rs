#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Chart sink contract, request builders and a JSON-lines sink.
//!
//! The [`ChartSink`] trait decouples the analytics results from any
//! specific renderer. [`requests`] turns an insight's output into the
//! [`ChartRequest`] a sink consumes, and [`JsonChartSink`] serializes those
//! requests for an external renderer to pick up.

pub mod requests;

use std::io::Write;

use engagement_chart_models::ChartRequest;
use thiserror::Error;

pub use requests::chart_for;

/// Errors that can occur while handing a chart to a sink.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Writing the request failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The request could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Receives fully computed chart requests and renders them.
pub trait ChartSink {
    /// Renders one chart.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError`] if the sink fails to accept the request.
    fn render(&mut self, request: &ChartRequest) -> Result<(), ChartError>;
}

/// A sink that discards every request.
///
/// Useful for running insights where only the computed values matter.
pub struct NullChartSink;

impl ChartSink for NullChartSink {
    fn render(&mut self, _request: &ChartRequest) -> Result<(), ChartError> {
        Ok(())
    }
}

/// Writes each request as one line of JSON.
pub struct JsonChartSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonChartSink<W> {
    /// Creates a sink writing to `writer`.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the underlying writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ChartSink for JsonChartSink<W> {
    fn render(&mut self, request: &ChartRequest) -> Result<(), ChartError> {
        log::debug!(
            "Writing {} chart '{}' ({})",
            request.kind,
            request.options.title,
            request.options.backend
        );
        serde_json::to_writer(&mut self.writer, request)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
