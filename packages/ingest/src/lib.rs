#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Delimited-file loader producing typed engagement tables.
//!
//! The header row decides the column order. Columns listed in
//! [`LoadOptions::columns`] must be present and are parsed to their declared
//! type; every other column is kept as text. Type errors are reported with
//! the offending line so the table handed to the analytics core is always
//! consistent with its schema.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use engagement_table_models::dates::parse_date;
use engagement_table_models::{ColumnDef, ColumnType, Schema, SchemaError, Table, Value};
use thiserror::Error;

/// Errors that can occur while loading a table.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Opening or reading the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid delimited text.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The header row does not form a valid schema.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// A declared column is absent from the header row.
    #[error("Missing required column '{column}'")]
    MissingColumn {
        /// The absent column name.
        column: String,
    },

    /// A number column holds something that is not a finite number.
    #[error("Line {line}: column '{column}' value '{value}' is not a number")]
    InvalidNumber {
        /// One-based line in the source file.
        line: u64,
        /// Column name.
        column: String,
        /// The raw cell.
        value: String,
    },

    /// A date column holds something that is not a recognizable date.
    #[error("Line {line}: column '{column}' value '{value}' is not a date")]
    InvalidDate {
        /// One-based line in the source file.
        line: u64,
        /// Column name.
        column: String,
        /// The raw cell.
        value: String,
    },
}

/// Options controlling how a delimited file is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Columns that must be present, with the type to parse them as.
    pub columns: Vec<ColumnDef>,
}

impl Default for LoadOptions {
    /// Comma-delimited with the four engagement columns required.
    fn default() -> Self {
        Self {
            delimiter: b',',
            columns: Schema::engagement().columns().to_vec(),
        }
    }
}

/// Loads a table from a delimited file on disk.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read, a required column is
/// missing, or a typed cell fails to parse.
pub fn load_csv(path: &Path, options: &LoadOptions) -> Result<Table, LoadError> {
    log::info!("Loading {}", path.display());
    let table = read_csv(File::open(path)?, options)?;
    log::info!(
        "Loaded {} rows with {} columns from {}",
        table.len(),
        table.schema().len(),
        path.display()
    );
    Ok(table)
}

/// Reads a table from any delimited byte stream.
///
/// # Errors
///
/// See [`load_csv`].
pub fn read_csv<R: Read>(reader: R, options: &LoadOptions) -> Result<Table, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    if let Some(missing) = options
        .columns
        .iter()
        .find(|c| !headers.iter().any(|h| *h == c.name))
    {
        return Err(LoadError::MissingColumn {
            column: missing.name.clone(),
        });
    }

    let schema = Schema::new(
        headers
            .iter()
            .map(|h| {
                let column_type = options
                    .columns
                    .iter()
                    .find(|c| c.name == *h)
                    .map_or(ColumnType::Text, |c| c.column_type);
                ColumnDef::new(h.clone(), column_type)
            })
            .collect(),
    )?;

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let line = record.position().map_or(i as u64 + 2, csv::Position::line);

        let row = schema
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, column)| parse_cell(record.get(idx).unwrap_or("").trim(), column, line))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }

    log::debug!("Parsed {} records", rows.len());

    Ok(Table::from_rows(schema, rows)?)
}

fn parse_cell(raw: &str, column: &ColumnDef, line: u64) -> Result<Value, LoadError> {
    match column.column_type {
        ColumnType::Text => Ok(Value::Text(raw.to_owned())),
        ColumnType::Number => raw
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Value::Number)
            .ok_or_else(|| LoadError::InvalidNumber {
                line,
                column: column.name.clone(),
                value: raw.to_owned(),
            }),
        ColumnType::Date => parse_date(raw)
            .map(Value::Date)
            .ok_or_else(|| LoadError::InvalidDate {
                line,
                column: column.name.clone(),
                value: raw.to_owned(),
            }),
    }
}
