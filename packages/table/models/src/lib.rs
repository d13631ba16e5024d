#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Typed columnar table and engagement record types.
//!
//! A [`Table`] is an immutable, row-ordered snapshot of a dataset with an
//! explicit [`Schema`]. Every cell is checked against its column's
//! [`ColumnType`] when the table is built, so downstream aggregations can
//! rely on the declared types instead of probing values at runtime.

pub mod dates;

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Column holding the age bucket of a record (e.g. `"18-24"`).
pub const AGE_GROUP: &str = "AGE_GROUP";
/// Column holding the engagement category label.
pub const ENGAGEMENT_CATEGORY: &str = "ENGAGEMENT_CATEGORY";
/// Column holding the citywide count measure.
pub const CITYWIDE_COUNT: &str = "CITYWIDE_COUNT";
/// Column holding the report date.
pub const REPORT_DATE: &str = "REPORT_DATE";

/// The type every cell of a column must have.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ColumnType {
    /// Free-form or categorical text.
    Text,
    /// Finite floating point number.
    Number,
    /// Calendar date without time of day.
    Date,
}

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Value {
    /// Text cell.
    Text(String),
    /// Numeric cell.
    Number(f64),
    /// Date cell.
    Date(NaiveDate),
}

impl Value {
    /// Returns the [`ColumnType`] this value belongs to.
    #[must_use]
    pub const fn column_type(&self) -> ColumnType {
        match self {
            Self::Text(_) => ColumnType::Text,
            Self::Number(_) => ColumnType::Number,
            Self::Date(_) => ColumnType::Date,
        }
    }

    /// Returns the numeric payload, if this is a number.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the text payload, if this is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the date payload, if this is a date.
    #[must_use]
    pub const fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

/// Name and type of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    /// Column name as it appears in the source header.
    pub name: String,
    /// Declared cell type.
    pub column_type: ColumnType,
}

impl ColumnDef {
    /// Creates a column definition.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// Ordered set of uniquely named columns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<ColumnDef>,
}

impl Schema {
    /// Creates a schema from column definitions.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateColumn`] if two columns share a name.
    pub fn new(columns: Vec<ColumnDef>) -> Result<Self, SchemaError> {
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(SchemaError::DuplicateColumn {
                    column: column.name.clone(),
                });
            }
        }
        Ok(Self { columns })
    }

    /// The four-column schema of the engagement dataset.
    #[must_use]
    pub fn engagement() -> Self {
        Self {
            columns: vec![
                ColumnDef::new(AGE_GROUP, ColumnType::Text),
                ColumnDef::new(ENGAGEMENT_CATEGORY, ColumnType::Text),
                ColumnDef::new(CITYWIDE_COUNT, ColumnType::Number),
                ColumnDef::new(REPORT_DATE, ColumnType::Date),
            ],
        }
    }

    /// Returns all column definitions in order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Returns the position of the named column.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Returns the definition of the named column.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the schema has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Error raised when rows do not fit a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Two columns share the same name.
    DuplicateColumn {
        /// The repeated column name.
        column: String,
    },
    /// A row has a different number of cells than the schema has columns.
    WidthMismatch {
        /// Zero-based row index.
        row: usize,
        /// Number of columns in the schema.
        expected: usize,
        /// Number of cells in the row.
        found: usize,
    },
    /// A cell's type does not match its column.
    TypeMismatch {
        /// Zero-based row index.
        row: usize,
        /// Column name.
        column: String,
        /// Declared column type.
        expected: ColumnType,
        /// Type of the offending cell.
        found: ColumnType,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateColumn { column } => write!(f, "duplicate column '{column}'"),
            Self::WidthMismatch {
                row,
                expected,
                found,
            } => write!(f, "row {row} has {found} cells, expected {expected}"),
            Self::TypeMismatch {
                row,
                column,
                expected,
                found,
            } => write!(
                f,
                "row {row} column '{column}' holds a {found} value, expected {expected}"
            ),
        }
    }
}

impl std::error::Error for SchemaError {}

/// One engagement observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Age bucket, e.g. `"18-24"`.
    pub age_group: String,
    /// Engagement category label, e.g. `"EMPLOYMENT-BUDGETED"`.
    pub engagement_category: String,
    /// Citywide count for this age group and category on the report date.
    pub citywide_count: f64,
    /// Date the count was reported.
    pub report_date: NaiveDate,
}

impl Record {
    fn into_row(self) -> Vec<Value> {
        vec![
            Value::Text(self.age_group),
            Value::Text(self.engagement_category),
            Value::Number(self.citywide_count),
            Value::Date(self.report_date),
        ]
    }
}

/// Immutable, row-ordered dataset with an explicit schema.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    schema: Schema,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Creates a table with no rows.
    #[must_use]
    pub const fn empty(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Creates a table after checking every row against `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if a row has the wrong width or a cell has
    /// the wrong type.
    pub fn from_rows(schema: Schema, rows: Vec<Vec<Value>>) -> Result<Self, SchemaError> {
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != schema.len() {
                return Err(SchemaError::WidthMismatch {
                    row: row_idx,
                    expected: schema.len(),
                    found: row.len(),
                });
            }
            for (value, column) in row.iter().zip(schema.columns()) {
                let found = value.column_type();
                if found != column.column_type {
                    return Err(SchemaError::TypeMismatch {
                        row: row_idx,
                        column: column.name.clone(),
                        expected: column.column_type,
                        found,
                    });
                }
            }
        }
        Ok(Self { schema, rows })
    }

    /// Builds a table with the [`Schema::engagement`] layout.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        Self {
            schema: Schema::engagement(),
            rows: records.into_iter().map(Record::into_row).collect(),
        }
    }

    /// The table's schema.
    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over rows in load order.
    pub fn rows(&self) -> impl Iterator<Item = &[Value]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Iterates over the cells of the column at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range for the schema.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> {
        assert!(index < self.schema.len(), "column index {index} out of range");
        self.rows.iter().map(move |row| &row[index])
    }

    /// Returns a new table holding clones of the rows for which `keep`
    /// returns `true`, with the same schema.
    #[must_use]
    pub fn select_rows(&self, mut keep: impl FnMut(&[Value]) -> bool) -> Self {
        Self {
            schema: self.schema.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| keep(row))
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn schema_rejects_duplicate_columns() {
        let err = Schema::new(vec![
            ColumnDef::new("A", ColumnType::Text),
            ColumnDef::new("A", ColumnType::Number),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateColumn {
                column: "A".to_string()
            }
        );
    }

    #[test]
    fn from_rows_rejects_type_mismatch() {
        let schema = Schema::new(vec![ColumnDef::new("N", ColumnType::Number)]).unwrap();
        let err = Table::from_rows(schema, vec![vec![Value::from("ten")]]).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::TypeMismatch {
                row: 0,
                expected: ColumnType::Number,
                found: ColumnType::Text,
                ..
            }
        ));
    }

    #[test]
    fn from_rows_rejects_width_mismatch() {
        let schema = Schema::new(vec![ColumnDef::new("N", ColumnType::Number)]).unwrap();
        let err = Table::from_rows(schema, vec![vec![Value::from(1.0), Value::from(2.0)]])
            .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::WidthMismatch {
                expected: 1,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn records_use_engagement_schema() {
        let table = Table::from_records([Record {
            age_group: "18-24".to_string(),
            engagement_category: "EMPLOYMENT-BUDGETED".to_string(),
            citywide_count: 10.0,
            report_date: date("2023-01-31"),
        }]);

        assert_eq!(table.len(), 1);
        let idx = table.schema().index_of(CITYWIDE_COUNT).unwrap();
        let values: Vec<_> = table.column_values(idx).collect();
        assert_eq!(values, vec![&Value::Number(10.0)]);
        assert_eq!(
            table.schema().column(REPORT_DATE).unwrap().column_type,
            ColumnType::Date
        );
    }

    #[test]
    fn select_rows_keeps_schema_on_empty_result() {
        let table = Table::from_records([Record {
            age_group: "18-24".to_string(),
            engagement_category: "SPORTS".to_string(),
            citywide_count: 1.0,
            report_date: date("2023-01-31"),
        }]);
        let none = table.select_rows(|_| false);
        assert!(none.is_empty());
        assert_eq!(none.schema(), table.schema());
    }

    #[test]
    fn value_display_is_canonical() {
        assert_eq!(Value::from(13.0).to_string(), "13");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from(date("2023-02-01")).to_string(), "2023-02-01");
        assert_eq!(Value::from("18-24").to_string(), "18-24");
    }

    #[test]
    fn column_type_round_trips_through_strum() {
        for ty in [ColumnType::Text, ColumnType::Number, ColumnType::Date] {
            let parsed: ColumnType = ty.as_ref().parse().unwrap();
            assert_eq!(parsed, ty);
        }
    }
}
