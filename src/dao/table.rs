//! In-memory representation of a single spreadsheet sheet.

use std::fmt;

use serde::{Serialize, Serializer};

/// Largest integer a `f64` represents exactly; beyond it numbers are emitted as floats.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Loosely typed cell value as found in a spreadsheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cell {
    /// Blank cell.
    #[default]
    Empty,
    /// Numeric cell.
    Number(f64),
    /// Text cell, including booleans rendered as text.
    Text(String),
}

impl Cell {
    /// Build a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// True for cells holding nothing at all.
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Value equality against a key received as text (e.g. a path segment).
    ///
    /// Numbers match when the trimmed key parses to the same value, so a
    /// numeric `7` cell matches the key `"7"`.
    pub fn loosely_eq(&self, key: &str) -> bool {
        match self {
            Cell::Text(text) => text == key,
            Cell::Number(number) => key
                .trim()
                .parse::<f64>()
                .is_ok_and(|parsed| parsed == *number),
            Cell::Empty => key.is_empty(),
        }
    }

    /// Numeric value of the cell; empty and non-numeric cells count as zero.
    pub fn as_f64_lossy(&self) -> f64 {
        match self {
            Cell::Number(number) if number.is_finite() => *number,
            Cell::Text(text) => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|parsed| parsed.is_finite())
                .unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Integral floats within the exact range, if this number is one.
    fn as_exact_integer(number: f64) -> Option<i64> {
        (number.is_finite() && number.fract() == 0.0 && number.abs() < MAX_EXACT_INTEGER)
            .then_some(number as i64)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Number(number) => match Cell::as_exact_integer(*number) {
                Some(integer) => write!(f, "{integer}"),
                None => write!(f, "{number}"),
            },
            Cell::Text(text) => f.write_str(text),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Empty => serializer.serialize_none(),
            Cell::Number(number) => match Cell::as_exact_integer(*number) {
                Some(integer) => serializer.serialize_i64(integer),
                None => serializer.serialize_f64(*number),
            },
            Cell::Text(text) => serializer.serialize_str(text),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_owned())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

/// Ordered rows of a sheet; the first row, when present, is the header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Wrap already materialized rows.
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// A table holding only `header`.
    pub fn with_header(header: Vec<Cell>) -> Self {
        Self { rows: vec![header] }
    }

    /// All rows including the header.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// The header row, if the table has any rows.
    pub fn header(&self) -> Option<&[Cell]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Rows after the header.
    pub fn data_rows(&self) -> &[Vec<Cell>] {
        self.rows.get(1..).unwrap_or_default()
    }

    /// Append a row after the existing ones.
    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// Take the rows, header included.
    pub fn into_rows(self) -> Vec<Vec<Cell>> {
        self.rows
    }

    /// True when the sheet has no rows at all.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
