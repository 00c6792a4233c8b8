//! Column-oriented profile output
//!
//! A [`ProfileTable`] is a list of equally long named columns, one row per
//! transverse bin. Tables are immutable values; a recompute builds a new one.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::ProfileResult;

/// Count-weighted mean of the profile axis
pub const MEAN: &str = "mean";
/// Count-weighted standard deviation of the profile axis
pub const STD: &str = "std";
/// Total count of the transverse bin
pub const ENTRIES: &str = "entries";
/// Whether the row's statistics are valid
pub const IS_OK: &str = "isOK";

pub fn quantile_column(index: usize) -> String {
    format!("quantile_{index}")
}

pub fn sum_column(index: usize) -> String {
    format!("sum_{index}")
}

pub fn sum_normed_column(index: usize) -> String {
    format!("sum_normed_{index}")
}

/// A single table column
#[derive(Clone, Debug, serde::Serialize)]
#[serde(untagged)]
pub enum Column {
    Float(Vec<f64>),
    Bool(Vec<bool>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Float(values) => values.len(),
            Column::Bool(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_float(&self) -> Option<&[f64]> {
        match self {
            Column::Float(values) => Some(values),
            Column::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<&[bool]> {
        match self {
            Column::Bool(values) => Some(values),
            Column::Float(_) => None,
        }
    }

    /// Bitwise equality, so NaN entries compare equal to themselves
    pub fn bit_eq(&self, other: &Column) -> bool {
        match (self, other) {
            (Column::Float(a), Column::Float(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
            }
            (Column::Bool(a), Column::Bool(b)) => a == b,
            _ => false,
        }
    }
}

/// Named columns of a histogram profile
#[derive(Clone, Debug, Default)]
pub struct ProfileTable {
    columns: Vec<(String, Column)>,
    rows: usize,
}

impl ProfileTable {
    /// Assemble a table; every column must have `rows` entries
    pub(crate) fn from_columns(rows: usize, columns: Vec<(String, Column)>) -> Self {
        debug_assert!(columns.iter().all(|(_, column)| column.len() == rows));
        Self { columns, rows }
    }

    /// Number of rows (transverse bins)
    pub fn num_rows(&self) -> usize {
        self.rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names in table order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Iterate over `(name, column)` pairs in table order
    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(name, column)| (name.as_str(), column))
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|(column_name, _)| column_name == name)
            .map(|(_, column)| column)
    }

    pub fn float_column(&self, name: &str) -> Option<&[f64]> {
        self.column(name).and_then(Column::as_float)
    }

    pub fn bool_column(&self, name: &str) -> Option<&[bool]> {
        self.column(name).and_then(Column::as_bool)
    }

    /// Bitwise equality of names, order and values
    pub fn bit_eq(&self, other: &ProfileTable) -> bool {
        self.rows == other.rows
            && self.columns.len() == other.columns.len()
            && self
                .columns
                .iter()
                .zip(&other.columns)
                .all(|((a_name, a), (b_name, b))| a_name == b_name && a.bit_eq(b))
    }

    /// Serialize as a JSON object of column arrays (NaN becomes `null`)
    pub fn to_json(&self) -> ProfileResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for ProfileTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, column) in &self.columns {
            map.serialize_entry(name, column)?;
        }
        map.end()
    }
}
