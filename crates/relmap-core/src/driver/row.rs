use crate::stmt::Value;

use std::sync::Arc;

/// A column-name-addressable result row.
///
/// The column list is shared across all rows of one result set. Lookup is
/// case-insensitive: names are lower-cased at construction and lookup keys
/// are lower-cased on the way in, so rows from catalogs that report
/// upper-cased aliases still resolve.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    /// Creates a row over a shared column list.
    ///
    /// # Panics
    ///
    /// Panics if the number of values does not match the number of columns.
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        assert_eq!(
            columns.len(),
            values.len(),
            "row value count must match column count"
        );
        Self { columns, values }
    }

    /// Lower-cases column names for case-insensitive lookup.
    pub fn columns_from(names: impl IntoIterator<Item = impl AsRef<str>>) -> Arc<[String]> {
        names
            .into_iter()
            .map(|name| name.as_ref().to_ascii_lowercase())
            .collect()
    }

    /// Builds a single free-standing row from name/value pairs. Intended for
    /// callers who hand-write SQL and feed externally-obtained rows into the
    /// merge primitives, and for tests.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Value)>,
    {
        let (names, values): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
        Self::new(Self::columns_from(names), values)
    }

    /// Returns the value of the named column, or `None` when the column is
    /// not part of this result set.
    pub fn get(&self, column: &str) -> Option<&Value> {
        let key = column.to_ascii_lowercase();
        let index = self.columns.iter().position(|name| *name == key)?;
        Some(&self.values[index])
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Returns the value at a positional index.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}
