use crate::Model;

use relmap_core::driver::Row;
use relmap_core::schema::db::TableMapping;
use relmap_core::stmt::Value;
use relmap_core::Result;

use indexmap::IndexMap;

/// Extracts one type's objects from flat, possibly duplicate-laden result
/// rows, using the column prefix under which that type's columns were
/// selected.
///
/// A null or non-positive prefixed id marks an outer-join miss: the row
/// carries no object for this prefix and is skipped without error. Columns
/// absent from the row's column list are left at their defaults, not probed.
#[derive(Debug)]
pub struct RowDemux<'a> {
    mapping: &'a TableMapping,
    prefix: String,
}

impl<'a> RowDemux<'a> {
    pub fn new(mapping: &'a TableMapping, prefix: impl Into<String>) -> Self {
        Self {
            mapping,
            prefix: prefix.into(),
        }
    }

    /// Instantiates this prefix's object from one row, or `None` on an
    /// outer-join miss.
    pub fn extract<M: Model>(&self, row: &Row) -> Result<Option<M>> {
        let id_column = self.prefixed(&self.mapping.id_column);
        match row.get(&id_column).and_then(Value::as_positive_id) {
            Some(_) => self.instantiate(row).map(Some),
            None => Ok(None),
        }
    }

    /// Accumulates an order-preserving, identity-deduplicated sequence over
    /// all rows: the first occurrence of an id wins and fixes its position;
    /// later rows with the same id are skipped for object creation (a join
    /// fans out one parent row per child row).
    pub fn collect<M: Model>(&self, rows: &[Row]) -> Result<Vec<M>> {
        let id_column = self.prefixed(&self.mapping.id_column);
        let mut seen: IndexMap<i64, M> = IndexMap::new();

        for row in rows {
            let Some(id) = row.get(&id_column).and_then(Value::as_positive_id) else {
                continue;
            };
            if seen.contains_key(&id) {
                continue;
            }
            seen.insert(id, self.instantiate(row)?);
        }

        Ok(seen.into_values().collect())
    }

    fn instantiate<M: Model>(&self, row: &Row) -> Result<M> {
        let mut object = M::default();
        for property in &self.mapping.properties {
            let column = self.prefixed(&property.column);
            if let Some(value) = row.get(&column) {
                object.set_property(property.property, value.clone().coerce(property.ty)?)?;
            }
        }
        Ok(object)
    }

    fn prefixed(&self, column: &str) -> String {
        format!("{}{column}", self.prefix)
    }
}
