use super::app::{ModelMeta, PropertyKind};
use super::db::{PropertyMapping, TableMapping};
use crate::driver::{ColumnInfo, SchemaIntrospector};
use crate::{Error, Result};

use heck::ToSnakeCase;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Lazily resolves and caches type-to-table mappings.
///
/// Mappings are resolved on first reference and cached for the registry's
/// lifetime; resolution is idempotent and first-writer-wins under races. A
/// race that resolves the same mapping twice is acceptable; both writers
/// produce the same value and the first insert sticks. Introspection and
/// matching happen with no lock held; only the final publish takes the
/// write lock.
///
/// The registry is an injected instance (held by the mapper), not a global,
/// so tests can clear and inspect it independently.
#[derive(Debug, Default)]
pub struct MappingRegistry {
    mappings: RwLock<HashMap<&'static str, Arc<TableMapping>>>,

    /// Introspected column lists for tables that have no model of their own,
    /// notably many-to-many join tables. Keyed by requested name.
    tables: RwLock<HashMap<String, Arc<TableColumns>>>,
}

/// Introspected columns of a table, with the name that actually matched the
/// catalog (the upper-case fallback may differ from the requested name).
#[derive(Debug)]
pub struct TableColumns {
    pub table: String,
    pub columns: Vec<ColumnInfo>,
}

impl TableColumns {
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .or_else(|| {
                let upper = name.to_uppercase();
                self.columns.iter().find(|c| c.name == upper)
            })
    }
}

impl MappingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the table mapping for a type, building and caching it on
    /// first reference.
    pub async fn resolve(
        &self,
        meta: &'static ModelMeta,
        schema: Option<&str>,
        introspector: &dyn SchemaIntrospector,
    ) -> Result<Arc<TableMapping>> {
        if let Some(mapping) = self.get(meta.name) {
            return Ok(mapping);
        }

        let mapping = Arc::new(self.build_mapping(meta, schema, introspector).await?);

        let mut mappings = self.mappings.write().unwrap();
        Ok(mappings.entry(meta.name).or_insert(mapping).clone())
    }

    /// Returns an already-resolved mapping without triggering resolution.
    pub fn get(&self, model: &str) -> Option<Arc<TableMapping>> {
        self.mappings.read().unwrap().get(model).cloned()
    }

    /// Introspects (and caches) the columns of a table that has no model,
    /// such as a many-to-many join table. `table` may be bare or
    /// schema-qualified; a qualified name overrides the configured schema.
    pub async fn table_columns(
        &self,
        table: &str,
        schema: Option<&str>,
        introspector: &dyn SchemaIntrospector,
    ) -> Result<Arc<TableColumns>> {
        if let Some(columns) = self.tables.read().unwrap().get(table) {
            return Ok(columns.clone());
        }

        let (schema, bare) = match table.split_once('.') {
            Some((qualifier, bare)) => (Some(qualifier), bare),
            None => (schema, table),
        };
        let columns = Arc::new(introspect_table(bare, schema, introspector).await?);

        let mut tables = self.tables.write().unwrap();
        Ok(tables.entry(table.to_string()).or_insert(columns).clone())
    }

    /// Drops every cached mapping and table column list.
    pub fn clear(&self) {
        self.mappings.write().unwrap().clear();
        self.tables.write().unwrap().clear();
    }

    /// Number of cached type mappings.
    pub fn len(&self) -> usize {
        self.mappings.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn build_mapping(
        &self,
        meta: &'static ModelMeta,
        schema: Option<&str>,
        introspector: &dyn SchemaIntrospector,
    ) -> Result<TableMapping> {
        match meta.property(meta.id.property) {
            Some(p) if matches!(p.kind, PropertyKind::Scalar(_)) => {}
            Some(_) => {
                return Err(Error::mapping(format!(
                    "identifier property `{}` of `{}` must be a scalar property",
                    meta.id.property, meta.name
                )))
            }
            None => {
                return Err(Error::mapping(format!(
                    "`{}` declares no property `{}` to use as its identifier",
                    meta.name, meta.id.property
                )))
            }
        }

        let requested = meta
            .table
            .map(str::to_string)
            .unwrap_or_else(|| meta.name.to_snake_case());
        let introspected = introspect_table(&requested, schema, introspector).await?;

        let mut properties = Vec::new();
        for property in meta.scalar_properties() {
            let PropertyKind::Scalar(ty) = property.kind else {
                continue;
            };
            // Unmatched properties are transient: dropped without error.
            if let Some(column) = introspected.column(property.name) {
                properties.push(PropertyMapping {
                    property: property.name,
                    column: column.name.clone(),
                    ty,
                });
            }
        }

        let id_column = properties
            .iter()
            .find(|p| p.property == meta.id.property)
            .map(|p| p.column.clone())
            .ok_or_else(|| {
                Error::mapping(format!(
                    "identifier property `{}` of `{}` matched no column of table `{}`",
                    meta.id.property, meta.name, introspected.table
                ))
            })?;

        tracing::debug!(
            model = meta.name,
            table = %introspected.table,
            properties = properties.len(),
            "resolved table mapping"
        );

        Ok(TableMapping {
            model: meta.name,
            schema: schema.map(str::to_string),
            table: introspected.table,
            id_property: meta.id.property,
            id_column,
            id_auto_increment: meta.id.auto_increment,
            properties,
        })
    }
}

/// Introspects a table, retrying once with the upper-cased name.
///
/// The retry is a compatibility fallback for case-sensitive catalogs that
/// store unquoted identifiers upper-cased; mixed-case table names remain
/// unsupported.
async fn introspect_table(
    table: &str,
    schema: Option<&str>,
    introspector: &dyn SchemaIntrospector,
) -> Result<TableColumns> {
    let columns = introspector.columns_of(schema, table).await?;
    if !columns.is_empty() {
        return Ok(TableColumns {
            table: table.to_string(),
            columns,
        });
    }

    let upper = table.to_uppercase();
    let columns = introspector.columns_of(schema, &upper).await?;
    if !columns.is_empty() {
        return Ok(TableColumns {
            table: upper,
            columns,
        });
    }

    Err(Error::mapping(format!(
        "table `{table}` not found via schema introspection{}",
        match schema {
            Some(schema) => format!(" (schema `{schema}`)"),
            None => String::new(),
        }
    )))
}
