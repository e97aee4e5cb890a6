use crate::{async_trait, stmt::Type, Result};

use std::fmt::Debug;

/// A column as reported by schema introspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column name, exactly as the catalog reports it.
    pub name: String,

    /// Storage type, translated to relmap's type system.
    pub ty: Type,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// The database-metadata lookup facility.
#[async_trait]
pub trait SchemaIntrospector: Debug + Send + Sync + 'static {
    /// Returns the columns of `table`, or an empty list when the table does
    /// not exist in the catalog.
    async fn columns_of(&self, schema: Option<&str>, table: &str) -> Result<Vec<ColumnInfo>>;
}
