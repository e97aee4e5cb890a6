use crate::{Error, Result};

/// Relationship cardinality between a root type and a related type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// Single-type query, no related side.
    #[default]
    None,

    /// The root table holds a foreign key to the related table.
    ToOne,

    /// The related table holds a foreign key to the root table.
    ToMany,

    /// A separate join table holds foreign keys to both tables.
    ToManyThrough,
}

/// Describes one relationship of a query: cardinality, related side, join
/// columns, and the root property to populate. Built per query call and
/// discarded after execution; only the derived cache signature outlives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub cardinality: Cardinality,

    /// Name of the related model.
    pub related_model: &'static str,

    /// Alias for the related table; defaults to the table name.
    pub related_alias: Option<String>,

    /// For `ToOne`: column on the root table referencing the related id.
    /// For `ToMany`: column on the related table referencing the root id.
    pub join_column: Option<String>,

    /// For `ToManyThrough`: the join table (bare or schema-qualified) and
    /// its two columns referencing root and related ids.
    pub join_table: Option<String>,
    pub root_join_column: Option<String>,
    pub related_join_column: Option<String>,

    /// Property on the root object to populate.
    pub target_property: String,
}

/// Validates a join-column argument: must be a non-blank, bare column name.
///
/// A blank argument is a usage error; a table-qualified one (containing a
/// `.`) is a query-semantics error, never silently corrected.
pub fn validate_join_column(name: &str, label: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::invalid_argument(format!("{label} must not be blank")));
    }
    if name.contains('.') {
        return Err(Error::invalid_query(format!(
            "invalid join column: {label} `{name}` must not be table qualified"
        )));
    }
    Ok(())
}
