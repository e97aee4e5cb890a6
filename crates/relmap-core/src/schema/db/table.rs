use crate::stmt::Type;

/// Database-side mapping for one type: the resolved table plus the
/// property/column pairs that survived introspection matching.
///
/// Built once per type by the [`MappingRegistry`](crate::schema::MappingRegistry)
/// and never mutated afterwards.
#[derive(Debug, PartialEq, Eq)]
pub struct TableMapping {
    /// Name of the model this mapping was resolved for.
    pub model: &'static str,

    /// Schema the table lives in, when one is configured.
    pub schema: Option<String>,

    /// Unqualified table name, exactly as it matched the catalog (the
    /// upper-case fallback may have changed its case).
    pub table: String,

    /// Identifier property and its column.
    pub id_property: &'static str,
    pub id_column: String,
    pub id_auto_increment: bool,

    /// Scalar properties that matched a column, in declaration order.
    /// Properties without a matching column are absent: they are transient
    /// and excluded from persistence and materialization.
    pub properties: Vec<PropertyMapping>,
}

/// One property/column pair of a [`TableMapping`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyMapping {
    pub property: &'static str,

    /// Column name exactly as the catalog reports it.
    pub column: String,

    /// Declared property type; the demultiplexer coerces row values to it.
    pub ty: Type,
}

impl TableMapping {
    /// Returns the mapping for a property, or `None` for transient and
    /// relationship properties.
    pub fn property(&self, name: &str) -> Option<&PropertyMapping> {
        self.properties.iter().find(|p| p.property == name)
    }

    /// Reverse lookup: the property mapped to `column`, matched exactly and
    /// then upper-cased as a case-sensitivity fallback.
    pub fn property_for_column(&self, column: &str) -> Option<&PropertyMapping> {
        self.properties
            .iter()
            .find(|p| p.column == column)
            .or_else(|| {
                let upper = column.to_uppercase();
                self.properties.iter().find(|p| p.column == upper)
            })
    }

    /// Returns true when `column` is mapped, with the upper-case fallback.
    pub fn has_column(&self, column: &str) -> bool {
        self.property_for_column(column).is_some()
    }

    /// The column name for a property, when mapped.
    pub fn column_for(&self, property: &str) -> Option<&str> {
        self.property(property).map(|p| p.column.as_str())
    }
}
