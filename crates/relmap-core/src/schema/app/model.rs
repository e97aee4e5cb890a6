use super::{PropertyKind, PropertyMeta};

/// Static application-side metadata for a mapped type.
///
/// Supplied by each `Model` implementation as a `'static` value; the
/// database-side [`TableMapping`](crate::schema::db::TableMapping) is
/// derived from it lazily by the [`MappingRegistry`](crate::schema::MappingRegistry).
#[derive(Debug, PartialEq, Eq)]
pub struct ModelMeta {
    /// Type name; used as the registry key and, snake-cased, as the default
    /// table name.
    pub name: &'static str,

    /// Explicit table name, overriding the derived one.
    pub table: Option<&'static str>,

    /// The designated identifier property.
    pub id: IdMeta,

    /// All declared properties, in declaration order.
    pub properties: &'static [PropertyMeta],
}

/// The identifier property of a mapped type.
#[derive(Debug, PartialEq, Eq)]
pub struct IdMeta {
    pub property: &'static str,

    /// True when the database generates the value on insert.
    pub auto_increment: bool,
}

impl ModelMeta {
    pub fn property(&self, name: &str) -> Option<&PropertyMeta> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Iterates the scalar (column-backed) properties.
    pub fn scalar_properties(&self) -> impl Iterator<Item = &PropertyMeta> {
        self.properties
            .iter()
            .filter(|p| matches!(p.kind, PropertyKind::Scalar(_)))
    }
}
