use relmap_core::schema::{Cardinality, Relation};

/// Statement shape discriminant, so different statements generated for the
/// same type/relationship shape do not collide in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// Combined root (+ optional related) SELECT.
    Select,

    /// Related-side-only SELECT used by the merge path.
    RelatedSelect,

    /// COUNT over the root (+ optional join).
    Count,

    Insert,
    Update,
    Delete,
}

/// The structural cache key for generated SQL.
///
/// Captures query shape only: types, aliases, cardinality, and join
/// columns/table. WHERE, ORDER BY, and LIMIT/OFFSET clauses vary per call
/// without changing the column list or join shape, so they are excluded by
/// construction and never fragment the cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuerySignature {
    pub kind: StatementKind,
    pub root_model: &'static str,
    pub root_alias: Option<String>,
    pub cardinality: Cardinality,
    pub related_model: Option<&'static str>,
    pub related_alias: Option<String>,
    pub join_column: Option<String>,
    pub join_table: Option<String>,
    pub root_join_column: Option<String>,
    pub related_join_column: Option<String>,
}

impl QuerySignature {
    /// Signature for a single-type statement.
    pub fn single(kind: StatementKind, root_model: &'static str) -> Self {
        Self {
            kind,
            root_model,
            root_alias: None,
            cardinality: Cardinality::None,
            related_model: None,
            related_alias: None,
            join_column: None,
            join_table: None,
            root_join_column: None,
            related_join_column: None,
        }
    }

    /// Signature for a query over a root (+ optional relationship).
    pub fn query(
        kind: StatementKind,
        root_model: &'static str,
        root_alias: Option<&str>,
        relation: Option<&Relation>,
    ) -> Self {
        let mut signature = Self::single(kind, root_model);
        signature.root_alias = root_alias.map(str::to_string);

        if let Some(relation) = relation {
            signature.cardinality = relation.cardinality;
            signature.related_model = Some(relation.related_model);
            signature.related_alias = relation.related_alias.clone();
            signature.join_column = relation.join_column.clone();
            signature.join_table = relation.join_table.clone();
            signature.root_join_column = relation.root_join_column.clone();
            signature.related_join_column = relation.related_join_column.clone();
        }

        signature
    }
}
