use relmap_core::schema::{validate_join_column, Cardinality, Relation};
use relmap_core::{Error, Result};

/// Relationship state accumulated by the fluent builders, validated into a
/// [`Relation`] when the query executes. Shared by `Query`, `QueryMerge`,
/// and `QueryCount` so call-order rules are enforced identically.
#[derive(Debug, Clone)]
pub(crate) struct RelationSpec {
    pub(crate) cardinality: Cardinality,
    pub(crate) related_model: &'static str,
    pub(crate) related_alias: Option<String>,
    pub(crate) owning_join_column: Option<String>,
    pub(crate) many_join_column: Option<String>,
    pub(crate) join_table: Option<String>,
    pub(crate) root_join_column: Option<String>,
    pub(crate) related_join_column: Option<String>,
    pub(crate) target_property: Option<String>,
}

impl RelationSpec {
    pub(crate) fn new(
        cardinality: Cardinality,
        related_model: &'static str,
        join_table: Option<String>,
    ) -> Self {
        Self {
            cardinality,
            related_model,
            related_alias: None,
            owning_join_column: None,
            many_join_column: None,
            join_table,
            root_join_column: None,
            related_join_column: None,
            target_property: None,
        }
    }

    /// Validates call-order invariants and produces the relationship
    /// descriptor. A relationship verb requires its matching join-column
    /// call; mixing verbs and join-column flavors is rejected.
    pub(crate) fn relation(&self, target_required: bool) -> Result<Relation> {
        let target_property = match (&self.target_property, target_required) {
            (Some(target), _) => target.clone(),
            (None, false) => String::new(),
            (None, true) => {
                return Err(Error::invalid_argument(
                    "populate_property() must be called when a relationship is queried",
                ))
            }
        };

        let join_column = match self.cardinality {
            Cardinality::None => None,
            Cardinality::ToOne => {
                if self.many_join_column.is_some() {
                    return Err(Error::invalid_argument(
                        "join_column_many_side() cannot be used with has_one(); \
                         call join_column_owning_side()",
                    ));
                }
                let column = self.owning_join_column.as_deref().ok_or_else(|| {
                    Error::invalid_argument(
                        "join_column_owning_side() must be called for has_one()",
                    )
                })?;
                validate_join_column(column, "join column on the owning side")?;
                Some(column.to_string())
            }
            Cardinality::ToMany => {
                if self.owning_join_column.is_some() {
                    return Err(Error::invalid_argument(
                        "join_column_owning_side() cannot be used with has_many(); \
                         call join_column_many_side()",
                    ));
                }
                let column = self.many_join_column.as_deref().ok_or_else(|| {
                    Error::invalid_argument(
                        "join_column_many_side() must be called for has_many()",
                    )
                })?;
                validate_join_column(column, "join column on the many side")?;
                Some(column.to_string())
            }
            Cardinality::ToManyThrough => {
                let (Some(root_column), Some(related_column)) =
                    (&self.root_join_column, &self.related_join_column)
                else {
                    return Err(Error::invalid_argument(
                        "through_join_columns() must be called for has_many_through()",
                    ));
                };
                validate_join_column(root_column, "root-side join table column")?;
                validate_join_column(related_column, "related-side join table column")?;

                let join_table = self.join_table.as_deref().unwrap_or("");
                if join_table.trim().is_empty() {
                    return Err(Error::invalid_argument("join table must not be blank"));
                }
                None
            }
        };

        Ok(Relation {
            cardinality: self.cardinality,
            related_model: self.related_model,
            related_alias: self.related_alias.clone(),
            join_column,
            join_table: self.join_table.clone(),
            root_join_column: self.root_join_column.clone(),
            related_join_column: self.related_join_column.clone(),
            target_property,
        })
    }
}
