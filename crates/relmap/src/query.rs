use crate::model::validate_target;
use crate::relation_spec::RelationSpec;
use crate::{merge, Mapper, Model, RowDemux};

use relmap_core::driver::Params;
use relmap_core::schema::Cardinality;
use relmap_core::{Error, Result};
use relmap_sql::{append_clauses, QuerySignature, SelectBuilder, StatementKind, JOIN_TABLE_ALIAS};

use std::marker::PhantomData;

/// Fluent SELECT over a root type, optionally extended with one
/// relationship. WHERE, ORDER BY, and LIMIT/OFFSET fragments are opaque SQL
/// appended verbatim; column references in them must use the prefix-free
/// table alias.
#[derive(Debug, Clone)]
pub struct Query<R: Model> {
    pub(crate) root_alias: Option<String>,
    pub(crate) where_clause: Option<String>,
    pub(crate) params: Params,
    pub(crate) order_by: Option<String>,
    pub(crate) limit_offset: Option<String>,
    _marker: PhantomData<R>,
}

impl<R: Model> Default for Query<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Model> Query<R> {
    pub fn new() -> Self {
        Self {
            root_alias: None,
            where_clause: None,
            params: Params::None,
            order_by: None,
            limit_offset: None,
            _marker: PhantomData,
        }
    }

    /// Aliases the root table; the alias becomes the column prefix and the
    /// reference to use in SQL fragments.
    pub fn table_alias(mut self, alias: impl Into<String>) -> Self {
        self.root_alias = Some(alias.into());
        self
    }

    /// Appends an opaque WHERE fragment with its bind parameters.
    pub fn where_clause(mut self, sql: impl Into<String>, params: Params) -> Self {
        self.where_clause = Some(sql.into());
        self.params = params;
        self
    }

    /// Appends an opaque ORDER BY fragment.
    pub fn order_by(mut self, sql: impl Into<String>) -> Self {
        self.order_by = Some(sql.into());
        self
    }

    /// Appends an opaque LIMIT/OFFSET fragment, passed through verbatim.
    pub fn limit_offset(mut self, sql: impl Into<String>) -> Self {
        self.limit_offset = Some(sql.into());
        self
    }

    /// Declares a to-one relationship; pair with
    /// [`join_column_owning_side`](RelatedQuery::join_column_owning_side).
    pub fn has_one<C: Model>(self) -> RelatedQuery<R, C> {
        RelatedQuery::new(self, Cardinality::ToOne, None)
    }

    /// Declares a to-many relationship; pair with
    /// [`join_column_many_side`](RelatedQuery::join_column_many_side).
    pub fn has_many<C: Model>(self) -> RelatedQuery<R, C> {
        RelatedQuery::new(self, Cardinality::ToMany, None)
    }

    /// Declares a many-to-many relationship through a join table; pair with
    /// [`through_join_columns`](RelatedQuery::through_join_columns).
    pub fn has_many_through<C: Model>(self, join_table: impl Into<String>) -> RelatedQuery<R, C> {
        RelatedQuery::new(self, Cardinality::ToManyThrough, Some(join_table.into()))
    }

    /// Runs the single-type query and materializes the results in row order.
    pub async fn execute(&self, mapper: &Mapper) -> Result<Vec<R>> {
        let mapping = mapper.mapping::<R>().await?;
        let builder = SelectBuilder::new(&mapping, self.root_alias.as_deref());

        let sql = mapper.sql_cache().get_or_build(
            QuerySignature::query(
                StatementKind::Select,
                mapping.model,
                self.root_alias.as_deref(),
                None,
            ),
            || builder.build(),
        )?;
        let sql = append_clauses(
            &sql,
            self.where_clause.as_deref(),
            self.order_by.as_deref(),
            self.limit_offset.as_deref(),
        );

        let rows = mapper.run_query(&sql, &self.params).await?;
        RowDemux::new(&mapping, builder.root_prefix()).collect(&rows)
    }
}

/// A [`Query`] extended with one relationship to a related type.
#[derive(Debug, Clone)]
pub struct RelatedQuery<R: Model, C: Model> {
    base: Query<R>,
    spec: RelationSpec,
    _marker: PhantomData<C>,
}

impl<R: Model, C: Model> RelatedQuery<R, C> {
    fn new(base: Query<R>, cardinality: Cardinality, join_table: Option<String>) -> Self {
        Self {
            base,
            spec: RelationSpec::new(cardinality, C::meta().name, join_table),
            _marker: PhantomData,
        }
    }

    /// Foreign key column on the root table referencing related ids
    /// (to-one).
    pub fn join_column_owning_side(mut self, column: impl Into<String>) -> Self {
        self.spec.owning_join_column = Some(column.into());
        self
    }

    /// Foreign key column on the related table referencing root ids
    /// (to-many).
    pub fn join_column_many_side(mut self, column: impl Into<String>) -> Self {
        self.spec.many_join_column = Some(column.into());
        self
    }

    /// Join-table columns referencing root and related ids (through).
    pub fn through_join_columns(
        mut self,
        root_column: impl Into<String>,
        related_column: impl Into<String>,
    ) -> Self {
        self.spec.root_join_column = Some(root_column.into());
        self.spec.related_join_column = Some(related_column.into());
        self
    }

    /// Aliases the related table.
    pub fn related_table_alias(mut self, alias: impl Into<String>) -> Self {
        self.spec.related_alias = Some(alias.into());
        self
    }

    /// Names the root property that receives the merged related objects.
    pub fn populate_property(mut self, property: impl Into<String>) -> Self {
        self.spec.target_property = Some(property.into());
        self
    }

    pub fn where_clause(mut self, sql: impl Into<String>, params: Params) -> Self {
        self.base = self.base.where_clause(sql, params);
        self
    }

    pub fn order_by(mut self, sql: impl Into<String>) -> Self {
        self.base = self.base.order_by(sql);
        self
    }

    pub fn limit_offset(mut self, sql: impl Into<String>) -> Self {
        self.base = self.base.limit_offset(sql);
        self
    }

    /// Runs the joined query, demultiplexes both column prefixes, and merges
    /// related objects into the root property.
    pub async fn execute(&self, mapper: &Mapper) -> Result<Vec<R>> {
        // Checked before any SQL work: a LIMIT applies to joined rows, and a
        // fanned-out join would truncate children mid-parent.
        if self.base.limit_offset.is_some()
            && matches!(
                self.spec.cardinality,
                Cardinality::ToMany | Cardinality::ToManyThrough
            )
        {
            return Err(Error::invalid_query(
                "limit/offset cannot be combined with a to-many relationship; \
                 the row fan-out makes the cutoff fall mid-parent",
            ));
        }

        let relation = self.spec.relation(true)?;
        validate_target::<R, C>(&relation)?;

        let root_mapping = mapper.mapping::<R>().await?;
        let related_mapping = mapper.mapping::<C>().await?;
        let join_table = match relation.join_table.as_deref() {
            Some(table) => Some(mapper.join_table_columns(table).await?),
            None => None,
        };

        let mut builder = SelectBuilder::new(&root_mapping, self.base.root_alias.as_deref())
            .relation(&relation, &related_mapping);
        if let Some(columns) = &join_table {
            builder = builder.join_table(columns);
        }

        let sql = mapper.sql_cache().get_or_build(
            QuerySignature::query(
                StatementKind::Select,
                root_mapping.model,
                self.base.root_alias.as_deref(),
                Some(&relation),
            ),
            || builder.build(),
        )?;
        let sql = append_clauses(
            &sql,
            self.base.where_clause.as_deref(),
            self.base.order_by.as_deref(),
            self.base.limit_offset.as_deref(),
        );

        let rows = mapper.run_query(&sql, &self.base.params).await?;

        let mut roots = RowDemux::new(&root_mapping, builder.root_prefix()).collect::<R>(&rows)?;
        let related_prefix = builder
            .related_prefix()
            .ok_or_else(|| Error::invalid_argument("a relationship must be attached"))?;
        let related = RowDemux::new(&related_mapping, related_prefix).collect::<C>(&rows)?;

        match relation.cardinality {
            Cardinality::ToOne => {
                let column = relation.join_column.as_deref().unwrap_or_default();
                let join_property = root_mapping
                    .property_for_column(column)
                    .map(|p| p.property)
                    .ok_or_else(|| {
                        Error::mapping(format!(
                            "join column `{column}` not found in table `{}`",
                            root_mapping.table
                        ))
                    })?;
                merge::merge_to_one(&mut roots, &related, join_property, &relation.target_property)?;
            }
            Cardinality::ToMany => {
                let column = relation.join_column.as_deref().unwrap_or_default();
                let join_property = related_mapping
                    .property_for_column(column)
                    .map(|p| p.property)
                    .ok_or_else(|| {
                        Error::mapping(format!(
                            "join column `{column}` not found in table `{}`",
                            related_mapping.table
                        ))
                    })?;
                merge::merge_to_many(&mut roots, related, join_property, &relation.target_property)?;
            }
            Cardinality::ToManyThrough => {
                let root_column = builder.root_join_column()?;
                let related_column = builder.related_join_column()?;
                let pairs = merge::join_pairs(
                    &rows,
                    &format!("{JOIN_TABLE_ALIAS}_{root_column}"),
                    &format!("{JOIN_TABLE_ALIAS}_{related_column}"),
                );
                merge::merge_to_many_through(
                    &mut roots,
                    &related,
                    &pairs,
                    &relation.target_property,
                )?;
            }
            Cardinality::None => {}
        }

        Ok(roots)
    }
}
