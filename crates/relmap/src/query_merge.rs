use crate::model::validate_target;
use crate::relation_spec::RelationSpec;
use crate::{merge, Mapper, Model, RowDemux};

use relmap_core::driver::{Params, Row};
use relmap_core::schema::Cardinality;
use relmap_core::{Error, Result};
use relmap_sql::{quote_ident, QuerySignature, SelectBuilder, StatementKind, JOIN_TABLE_ALIAS};

use indexmap::IndexSet;
use std::marker::PhantomData;

/// Ids per `IN` list. Large root batches are fetched in several statements
/// rather than one unbounded list; rows are accumulated in chunk order so
/// dedup and grouping behave as if a single statement had run.
const IN_CHUNK_SIZE: usize = 100;

/// Merges one relationship into an already-materialized root list. Only the
/// related side is fetched, keyed by the root objects' ids; no root SELECT
/// runs and no WHERE/ORDER BY/LIMIT fragments are accepted.
#[derive(Debug, Clone)]
pub struct QueryMerge<R: Model> {
    _marker: PhantomData<R>,
}

impl<R: Model> Default for QueryMerge<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Model> QueryMerge<R> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    pub fn has_one<C: Model>(self) -> RelatedMerge<R, C> {
        RelatedMerge::new(Cardinality::ToOne, None)
    }

    pub fn has_many<C: Model>(self) -> RelatedMerge<R, C> {
        RelatedMerge::new(Cardinality::ToMany, None)
    }

    pub fn has_many_through<C: Model>(self, join_table: impl Into<String>) -> RelatedMerge<R, C> {
        RelatedMerge::new(Cardinality::ToManyThrough, Some(join_table.into()))
    }
}

/// A [`QueryMerge`] with its relationship declared.
#[derive(Debug, Clone)]
pub struct RelatedMerge<R: Model, C: Model> {
    spec: RelationSpec,
    _marker: PhantomData<(R, C)>,
}

impl<R: Model, C: Model> RelatedMerge<R, C> {
    fn new(cardinality: Cardinality, join_table: Option<String>) -> Self {
        Self {
            spec: RelationSpec::new(cardinality, C::meta().name, join_table),
            _marker: PhantomData,
        }
    }

    pub fn join_column_owning_side(mut self, column: impl Into<String>) -> Self {
        self.spec.owning_join_column = Some(column.into());
        self
    }

    pub fn join_column_many_side(mut self, column: impl Into<String>) -> Self {
        self.spec.many_join_column = Some(column.into());
        self
    }

    pub fn through_join_columns(
        mut self,
        root_column: impl Into<String>,
        related_column: impl Into<String>,
    ) -> Self {
        self.spec.root_join_column = Some(root_column.into());
        self.spec.related_join_column = Some(related_column.into());
        self
    }

    pub fn related_table_alias(mut self, alias: impl Into<String>) -> Self {
        self.spec.related_alias = Some(alias.into());
        self
    }

    pub fn populate_property(mut self, property: impl Into<String>) -> Self {
        self.spec.target_property = Some(property.into());
        self
    }

    /// Fetches the related side for `roots` and merges it in place. To-many
    /// roots with no children still get an empty list assigned.
    pub async fn execute(&self, mapper: &Mapper, roots: &mut [R]) -> Result<()> {
        let relation = self.spec.relation(true)?;
        validate_target::<R, C>(&relation)?;

        if roots.is_empty() {
            return Ok(());
        }

        let root_mapping = mapper.mapping::<R>().await?;
        let related_mapping = mapper.mapping::<C>().await?;
        let join_table = match relation.join_table.as_deref() {
            Some(table) => Some(mapper.join_table_columns(table).await?),
            None => None,
        };

        let mut builder =
            SelectBuilder::new(&root_mapping, None).relation(&relation, &related_mapping);
        if let Some(columns) = &join_table {
            builder = builder.join_table(columns);
        }
        let related_ref = builder
            .related_reference()
            .ok_or_else(|| Error::invalid_argument("a relationship must be attached"))?;
        let related_prefix = builder
            .related_prefix()
            .ok_or_else(|| Error::invalid_argument("a relationship must be attached"))?;

        let signature = QuerySignature::query(
            StatementKind::RelatedSelect,
            root_mapping.model,
            None,
            Some(&relation),
        );

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

                // The ids to fetch are the roots' foreign key values.
                let mut ids: IndexSet<i64> = IndexSet::new();
                for root in roots.iter() {
                    if let Some(id) = root.get_property(join_property)?.as_positive_id() {
                        ids.insert(id);
                    }
                }

                let base = mapper
                    .sql_cache()
                    .get_or_build(signature, || builder.build_related_only())?;
                let in_column = format!(
                    "{related_ref}.{}",
                    quote_ident(&related_mapping.id_column)
                );
                let rows = self.fetch_chunked(mapper, &base, &in_column, &ids).await?;

                let related = RowDemux::new(&related_mapping, related_prefix).collect::<C>(&rows)?;
                merge::merge_to_one(roots, &related, join_property, &relation.target_property)
            }
            Cardinality::ToMany => {
                let column = relation.join_column.as_deref().unwrap_or_default();
                let join_mapping = related_mapping.property_for_column(column).ok_or_else(|| {
                    Error::mapping(format!(
                        "join column `{column}` not found in table `{}`",
                        related_mapping.table
                    ))
                })?;
                let join_property = join_mapping.property;
                let join_column = join_mapping.column.clone();

                let ids = root_ids(roots, root_mapping.model, root_mapping.id_property)?;

                let base = mapper
                    .sql_cache()
                    .get_or_build(signature, || builder.build_related_only())?;
                let in_column = format!("{related_ref}.{}", quote_ident(&join_column));
                let rows = self.fetch_chunked(mapper, &base, &in_column, &ids).await?;

                let related = RowDemux::new(&related_mapping, related_prefix).collect::<C>(&rows)?;
                merge::merge_to_many(roots, related, join_property, &relation.target_property)
            }
            Cardinality::ToManyThrough => {
                let ids = root_ids(roots, root_mapping.model, root_mapping.id_property)?;

                let base = mapper
                    .sql_cache()
                    .get_or_build(signature, || builder.build_through_related())?;
                let root_column = builder.root_join_column()?;
                let related_column = builder.related_join_column()?;
                let in_column = format!("{JOIN_TABLE_ALIAS}.{}", quote_ident(root_column));
                let rows = self.fetch_chunked(mapper, &base, &in_column, &ids).await?;

                let related = RowDemux::new(&related_mapping, related_prefix).collect::<C>(&rows)?;
                let pairs = merge::join_pairs(
                    &rows,
                    &format!("{JOIN_TABLE_ALIAS}_{root_column}"),
                    &format!("{JOIN_TABLE_ALIAS}_{related_column}"),
                );
                merge::merge_to_many_through(roots, &related, &pairs, &relation.target_property)
            }
            Cardinality::None => Ok(()),
        }
    }

    async fn fetch_chunked(
        &self,
        mapper: &Mapper,
        base: &str,
        in_column: &str,
        ids: &IndexSet<i64>,
    ) -> Result<Vec<Row>> {
        let mut rows = Vec::new();
        let id_list: Vec<i64> = ids.iter().copied().collect();
        for chunk in id_list.chunks(IN_CHUNK_SIZE) {
            let sql = format!("{base} WHERE {in_column} IN ({})", placeholders(chunk.len()));
            let params = Params::positional(chunk.iter().copied());
            rows.extend(mapper.run_query(&sql, &params).await?);
        }
        Ok(rows)
    }
}

fn root_ids<R: Model>(
    roots: &[R],
    model: &str,
    id_property: &str,
) -> Result<IndexSet<i64>> {
    let mut ids = IndexSet::new();
    for root in roots {
        let id = root
            .get_property(id_property)?
            .as_positive_id()
            .ok_or_else(|| {
                Error::invalid_argument(format!(
                    "every `{model}` object must carry its identifier before merging"
                ))
            })?;
        ids.insert(id);
    }
    Ok(ids)
}

fn placeholders(count: usize) -> String {
    let mut sql = String::with_capacity(count.saturating_mul(3));
    for index in 0..count {
        if index > 0 {
            sql.push_str(", ");
        }
        sql.push('?');
    }
    sql
}
