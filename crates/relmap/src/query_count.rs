use crate::relation_spec::RelationSpec;
use crate::{Mapper, Model};

use relmap_core::driver::{Params, Row};
use relmap_core::schema::Cardinality;
use relmap_core::stmt::Value;
use relmap_core::{Error, Result};
use relmap_sql::{append_clauses, QuerySignature, SelectBuilder, StatementKind};

use std::marker::PhantomData;

/// COUNT over a root type, optionally joined through one relationship. A
/// WHERE fragment is accepted; ORDER BY and LIMIT/OFFSET make no sense for a
/// count and are not offered.
#[derive(Debug, Clone)]
pub struct QueryCount<R: Model> {
    root_alias: Option<String>,
    where_clause: Option<String>,
    params: Params,
    _marker: PhantomData<R>,
}

impl<R: Model> Default for QueryCount<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Model> QueryCount<R> {
    pub fn new() -> Self {
        Self {
            root_alias: None,
            where_clause: None,
            params: Params::None,
            _marker: PhantomData,
        }
    }

    pub fn table_alias(mut self, alias: impl Into<String>) -> Self {
        self.root_alias = Some(alias.into());
        self
    }

    pub fn where_clause(mut self, sql: impl Into<String>, params: Params) -> Self {
        self.where_clause = Some(sql.into());
        self.params = params;
        self
    }

    pub fn has_one<C: Model>(self) -> RelatedCount<R, C> {
        RelatedCount::new(self, Cardinality::ToOne, None)
    }

    pub fn has_many<C: Model>(self) -> RelatedCount<R, C> {
        RelatedCount::new(self, Cardinality::ToMany, None)
    }

    pub fn has_many_through<C: Model>(self, join_table: impl Into<String>) -> RelatedCount<R, C> {
        RelatedCount::new(self, Cardinality::ToManyThrough, Some(join_table.into()))
    }

    pub async fn execute(&self, mapper: &Mapper) -> Result<i64> {
        let mapping = mapper.mapping::<R>().await?;
        let builder = SelectBuilder::new(&mapping, self.root_alias.as_deref());

        let sql = mapper.sql_cache().get_or_build(
            QuerySignature::query(
                StatementKind::Count,
                mapping.model,
                self.root_alias.as_deref(),
                None,
            ),
            || builder.build_count(),
        )?;
        let sql = append_clauses(&sql, self.where_clause.as_deref(), None, None);

        let rows = mapper.run_query(&sql, &self.params).await?;
        count_from(&rows)
    }
}

/// A [`QueryCount`] joined through one relationship. The count is over
/// joined rows, so a fanned-out to-many join counts child rows.
#[derive(Debug, Clone)]
pub struct RelatedCount<R: Model, C: Model> {
    base: QueryCount<R>,
    spec: RelationSpec,
    _marker: PhantomData<C>,
}

impl<R: Model, C: Model> RelatedCount<R, C> {
    fn new(base: QueryCount<R>, cardinality: Cardinality, join_table: Option<String>) -> Self {
        Self {
            base,
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

    pub fn where_clause(mut self, sql: impl Into<String>, params: Params) -> Self {
        self.base = self.base.where_clause(sql, params);
        self
    }

    pub async fn execute(&self, mapper: &Mapper) -> Result<i64> {
        // Nothing is materialized, so no populate target is required.
        let relation = self.spec.relation(false)?;

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
                StatementKind::Count,
                root_mapping.model,
                self.base.root_alias.as_deref(),
                Some(&relation),
            ),
            || builder.build_count(),
        )?;
        let sql = append_clauses(&sql, self.base.where_clause.as_deref(), None, None);

        let rows = mapper.run_query(&sql, &self.base.params).await?;
        count_from(&rows)
    }
}

fn count_from(rows: &[Row]) -> Result<i64> {
    let value = rows
        .first()
        .and_then(|row| row.get_index(0))
        .ok_or_else(|| relmap_core::err!("count query returned no rows"))?;
    match value {
        Value::I64(count) => Ok(*count),
        Value::I32(count) => Ok(i64::from(*count)),
        other => Err(Error::type_conversion(other.clone(), relmap_core::stmt::Type::I64)),
    }
}
