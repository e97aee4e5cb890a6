mod builder;
pub use builder::Builder;

use crate::{Model, RowDemux};

use relmap_core::driver::{Executor, ExecuteResult, Params, Row, SchemaIntrospector};
use relmap_core::schema::db::TableMapping;
use relmap_core::schema::{MappingRegistry, TableColumns};
use relmap_core::stmt::Value;
use relmap_core::{Error, Result};
use relmap_sql::{append_clauses, quote_ident, QuerySignature, SelectBuilder, SqlCache, StatementKind};

use std::sync::Arc;

/// Mapper-wide configuration: optional schema prefix plus the audit and
/// optimistic-version property names. Audit/version properties apply to any
/// model that maps them; models without the property are left untouched.
#[derive(Debug, Clone, Default)]
pub struct MapperConfig {
    pub schema: Option<String>,
    pub created_on_property: Option<String>,
    pub updated_on_property: Option<String>,
    pub version_property: Option<String>,
}

/// The entry point: owns the execution and introspection collaborators, the
/// mapping registry, and the SQL cache, and exposes CRUD plus the query
/// facades' shared plumbing.
#[derive(Debug)]
pub struct Mapper {
    executor: Arc<dyn Executor>,
    introspector: Arc<dyn SchemaIntrospector>,
    registry: MappingRegistry,
    sql_cache: SqlCache,
    config: MapperConfig,
}

impl Mapper {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Resolves (and caches) the table mapping for a type.
    pub async fn mapping<M: Model>(&self) -> Result<Arc<TableMapping>> {
        self.registry
            .resolve(M::meta(), self.config.schema.as_deref(), &*self.introspector)
            .await
    }

    /// The mapping registry, exposed so tests can clear and inspect it.
    pub fn registry(&self) -> &MappingRegistry {
        &self.registry
    }

    /// The structural SQL cache, exposed so tests can clear and inspect it.
    pub fn sql_cache(&self) -> &SqlCache {
        &self.sql_cache
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Inserts an object and, for auto-increment identifiers, populates the
    /// generated key back onto it. Sets configured audit timestamps and
    /// initializes the version to 1 when those properties are mapped.
    pub async fn insert<M: Model>(&self, object: &mut M) -> Result<()> {
        let mapping = self.mapping::<M>().await?;

        let now = Value::Timestamp(chrono::Local::now().naive_local());
        if let Some(property) = self.config.created_on_property.clone() {
            set_if_mapped(object, &mapping, &property, now.clone())?;
        }
        if let Some(property) = self.config.updated_on_property.clone() {
            set_if_mapped(object, &mapping, &property, now)?;
        }
        if let Some(property) = self.config.version_property.clone() {
            set_if_mapped(object, &mapping, &property, Value::I32(1))?;
        }

        let id_value = object.get_property(mapping.id_property)?;
        let properties: Vec<_> = if mapping.id_auto_increment {
            if id_value.as_positive_id().is_some() {
                return Err(Error::invalid_argument(format!(
                    "identifier `{}` of `{}` is auto-increment and must not be set before insert",
                    mapping.id_property, mapping.model
                )));
            }
            mapping
                .properties
                .iter()
                .filter(|p| p.property != mapping.id_property)
                .collect()
        } else {
            if id_value.is_null() {
                return Err(Error::invalid_argument(format!(
                    "identifier `{}` of `{}` must be set before insert",
                    mapping.id_property, mapping.model
                )));
            }
            mapping.properties.iter().collect()
        };

        let columns: Vec<&str> = properties.iter().map(|p| p.column.as_str()).collect();
        let sql = self
            .sql_cache
            .get_or_build(QuerySignature::single(StatementKind::Insert, mapping.model), || {
                Ok(relmap_sql::insert(&mapping, &columns))
            })?;

        let mut values = Vec::with_capacity(properties.len());
        for property in &properties {
            values.push(object.get_property(property.property)?);
        }

        let result = self.run_execute(&sql, &Params::Positional(values)).await?;

        if mapping.id_auto_increment {
            let id = result.last_insert_id.ok_or_else(|| {
                relmap_core::err!(
                    "driver reported no generated key for insert into `{}`",
                    mapping.table
                )
            })?;
            let ty = mapping
                .property(mapping.id_property)
                .ok_or_else(|| Error::mapping(format!(
                    "identifier `{}` is not mapped for `{}`",
                    mapping.id_property, mapping.model
                )))?
                .ty;
            object.set_property(mapping.id_property, Value::I64(id).coerce(ty)?)?;
        }
        Ok(())
    }

    /// Updates all mapped non-identifier columns of an object. When a
    /// version property is configured and mapped, the update is guarded by
    /// the previous version and bumps it; zero affected rows then raises an
    /// optimistic lock error and leaves the object's version untouched.
    pub async fn update<M: Model>(&self, object: &mut M) -> Result<u64> {
        let mapping = self.mapping::<M>().await?;
        let id = object
            .get_property(mapping.id_property)?
            .as_positive_id()
            .ok_or_else(|| {
                Error::invalid_argument(format!(
                    "identifier `{}` of `{}` must be set before update",
                    mapping.id_property, mapping.model
                ))
            })?;

        if let Some(property) = self.config.updated_on_property.clone() {
            let now = Value::Timestamp(chrono::Local::now().naive_local());
            set_if_mapped(object, &mapping, &property, now)?;
        }

        let version = self.versioned_property(&mapping);
        let old_version = match &version {
            Some(property) => {
                let value = object.get_property(property)?;
                let old = value.to_option_i32()?.ok_or_else(|| {
                    Error::invalid_argument(format!(
                        "version property `{property}` of `{}` must be initialized before update",
                        mapping.model
                    ))
                })?;
                object.set_property(property, Value::I32(old + 1))?;
                Some(old)
            }
            None => None,
        };

        // Identifier and created-on audit columns never change on update.
        let created_on = self.config.created_on_property.as_deref();
        let properties: Vec<_> = mapping
            .properties
            .iter()
            .filter(|p| p.property != mapping.id_property && Some(p.property) != created_on)
            .collect();
        let columns: Vec<&str> = properties.iter().map(|p| p.column.as_str()).collect();
        let version_column = version
            .as_deref()
            .and_then(|property| mapping.column_for(property));

        let sql = self
            .sql_cache
            .get_or_build(QuerySignature::single(StatementKind::Update, mapping.model), || {
                Ok(relmap_sql::update(&mapping, &columns, version_column))
            })?;

        let mut values = Vec::with_capacity(properties.len() + 2);
        for property in &properties {
            values.push(object.get_property(property.property)?);
        }
        values.push(Value::I64(id));
        if let Some(old) = old_version {
            values.push(Value::I32(old));
        }

        let result = self.run_execute(&sql, &Params::Positional(values)).await?;

        if result.affected == 0 {
            if let (Some(property), Some(old)) = (&version, old_version) {
                object.set_property(property, Value::I32(old))?;
                return Err(Error::optimistic_lock(mapping.model, id));
            }
        }
        Ok(result.affected)
    }

    /// Deletes an object by its identifier property.
    pub async fn delete<M: Model>(&self, object: &M) -> Result<u64> {
        let mapping = self.mapping::<M>().await?;
        let id = object
            .get_property(mapping.id_property)?
            .as_positive_id()
            .ok_or_else(|| {
                Error::invalid_argument(format!(
                    "identifier `{}` of `{}` must be set before delete",
                    mapping.id_property, mapping.model
                ))
            })?;
        self.delete_by_id::<M>(id).await
    }

    pub async fn delete_by_id<M: Model>(&self, id: i64) -> Result<u64> {
        let mapping = self.mapping::<M>().await?;
        let sql = self
            .sql_cache
            .get_or_build(QuerySignature::single(StatementKind::Delete, mapping.model), || {
                Ok(relmap_sql::delete_by_id(&mapping))
            })?;
        let result = self
            .run_execute(&sql, &Params::positional([id]))
            .await?;
        Ok(result.affected)
    }

    pub async fn find_by_id<M: Model>(&self, id: i64) -> Result<Option<M>> {
        let mapping = self.mapping::<M>().await?;
        let builder = SelectBuilder::new(&mapping, None);
        let sql = self.cached_select(&mapping, &builder)?;

        let where_clause = format!(
            "{}.{} = ?",
            builder.root_reference(),
            quote_ident(&mapping.id_column)
        );
        let sql = append_clauses(&sql, Some(&where_clause), None, None);
        let rows = self.run_query(&sql, &Params::positional([id])).await?;

        let mut objects = RowDemux::new(&mapping, builder.root_prefix()).collect::<M>(&rows)?;
        Ok(if objects.is_empty() {
            None
        } else {
            Some(objects.remove(0))
        })
    }

    pub async fn find_all<M: Model>(&self) -> Result<Vec<M>> {
        let mapping = self.mapping::<M>().await?;
        let builder = SelectBuilder::new(&mapping, None);
        let sql = self.cached_select(&mapping, &builder)?;
        let rows = self.run_query(&sql, &Params::None).await?;
        RowDemux::new(&mapping, builder.root_prefix()).collect(&rows)
    }

    fn cached_select(&self, mapping: &TableMapping, builder: &SelectBuilder<'_>) -> Result<Arc<str>> {
        self.sql_cache.get_or_build(
            QuerySignature::query(StatementKind::Select, mapping.model, None, None),
            || builder.build(),
        )
    }

    /// The configured version property, when this mapping carries it.
    pub(crate) fn versioned_property(&self, mapping: &TableMapping) -> Option<String> {
        let property = self.config.version_property.as_deref()?;
        mapping.property(property)?;
        Some(property.to_string())
    }

    /// Introspects (and caches) a join table's columns.
    pub(crate) async fn join_table_columns(&self, table: &str) -> Result<Arc<TableColumns>> {
        self.registry
            .table_columns(table, self.config.schema.as_deref(), &*self.introspector)
            .await
    }

    pub(crate) async fn run_query(&self, sql: &str, params: &Params) -> Result<Vec<Row>> {
        tracing::debug!(%sql, "executing query");
        self.executor.query(sql, params).await
    }

    pub(crate) async fn run_execute(&self, sql: &str, params: &Params) -> Result<ExecuteResult> {
        tracing::debug!(%sql, "executing statement");
        self.executor.execute(sql, params).await
    }

    pub(crate) fn new(
        executor: Arc<dyn Executor>,
        introspector: Arc<dyn SchemaIntrospector>,
        config: MapperConfig,
    ) -> Self {
        Self {
            executor,
            introspector,
            registry: MappingRegistry::new(),
            sql_cache: SqlCache::new(),
            config,
        }
    }
}

/// Sets a configured audit/version property when the mapping carries it;
/// models without the property are skipped, not failed.
fn set_if_mapped<M: Model>(
    object: &mut M,
    mapping: &TableMapping,
    property: &str,
    value: Value,
) -> Result<()> {
    if let Some(mapped) = mapping.property(property) {
        object.set_property(property, value.coerce(mapped.ty)?)?;
    }
    Ok(())
}
