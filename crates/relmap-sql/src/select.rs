use crate::{push_ident, push_qualified};

use relmap_core::schema::db::TableMapping;
use relmap_core::schema::{validate_join_column, Cardinality, Relation, TableColumns};
use relmap_core::{Error, Result};

/// Fixed alias for the join table in a many-to-many-through query. The join
/// table carries no model of its own, so its columns are selected under this
/// reserved prefix for the merge step to pair ids.
pub const JOIN_TABLE_ALIAS: &str = "jt";

/// Generates join-aware SELECT and COUNT statements with column-prefixed
/// aliases, so that multiple types' columns (notably every type's id column)
/// can be disambiguated within one flat row.
///
/// The builder validates join columns against resolved mappings before any
/// SQL is written; generated text carries no WHERE/ORDER BY/LIMIT clauses,
/// which are appended per execution via [`append_clauses`].
#[derive(Debug)]
pub struct SelectBuilder<'a> {
    root: &'a TableMapping,
    root_alias: Option<&'a str>,
    relation: Option<&'a Relation>,
    related: Option<&'a TableMapping>,
    join_table: Option<&'a TableColumns>,
}

impl<'a> SelectBuilder<'a> {
    pub fn new(root: &'a TableMapping, root_alias: Option<&'a str>) -> Self {
        Self {
            root,
            root_alias,
            relation: None,
            related: None,
            join_table: None,
        }
    }

    /// Attaches the related side of the query.
    pub fn relation(mut self, relation: &'a Relation, related: &'a TableMapping) -> Self {
        self.relation = Some(relation);
        self.related = Some(related);
        self
    }

    /// Supplies the introspected join table for a through relationship, so
    /// its join columns can be checked for existence.
    pub fn join_table(mut self, columns: &'a TableColumns) -> Self {
        self.join_table = Some(columns);
        self
    }

    /// The column-alias prefix under which root columns are selected.
    pub fn root_prefix(&self) -> String {
        format!("{}_", self.root_alias.unwrap_or(&self.root.table))
    }

    /// The column-alias prefix for related columns, when a relation is set.
    pub fn related_prefix(&self) -> Option<String> {
        let relation = self.relation?;
        let related = self.related?;
        let alias = relation
            .related_alias
            .as_deref()
            .unwrap_or(&related.table);
        Some(format!("{alias}_"))
    }

    /// SQL reference for root columns: the alias when one is set, otherwise
    /// the quoted (possibly schema-qualified) table name.
    pub fn root_reference(&self) -> String {
        match self.root_alias {
            Some(alias) => alias.to_string(),
            None => {
                let mut out = String::new();
                push_qualified(&mut out, self.root.schema.as_deref(), &self.root.table);
                out
            }
        }
    }

    /// SQL reference for related columns, when a relation is set.
    pub fn related_reference(&self) -> Option<String> {
        let relation = self.relation?;
        let related = self.related?;
        Some(match relation.related_alias.as_deref() {
            Some(alias) => alias.to_string(),
            None => {
                let mut out = String::new();
                push_qualified(&mut out, related.schema.as_deref(), &related.table);
                out
            }
        })
    }

    /// Builds the combined SELECT for the root and, when a relation is set,
    /// the joined related side.
    pub fn build(&self) -> Result<String> {
        self.validate()?;

        let mut sql = String::from("SELECT ");
        push_columns(&mut sql, self.root, &self.root_reference(), &self.root_prefix());

        if let (Some(relation), Some(related)) = (self.relation, self.related) {
            let related_ref = self.related_reference().unwrap();
            let related_prefix = self.related_prefix().unwrap();
            sql.push_str(", ");
            push_columns(&mut sql, related, &related_ref, &related_prefix);

            if relation.cardinality == Cardinality::ToManyThrough {
                sql.push_str(", ");
                self.push_join_table_columns(&mut sql)?;
            }
        }

        sql.push_str(" FROM ");
        self.push_root_from(&mut sql);
        self.push_joins(&mut sql)?;

        Ok(sql)
    }

    /// Builds the COUNT statement over the same join shape.
    pub fn build_count(&self) -> Result<String> {
        self.validate()?;

        let mut sql = String::from("SELECT count(*) FROM ");
        self.push_root_from(&mut sql);
        self.push_joins(&mut sql)?;
        Ok(sql)
    }

    /// Builds the related-side-only SELECT used when merging relationship
    /// data into an already-materialized root list. The caller appends its
    /// `WHERE <join column> IN (…)` clause per id chunk.
    pub fn build_related_only(&self) -> Result<String> {
        let (relation, related) = self.relation_parts()?;
        self.validate()?;

        debug_assert!(matches!(
            relation.cardinality,
            Cardinality::ToOne | Cardinality::ToMany
        ));

        let related_ref = self.related_reference().unwrap();
        let mut sql = String::from("SELECT ");
        push_columns(&mut sql, related, &related_ref, &self.related_prefix().unwrap());
        sql.push_str(" FROM ");
        push_qualified(&mut sql, related.schema.as_deref(), &related.table);
        if let Some(alias) = relation.related_alias.as_deref() {
            sql.push(' ');
            sql.push_str(alias);
        }
        Ok(sql)
    }

    /// Builds the join-table-driven related SELECT for merging a through
    /// relationship: related columns plus the two join-table id columns.
    pub fn build_through_related(&self) -> Result<String> {
        let (relation, related) = self.relation_parts()?;
        self.validate()?;

        let related_ref = self.related_reference().unwrap();
        let mut sql = String::from("SELECT ");
        push_columns(&mut sql, related, &related_ref, &self.related_prefix().unwrap());
        sql.push_str(", ");
        self.push_join_table_columns(&mut sql)?;

        sql.push_str(" FROM ");
        push_qualified(&mut sql, None, relation.join_table.as_deref().unwrap());
        sql.push(' ');
        sql.push_str(JOIN_TABLE_ALIAS);

        sql.push_str(" LEFT JOIN ");
        self.push_related_from(&mut sql);
        sql.push_str(" ON ");
        push_join_table_column(&mut sql, self.related_join_column()?);
        sql.push_str(" = ");
        push_column_ref(&mut sql, &related_ref, &related.id_column);

        Ok(sql)
    }

    /// The join-table column referencing root ids, resolved to its catalog
    /// casing when the join table was introspected.
    pub fn root_join_column(&self) -> Result<&str> {
        let (relation, _) = self.relation_parts()?;
        let name = relation.root_join_column.as_deref().ok_or_else(|| {
            Error::invalid_argument("through join columns must be specified")
        })?;
        Ok(self.resolve_join_table_column(name).unwrap_or(name))
    }

    /// The join-table column referencing related ids.
    pub fn related_join_column(&self) -> Result<&str> {
        let (relation, _) = self.relation_parts()?;
        let name = relation.related_join_column.as_deref().ok_or_else(|| {
            Error::invalid_argument("through join columns must be specified")
        })?;
        Ok(self.resolve_join_table_column(name).unwrap_or(name))
    }

    fn resolve_join_table_column(&self, name: &str) -> Option<&str> {
        let columns = self.join_table?;
        Some(columns.column(name)?.name.as_str())
    }

    fn relation_parts(&self) -> Result<(&'a Relation, &'a TableMapping)> {
        match (self.relation, self.related) {
            (Some(relation), Some(related)) => Ok((relation, related)),
            _ => Err(Error::invalid_argument(
                "a relationship must be attached before building a related select",
            )),
        }
    }

    fn push_root_from(&self, sql: &mut String) {
        push_qualified(sql, self.root.schema.as_deref(), &self.root.table);
        if let Some(alias) = self.root_alias {
            sql.push(' ');
            sql.push_str(alias);
        }
    }

    fn push_related_from(&self, sql: &mut String) {
        let relation = self.relation.unwrap();
        let related = self.related.unwrap();
        push_qualified(sql, related.schema.as_deref(), &related.table);
        if let Some(alias) = relation.related_alias.as_deref() {
            sql.push(' ');
            sql.push_str(alias);
        }
    }

    fn push_joins(&self, sql: &mut String) -> Result<()> {
        let (Some(relation), Some(related)) = (self.relation, self.related) else {
            return Ok(());
        };
        let root_ref = self.root_reference();
        let related_ref = self.related_reference().unwrap();

        match relation.cardinality {
            Cardinality::None => {}
            Cardinality::ToOne => {
                let join = self.owning_join_column()?;
                sql.push_str(" LEFT JOIN ");
                self.push_related_from(sql);
                sql.push_str(" ON ");
                push_column_ref(sql, &root_ref, join);
                sql.push_str(" = ");
                push_column_ref(sql, &related_ref, &related.id_column);
            }
            Cardinality::ToMany => {
                let join = self.many_side_join_column()?;
                sql.push_str(" LEFT JOIN ");
                self.push_related_from(sql);
                sql.push_str(" ON ");
                push_column_ref(sql, &related_ref, join);
                sql.push_str(" = ");
                push_column_ref(sql, &root_ref, &self.root.id_column);
            }
            Cardinality::ToManyThrough => {
                sql.push_str(" LEFT JOIN ");
                push_qualified(sql, None, relation.join_table.as_deref().unwrap());
                sql.push(' ');
                sql.push_str(JOIN_TABLE_ALIAS);
                sql.push_str(" ON ");
                push_join_table_column(sql, self.root_join_column()?);
                sql.push_str(" = ");
                push_column_ref(sql, &root_ref, &self.root.id_column);

                sql.push_str(" LEFT JOIN ");
                self.push_related_from(sql);
                sql.push_str(" ON ");
                push_join_table_column(sql, self.related_join_column()?);
                sql.push_str(" = ");
                push_column_ref(sql, &related_ref, &related.id_column);
            }
        }
        Ok(())
    }

    fn push_join_table_columns(&self, sql: &mut String) -> Result<()> {
        let root_col = self.root_join_column()?;
        push_join_table_column(sql, root_col);
        sql.push_str(&format!(" {JOIN_TABLE_ALIAS}_{root_col}"));
        sql.push_str(", ");
        let related_col = self.related_join_column()?;
        push_join_table_column(sql, related_col);
        sql.push_str(&format!(" {JOIN_TABLE_ALIAS}_{related_col}"));
        Ok(())
    }

    /// To-one join column on the root (owning) table, resolved to catalog
    /// casing.
    fn owning_join_column(&self) -> Result<&str> {
        let relation = self.relation.unwrap();
        let name = relation.join_column.as_deref().ok_or_else(|| {
            Error::invalid_argument("a join column on the owning side must be specified")
        })?;
        self.root
            .property_for_column(name)
            .map(|p| p.column.as_str())
            .ok_or_else(|| {
                Error::mapping(format!(
                    "join column `{name}` not found in table `{}`",
                    self.root.table
                ))
            })
    }

    /// To-many join column on the related (many) table.
    fn many_side_join_column(&self) -> Result<&str> {
        let relation = self.relation.unwrap();
        let related = self.related.unwrap();
        let name = relation.join_column.as_deref().ok_or_else(|| {
            Error::invalid_argument("a join column on the many side must be specified")
        })?;
        related
            .property_for_column(name)
            .map(|p| p.column.as_str())
            .ok_or_else(|| {
                Error::mapping(format!(
                    "join column `{name}` not found in table `{}`",
                    related.table
                ))
            })
    }

    fn validate(&self) -> Result<()> {
        let Some(relation) = self.relation else {
            return Ok(());
        };

        if let Some(related_prefix) = self.related_prefix() {
            if self.root_prefix() == related_prefix {
                return Err(Error::invalid_query(format!(
                    "root and related sides share the column prefix `{related_prefix}`; \
                     give each side a distinct table alias"
                )));
            }
        }

        match relation.cardinality {
            Cardinality::None => {}
            Cardinality::ToOne => {
                let name = relation.join_column.as_deref().unwrap_or("");
                validate_join_column(name, "join column on the owning side")?;
                self.owning_join_column()?;
            }
            Cardinality::ToMany => {
                let name = relation.join_column.as_deref().unwrap_or("");
                validate_join_column(name, "join column on the many side")?;
                self.many_side_join_column()?;
            }
            Cardinality::ToManyThrough => {
                let table = relation.join_table.as_deref().unwrap_or("");
                if table.trim().is_empty() {
                    return Err(Error::invalid_argument("join table must not be blank"));
                }
                let root_col = relation.root_join_column.as_deref().unwrap_or("");
                let related_col = relation.related_join_column.as_deref().unwrap_or("");
                validate_join_column(root_col, "root-side join table column")?;
                validate_join_column(related_col, "related-side join table column")?;

                if let Some(columns) = self.join_table {
                    for name in [root_col, related_col] {
                        if columns.column(name).is_none() {
                            return Err(Error::mapping(format!(
                                "join column `{name}` not found in join table `{}`",
                                columns.table
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Appends the per-execution clauses to cached SQL. `where_clause` and
/// `order_by` are bare fragments (the keywords are added here);
/// `limit_offset` is appended verbatim. None of these ever enter the cache.
pub fn append_clauses(
    base: &str,
    where_clause: Option<&str>,
    order_by: Option<&str>,
    limit_offset: Option<&str>,
) -> String {
    let mut sql = base.to_string();
    if let Some(fragment) = where_clause {
        sql.push_str(" WHERE ");
        sql.push_str(fragment);
    }
    if let Some(fragment) = order_by {
        sql.push_str(" ORDER BY ");
        sql.push_str(fragment);
    }
    if let Some(fragment) = limit_offset {
        sql.push(' ');
        sql.push_str(fragment);
    }
    sql
}

/// Appends `<reference>."column" <prefix><column>` pairs for every mapped
/// property.
fn push_columns(sql: &mut String, mapping: &TableMapping, reference: &str, prefix: &str) {
    let mut first = true;
    for property in &mapping.properties {
        if !first {
            sql.push_str(", ");
        }
        first = false;
        push_column_ref(sql, reference, &property.column);
        sql.push(' ');
        sql.push_str(prefix);
        sql.push_str(&property.column);
    }
}

fn push_column_ref(sql: &mut String, reference: &str, column: &str) {
    sql.push_str(reference);
    sql.push('.');
    push_ident(sql, column);
}

fn push_join_table_column(sql: &mut String, column: &str) {
    push_column_ref(sql, JOIN_TABLE_ALIAS, column)
}
