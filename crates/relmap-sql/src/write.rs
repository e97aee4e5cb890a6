use crate::{push_ident, push_qualified};

use relmap_core::schema::db::TableMapping;

/// Builds `INSERT INTO t (c1, c2, …) VALUES (?, ?, …)` for the given
/// columns, in the order given.
pub fn insert(mapping: &TableMapping, columns: &[&str]) -> String {
    let mut sql = String::from("INSERT INTO ");
    push_qualified(&mut sql, mapping.schema.as_deref(), &mapping.table);
    sql.push_str(" (");
    for (index, column) in columns.iter().enumerate() {
        if index > 0 {
            sql.push_str(", ");
        }
        push_ident(&mut sql, column);
    }
    sql.push_str(") VALUES (");
    for index in 0..columns.len() {
        if index > 0 {
            sql.push_str(", ");
        }
        sql.push('?');
    }
    sql.push(')');
    sql
}

/// Builds `UPDATE t SET c1 = ?, … WHERE id = ?`, optionally guarded by
/// `AND version = ?` for optimistic locking.
pub fn update(mapping: &TableMapping, set_columns: &[&str], version_column: Option<&str>) -> String {
    let mut sql = String::from("UPDATE ");
    push_qualified(&mut sql, mapping.schema.as_deref(), &mapping.table);
    sql.push_str(" SET ");
    for (index, column) in set_columns.iter().enumerate() {
        if index > 0 {
            sql.push_str(", ");
        }
        push_ident(&mut sql, column);
        sql.push_str(" = ?");
    }
    sql.push_str(" WHERE ");
    push_ident(&mut sql, &mapping.id_column);
    sql.push_str(" = ?");
    if let Some(version) = version_column {
        sql.push_str(" AND ");
        push_ident(&mut sql, version);
        sql.push_str(" = ?");
    }
    sql
}

/// Builds `DELETE FROM t WHERE id = ?`.
pub fn delete_by_id(mapping: &TableMapping) -> String {
    let mut sql = String::from("DELETE FROM ");
    push_qualified(&mut sql, mapping.schema.as_deref(), &mapping.table);
    sql.push_str(" WHERE ");
    push_ident(&mut sql, &mapping.id_column);
    sql.push_str(" = ?");
    sql
}
