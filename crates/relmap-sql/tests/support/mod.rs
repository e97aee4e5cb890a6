#![allow(dead_code)]

use relmap_core::schema::db::{PropertyMapping, TableMapping};
use relmap_core::schema::{Cardinality, Relation};
use relmap_core::stmt::Type;

pub fn mapping(
    model: &'static str,
    table: &str,
    id_property: &'static str,
    columns: &[(&'static str, Type)],
) -> TableMapping {
    TableMapping {
        model,
        schema: None,
        table: table.to_string(),
        id_property,
        id_column: id_property.to_string(),
        id_auto_increment: true,
        properties: columns
            .iter()
            .map(|(name, ty)| PropertyMapping {
                property: name,
                column: name.to_string(),
                ty: *ty,
            })
            .collect(),
    }
}

pub fn orders() -> TableMapping {
    mapping(
        "Order",
        "orders",
        "order_id",
        &[
            ("order_id", Type::I64),
            ("customer_id", Type::I64),
            ("status", Type::String),
        ],
    )
}

pub fn customers() -> TableMapping {
    mapping(
        "Customer",
        "customers",
        "customer_id",
        &[("customer_id", Type::I64), ("name", Type::String)],
    )
}

pub fn order_lines() -> TableMapping {
    mapping(
        "OrderLine",
        "order_lines",
        "order_line_id",
        &[
            ("order_line_id", Type::I64),
            ("order_id", Type::I64),
            ("qty", Type::I32),
        ],
    )
}

pub fn products() -> TableMapping {
    mapping(
        "Product",
        "products",
        "product_id",
        &[("product_id", Type::I64), ("name", Type::String)],
    )
}

pub fn to_one(
    related_model: &'static str,
    alias: Option<&str>,
    join_column: &str,
    target: &str,
) -> Relation {
    Relation {
        cardinality: Cardinality::ToOne,
        related_model,
        related_alias: alias.map(str::to_string),
        join_column: Some(join_column.to_string()),
        join_table: None,
        root_join_column: None,
        related_join_column: None,
        target_property: target.to_string(),
    }
}

pub fn to_many(
    related_model: &'static str,
    alias: Option<&str>,
    join_column: &str,
    target: &str,
) -> Relation {
    Relation {
        cardinality: Cardinality::ToMany,
        related_model,
        related_alias: alias.map(str::to_string),
        join_column: Some(join_column.to_string()),
        join_table: None,
        root_join_column: None,
        related_join_column: None,
        target_property: target.to_string(),
    }
}

pub fn through(
    related_model: &'static str,
    alias: Option<&str>,
    join_table: &str,
    root_join_column: &str,
    related_join_column: &str,
    target: &str,
) -> Relation {
    Relation {
        cardinality: Cardinality::ToManyThrough,
        related_model,
        related_alias: alias.map(str::to_string),
        join_column: None,
        join_table: Some(join_table.to_string()),
        root_join_column: Some(root_join_column.to_string()),
        related_join_column: Some(related_join_column.to_string()),
        target_property: target.to_string(),
    }
}
