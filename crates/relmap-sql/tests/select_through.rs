mod support;

use pretty_assertions::assert_eq;
use relmap_core::driver::ColumnInfo;
use relmap_core::schema::TableColumns;
use relmap_core::stmt::Type;
use relmap_sql::SelectBuilder;
use support::{orders, products, through};

fn join_table() -> TableColumns {
    TableColumns {
        table: "order_product".to_string(),
        columns: vec![
            ColumnInfo::new("order_id", Type::I64),
            ColumnInfo::new("product_id", Type::I64),
        ],
    }
}

#[test]
fn through_joins_root_to_join_table_to_related() {
    let orders = orders();
    let products = products();
    let relation = through(
        "Product",
        Some("p"),
        "order_product",
        "order_id",
        "product_id",
        "products",
    );
    let jt = join_table();
    let builder = SelectBuilder::new(&orders, Some("o"))
        .relation(&relation, &products)
        .join_table(&jt);

    assert_eq!(
        builder.build().unwrap(),
        r#"SELECT o."order_id" o_order_id, o."customer_id" o_customer_id, o."status" o_status, p."product_id" p_product_id, p."name" p_name, jt."order_id" jt_order_id, jt."product_id" jt_product_id FROM "orders" o LEFT JOIN "order_product" jt ON jt."order_id" = o."order_id" LEFT JOIN "products" p ON jt."product_id" = p."product_id""#
    );
}

#[test]
fn through_related_select_is_driven_by_the_join_table() {
    let orders = orders();
    let products = products();
    let relation = through(
        "Product",
        Some("p"),
        "order_product",
        "order_id",
        "product_id",
        "products",
    );
    let jt = join_table();
    let builder = SelectBuilder::new(&orders, Some("o"))
        .relation(&relation, &products)
        .join_table(&jt);

    assert_eq!(
        builder.build_through_related().unwrap(),
        r#"SELECT p."product_id" p_product_id, p."name" p_name, jt."order_id" jt_order_id, jt."product_id" jt_product_id FROM "order_product" jt LEFT JOIN "products" p ON jt."product_id" = p."product_id""#
    );
}

#[test]
fn schema_qualified_join_table_is_quoted_per_part() {
    let orders = orders();
    let products = products();
    let relation = through(
        "Product",
        Some("p"),
        "app.order_product",
        "order_id",
        "product_id",
        "products",
    );
    let builder = SelectBuilder::new(&orders, Some("o")).relation(&relation, &products);

    let sql = builder.build().unwrap();
    assert!(sql.contains(r#"LEFT JOIN "app"."order_product" jt"#), "{sql}");
}

#[test]
fn dotted_through_join_column_is_an_invalid_query_error() {
    let orders = orders();
    let products = products();
    let relation = through(
        "Product",
        Some("p"),
        "order_product",
        "jt.order_id",
        "product_id",
        "products",
    );
    let err = SelectBuilder::new(&orders, Some("o"))
        .relation(&relation, &products)
        .build()
        .unwrap_err();

    assert!(err.is_invalid_query());
    assert!(err.to_string().contains("invalid join column"), "{err}");
}

#[test]
fn join_column_missing_from_join_table_is_a_mapping_error() {
    let orders = orders();
    let products = products();
    let relation = through(
        "Product",
        Some("p"),
        "order_product",
        "order_id",
        "wrong_col",
        "products",
    );
    let jt = join_table();
    let err = SelectBuilder::new(&orders, Some("o"))
        .relation(&relation, &products)
        .join_table(&jt)
        .build()
        .unwrap_err();

    assert!(err.is_mapping());
    assert!(err.to_string().contains("wrong_col"), "{err}");
}
