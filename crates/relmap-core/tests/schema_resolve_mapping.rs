use relmap_core::async_trait;
use relmap_core::driver::{ColumnInfo, SchemaIntrospector};
use relmap_core::schema::app::{IdMeta, ModelMeta, PropertyMeta};
use relmap_core::schema::MappingRegistry;
use relmap_core::stmt::Type;
use relmap_core::Result;

use std::collections::HashMap;

/// Introspector backed by an in-memory catalog.
#[derive(Debug, Default)]
struct Catalog {
    tables: HashMap<String, Vec<ColumnInfo>>,
}

impl Catalog {
    fn with_table(mut self, name: &str, columns: &[(&str, Type)]) -> Self {
        self.tables.insert(
            name.to_string(),
            columns
                .iter()
                .map(|(name, ty)| ColumnInfo::new(*name, *ty))
                .collect(),
        );
        self
    }
}

#[async_trait]
impl SchemaIntrospector for Catalog {
    async fn columns_of(&self, schema: Option<&str>, table: &str) -> Result<Vec<ColumnInfo>> {
        let key = match schema {
            Some(schema) => format!("{schema}.{table}"),
            None => table.to_string(),
        };
        Ok(self.tables.get(&key).cloned().unwrap_or_default())
    }
}

static ORDER_META: ModelMeta = ModelMeta {
    name: "Order",
    table: Some("orders"),
    id: IdMeta {
        property: "order_id",
        auto_increment: true,
    },
    properties: &[
        PropertyMeta::scalar("order_id", Type::I64),
        PropertyMeta::scalar("status", Type::String),
        PropertyMeta::scalar("transient_note", Type::String),
        PropertyMeta::collection("lines", "OrderLine"),
    ],
};

static CUSTOMER_META: ModelMeta = ModelMeta {
    name: "Customer",
    table: None,
    id: IdMeta {
        property: "customer_id",
        auto_increment: true,
    },
    properties: &[
        PropertyMeta::scalar("customer_id", Type::I64),
        PropertyMeta::scalar("name", Type::String),
    ],
};

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn resolve_drops_unmatched_properties() {
    let catalog = Catalog::default().with_table(
        "orders",
        &[("order_id", Type::I64), ("status", Type::String)],
    );
    let registry = MappingRegistry::new();

    let mapping = registry.resolve(&ORDER_META, None, &catalog).await.unwrap();

    assert_eq!(mapping.table, "orders");
    assert_eq!(mapping.id_column, "order_id");
    assert!(mapping.id_auto_increment);
    // `transient_note` matched no column and the collection property is not
    // column-backed; neither may appear in the mapping.
    let properties: Vec<_> = mapping.properties.iter().map(|p| p.property).collect();
    assert_eq!(properties, ["order_id", "status"]);
}

#[tokio::test]
async fn derived_table_name_is_snake_cased_type_name() {
    let catalog = Catalog::default().with_table(
        "customer",
        &[("customer_id", Type::I64), ("name", Type::String)],
    );
    let registry = MappingRegistry::new();

    let mapping = registry
        .resolve(&CUSTOMER_META, None, &catalog)
        .await
        .unwrap();
    assert_eq!(mapping.table, "customer");
}

#[tokio::test]
async fn schema_prefix_scopes_introspection() {
    let catalog = Catalog::default().with_table(
        "app.orders",
        &[("order_id", Type::I64), ("status", Type::String)],
    );
    let registry = MappingRegistry::new();

    let mapping = registry
        .resolve(&ORDER_META, Some("app"), &catalog)
        .await
        .unwrap();
    assert_eq!(mapping.schema.as_deref(), Some("app"));
    assert_eq!(mapping.table, "orders");
}

// ---------------------------------------------------------------------------
// Case fallback
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upper_case_fallback_for_table_and_columns() {
    let catalog = Catalog::default().with_table(
        "ORDERS",
        &[("ORDER_ID", Type::I64), ("STATUS", Type::String)],
    );
    let registry = MappingRegistry::new();

    let mapping = registry.resolve(&ORDER_META, None, &catalog).await.unwrap();

    assert_eq!(mapping.table, "ORDERS");
    assert_eq!(mapping.id_column, "ORDER_ID");
    assert_eq!(mapping.column_for("status"), Some("STATUS"));
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_table_is_a_mapping_error() {
    let registry = MappingRegistry::new();
    let err = registry
        .resolve(&ORDER_META, None, &Catalog::default())
        .await
        .unwrap_err();

    assert!(err.is_mapping());
    assert!(err.to_string().contains("orders"), "{err}");
}

#[tokio::test]
async fn id_without_matching_column_is_a_mapping_error() {
    let catalog = Catalog::default().with_table("orders", &[("status", Type::String)]);
    let registry = MappingRegistry::new();

    let err = registry
        .resolve(&ORDER_META, None, &catalog)
        .await
        .unwrap_err();
    assert!(err.is_mapping());
    assert!(err.to_string().contains("order_id"), "{err}");
}

// ---------------------------------------------------------------------------
// Caching
// ---------------------------------------------------------------------------

#[tokio::test]
async fn resolution_is_cached_and_clearable() {
    let catalog = Catalog::default().with_table(
        "orders",
        &[("order_id", Type::I64), ("status", Type::String)],
    );
    let registry = MappingRegistry::new();
    assert!(registry.is_empty());

    let first = registry.resolve(&ORDER_META, None, &catalog).await.unwrap();
    let second = registry.resolve(&ORDER_META, None, &catalog).await.unwrap();

    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(registry.len(), 1);

    registry.clear();
    assert!(registry.is_empty());
    assert!(registry.get("Order").is_none());
}

#[tokio::test]
async fn join_table_columns_are_cached_with_fallback() {
    let catalog =
        Catalog::default().with_table("ORDER_PRODUCT", &[("order_id", Type::I64), ("product_id", Type::I64)]);
    let registry = MappingRegistry::new();

    let columns = registry
        .table_columns("order_product", None, &catalog)
        .await
        .unwrap();
    assert_eq!(columns.table, "ORDER_PRODUCT");
    assert!(columns.column("order_id").is_some());
    assert!(columns.column("missing").is_none());
}
