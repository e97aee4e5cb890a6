#![allow(dead_code)]

use relmap::schema::app::{IdMeta, ModelMeta, PropertyMeta};
use relmap::schema::db::{PropertyMapping, TableMapping};
use relmap::stmt::{Type, Value};
use relmap::{Error, Model, Related, Result};

use chrono::NaiveDateTime;

// -----------------------------------------------------------------------------
// Model fixtures
// -----------------------------------------------------------------------------

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Order {
    pub order_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub status: String,
    pub created_on: Option<NaiveDateTime>,
    pub updated_on: Option<NaiveDateTime>,
    pub version: Option<i32>,
    pub customer: Option<Customer>,
    pub lines: Vec<OrderLine>,
    pub products: Vec<Product>,
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
        PropertyMeta::scalar("customer_id", Type::I64),
        PropertyMeta::scalar("status", Type::String),
        PropertyMeta::scalar("created_on", Type::Timestamp),
        PropertyMeta::scalar("updated_on", Type::Timestamp),
        PropertyMeta::scalar("version", Type::I32),
        PropertyMeta::reference("customer", "Customer"),
        PropertyMeta::collection("lines", "OrderLine"),
        PropertyMeta::collection("products", "Product"),
    ],
};

impl Model for Order {
    fn meta() -> &'static ModelMeta {
        &ORDER_META
    }

    fn get_property(&self, name: &str) -> Result<Value> {
        match name {
            "order_id" => Ok(opt_i64(self.order_id)),
            "customer_id" => Ok(opt_i64(self.customer_id)),
            "status" => Ok(Value::String(self.status.clone())),
            "created_on" => Ok(opt_timestamp(self.created_on)),
            "updated_on" => Ok(opt_timestamp(self.updated_on)),
            "version" => Ok(opt_i32(self.version)),
            _ => Err(unknown_property("Order", name)),
        }
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "order_id" => self.order_id = value.to_option_i64()?,
            "customer_id" => self.customer_id = value.to_option_i64()?,
            "status" => self.status = value.to_string()?,
            "created_on" => self.created_on = value.to_option_timestamp()?,
            "updated_on" => self.updated_on = value.to_option_timestamp()?,
            "version" => self.version = value.to_option_i32()?,
            _ => return Err(unknown_property("Order", name)),
        }
        Ok(())
    }

    fn set_related(&mut self, name: &str, related: Related) -> Result<()> {
        match name {
            "customer" => self.customer = Some(related.one()?),
            "lines" => self.lines = related.many()?,
            "products" => self.products = related.many()?,
            _ => return Err(unknown_property("Order", name)),
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Customer {
    pub customer_id: Option<i64>,
    pub name: String,
}

static CUSTOMER_META: ModelMeta = ModelMeta {
    name: "Customer",
    table: Some("customers"),
    id: IdMeta {
        property: "customer_id",
        auto_increment: true,
    },
    properties: &[
        PropertyMeta::scalar("customer_id", Type::I64),
        PropertyMeta::scalar("name", Type::String),
    ],
};

impl Model for Customer {
    fn meta() -> &'static ModelMeta {
        &CUSTOMER_META
    }

    fn get_property(&self, name: &str) -> Result<Value> {
        match name {
            "customer_id" => Ok(opt_i64(self.customer_id)),
            "name" => Ok(Value::String(self.name.clone())),
            _ => Err(unknown_property("Customer", name)),
        }
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "customer_id" => self.customer_id = value.to_option_i64()?,
            "name" => self.name = value.to_string()?,
            _ => return Err(unknown_property("Customer", name)),
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct OrderLine {
    pub order_line_id: Option<i64>,
    pub order_id: Option<i64>,
    pub qty: i32,
}

static ORDER_LINE_META: ModelMeta = ModelMeta {
    name: "OrderLine",
    table: Some("order_lines"),
    id: IdMeta {
        property: "order_line_id",
        auto_increment: true,
    },
    properties: &[
        PropertyMeta::scalar("order_line_id", Type::I64),
        PropertyMeta::scalar("order_id", Type::I64),
        PropertyMeta::scalar("qty", Type::I32),
    ],
};

impl Model for OrderLine {
    fn meta() -> &'static ModelMeta {
        &ORDER_LINE_META
    }

    fn get_property(&self, name: &str) -> Result<Value> {
        match name {
            "order_line_id" => Ok(opt_i64(self.order_line_id)),
            "order_id" => Ok(opt_i64(self.order_id)),
            "qty" => Ok(Value::I32(self.qty)),
            _ => Err(unknown_property("OrderLine", name)),
        }
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "order_line_id" => self.order_line_id = value.to_option_i64()?,
            "order_id" => self.order_id = value.to_option_i64()?,
            "qty" => self.qty = value.to_i32()?,
            _ => return Err(unknown_property("OrderLine", name)),
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Product {
    pub product_id: Option<i64>,
    pub name: String,
    pub orders: Vec<Order>,
}

static PRODUCT_META: ModelMeta = ModelMeta {
    name: "Product",
    table: Some("products"),
    id: IdMeta {
        property: "product_id",
        auto_increment: true,
    },
    properties: &[
        PropertyMeta::scalar("product_id", Type::I64),
        PropertyMeta::scalar("name", Type::String),
        PropertyMeta::collection("orders", "Order"),
    ],
};

impl Model for Product {
    fn meta() -> &'static ModelMeta {
        &PRODUCT_META
    }

    fn get_property(&self, name: &str) -> Result<Value> {
        match name {
            "product_id" => Ok(opt_i64(self.product_id)),
            "name" => Ok(Value::String(self.name.clone())),
            _ => Err(unknown_property("Product", name)),
        }
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "product_id" => self.product_id = value.to_option_i64()?,
            "name" => self.name = value.to_string()?,
            _ => return Err(unknown_property("Product", name)),
        }
        Ok(())
    }

    fn set_related(&mut self, name: &str, related: Related) -> Result<()> {
        match name {
            "orders" => self.orders = related.many()?,
            _ => return Err(unknown_property("Product", name)),
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Construction helpers
// -----------------------------------------------------------------------------

pub fn order(id: i64, customer_id: Option<i64>, status: &str) -> Order {
    Order {
        order_id: Some(id),
        customer_id,
        status: status.to_string(),
        ..Order::default()
    }
}

pub fn customer(id: i64, name: &str) -> Customer {
    Customer {
        customer_id: Some(id),
        name: name.to_string(),
    }
}

pub fn order_line(id: i64, order_id: Option<i64>, qty: i32) -> OrderLine {
    OrderLine {
        order_line_id: Some(id),
        order_id,
        qty,
    }
}

pub fn product(id: i64, name: &str) -> Product {
    Product {
        product_id: Some(id),
        name: name.to_string(),
        orders: Vec::new(),
    }
}

/// Database-side mapping literal, for tests that bypass introspection.
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

pub fn orders_mapping() -> TableMapping {
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

pub fn customers_mapping() -> TableMapping {
    mapping(
        "Customer",
        "customers",
        "customer_id",
        &[("customer_id", Type::I64), ("name", Type::String)],
    )
}

fn opt_i32(value: Option<i32>) -> Value {
    value.map(Value::I32).unwrap_or(Value::Null)
}

fn opt_i64(value: Option<i64>) -> Value {
    value.map(Value::I64).unwrap_or(Value::Null)
}

fn opt_timestamp(value: Option<NaiveDateTime>) -> Value {
    value.map(Value::Timestamp).unwrap_or(Value::Null)
}

fn unknown_property(model: &str, name: &str) -> Error {
    Error::invalid_argument(format!("`{model}` has no property `{name}`"))
}
