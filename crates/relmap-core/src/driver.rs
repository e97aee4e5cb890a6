mod introspect;
pub use introspect::{ColumnInfo, SchemaIntrospector};

mod params;
pub use params::Params;

mod row;
pub use row::Row;

use crate::{async_trait, Result};

use std::fmt::Debug;

/// Result of a statement that modifies rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecuteResult {
    /// Number of rows the statement affected.
    pub affected: u64,

    /// Key generated by the database for an auto-increment insert, when the
    /// driver can report one.
    pub last_insert_id: Option<i64>,
}

/// The statement execution facility.
///
/// relmap builds SQL text and hands it here together with positional or
/// named parameters; connection management, pooling, transactions, and
/// timeouts are all owned by the implementation.
#[async_trait]
pub trait Executor: Debug + Send + Sync + 'static {
    /// Execute a query and return its rows.
    async fn query(&self, sql: &str, params: &Params) -> Result<Vec<Row>>;

    /// Execute a statement that modifies rows.
    async fn execute(&self, sql: &str, params: &Params) -> Result<ExecuteResult>;
}
