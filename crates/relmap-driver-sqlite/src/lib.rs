mod value;
use value::Value;

use relmap_core::driver::{
    ColumnInfo, ExecuteResult, Executor, Params, Row, SchemaIntrospector,
};
use relmap_core::stmt::Type;
use relmap_core::{async_trait, Error, Result};

use rusqlite::types::Value as SqlValue;
use rusqlite::Connection as RusqliteConnection;

use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// SQLite database connection implementing both driver facilities.
///
/// rusqlite connections are synchronous and not `Sync`, so the connection
/// sits behind an async mutex; clones share it. Statements are serialized,
/// which matches SQLite's own single-writer model.
#[derive(Debug, Clone)]
pub struct SqliteConnection {
    connection: Arc<Mutex<RusqliteConnection>>,
}

impl SqliteConnection {
    pub fn open_in_memory() -> Result<Self> {
        let connection = RusqliteConnection::open_in_memory().map_err(Error::driver)?;
        Ok(Self::from_rusqlite(connection))
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = RusqliteConnection::open(path).map_err(Error::driver)?;
        Ok(Self::from_rusqlite(connection))
    }

    pub fn from_rusqlite(connection: RusqliteConnection) -> Self {
        Self {
            connection: Arc::new(Mutex::new(connection)),
        }
    }

    /// Runs one statement outside the mapper, for schema setup and fixtures.
    pub async fn execute_raw(&self, sql: &str) -> Result<()> {
        let connection = self.connection.lock().await;
        connection.execute_batch(sql).map_err(Error::driver)
    }
}

#[async_trait]
impl Executor for SqliteConnection {
    async fn query(&self, sql: &str, params: &Params) -> Result<Vec<Row>> {
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare_cached(sql).map_err(Error::driver)?;

        let columns = Row::columns_from(statement.column_names());
        let width = columns.len();

        let mut raw = bind(&mut statement, params)?;
        let mut rows = Vec::new();
        loop {
            match raw.next() {
                Ok(Some(row)) => {
                    let mut values = Vec::with_capacity(width);
                    for index in 0..width {
                        let value: SqlValue = row.get(index).map_err(Error::driver)?;
                        values.push(Value::from_sql(value).into_inner());
                    }
                    rows.push(Row::new(columns.clone(), values));
                }
                Ok(None) => break,
                Err(err) => return Err(Error::driver(err)),
            }
        }

        tracing::trace!(rows = rows.len(), "query returned");
        Ok(rows)
    }

    async fn execute(&self, sql: &str, params: &Params) -> Result<ExecuteResult> {
        let connection = self.connection.lock().await;
        let affected = {
            let mut statement = connection.prepare_cached(sql).map_err(Error::driver)?;
            match params {
                Params::None => statement.execute([]).map_err(Error::driver)?,
                Params::Positional(values) => {
                    let bound: Vec<Value> = values.iter().cloned().map(Value::from).collect();
                    statement
                        .execute(rusqlite::params_from_iter(bound.iter()))
                        .map_err(Error::driver)?
                }
                Params::Named(values) => {
                    let bound: Vec<(String, Value)> = values
                        .iter()
                        .map(|(name, value)| (format!(":{name}"), Value::from(value.clone())))
                        .collect();
                    let refs: Vec<(&str, &dyn rusqlite::types::ToSql)> = bound
                        .iter()
                        .map(|(name, value)| (name.as_str(), value as &dyn rusqlite::types::ToSql))
                        .collect();
                    statement.execute(&refs[..]).map_err(Error::driver)?
                }
            }
        };

        let last_insert_id = is_insert(sql).then(|| connection.last_insert_rowid());
        Ok(ExecuteResult {
            affected: affected as u64,
            last_insert_id,
        })
    }
}

#[async_trait]
impl SchemaIntrospector for SqliteConnection {
    async fn columns_of(&self, schema: Option<&str>, table: &str) -> Result<Vec<ColumnInfo>> {
        let connection = self.connection.lock().await;

        // SQLite attaches schemas per connection; a configured schema name
        // scopes the pragma, otherwise the main database is searched.
        let sql = match schema {
            Some(schema) => format!(
                "SELECT name, type FROM {}.pragma_table_info(?)",
                quote(schema)
            ),
            None => String::from("SELECT name, type FROM pragma_table_info(?)"),
        };

        let mut statement = connection.prepare_cached(&sql).map_err(Error::driver)?;
        let mut raw = statement.query([table]).map_err(Error::driver)?;

        let mut columns = Vec::new();
        while let Some(row) = raw.next().map_err(Error::driver)? {
            let name: String = row.get(0).map_err(Error::driver)?;
            let declared: String = row.get(1).map_err(Error::driver)?;
            columns.push(ColumnInfo::new(name, type_from_declared(&declared)));
        }
        Ok(columns)
    }
}

fn bind<'s>(
    statement: &'s mut rusqlite::CachedStatement<'_>,
    params: &Params,
) -> Result<rusqlite::Rows<'s>> {
    match params {
        Params::None => statement.query([]).map_err(Error::driver),
        Params::Positional(values) => {
            let bound: Vec<Value> = values.iter().cloned().map(Value::from).collect();
            statement
                .query(rusqlite::params_from_iter(bound.iter()))
                .map_err(Error::driver)
        }
        Params::Named(values) => {
            for (name, value) in values {
                let index = statement
                    .parameter_index(&format!(":{name}"))
                    .map_err(Error::driver)?
                    .ok_or_else(|| {
                        Error::invalid_argument(format!("unknown named parameter `{name}`"))
                    })?;
                statement
                    .raw_bind_parameter(index, Value::from(value.clone()))
                    .map_err(Error::driver)?;
            }
            Ok(statement.raw_query())
        }
    }
}

/// Maps a declared column type to the core type system following SQLite's
/// affinity rules, extended with date/time and boolean names.
fn type_from_declared(declared: &str) -> Type {
    let upper = declared.to_ascii_uppercase();
    if upper.contains("INT") {
        Type::I64
    } else if upper.contains("BOOL") {
        Type::Bool
    } else if upper.contains("DATE") || upper.contains("TIME") {
        Type::Timestamp
    } else if upper.contains("CHAR") || upper.contains("CLOB") || upper.contains("TEXT") {
        Type::String
    } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
        Type::F64
    } else if upper.is_empty() || upper.contains("BLOB") {
        Type::Bytes
    } else {
        // NUMERIC affinity and anything else not matched above.
        Type::F64
    }
}

fn is_insert(sql: &str) -> bool {
    sql.trim_start()
        .get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("insert"))
}

fn quote(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
