//! Connection gateway over rusqlite.
//!
//! Every statement runs synchronously on the wrapped connection; failures
//! propagate immediately with no retry. Result rows come back as ordered
//! column-to-value maps so callers never deal in positional indexes.

use std::path::Path;

use indexmap::IndexMap;
use rusqlite::params_from_iter;

use crate::error::Result;
use crate::recordlite_trace_query;
use crate::sql::Sql;
use crate::value::Value;

/// One result row: column name to value, in result-set column order.
pub type Row = IndexMap<String, Value>;

/// Synchronous SQLite connection wrapper.
#[derive(Debug)]
pub struct Connection {
    inner: rusqlite::Connection,
}

impl Connection {
    /// Opens a database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Connection {
            inner: rusqlite::Connection::open(path)?,
        })
    }

    /// Opens an in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Connection {
            inner: rusqlite::Connection::open_in_memory()?,
        })
    }

    /// Gets a reference to the underlying connection.
    pub fn inner(&self) -> &rusqlite::Connection {
        &self.inner
    }

    /// Executes a parameterized statement and returns every row as a map.
    ///
    /// `params` bind positionally to `?` placeholders in call order.
    pub fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        recordlite_trace_query!(sql, params.len());
        let mut stmt = self.inner.prepare(sql)?;
        let names: Vec<String> = stmt.column_names().iter().map(|n| n.to_string()).collect();

        let mut rows = stmt.query(params_from_iter(params.iter()))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut map = Row::with_capacity(names.len());
            for (i, name) in names.iter().enumerate() {
                map.insert(name.clone(), row.get::<_, Value>(i)?);
            }
            out.push(map);
        }
        Ok(out)
    }

    /// Executes a parameterized DML statement, returning the affected row
    /// count.
    pub fn run(&self, sql: &str, params: &[Value]) -> Result<usize> {
        recordlite_trace_query!(sql, params.len());
        Ok(self.inner.execute(sql, params_from_iter(params.iter()))?)
    }

    /// Executes a built [`Sql`] fragment as a query.
    pub fn query_sql(&self, sql: &Sql) -> Result<Vec<Row>> {
        self.query(sql.sql(), sql.params())
    }

    /// Executes a built [`Sql`] fragment as DML.
    pub fn run_sql(&self, sql: &Sql) -> Result<usize> {
        self.run(sql.sql(), sql.params())
    }

    /// Prepares `sql` and returns its result column names without executing.
    pub fn columns_of(&self, sql: &str) -> Result<Vec<String>> {
        let stmt = self.inner.prepare(sql)?;
        Ok(stmt.column_names().iter().map(|n| n.to_string()).collect())
    }

    /// The primary key generated by the most recent insert on this
    /// connection.
    pub fn last_insert_id(&self) -> i64 {
        self.inner.last_insert_rowid()
    }

    /// Runs a batch of semicolon-separated statements, e.g. a seed script.
    pub fn batch(&self, sql: &str) -> Result<()> {
        Ok(self.inner.execute_batch(sql)?)
    }
}

impl From<rusqlite::Connection> for Connection {
    fn from(inner: rusqlite::Connection) -> Self {
        Connection { inner }
    }
}
