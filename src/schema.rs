//! Per-model schema metadata: table name, introspected columns, generated
//! accessors, and the association catalog.
//!
//! Each [`ModelType`] is shared process-wide through the registry in
//! [`crate::model::Db`]. The column list and accessor map populate once,
//! behind a single initialization barrier, and are immutable afterwards;
//! the table structure is assumed fixed for the process lifetime.

use std::fmt;
use std::sync::RwLock;

use indexmap::IndexMap;
use once_cell::sync::OnceCell;

use crate::assoc::AssociationSpec;
use crate::conn::Connection;
use crate::error::{RecordError, Result};
use crate::inflect;
use crate::record::Record;
use crate::sql;
use crate::value::Value;

/// The primary key column. Composite keys are out of scope.
pub const PRIMARY_KEY: &str = "id";

/// Runtime descriptor for one mapped table.
#[derive(Debug)]
pub struct ModelType {
    name: String,
    table_name: String,
    columns: OnceCell<Vec<String>>,
    accessors: OnceCell<Accessors>,
    associations: RwLock<IndexMap<String, AssociationSpec>>,
}

impl ModelType {
    /// Creates a descriptor. `table` overrides the tableized default; the
    /// override window closes here, before any schema access.
    pub(crate) fn new(name: &str, table: Option<&str>) -> Result<Self> {
        let table_name = match table {
            Some(t) => t.to_string(),
            None => inflect::tableize(name),
        };
        sql::ensure_identifier(&table_name)?;
        Ok(ModelType {
            name: name.to_string(),
            table_name,
            columns: OnceCell::new(),
            accessors: OnceCell::new(),
            associations: RwLock::new(IndexMap::new()),
        })
    }

    /// The model name, e.g. `"Human"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The mapped table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// The primary key column name.
    pub fn primary_key(&self) -> &'static str {
        PRIMARY_KEY
    }

    /// The ordered column list, introspected from the live table on first
    /// call and cached for the lifetime of the descriptor.
    pub fn columns(&self, conn: &Connection) -> Result<&[String]> {
        let columns = self.columns.get_or_try_init(|| self.introspect(conn))?;
        Ok(columns.as_slice())
    }

    /// The cached column list, if already resolved.
    pub fn resolved_columns(&self) -> Option<&[String]> {
        self.columns.get().map(Vec::as_slice)
    }

    /// The per-column accessor map, built once from the resolved columns.
    /// Repeated calls return the same map.
    pub fn accessors(&self, conn: &Connection) -> Result<&Accessors> {
        let columns = self.columns(conn)?;
        Ok(self.accessors.get_or_init(|| Accessors::build(columns)))
    }

    fn introspect(&self, conn: &Connection) -> Result<Vec<String>> {
        let pragma = format!("PRAGMA table_info({})", sql::quote_ident(&self.table_name));
        let rows = conn
            .query(&pragma, &[])
            .map_err(|err| RecordError::SchemaResolution {
                table: self.table_name.clone(),
                reason: err.to_string(),
            })?;
        if rows.is_empty() {
            return Err(RecordError::SchemaResolution {
                table: self.table_name.clone(),
                reason: "table does not exist".to_string(),
            });
        }

        let mut columns = Vec::with_capacity(rows.len());
        for row in &rows {
            match row.get("name").and_then(|v| v.as_str()) {
                Some(name) => columns.push(name.to_string()),
                None => {
                    return Err(RecordError::SchemaResolution {
                        table: self.table_name.clone(),
                        reason: "malformed table_info row".to_string(),
                    });
                }
            }
        }
        Ok(columns)
    }

    /// Registers an association spec. Re-registering a name replaces the
    /// earlier spec.
    pub(crate) fn add_association(&self, name: &str, spec: AssociationSpec) {
        self.associations
            .write()
            .expect("association catalog lock poisoned")
            .insert(name.to_string(), spec);
    }

    /// Looks up an association spec by name.
    pub fn association(&self, name: &str) -> Option<AssociationSpec> {
        self.associations
            .read()
            .expect("association catalog lock poisoned")
            .get(name)
            .cloned()
    }
}

//------------------------------------------------------------------------------
// Generated accessors
//------------------------------------------------------------------------------

type Getter = Box<dyn Fn(&Record) -> Option<Value> + Send + Sync>;
type Setter = Box<dyn Fn(&mut Record, Value) -> Result<()> + Send + Sync>;

/// A generated getter/setter pair for one column.
pub struct Accessor {
    getter: Getter,
    setter: Setter,
}

impl Accessor {
    /// Reads the column value from a record.
    pub fn read(&self, record: &Record) -> Option<Value> {
        (self.getter)(record)
    }

    /// Writes the column value into a record. Fails with
    /// [`RecordError::UnknownAttribute`] if the record's model does not
    /// carry the column.
    pub fn write(&self, record: &mut Record, value: Value) -> Result<()> {
        (self.setter)(record, value)
    }
}

/// Capability map from column name to generated accessor, in column order.
pub struct Accessors {
    map: IndexMap<String, Accessor>,
}

impl Accessors {
    fn build(columns: &[String]) -> Self {
        let mut map = IndexMap::with_capacity(columns.len());
        for column in columns {
            let read_column = column.clone();
            let write_column = column.clone();
            map.insert(
                column.clone(),
                Accessor {
                    getter: Box::new(move |record| record.get(&read_column).cloned()),
                    setter: Box::new(move |record, value| record.set(&write_column, value)),
                },
            );
        }
        Accessors { map }
    }

    /// The accessor for `column`, if the column exists.
    pub fn get(&self, column: &str) -> Option<&Accessor> {
        self.map.get(column)
    }

    /// Number of column accessors.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True if no accessors were generated.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl fmt::Debug for Accessors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Accessors")
            .field(&self.map.keys().collect::<Vec<_>>())
            .finish()
    }
}
