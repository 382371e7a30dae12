//! Model registry and CRUD operations.
//!
//! [`Db`] owns the connection and the registry of model descriptors; a
//! [`Model`] handle pairs one descriptor with the connection and carries
//! the whole query/CRUD surface.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::conn::{Connection, Row};
use crate::error::{RecordError, Result};
use crate::inflect;
use crate::record::{Attributes, Record};
use crate::schema::{Accessors, ModelType};
use crate::sql::{self, Sql};
use crate::value::Value;

/// Database handle: the connection gateway plus the model registry.
#[derive(Debug)]
pub struct Db {
    conn: Connection,
    models: RwLock<HashMap<String, Arc<ModelType>>>,
}

impl Db {
    /// Wraps an open connection.
    pub fn new(conn: Connection) -> Self {
        Db {
            conn,
            models: RwLock::new(HashMap::new()),
        }
    }

    /// Opens an in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Db::new(Connection::open_in_memory()?))
    }

    /// The underlying connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Registers a model under its conventional table name
    /// (tableized model name). Registering the same model again returns the
    /// existing descriptor.
    pub fn register(&self, name: &str) -> Result<Model<'_>> {
        self.register_model(name, None)
    }

    /// Registers a model with an explicit table name. The override is only
    /// possible here, before any schema access.
    pub fn register_with_table(&self, name: &str, table: &str) -> Result<Model<'_>> {
        self.register_model(name, Some(table))
    }

    /// Looks up a registered model.
    pub fn model(&self, name: &str) -> Result<Model<'_>> {
        self.models
            .read()
            .expect("model registry lock poisoned")
            .get(name)
            .map(|ty| Model {
                db: self,
                ty: ty.clone(),
            })
            .ok_or_else(|| RecordError::ModelNotRegistered(name.to_string()))
    }

    fn register_model(&self, name: &str, table: Option<&str>) -> Result<Model<'_>> {
        let mut models = self.models.write().expect("model registry lock poisoned");
        if let Some(existing) = models.get(name) {
            let requested = match table {
                Some(t) => t.to_string(),
                None => inflect::tableize(name),
            };
            if existing.table_name() != requested {
                return Err(RecordError::AlreadyRegistered(name.to_string()));
            }
            return Ok(Model {
                db: self,
                ty: existing.clone(),
            });
        }

        let ty = Arc::new(ModelType::new(name, table)?);
        models.insert(name.to_string(), ty.clone());
        Ok(Model { db: self, ty })
    }
}

/// Handle over one registered model, bound to its database.
#[derive(Debug, Clone)]
pub struct Model<'db> {
    pub(crate) db: &'db Db,
    pub(crate) ty: Arc<ModelType>,
}

impl<'db> Model<'db> {
    /// The model name.
    pub fn name(&self) -> &str {
        self.ty.name()
    }

    /// The mapped table name.
    pub fn table_name(&self) -> &str {
        self.ty.table_name()
    }

    /// The ordered column list, resolved once from the live table.
    pub fn columns(&self) -> Result<&[String]> {
        self.ty.columns(self.db.conn())
    }

    /// Resolves columns and builds the accessor map. Idempotent.
    pub fn finalize(&self) -> Result<()> {
        self.accessors().map(|_| ())
    }

    /// The generated per-column accessors.
    pub fn accessors(&self) -> Result<&Accessors> {
        self.ty.accessors(self.db.conn())
    }

    /// Creates an empty record for this model.
    pub fn new_record(&self) -> Result<Record> {
        self.finalize()?;
        Ok(Record::new(self.ty.clone()))
    }

    /// Creates a record from raw attribute values, assigning each through
    /// the generated setter. Keys outside the column set fail with
    /// [`RecordError::UnknownAttribute`].
    pub fn build(&self, raw: Attributes) -> Result<Record> {
        let mut record = self.new_record()?;
        let accessors = self.accessors()?;
        for (column, value) in raw {
            let accessor = accessors
                .get(&column)
                .ok_or_else(|| RecordError::UnknownAttribute(column.clone()))?;
            accessor.write(&mut record, value)?;
        }
        Ok(record)
    }

    /// Unconditional `SELECT * FROM <table>`, materialized.
    pub fn all(&self) -> Result<Vec<Record>> {
        let stmt = sql::select_star(self.table_name());
        let rows = self.db.conn().query_sql(&stmt)?;
        self.materialize(rows)
    }

    /// Looks up the row with the given primary key.
    pub fn find(&self, id: impl Into<Value>) -> Result<Option<Record>> {
        let stmt = sql::select_star(self.table_name())
            .append_raw(" WHERE ")
            .append_raw(&sql::quote_ident(self.ty.primary_key()))
            .append_raw(" = ")
            .param(id.into());
        let rows = self.db.conn().query_sql(&stmt)?;
        Ok(self.materialize(rows)?.into_iter().next())
    }

    /// The first row in table order, if any.
    pub fn first(&self) -> Result<Option<Record>> {
        let stmt = sql::select_star(self.table_name()).append_raw(" LIMIT 1");
        let rows = self.db.conn().query_sql(&stmt)?;
        Ok(self.materialize(rows)?.into_iter().next())
    }

    /// Inserts the record, then assigns the generated primary key.
    ///
    /// Columns are written in column order with values from
    /// [`Record::attribute_values`]; the generated id is read after the
    /// statement executes.
    pub fn insert(&self, record: &mut Record) -> Result<()> {
        let columns = self.columns()?;
        let column_list = columns
            .iter()
            .map(|c| sql::quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; columns.len()].join(", ");
        let stmt = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            sql::quote_ident(self.table_name()),
            column_list,
            placeholders
        );
        self.db.conn().run(&stmt, &record.attribute_values())?;

        let id = self.db.conn().last_insert_id();
        record.set(self.ty.primary_key(), Value::Integer(id))
    }

    /// Updates every non-key column of the record's row.
    ///
    /// Bind order contract: non-key values in column order, then the key
    /// value last.
    pub fn update(&self, record: &Record) -> Result<()> {
        let pk = self.ty.primary_key();
        let columns = self.columns()?;

        let mut assignments = Vec::with_capacity(columns.len());
        let mut params = Vec::with_capacity(columns.len());
        for (column, value) in columns.iter().zip(record.attribute_values()) {
            if column == pk {
                continue;
            }
            assignments.push(format!("{} = ?", sql::quote_ident(column)));
            params.push(value);
        }
        params.push(record.get(pk).cloned().unwrap_or(Value::Null));

        let stmt = format!(
            "UPDATE {} SET {} WHERE {} = ?",
            sql::quote_ident(self.table_name()),
            assignments.join(", "),
            sql::quote_ident(pk)
        );
        self.db.conn().run(&stmt, &params)?;
        Ok(())
    }

    /// Updates if a row with the record's primary key exists, else inserts.
    ///
    /// The existence check and the write are separate statements; a
    /// concurrent writer can slip between them. Accepted limitation.
    pub fn save(&self, record: &mut Record) -> Result<()> {
        let exists = match record.get(self.ty.primary_key()) {
            Some(v) if !v.is_null() => self.find(v.clone())?.is_some(),
            _ => false,
        };
        if exists {
            self.update(record)
        } else {
            self.insert(record)
        }
    }

    /// Converts raw result rows into records of this model.
    pub(crate) fn materialize(&self, rows: Vec<Row>) -> Result<Vec<Record>> {
        rows.into_iter().map(|row| self.build(row)).collect()
    }

    pub(crate) fn where_stmt(&self, predicates: &Attributes) -> Result<Sql> {
        Ok(sql::select_star(self.table_name())
            .append_raw(" WHERE ")
            .append(sql::eq_predicates(predicates)?))
    }
}
