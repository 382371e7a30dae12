//! In-memory records: one row, or an unsaved candidate row, of a model.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{RecordError, Result};
use crate::schema::ModelType;
use crate::value::Value;

/// Ordered attribute map, also used for query predicates.
pub type Attributes = IndexMap<String, Value>;

/// One row of a model's table, owned attribute map included.
///
/// Every attribute key belongs to the model's resolved column set; writes
/// through [`Record::set`] enforce this.
#[derive(Debug, Clone)]
pub struct Record {
    model: Arc<ModelType>,
    attributes: Attributes,
}

impl Record {
    pub(crate) fn new(model: Arc<ModelType>) -> Self {
        Record {
            model,
            attributes: Attributes::new(),
        }
    }

    /// The name of the model this record belongs to.
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// The attribute map.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Reads one attribute.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.attributes.get(column)
    }

    /// Writes one attribute, rejecting keys outside the model's columns.
    pub fn set(&mut self, column: &str, value: impl Into<Value>) -> Result<()> {
        let known = self
            .model
            .resolved_columns()
            .is_some_and(|columns| columns.iter().any(|c| c == column));
        if !known {
            return Err(RecordError::UnknownAttribute(column.to_string()));
        }
        self.attributes.insert(column.to_string(), value.into());
        Ok(())
    }

    /// Attribute values in the model's column order, `Null` for columns the
    /// record has no value for.
    ///
    /// This ordering keeps positional SQL placeholders aligned with their
    /// bound values across insert and update statements.
    pub fn attribute_values(&self) -> Vec<Value> {
        match self.model.resolved_columns() {
            Some(columns) => columns
                .iter()
                .map(|c| self.attributes.get(c).cloned().unwrap_or(Value::Null))
                .collect(),
            None => Vec::new(),
        }
    }

    /// The primary key value as an integer, if set.
    pub fn id(&self) -> Option<i64> {
        self.get(self.model.primary_key()).and_then(Value::as_i64)
    }
}
