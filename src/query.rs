//! Declarative query surface: predicate filters and convention joins.

use crate::error::{RecordError, Result};
use crate::inflect;
use crate::model::Model;
use crate::record::{Attributes, Record};
use crate::sql::{self, Sql};

impl<'db> Model<'db> {
    /// `SELECT * FROM <table> WHERE <c1> = ? AND <c2> = ? …` with
    /// placeholders in predicate-map order and values bound in the same
    /// order. Result order is whatever the driver returns.
    ///
    /// An empty predicate map is rejected; unconditional scans go through
    /// [`Model::all`].
    pub fn r#where(&self, predicates: &Attributes) -> Result<Vec<Record>> {
        if predicates.is_empty() {
            return Err(RecordError::EmptyPredicates);
        }
        let stmt = self.where_stmt(predicates)?;
        let rows = self.db.conn().query_sql(&stmt)?;
        self.materialize(rows)
    }

    /// Inner join against `other_table` on the convention
    /// `<this>.id = <other>.<singularized other>_id`, selecting only this
    /// model's columns so rows materialize into this model.
    ///
    /// The joined table name is validated as a bare identifier and
    /// interpolated; identifiers cannot be bound as parameters.
    pub fn join(&self, other_table: &str) -> Result<Vec<Record>> {
        sql::ensure_identifier(other_table)?;

        let this = sql::quote_ident(self.table_name());
        let other = sql::quote_ident(other_table);
        let pk = sql::quote_ident(self.ty.primary_key());
        let join_key = sql::quote_ident(&format!("{}_id", inflect::singularize(other_table)));

        let stmt = Sql::raw(format!(
            "SELECT {this}.* FROM {this} JOIN {other} ON {this}.{pk} = {other}.{join_key}"
        ));
        let rows = self.db.conn().query_sql(&stmt)?;
        self.materialize(rows)
    }
}
