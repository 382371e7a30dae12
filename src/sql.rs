//! Runtime SQL fragments with positional parameter tracking.
//!
//! A [`Sql`] keeps the statement text and the values bound to its `?`
//! placeholders side by side, so the placeholder order and the bind order
//! cannot drift apart while a statement is being assembled.

use smallvec::SmallVec;

use crate::error::{RecordError, Result};
use crate::record::Attributes;
use crate::value::Value;

/// A SQL statement or fragment with parameters.
#[derive(Debug, Clone, Default)]
pub struct Sql {
    text: String,
    params: SmallVec<[Value; 4]>,
}

impl Sql {
    /// Creates a new empty SQL fragment.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a fragment from raw SQL text with no parameters.
    pub fn raw(text: impl Into<String>) -> Self {
        Sql {
            text: text.into(),
            params: SmallVec::new(),
        }
    }

    /// Appends raw SQL text.
    pub fn append_raw(mut self, text: &str) -> Self {
        self.text.push_str(text);
        self
    }

    /// Appends another fragment, carrying its parameters over in order.
    pub fn append(mut self, other: Sql) -> Self {
        self.text.push_str(&other.text);
        self.params.extend(other.params);
        self
    }

    /// Appends a `?` placeholder and binds `value` to it.
    pub fn param(mut self, value: Value) -> Self {
        self.text.push('?');
        self.params.push(value);
        self
    }

    /// Joins fragments with a separator, concatenating their parameters.
    pub fn join(parts: impl IntoIterator<Item = Sql>, separator: &str) -> Self {
        let mut out = Sql::empty();
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                out.text.push_str(separator);
            }
            out = out.append(part);
        }
        out
    }

    /// The statement text.
    pub fn sql(&self) -> &str {
        &self.text
    }

    /// The bound parameters, in placeholder order.
    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

//------------------------------------------------------------------------------
// Identifier handling
//------------------------------------------------------------------------------

/// Returns true if `name` is a bare SQL identifier: ASCII alphanumerics and
/// underscores, not starting with a digit.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validates `name` as a bare identifier.
///
/// Table and column names are interpolated into statement text, never bound
/// as parameters; parameter binding only covers literal values.
pub fn ensure_identifier(name: &str) -> Result<&str> {
    if is_identifier(name) {
        Ok(name)
    } else {
        Err(RecordError::InvalidIdentifier(name.to_string()))
    }
}

/// Double-quotes a validated identifier.
pub fn quote_ident(name: &str) -> String {
    format!("\"{name}\"")
}

//------------------------------------------------------------------------------
// Statement helpers
//------------------------------------------------------------------------------

/// `SELECT * FROM "table"`
pub fn select_star(table: &str) -> Sql {
    Sql::raw(format!("SELECT * FROM {}", quote_ident(table)))
}

/// `"c1" = ? AND "c2" = ? …` in predicate-map order, values bound in the
/// same order.
pub fn eq_predicates(predicates: &Attributes) -> Result<Sql> {
    let mut parts = Vec::with_capacity(predicates.len());
    for (column, value) in predicates {
        ensure_identifier(column)?;
        let part = Sql::raw(format!("{} = ", quote_ident(column))).param(value.clone());
        parts.push(part);
    }
    Ok(Sql::join(parts, " AND "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_keeps_placeholders_and_params_aligned() {
        let sql = Sql::raw("SELECT * FROM \"cats\" WHERE \"name\" = ")
            .param(Value::from("whiskers"))
            .append_raw(" AND \"age\" = ")
            .param(Value::from(4));

        assert_eq!(
            sql.sql(),
            "SELECT * FROM \"cats\" WHERE \"name\" = ? AND \"age\" = ?"
        );
        assert_eq!(sql.params(), &[Value::from("whiskers"), Value::from(4)]);
    }

    #[test]
    fn join_concatenates_params_in_order() {
        let joined = Sql::join(
            [
                Sql::raw("\"a\" = ").param(Value::from(1)),
                Sql::raw("\"b\" = ").param(Value::from(2)),
            ],
            " AND ",
        );
        assert_eq!(joined.sql(), "\"a\" = ? AND \"b\" = ?");
        assert_eq!(joined.params(), &[Value::from(1), Value::from(2)]);
    }

    #[test]
    fn eq_predicates_follow_map_order() {
        let mut predicates = Attributes::new();
        predicates.insert("house_id".to_string(), Value::from(3));
        predicates.insert("fname".to_string(), Value::from("Devon"));

        let sql = eq_predicates(&predicates).unwrap();
        assert_eq!(sql.sql(), "\"house_id\" = ? AND \"fname\" = ?");
        assert_eq!(sql.params(), &[Value::from(3), Value::from("Devon")]);
    }

    #[test]
    fn identifier_validation() {
        assert!(is_identifier("humans"));
        assert!(is_identifier("_hidden"));
        assert!(is_identifier("table2"));
        assert!(!is_identifier("2table"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("humans; DROP TABLE humans"));
        assert!(!is_identifier("hu-mans"));
        assert!(!is_identifier("\"humans\""));
    }

    #[test]
    fn eq_predicates_reject_malformed_column() {
        let mut predicates = Attributes::new();
        predicates.insert("a\" OR 1=1 --".to_string(), Value::from(1));
        assert!(matches!(
            eq_predicates(&predicates),
            Err(RecordError::InvalidIdentifier(_))
        ));
    }
}
