//! recordlite — a runtime-reflective Active Record style ORM for SQLite.
//!
//! Models are registered by name against a live database; their columns are
//! introspected from the table on first use and cached, attribute accessors
//! are generated from the discovered schema, and declarative predicate maps
//! become parameterized SQL. Associations (belongs-to, has-many,
//! has-one-through) resolve lazily through the model registry, so
//! interdependent models can be registered in any order.
//!
//! ```no_run
//! use recordlite::prelude::*;
//!
//! fn main() -> recordlite::Result<()> {
//!     let db = Db::new(Connection::open("app.db")?);
//!
//!     let humans = db.register("Human")?;
//!     db.register("House")?;
//!     humans.belongs_to("house", AssocOptions::new());
//!
//!     let mut human = humans.build(attrs! { "fname" => "Devon" })?;
//!     humans.save(&mut human)?;
//!
//!     let house = humans.assoc_one(&human, "house")?;
//!     println!("{house:?}");
//!     Ok(())
//! }
//! ```

pub mod assoc;
pub mod conn;
pub mod error;
pub mod inflect;
mod macros;
pub mod model;
pub mod query;
pub mod record;
pub mod schema;
pub mod sql;
mod trace;
pub mod value;

pub use assoc::{AssocLink, AssocOptions, AssociationSpec, Related};
pub use conn::{Connection, Row};
pub use error::{RecordError, Result};
pub use model::{Db, Model};
pub use record::{Attributes, Record};
pub use schema::{Accessor, Accessors, ModelType, PRIMARY_KEY};
pub use sql::Sql;
pub use value::Value;

/// Convenience imports for typical usage.
pub mod prelude {
    pub use crate::attrs;
    pub use crate::{
        AssocOptions, Attributes, Connection, Db, Model, Record, RecordError, Related, Result,
        Value,
    };
}
