//! Association catalog and resolution.
//!
//! Specs name their target model as a string and resolve it through the
//! registry only when an association is first accessed, so interdependent
//! models can be registered in any order. Results are recomputed on every
//! access, never memoized.

use crate::error::{RecordError, Result};
use crate::inflect;
use crate::model::Model;
use crate::record::{Attributes, Record};
use crate::schema::PRIMARY_KEY;

/// The columns and target of one single-hop association.
#[derive(Debug, Clone)]
pub struct AssocLink {
    /// Foreign key column. For belongs-to it lives on the owning row, for
    /// has-many on the target table.
    pub foreign_key: String,
    /// Target model name, resolved through the registry at access time.
    pub target: String,
    /// Key column matched against the foreign key. For belongs-to this is
    /// the target's primary key; for has-many it is the owner's.
    pub primary_key: String,
}

/// A named relationship registered on a model.
#[derive(Debug, Clone)]
pub enum AssociationSpec {
    /// Foreign key on the owning row; resolves to zero or one record.
    BelongsTo(AssocLink),
    /// Foreign key on the target table; resolves to a sequence in driver
    /// row order.
    HasMany(AssocLink),
    /// Two-hop composition of already-registered associations; resolves to
    /// zero or one record.
    HasOneThrough { through: String, source: String },
}

/// Optional overrides for association registration; anything left unset
/// falls back to the naming conventions.
#[derive(Debug, Clone, Default)]
pub struct AssocOptions {
    foreign_key: Option<String>,
    target: Option<String>,
    primary_key: Option<String>,
}

impl AssocOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the foreign key column.
    pub fn foreign_key(mut self, column: impl Into<String>) -> Self {
        self.foreign_key = Some(column.into());
        self
    }

    /// Overrides the target model name.
    pub fn target(mut self, model: impl Into<String>) -> Self {
        self.target = Some(model.into());
        self
    }

    /// Overrides the key column matched against the foreign key.
    pub fn primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = Some(column.into());
        self
    }
}

/// The outcome of resolving an association.
#[derive(Debug, Clone)]
pub enum Related {
    /// Belongs-to or has-one-through result.
    One(Option<Record>),
    /// Has-many result, in driver row order.
    Many(Vec<Record>),
}

impl Related {
    /// Extracts a single-record result.
    pub fn one(self) -> Result<Option<Record>> {
        match self {
            Related::One(record) => Ok(record),
            Related::Many(_) => Err(RecordError::AssociationKind {
                expected: "a single record",
                actual: "a collection",
            }),
        }
    }

    /// Extracts a collection result.
    pub fn many(self) -> Result<Vec<Record>> {
        match self {
            Related::Many(records) => Ok(records),
            Related::One(_) => Err(RecordError::AssociationKind {
                expected: "a collection",
                actual: "a single record",
            }),
        }
    }
}

impl<'db> Model<'db> {
    /// Registers a belongs-to association. Defaults: foreign key
    /// `{name}_id` on this model, target `UpperCamel(name)`, matched
    /// against the target's `id`.
    pub fn belongs_to(&self, name: &str, options: AssocOptions) {
        let link = AssocLink {
            foreign_key: options
                .foreign_key
                .unwrap_or_else(|| inflect::foreign_key(name)),
            target: options.target.unwrap_or_else(|| inflect::classify(name)),
            primary_key: options.primary_key.unwrap_or_else(|| PRIMARY_KEY.to_string()),
        };
        self.ty.add_association(name, AssociationSpec::BelongsTo(link));
    }

    /// Registers a has-many association. Defaults: foreign key
    /// `{snake(this model)}_id` on the target table, target
    /// `UpperCamel(singularize(name))`, matched against this model's `id`.
    pub fn has_many(&self, name: &str, options: AssocOptions) {
        let link = AssocLink {
            foreign_key: options
                .foreign_key
                .unwrap_or_else(|| inflect::foreign_key(self.name())),
            target: options
                .target
                .unwrap_or_else(|| inflect::classify(&inflect::singularize(name))),
            primary_key: options.primary_key.unwrap_or_else(|| PRIMARY_KEY.to_string()),
        };
        self.ty.add_association(name, AssociationSpec::HasMany(link));
    }

    /// Registers a has-one-through association composing the `through`
    /// association on this model with the `source` association on the
    /// through-target. Both names are checked at resolution time, not here.
    pub fn has_one_through(&self, name: &str, through: &str, source: &str) {
        self.ty.add_association(
            name,
            AssociationSpec::HasOneThrough {
                through: through.to_string(),
                source: source.to_string(),
            },
        );
    }

    /// Resolves a named association for `record`.
    pub fn assoc(&self, record: &Record, name: &str) -> Result<Related> {
        let spec = self
            .ty
            .association(name)
            .ok_or_else(|| RecordError::AssociationNotRegistered {
                model: self.name().to_string(),
                name: name.to_string(),
            })?;
        match spec {
            AssociationSpec::BelongsTo(link) => {
                Ok(Related::One(self.resolve_belongs_to(record, &link)?))
            }
            AssociationSpec::HasMany(link) => {
                Ok(Related::Many(self.resolve_has_many(record, &link)?))
            }
            AssociationSpec::HasOneThrough { through, source } => {
                Ok(Related::One(self.resolve_through(record, &through, &source)?))
            }
        }
    }

    /// Resolves an association expected to yield at most one record.
    pub fn assoc_one(&self, record: &Record, name: &str) -> Result<Option<Record>> {
        self.assoc(record, name)?.one()
    }

    /// Resolves an association expected to yield a collection.
    pub fn assoc_many(&self, record: &Record, name: &str) -> Result<Vec<Record>> {
        self.assoc(record, name)?.many()
    }

    fn resolve_belongs_to(&self, record: &Record, link: &AssocLink) -> Result<Option<Record>> {
        let fk_value = match record.get(&link.foreign_key) {
            Some(v) if !v.is_null() => v.clone(),
            _ => return Ok(None),
        };
        let target = self.db.model(&link.target)?;
        let mut predicates = Attributes::new();
        predicates.insert(link.primary_key.clone(), fk_value);
        Ok(target.r#where(&predicates)?.into_iter().next())
    }

    fn resolve_has_many(&self, record: &Record, link: &AssocLink) -> Result<Vec<Record>> {
        let owner_key = match record.get(&link.primary_key) {
            Some(v) if !v.is_null() => v.clone(),
            _ => return Ok(Vec::new()),
        };
        let target = self.db.model(&link.target)?;
        let mut predicates = Attributes::new();
        predicates.insert(link.foreign_key.clone(), owner_key);
        target.r#where(&predicates)
    }

    fn resolve_through(&self, record: &Record, through: &str, source: &str) -> Result<Option<Record>> {
        let intermediate = match self.assoc(record, through)?.one()? {
            Some(r) => r,
            None => return Ok(None),
        };
        let through_target = self.db.model(intermediate.model_name())?;
        through_target.assoc(&intermediate, source)?.one()
    }
}
