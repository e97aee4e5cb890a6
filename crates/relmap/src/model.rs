use relmap_core::schema::app::{ModelMeta, PropertyKind};
use relmap_core::schema::{Cardinality, Relation};
use relmap_core::stmt::Value;
use relmap_core::{Error, Result};

use std::any::Any;

/// The capability interface mapped types implement.
///
/// Property access goes through a name-keyed lookup written once per type,
/// so the demultiplexer and merge engine stay decoupled from concrete field
/// layouts. Scalar values travel as [`Value`]; relationship targets travel
/// type-erased through [`Related`] and are downcast inside the per-type
/// implementation.
pub trait Model: Default + Clone + Send + Sync + 'static {
    /// Static metadata: table, identifier, and declared properties.
    fn meta() -> &'static ModelMeta;

    /// Reads a scalar property.
    fn get_property(&self, name: &str) -> Result<Value>;

    /// Writes a scalar property. The caller has already coerced `value` to
    /// the property's declared type.
    fn set_property(&mut self, name: &str, value: Value) -> Result<()>;

    /// Populates a relationship property. Types without relationship
    /// properties keep the default.
    fn set_related(&mut self, name: &str, related: Related) -> Result<()> {
        let _ = related;
        Err(Error::invalid_argument(format!(
            "`{}` has no relationship property `{name}`",
            Self::meta().name
        )))
    }
}

/// A type-erased relationship payload, produced by the merge engine and
/// consumed by [`Model::set_related`].
pub enum Related {
    /// One related object (to-one).
    One(Box<dyn Any + Send>),

    /// A `Vec` of related objects (to-many, to-many-through).
    Many(Box<dyn Any + Send>),
}

impl Related {
    pub fn one_of<T: Send + 'static>(value: T) -> Self {
        Self::One(Box::new(value))
    }

    pub fn many_of<T: Send + 'static>(values: Vec<T>) -> Self {
        Self::Many(Box::new(values))
    }

    /// Downcasts a to-one payload.
    pub fn one<T: 'static>(self) -> Result<T> {
        match self {
            Self::One(value) => value
                .downcast::<T>()
                .map(|value| *value)
                .map_err(|_| Error::invalid_argument("related object has an unexpected type")),
            Self::Many(_) => Err(Error::invalid_argument(
                "expected one related object, got a collection",
            )),
        }
    }

    /// Downcasts a to-many payload.
    pub fn many<T: 'static>(self) -> Result<Vec<T>> {
        match self {
            Self::Many(values) => values
                .downcast::<Vec<T>>()
                .map(|values| *values)
                .map_err(|_| Error::invalid_argument("related collection has an unexpected type")),
            Self::One(_) => Err(Error::invalid_argument(
                "expected a related collection, got one object",
            )),
        }
    }
}

/// Checks that the relationship's target property exists on the root type
/// and is structurally compatible with the cardinality: a reference for
/// to-one, a collection with the right element type for to-many shapes.
pub(crate) fn validate_target<R: Model, C: Model>(relation: &Relation) -> Result<()> {
    let meta = R::meta();
    let target = &relation.target_property;
    let property = meta.property(target).ok_or_else(|| {
        Error::mapping(format!("property `{target}` not found on `{}`", meta.name))
    })?;

    let related = C::meta().name;
    match relation.cardinality {
        Cardinality::None => Ok(()),
        Cardinality::ToOne => match property.kind {
            PropertyKind::Reference { model } if model == related => Ok(()),
            PropertyKind::Reference { model } => Err(Error::mapping(format!(
                "property `{target}` of `{}` references `{model}`, not `{related}`",
                meta.name
            ))),
            _ => Err(Error::mapping(format!(
                "property `{target}` of `{}` must be a to-one reference to populate `has_one`",
                meta.name
            ))),
        },
        Cardinality::ToMany | Cardinality::ToManyThrough => match property.kind {
            PropertyKind::Collection { element } if element == related => Ok(()),
            PropertyKind::Collection { element } => Err(Error::mapping(format!(
                "collection property `{target}` of `{}` holds `{element}`, not `{related}`",
                meta.name
            ))),
            _ => Err(Error::mapping(format!(
                "property `{target}` of `{}` must be a collection to populate a to-many relationship",
                meta.name
            ))),
        },
    }
}
