use crate::stmt::Type;

/// A declared property of a mapped type.
#[derive(Debug, PartialEq, Eq)]
pub struct PropertyMeta {
    pub name: &'static str,
    pub kind: PropertyKind,
}

/// The shape of a property, checked against relationship cardinalities at
/// query-build time.
#[derive(Debug, PartialEq, Eq)]
pub enum PropertyKind {
    /// A column-backed value of the given type.
    Scalar(Type),

    /// A to-one relationship target holding one related object; `model`
    /// names the related type.
    Reference { model: &'static str },

    /// A to-many relationship target holding a collection of related
    /// objects; `element` names the declared element type. Rust collections
    /// are statically typed, so the element type is always known here and
    /// untyped collections cannot be expressed.
    Collection { element: &'static str },
}

impl PropertyMeta {
    pub const fn scalar(name: &'static str, ty: Type) -> Self {
        Self {
            name,
            kind: PropertyKind::Scalar(ty),
        }
    }

    pub const fn reference(name: &'static str, model: &'static str) -> Self {
        Self {
            name,
            kind: PropertyKind::Reference { model },
        }
    }

    pub const fn collection(name: &'static str, element: &'static str) -> Self {
        Self {
            name,
            kind: PropertyKind::Collection { element },
        }
    }
}
