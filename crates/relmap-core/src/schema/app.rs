mod model;
pub use model::{IdMeta, ModelMeta};

mod property;
pub use property::{PropertyKind, PropertyMeta};
