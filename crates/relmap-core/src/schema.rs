pub mod app;

pub mod db;

mod registry;
pub use registry::{MappingRegistry, TableColumns};

mod relation;
pub use relation::{validate_join_column, Cardinality, Relation};
