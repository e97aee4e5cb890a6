mod table;
pub use table::{PropertyMapping, TableMapping};
