mod cache;
pub use cache::SqlCache;

mod ident;
pub use ident::quote_ident;
use ident::{push_ident, push_qualified};

mod select;
pub use select::{append_clauses, SelectBuilder, JOIN_TABLE_ALIAS};

mod signature;
pub use signature::{QuerySignature, StatementKind};

mod write;
pub use write::{delete_by_id, insert, update};
