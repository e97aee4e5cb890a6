mod demux;
pub use demux::RowDemux;

mod mapper;
pub use mapper::{Builder, Mapper, MapperConfig};

mod merge;
pub use merge::{join_pairs, merge_to_many, merge_to_many_through, merge_to_one};

mod model;
pub use model::{Model, Related};

mod query;
pub use query::{Query, RelatedQuery};

mod query_count;
pub use query_count::{QueryCount, RelatedCount};

mod query_merge;
pub use query_merge::{QueryMerge, RelatedMerge};

mod relation_spec;

pub use relmap_core::{driver, schema, stmt, Error, Result};
