mod column_type;
pub use column_type::ColumnType;

mod dialect;
pub use dialect::{Dialect, Flavor};

mod fragment;
pub use fragment::SqlFragment;

mod serializer;

pub mod stmt;
pub use stmt::Statement;
