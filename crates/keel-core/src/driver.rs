mod capability;
pub use capability::{Capability, Support};

mod document;
pub use document::{Document, DocumentStore};

mod sql;
pub use sql::{ColumnInfo, IndexInfo, Rows, SqlDriver};
