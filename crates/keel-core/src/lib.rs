pub mod driver;
pub use driver::{Capability, DocumentStore, SqlDriver};

mod error;
pub use error::Error;

pub mod query;

pub mod schema;
pub use schema::{Entity, EntityMetadata, Registry};

pub mod stmt;

/// A Result type alias that uses Keel's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
