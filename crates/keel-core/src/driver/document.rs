use super::Capability;
use crate::{stmt::Value, Result};

use indexmap::IndexMap;

/// One stored record: column name to value, in column order.
pub type Document = IndexMap<String, Value>;

/// A store that keeps whole records keyed by id, with no query language.
///
/// Queries are answered by loading a collection and filtering in process.
pub trait DocumentStore: core::fmt::Debug + Send + Sync + 'static {
    fn capability(&self) -> &'static Capability {
        &Capability::JSON
    }

    /// Loads one document by its canonical id string.
    fn load(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Loads every document of a collection.
    fn load_all(&self, collection: &str) -> Result<Vec<Document>>;

    /// Inserts or replaces a document.
    fn store(&self, collection: &str, id: &str, document: Document) -> Result<()>;

    /// Removes a document. Returns true when it existed.
    fn remove(&self, collection: &str, id: &str) -> Result<bool>;

    /// Removes every document of a collection.
    fn drop_collection(&self, collection: &str) -> Result<()>;
}
