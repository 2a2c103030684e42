use super::{connect, Backend, Db};
use crate::Result;

use keel_core::{
    driver::{DocumentStore, SqlDriver},
    schema::{Entity, Registry},
};
use keel_sql::{Dialect, Flavor};

use std::sync::Arc;

type Register = fn(&Registry) -> Result<()>;

#[derive(Default)]
pub struct Builder {
    /// Entity types whose metadata is built, and validated, on connect
    entities: Vec<Register>,
}

impl Builder {
    pub fn register<T: Entity>(&mut self) -> &mut Self {
        self.entities
            .push(|registry| registry.metadata::<T>().map(drop));
        self
    }

    /// Connects to the backend named by `url`.
    ///
    /// Supported URLs are `sqlite::memory:`, `sqlite:<path>` and
    /// `json:<dir>`, each behind its crate feature.
    pub fn connect(&self, url: &str) -> Result<Db> {
        let backend = connect(url)?;
        self.build(backend)
    }

    /// Builds a database over an already connected SQL driver.
    pub fn build_with_sql(&self, driver: impl SqlDriver, flavor: Flavor) -> Result<Db> {
        self.build(Backend::Sql {
            driver: Arc::new(driver),
            dialect: Dialect::new(flavor),
        })
    }

    /// Builds a database over a document store.
    pub fn build_with_documents(&self, store: impl DocumentStore) -> Result<Db> {
        self.build(Backend::Documents(Arc::new(store)))
    }

    pub fn build(&self, backend: Backend) -> Result<Db> {
        let registry = Registry::new();
        for register in &self.entities {
            register(&registry)?;
        }
        Ok(Db::new(backend, registry))
    }
}

impl core::fmt::Debug for Builder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Builder")
            .field("entities", &self.entities.len())
            .finish()
    }
}
