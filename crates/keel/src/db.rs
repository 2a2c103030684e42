mod builder;
pub use builder::Builder;

mod connect;
pub use connect::connect;

use crate::{
    transaction::{Guarded, Slot},
    Repository, Result,
};

use keel_core::{
    driver::{Capability, DocumentStore, SqlDriver, Support},
    schema::{Entity, Registry},
};
use keel_sql::{Dialect, Flavor};

use std::sync::Arc;

/// Where records live.
#[derive(Debug, Clone)]
pub enum Backend {
    /// A SQL driver, with the dialect its statements are rendered in.
    Sql {
        driver: Arc<dyn SqlDriver>,
        dialect: Dialect,
    },

    /// A store of whole documents, queried by scan-and-filter.
    Documents(Arc<dyn DocumentStore>),
}

impl Backend {
    pub fn capability(&self) -> &'static Capability {
        match self {
            Backend::Sql { driver, .. } => driver.capability(),
            Backend::Documents(store) => store.capability(),
        }
    }
}

/// Shared state between all `Db` clones.
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) backend: Backend,
    pub(crate) registry: Registry,

    /// Owner of the open transaction, if any.
    pub(crate) slot: Arc<Slot>,
}

/// A database handle. Cloning is cheap; clones share the backend, the
/// metadata registry and the transaction slot.
#[derive(Debug, Clone)]
pub struct Db {
    pub(crate) shared: Arc<Shared>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub(crate) fn new(backend: Backend, registry: Registry) -> Db {
        let slot = Arc::new(Slot::default());

        // Statements from threads other than the transaction's owner wait
        // for the transaction to finish.
        let backend = match backend {
            Backend::Sql { driver, dialect } => Backend::Sql {
                driver: Arc::new(Guarded::new(driver, slot.clone())),
                dialect,
            },
            backend => backend,
        };

        Db {
            shared: Arc::new(Shared {
                backend,
                registry,
                slot,
            }),
        }
    }

    /// Returns the repository for `E`, computing its metadata on first use.
    pub fn repository<E: Entity>(&self) -> Result<Repository<E>> {
        let metadata = self.shared.registry.metadata::<E>()?;
        Ok(Repository::new(self.clone(), metadata))
    }

    pub fn registry(&self) -> &Registry {
        &self.shared.registry
    }

    pub fn backend(&self) -> &Backend {
        &self.shared.backend
    }

    /// SQL flavor of the backend, if it speaks SQL.
    pub fn flavor(&self) -> Option<Flavor> {
        match &self.shared.backend {
            Backend::Sql { dialect, .. } => Some(dialect.flavor()),
            Backend::Documents(_) => None,
        }
    }

    pub fn capability(&self) -> &'static Capability {
        self.shared.backend.capability()
    }

    pub fn supports(&self, support: Support) -> bool {
        self.capability().supports(support)
    }
}
