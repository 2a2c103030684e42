use keel::{db::Builder, Capability, Db};

use crate::Setup;

pub struct SetupSqlite;

impl SetupSqlite {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SetupSqlite {
    fn default() -> Self {
        Self::new()
    }
}

impl Setup for SetupSqlite {
    fn connect(&self, builder: Builder) -> keel::Result<Db> {
        builder.connect("sqlite::memory:")
    }

    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }
}
