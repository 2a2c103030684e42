use keel::{db::Builder, Capability, Db};

use crate::Setup;

use tempfile::TempDir;

/// A JSON store in a fresh temporary directory, removed on drop.
pub struct SetupJson {
    dir: TempDir,
}

impl SetupJson {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }
}

impl Default for SetupJson {
    fn default() -> Self {
        Self::new()
    }
}

impl Setup for SetupJson {
    fn connect(&self, builder: Builder) -> keel::Result<Db> {
        builder.connect(&format!("json:{}", self.dir.path().display()))
    }

    fn capability(&self) -> &'static Capability {
        &Capability::JSON
    }
}
