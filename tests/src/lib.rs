#[macro_use]
mod macros;

pub mod db;

use keel::{db::Builder, Capability, Db};

use std::sync::Once;

pub trait Setup: Send + Sync + 'static {
    /// Connects with the given entity registrations. Panics on failure.
    fn setup(&self, builder: Builder) -> Db {
        init_tracing();
        self.connect(builder).unwrap()
    }

    fn connect(&self, builder: Builder) -> keel::Result<Db>;

    fn capability(&self) -> &'static Capability;
}

/// Installs a `RUST_LOG`-driven subscriber once per test binary.
pub fn init_tracing() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
