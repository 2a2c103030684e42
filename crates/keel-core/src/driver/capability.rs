/// What a backend can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability {
    /// When true, the backend executes SQL text rendered by a dialect.
    pub sql: bool,

    /// Supports BEGIN/COMMIT/ROLLBACK.
    pub transactions: bool,

    /// Supports additive schema migration.
    pub migrations: bool,

    /// Supports flat predicate queries.
    pub query: bool,
}

/// Optional features a caller can probe with `Db::supports`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Support {
    /// Blocking calls can be wrapped into futures.
    WrappedAsync,

    /// Native asynchronous execution.
    Async,

    Query,
    Transaction,
    Migration,
}

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        sql: true,
        transactions: true,
        migrations: true,
        query: true,
    };

    /// MySQL / MariaDB capabilities.
    pub const MYSQL: Self = Self::SQLITE;

    /// PostgreSQL capabilities.
    pub const POSTGRESQL: Self = Self::SQLITE;

    /// Flat-file JSON document store capabilities.
    pub const JSON: Self = Self {
        sql: false,
        transactions: false,
        migrations: false,
        query: true,
    };

    pub fn supports(&self, support: Support) -> bool {
        match support {
            Support::WrappedAsync => true,
            Support::Async => false,
            Support::Query => self.query,
            Support::Transaction => self.transactions,
            Support::Migration => self.migrations,
        }
    }
}
