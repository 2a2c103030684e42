mod value;
use value::Value;

use keel_core::{
    driver::{Capability, Rows, SqlDriver},
    stmt, Error, Result,
};
use rusqlite::Connection as RusqliteConnection;
use std::{
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};
use tracing::debug;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sqlite {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Create a new SQLite driver with an arbitrary connection URL
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(|err| {
            Error::invalid_connection_url(format!("{err}; url={url_str}"))
        })?;

        if url.scheme() != "sqlite" {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `sqlite` scheme; url={url_str}"
            )));
        }

        if url.path() == ":memory:" {
            Ok(Self::InMemory)
        } else if url.path().is_empty() {
            Err(Error::invalid_connection_url(format!(
                "connection URL has no database path; url={url_str}"
            )))
        } else {
            Ok(Self::File(PathBuf::from(url.path())))
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }

    pub fn url(&self) -> String {
        match self {
            Sqlite::InMemory => "sqlite::memory:".to_string(),
            Sqlite::File(path) => format!("sqlite:{}", path.display()),
        }
    }

    pub fn connect(&self) -> Result<Connection> {
        match self {
            Sqlite::File(path) => Connection::open(path),
            Sqlite::InMemory => Connection::in_memory(),
        }
    }
}

/// One SQLite connection.
///
/// Statements are serialized through a mutex; an in-memory database lives
/// exactly as long as its connection.
#[derive(Debug)]
pub struct Connection {
    connection: Mutex<RusqliteConnection>,
}

impl Connection {
    pub fn in_memory() -> Result<Self> {
        let connection =
            RusqliteConnection::open_in_memory().map_err(Error::backend_execution_failure)?;
        Ok(Self::from_connection(connection))
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection =
            RusqliteConnection::open(path).map_err(Error::backend_execution_failure)?;
        Ok(Self::from_connection(connection))
    }

    fn from_connection(connection: RusqliteConnection) -> Self {
        Self {
            connection: Mutex::new(connection),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RusqliteConnection> {
        self.connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn run(&self, sql: &str, params: &[stmt::Value]) -> Result<u64> {
        let connection = self.lock();
        let mut stmt = connection.prepare_cached(sql).map_err(|err| failed(err, sql))?;
        let count = stmt
            .execute(rusqlite::params_from_iter(params.iter().map(Value)))
            .map_err(|err| failed(err, sql))?;
        Ok(count as u64)
    }
}

impl SqlDriver for Connection {
    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }

    fn execute(&self, sql: &str) -> Result<bool> {
        debug!(sql, "execute");
        let connection = self.lock();
        let mut stmt = connection.prepare(sql).map_err(|err| failed(err, sql))?;
        let has_rows = stmt.column_count() > 0;
        if has_rows {
            let mut rows = stmt.query([]).map_err(|err| failed(err, sql))?;
            rows.next().map_err(|err| failed(err, sql))?;
        } else {
            stmt.execute([]).map_err(|err| failed(err, sql))?;
        }
        Ok(has_rows)
    }

    fn execute_update(&self, sql: &str, params: &[stmt::Value]) -> Result<u64> {
        debug!(sql, params = params.len(), "execute update");
        self.run(sql, params)
    }

    fn execute_batch(&self, sql: &str, batch: &[Vec<stmt::Value>]) -> Result<u64> {
        debug!(sql, rows = batch.len(), "execute batch");
        let connection = self.lock();
        let mut stmt = connection.prepare_cached(sql).map_err(|err| failed(err, sql))?;

        let mut count = 0;
        for params in batch {
            count += stmt
                .execute(rusqlite::params_from_iter(params.iter().map(Value)))
                .map_err(|err| failed(err, sql))? as u64;
        }
        Ok(count)
    }

    fn query(&self, sql: &str, params: &[stmt::Value]) -> Result<Rows> {
        debug!(sql, params = params.len(), "query");
        let connection = self.lock();
        let mut stmt = connection.prepare_cached(sql).map_err(|err| failed(err, sql))?;

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let mut cursor = stmt
            .query(rusqlite::params_from_iter(params.iter().map(Value)))
            .map_err(|err| failed(err, sql))?;

        let mut rows = vec![];
        while let Some(row) = cursor.next().map_err(|err| failed(err, sql))? {
            let record = (0..width)
                .map(|index| Value::from_sql(row, index))
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(|err| failed(err, sql))?;
            rows.push(record);
        }

        Ok(Rows { columns, rows })
    }

    fn begin(&self) -> Result<()> {
        self.run("BEGIN", &[]).map(drop)
    }

    fn commit(&self) -> Result<()> {
        self.run("COMMIT", &[]).map(drop)
    }

    fn rollback(&self) -> Result<()> {
        self.run("ROLLBACK", &[]).map(drop)
    }
}

fn failed(err: rusqlite::Error, sql: &str) -> Error {
    Error::backend_execution_failure(err).context(format!("statement: {sql}"))
}
