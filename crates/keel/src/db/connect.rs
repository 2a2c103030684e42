use super::Backend;
use crate::{Error, Result};

use url::Url;

/// Opens the backend named by a connection URL.
pub fn connect(url: &str) -> Result<Backend> {
    let parsed = Url::parse(url)
        .map_err(|err| Error::invalid_connection_url(format!("{err}; url={url}")))?;

    match parsed.scheme() {
        "sqlite" => connect_sqlite(url),
        "json" => connect_json(url),
        scheme => Err(Error::invalid_connection_url(format!(
            "unsupported database; scheme={scheme}; url={url}"
        ))),
    }
}

#[cfg(feature = "sqlite")]
fn connect_sqlite(url: &str) -> Result<Backend> {
    let connection = keel_driver_sqlite::Sqlite::new(url)?.connect()?;
    Ok(Backend::Sql {
        driver: std::sync::Arc::new(connection),
        dialect: keel_sql::Dialect::sqlite(),
    })
}

#[cfg(not(feature = "sqlite"))]
fn connect_sqlite(_url: &str) -> Result<Backend> {
    Err(Error::invalid_connection_url("`sqlite` feature not enabled"))
}

#[cfg(feature = "json")]
fn connect_json(url: &str) -> Result<Backend> {
    let store = keel_driver_json::JsonStore::new(url)?;
    Ok(Backend::Documents(std::sync::Arc::new(store)))
}

#[cfg(not(feature = "json"))]
fn connect_json(_url: &str) -> Result<Backend> {
    Err(Error::invalid_connection_url("`json` feature not enabled"))
}
