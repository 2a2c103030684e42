mod value;

use keel_core::{
    driver::{Document, DocumentStore},
    Error, Result,
};
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::debug;
use url::Url;

/// Flat-file document store: one pretty-printed JSON file per record,
/// named `<collection>_<id>.json`, all in one directory.
///
/// Writes go to a temporary file in the same directory that is then
/// renamed over the target, so a reader never sees a partial record.
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    /// Opens a store from a `json:<dir>` URL.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(|err| {
            Error::invalid_connection_url(format!("{err}; url={url_str}"))
        })?;

        if url.scheme() != "json" {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `json` scheme; url={url_str}"
            )));
        }

        if url.path().is_empty() {
            return Err(Error::invalid_connection_url(format!(
                "connection URL has no directory; url={url_str}"
            )));
        }

        Self::open(url.path())
    }

    /// Opens a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|err| io_failed(err, &root))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, collection: &str, id: &str) -> PathBuf {
        self.root.join(format!(
            "{}{}.json",
            prefix(collection),
            encode_id(id)
        ))
    }

    fn read(&self, path: &Path) -> Result<Option<Document>> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(io_failed(err, path)),
        };

        let json: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|err| Error::from(err).context(format!("reading {}", path.display())))?;

        Ok(value::from_json(json))
    }

    /// Paths of every record file of `collection`.
    fn files(&self, collection: &str) -> Result<Vec<PathBuf>> {
        let prefix = prefix(collection);
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
            Err(err) => return Err(io_failed(err, &self.root)),
        };

        let mut paths = vec![];
        for entry in entries {
            let entry = entry.map_err(|err| io_failed(err, &self.root))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };

            let owned = name
                .strip_prefix(&prefix)
                .and_then(|rest| rest.strip_suffix(".json"))
                .is_some_and(|id| !id.is_empty() && !id.contains('_'));

            if owned {
                paths.push(entry.path());
            }
        }

        paths.sort();
        Ok(paths)
    }
}

impl DocumentStore for JsonStore {
    fn load(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        self.read(&self.path(collection, id))
    }

    fn load_all(&self, collection: &str) -> Result<Vec<Document>> {
        let files = self.files(collection)?;
        debug!(collection, files = files.len(), "scanning collection");

        let mut documents = Vec::with_capacity(files.len());
        for path in files {
            if let Some(document) = self.read(&path)? {
                documents.push(document);
            }
        }
        Ok(documents)
    }

    fn store(&self, collection: &str, id: &str, document: Document) -> Result<()> {
        let path = self.path(collection, id);
        debug!(path = %path.display(), "storing document");

        let json = serde_json::to_vec_pretty(&value::to_json(document))?;

        let mut file =
            tempfile::NamedTempFile::new_in(&self.root).map_err(|err| io_failed(err, &self.root))?;
        file.write_all(&json).map_err(|err| io_failed(err, &path))?;
        file.persist(&path)
            .map_err(|err| io_failed(err.error, &path))?;
        Ok(())
    }

    fn remove(&self, collection: &str, id: &str) -> Result<bool> {
        let path = self.path(collection, id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(io_failed(err, &path)),
        }
    }

    fn drop_collection(&self, collection: &str) -> Result<()> {
        for path in self.files(collection)? {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => return Err(io_failed(err, &path)),
            }
        }
        Ok(())
    }
}

fn prefix(collection: &str) -> String {
    format!("{}_", collection.to_lowercase())
}

/// Escapes everything outside `[A-Za-z0-9.-]`, underscores included, so a
/// file name splits unambiguously into collection and id.
fn encode_id(id: &str) -> String {
    let mut ret = String::with_capacity(id.len());
    for byte in id.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'-' => ret.push(byte as char),
            _ => ret.push_str(&format!("%{byte:02X}")),
        }
    }
    ret
}

fn io_failed(err: io::Error, path: &Path) -> Error {
    Error::backend_execution_failure(err).context(format!("path: {}", path.display()))
}
