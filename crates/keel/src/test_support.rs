use crate::{Db, Result};

use keel_core::{
    driver::{Capability, Document, DocumentStore, Rows, SqlDriver},
    stmt::Value,
};
use keel_sql::Flavor;

use std::{
    collections::{BTreeMap, VecDeque},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

#[derive(Debug, Default, Clone, PartialEq, crate::Entity)]
#[entity("people")]
#[index(name = "idx_people_name_age", columns("name", "age"))]
pub(crate) struct Person {
    #[id]
    #[column]
    pub(crate) id: i64,

    #[column(nullable = false)]
    pub(crate) name: String,

    #[column]
    pub(crate) age: Option<i32>,

    #[column]
    pub(crate) active: bool,
}

impl Person {
    pub(crate) fn new(id: i64, name: &str, age: Option<i32>, active: bool) -> Person {
        Person {
            id,
            name: name.to_string(),
            age,
            active,
        }
    }
}

/// Documents in memory, keyed by collection then id. Clones share the
/// same documents.
#[derive(Debug, Default, Clone)]
pub(crate) struct MemoryStore {
    collections: Arc<Mutex<BTreeMap<String, BTreeMap<String, Document>>>>,
    scans: Arc<AtomicUsize>,
}

impl MemoryStore {
    /// Number of `load_all` calls so far.
    pub(crate) fn scans(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let collections = self.collections.lock().unwrap();
        Ok(collections
            .get(collection)
            .and_then(|documents| documents.get(id))
            .cloned())
    }

    fn load_all(&self, collection: &str) -> Result<Vec<Document>> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        let collections = self.collections.lock().unwrap();
        Ok(collections
            .get(collection)
            .map(|documents| documents.values().cloned().collect())
            .unwrap_or_default())
    }

    fn store(&self, collection: &str, id: &str, document: Document) -> Result<()> {
        let mut collections = self.collections.lock().unwrap();
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document);
        Ok(())
    }

    fn remove(&self, collection: &str, id: &str) -> Result<bool> {
        let mut collections = self.collections.lock().unwrap();
        Ok(collections
            .get_mut(collection)
            .and_then(|documents| documents.remove(id))
            .is_some())
    }

    fn drop_collection(&self, collection: &str) -> Result<()> {
        self.collections.lock().unwrap().remove(collection);
        Ok(())
    }
}

/// A SQL driver that records every call and answers queries from a script.
#[derive(Debug, Clone, Default)]
pub(crate) struct Recorder {
    inner: Arc<Mutex<Recorded>>,
}

#[derive(Debug, Default)]
struct Recorded {
    log: Vec<String>,
    answers: VecDeque<Rows>,
    failing: Option<&'static str>,
}

impl Recorder {
    /// Queues the rows returned by the next `query` call.
    pub(crate) fn answer(&self, columns: &[&str], rows: Vec<Vec<Value>>) {
        self.inner.lock().unwrap().answers.push_back(Rows {
            columns: columns.iter().map(|column| column.to_string()).collect(),
            rows,
        });
    }

    /// Queues a single-column `name` result.
    pub(crate) fn answer_names(&self, names: &[&str]) {
        self.answer(
            &["name"],
            names.iter().map(|name| vec![Value::from(*name)]).collect(),
        );
    }

    /// Makes every later `BEGIN`, `COMMIT` or `ROLLBACK` named `call` fail
    /// after being recorded.
    pub(crate) fn fail_on(&self, call: &'static str) {
        self.inner.lock().unwrap().failing = Some(call);
    }

    pub(crate) fn log(&self) -> Vec<String> {
        self.inner.lock().unwrap().log.clone()
    }

    fn record(&self, entry: impl Into<String>) {
        self.inner.lock().unwrap().log.push(entry.into());
    }

    fn control(&self, call: &'static str) -> Result<()> {
        self.record(call);
        if self.inner.lock().unwrap().failing == Some(call) {
            return Err(keel_core::err!("{call} failed"));
        }
        Ok(())
    }
}

impl SqlDriver for Recorder {
    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }

    fn execute(&self, sql: &str) -> Result<bool> {
        self.record(sql);
        Ok(false)
    }

    fn execute_update(&self, sql: &str, _params: &[Value]) -> Result<u64> {
        self.record(sql);
        Ok(1)
    }

    fn execute_batch(&self, sql: &str, batch: &[Vec<Value>]) -> Result<u64> {
        self.record(sql);
        Ok(batch.len() as u64)
    }

    fn query(&self, sql: &str, _params: &[Value]) -> Result<Rows> {
        self.record(sql);
        Ok(self
            .inner
            .lock()
            .unwrap()
            .answers
            .pop_front()
            .unwrap_or_default())
    }

    fn begin(&self) -> Result<()> {
        self.control("BEGIN")
    }

    fn commit(&self) -> Result<()> {
        self.control("COMMIT")
    }

    fn rollback(&self) -> Result<()> {
        self.control("ROLLBACK")
    }
}

pub(crate) fn sql_db(recorder: &Recorder) -> Db {
    Db::builder()
        .register::<Person>()
        .build_with_sql(recorder.clone(), Flavor::Sqlite)
        .unwrap()
}

pub(crate) fn document_db() -> Db {
    document_db_over(&MemoryStore::default())
}

pub(crate) fn document_db_over(store: &MemoryStore) -> Db {
    Db::builder()
        .register::<Person>()
        .build_with_documents(store.clone())
        .unwrap()
}
