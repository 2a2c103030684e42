use crate::{MigrationReport, Query, Repository, Result};

use keel_core::{
    schema::Entity,
    stmt::{Operator, Value},
};

use tokio::task::{spawn_blocking, JoinError};

/// Async face of a [`Repository`].
///
/// Every call hands the whole blocking operation to tokio's blocking pool.
/// Dropping a returned future detaches the caller; the backend call still
/// runs to completion.
pub struct AsyncRepository<E> {
    inner: Repository<E>,
}

/// Async face of a [`Query`]. Builder methods are synchronous; terminals
/// run on the blocking pool.
#[derive(Debug)]
pub struct AsyncQuery<E> {
    inner: Query<E>,
}

impl<E> AsyncRepository<E> {
    pub(crate) fn new(inner: Repository<E>) -> AsyncRepository<E> {
        AsyncRepository { inner }
    }
}

impl<E: Entity> AsyncRepository<E> {
    /// The blocking repository this wraps.
    pub fn blocking(&self) -> &Repository<E> {
        &self.inner
    }

    pub fn query(&self) -> AsyncQuery<E> {
        AsyncQuery {
            inner: self.inner.query(),
        }
    }

    pub async fn save(&self, entity: E) -> Result<()> {
        self.run(move |repository| repository.save(&entity)).await
    }

    pub async fn save_all(&self, entities: Vec<E>) -> Result<()> {
        self.run(move |repository| repository.save_all(&entities))
            .await
    }

    pub async fn delete(&self, entity: E) -> Result<bool> {
        self.run(move |repository| repository.delete(&entity)).await
    }

    pub async fn delete_by_id(&self, id: impl Into<Value>) -> Result<bool> {
        let id = id.into();
        self.run(move |repository| repository.delete_by_id(id)).await
    }

    pub async fn delete_all_by_id<I>(&self, ids: I) -> Result<u64>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let ids: Vec<Value> = ids.into_iter().map(Into::into).collect();
        self.run(move |repository| repository.delete_all_by_id(ids))
            .await
    }

    pub async fn delete_all(&self) -> Result<u64> {
        self.run(|repository| repository.delete_all()).await
    }

    pub async fn find_by_id(&self, id: impl Into<Value>) -> Result<Option<E>> {
        let id = id.into();
        self.run(move |repository| repository.find_by_id(id)).await
    }

    pub async fn find_all(&self) -> Result<Vec<E>> {
        self.run(|repository| repository.find_all()).await
    }

    pub async fn count(&self) -> Result<u64> {
        self.run(|repository| repository.count()).await
    }

    pub async fn create_table_if_not_exists(&self) -> Result<()> {
        self.run(|repository| repository.create_table_if_not_exists())
            .await
    }

    pub async fn drop_table(&self) -> Result<()> {
        self.run(|repository| repository.drop_table()).await
    }

    pub async fn migrate(&self) -> Result<MigrationReport> {
        self.run(|repository| repository.migrate()).await
    }

    async fn run<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(Repository<E>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let repository = self.inner.clone();
        joined(spawn_blocking(move || f(repository)).await)
    }
}

impl<E: Entity> AsyncQuery<E> {
    pub fn filter(self, column: &str, op: Operator, value: impl Into<Value>) -> Result<Self> {
        Ok(AsyncQuery {
            inner: self.inner.filter(column, op, value)?,
        })
    }

    pub fn and(self) -> Self {
        AsyncQuery {
            inner: self.inner.and(),
        }
    }

    pub fn or(self) -> Self {
        AsyncQuery {
            inner: self.inner.or(),
        }
    }

    pub fn limit(self, n: i64) -> Self {
        AsyncQuery {
            inner: self.inner.limit(n),
        }
    }

    pub async fn all(self) -> Result<Vec<E>> {
        let query = self.inner;
        joined(spawn_blocking(move || query.all()).await)
    }

    pub async fn one(self) -> Result<Option<E>> {
        let query = self.inner;
        joined(spawn_blocking(move || query.one()).await)
    }

    pub async fn delete(self) -> Result<u64> {
        let query = self.inner;
        joined(spawn_blocking(move || query.delete()).await)
    }

    pub async fn count(self) -> Result<u64> {
        let query = self.inner;
        joined(spawn_blocking(move || query.count()).await)
    }
}

/// Unwraps a blocking task's outcome. A panic in the task resumes on the
/// caller.
fn joined<T>(result: core::result::Result<Result<T>, JoinError>) -> Result<T> {
    match result {
        Ok(result) => result,
        Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
        Err(err) => Err(keel_core::err!("blocking task did not complete: {err}")),
    }
}

impl<E> Clone for AsyncRepository<E> {
    fn clone(&self) -> Self {
        AsyncRepository {
            inner: self.inner.clone(),
        }
    }
}

impl<E> core::fmt::Debug for AsyncRepository<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AsyncRepository")
            .field("inner", &self.inner)
            .finish()
    }
}
