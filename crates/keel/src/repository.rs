use crate::{
    db::Backend,
    migrate::{self, MigrationReport},
    query::{key_string, load_document},
    AsyncRepository, Db, Error, Query, Result,
};

use keel_core::{
    driver::Document,
    stmt::{Coercion, DefaultCoercion, Operator, Value},
    EntityMetadata,
};

use std::sync::Arc;
use tracing::debug;

/// Persistence operations for one entity type.
pub struct Repository<E> {
    db: Db,
    metadata: Arc<EntityMetadata<E>>,
}

impl<E> Repository<E> {
    pub(crate) fn new(db: Db, metadata: Arc<EntityMetadata<E>>) -> Repository<E> {
        Repository { db, metadata }
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    pub fn metadata(&self) -> &EntityMetadata<E> {
        &self.metadata
    }

    /// Returns a fresh query builder.
    pub fn query(&self) -> Query<E> {
        Query::new(self.clone())
    }

    pub fn into_async(self) -> AsyncRepository<E> {
        AsyncRepository::new(self)
    }

    /// Inserts `entity`, or replaces the record with the same id.
    pub fn save(&self, entity: &E) -> Result<()> {
        match self.db.backend() {
            Backend::Sql { driver, dialect } => {
                let sql = dialect.upsert(&self.metadata);
                let params = self.row(dialect, entity)?;

                debug!(%sql, params = params.len(), "save");
                driver.execute_update(&sql, &params)?;
                Ok(())
            }
            Backend::Documents(store) => {
                let (key, document) = self.document(entity)?;
                store.store(self.metadata.entity_name(), &key, document)
            }
        }
    }

    /// Saves every record in one batch.
    pub fn save_all(&self, entities: &[E]) -> Result<()> {
        if entities.is_empty() {
            return Ok(());
        }

        match self.db.backend() {
            Backend::Sql { driver, dialect } => {
                let sql = dialect.upsert(&self.metadata);
                let batch = entities
                    .iter()
                    .map(|entity| self.row(dialect, entity))
                    .collect::<Result<Vec<_>>>()?;

                debug!(%sql, records = batch.len(), "save batch");
                driver.execute_batch(&sql, &batch)?;
                Ok(())
            }
            Backend::Documents(store) => {
                for entity in entities {
                    let (key, document) = self.document(entity)?;
                    store.store(self.metadata.entity_name(), &key, document)?;
                }
                Ok(())
            }
        }
    }

    /// Deletes the record with the id of `entity`. Returns true when a
    /// record was removed.
    pub fn delete(&self, entity: &E) -> Result<bool> {
        let id = self.metadata.id_value(entity)?;
        self.delete_by_id(id)
    }

    pub fn delete_by_id(&self, id: impl Into<Value>) -> Result<bool> {
        if let Backend::Documents(store) = self.db.backend() {
            return match self.id_key(id.into()) {
                Some(key) => store.remove(self.metadata.entity_name(), &key),
                None => Ok(false),
            };
        }

        let removed = self
            .query()
            .filter(&self.metadata.id().column_name, Operator::Equal, id)?
            .delete()?;
        Ok(removed > 0)
    }

    /// Deletes every record whose id is in `ids`, with a single `IN`
    /// predicate.
    pub fn delete_all_by_id<I>(&self, ids: I) -> Result<u64>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.query()
            .filter(&self.metadata.id().column_name, Operator::In, Value::list(ids))?
            .delete()
    }

    /// Deletes every record.
    pub fn delete_all(&self) -> Result<u64> {
        self.query().delete()
    }

    pub fn find_by_id(&self, id: impl Into<Value>) -> Result<Option<E>> {
        if let Backend::Documents(store) = self.db.backend() {
            let Some(key) = self.id_key(id.into()) else {
                return Ok(None);
            };
            return store
                .load(self.metadata.entity_name(), &key)?
                .map(|document| load_document(&self.metadata, &document))
                .transpose();
        }

        self.query()
            .filter(&self.metadata.id().column_name, Operator::Equal, id)?
            .one()
    }

    pub fn find_all(&self) -> Result<Vec<E>> {
        self.query().all()
    }

    pub fn count(&self) -> Result<u64> {
        self.query().count()
    }

    /// Creates the table, then every declared index that is not yet
    /// present. Document stores have nothing to create.
    pub fn create_table_if_not_exists(&self) -> Result<()> {
        let Backend::Sql { driver, dialect } = self.db.backend() else {
            return Ok(());
        };

        let sql = dialect.create_table(&self.metadata);
        debug!(%sql, "create table");
        driver.execute(&sql)?;

        let live = migrate::index_names(&migrate::live_indexes(
            driver.as_ref(),
            dialect,
            self.metadata.entity_name(),
        )?);
        for index in self.metadata.indexes() {
            if !live.contains(&index.name.to_lowercase()) {
                let sql = dialect.create_index(&self.metadata, index);
                debug!(%sql, "create index");
                driver.execute(&sql)?;
            }
        }

        Ok(())
    }

    pub fn drop_table(&self) -> Result<()> {
        match self.db.backend() {
            Backend::Sql { driver, dialect } => {
                let sql = dialect.drop_table(&self.metadata);
                debug!(%sql, "drop table");
                driver.execute(&sql)?;
                Ok(())
            }
            Backend::Documents(store) => store.drop_collection(self.metadata.entity_name()),
        }
    }

    /// Brings the live table up to date with the entity: adds missing
    /// columns and indexes. Nothing is ever dropped.
    pub fn migrate(&self) -> Result<MigrationReport> {
        match self.db.backend() {
            Backend::Sql { driver, dialect } => {
                migrate::run(driver.as_ref(), dialect, &self.metadata)
            }
            Backend::Documents(_) => Err(Error::unsupported_feature(
                "migration is not supported by document stores",
            )),
        }
    }

    /// Document key for a caller-supplied id, read as the id's declared
    /// type. An id that cannot name a record (null, or of the wrong type)
    /// yields `None`.
    fn id_key(&self, id: Value) -> Option<String> {
        let ty = &self.metadata.id().ty;
        let id = DefaultCoercion
            .from_backend(DefaultCoercion.to_backend(id), ty)
            .ok()?;
        key_string(&id).ok()
    }

    /// Extracts `entity` as upsert parameters, in column order.
    fn row(&self, dialect: &keel_sql::Dialect, entity: &E) -> Result<Vec<Value>> {
        Ok(self
            .metadata
            .extract(entity)?
            .into_iter()
            .map(|value| dialect.to_backend(value))
            .collect())
    }

    /// Extracts `entity` as a document, with its key.
    fn document(&self, entity: &E) -> Result<(String, Document)> {
        let values = self.metadata.extract(entity)?;
        let key = key_string(values.first().unwrap_or(&Value::Null)).map_err(|err| {
            err.context(format!(
                "saving `{}` needs a non-null id",
                self.metadata.entity_name()
            ))
        })?;

        let document = self
            .metadata
            .all_fields()
            .zip(values)
            .map(|(field, value)| (field.column_name.clone(), DefaultCoercion.to_backend(value)))
            .collect();

        Ok((key, document))
    }
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Repository {
            db: self.db.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

impl<E> core::fmt::Debug for Repository<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Repository")
            .field("entity", &self.metadata.entity_name())
            .field("db", &self.db)
            .finish()
    }
}
