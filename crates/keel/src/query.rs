use crate::{db::Backend, Repository, Result};

use keel_core::{
    driver::{Document, Rows},
    query::{Filter, QueryState},
    schema::FieldMetadata,
    stmt::{Coercion, DefaultCoercion, Operator, Type, Value},
    EntityMetadata, Error,
};
use keel_sql::{Dialect, SqlFragment};

use tracing::debug;

/// A fresh, independently owned query over one entity type.
///
/// Built with [`filter`](Self::filter), [`and`](Self::and),
/// [`or`](Self::or) and [`limit`](Self::limit), then run with one of the
/// terminals. `or` binds the next predicate to the one right before it:
/// `a.or().b.and().c` means `(a OR b) AND c`.
#[derive(Debug)]
pub struct Query<E> {
    repository: Repository<E>,
    plan: Plan,
}

#[derive(Debug)]
enum Plan {
    Sql {
        dialect: Dialect,
        state: QueryState<SqlFragment>,
    },
    Documents(QueryState<Filter>),
}

impl<E> Query<E> {
    pub(crate) fn new(repository: Repository<E>) -> Query<E> {
        let plan = match repository.db().backend() {
            Backend::Sql { dialect, .. } => Plan::Sql {
                dialect: *dialect,
                state: QueryState::new(),
            },
            Backend::Documents(_) => Plan::Documents(QueryState::new()),
        };

        Query { repository, plan }
    }

    /// Adds the predicate `column op value`.
    ///
    /// `column` may be a column name or a field name. Predicates that cannot
    /// be built, such as null with an ordering operator, fail here rather
    /// than at execution.
    pub fn filter(mut self, column: &str, op: Operator, value: impl Into<Value>) -> Result<Self> {
        let metadata = self.repository.metadata();
        let column = metadata.resolve_column(column);
        let ty = metadata.field(&column).map(|field| field.ty);
        let value = value.into();

        match (&mut self.plan, ty) {
            (Plan::Sql { dialect, state }, Some(ty)) => {
                state.push(dialect.build_field_predicate(&column, &ty, op, value)?);
            }
            (Plan::Sql { dialect, state }, None) => {
                state.push(dialect.build_predicate(&column, op, value)?);
            }
            (Plan::Documents(state), Some(ty)) => {
                state.push(Filter::build_field(&column, ty, op, DefaultCoercion.to_backend(value))?);
            }
            (Plan::Documents(state), None) => {
                state.push(Filter::build(&column, op, DefaultCoercion.to_backend(value))?);
            }
        }

        Ok(self)
    }

    pub fn and(mut self) -> Self {
        match &mut self.plan {
            Plan::Sql { state, .. } => state.and(),
            Plan::Documents(state) => state.and(),
        }
        self
    }

    pub fn or(mut self) -> Self {
        match &mut self.plan {
            Plan::Sql { state, .. } => state.or(),
            Plan::Documents(state) => state.or(),
        }
        self
    }

    /// Caps the number of records `all` returns. Zero or a negative value
    /// removes the cap.
    pub fn limit(mut self, n: i64) -> Self {
        match &mut self.plan {
            Plan::Sql { state, .. } => state.limit(n),
            Plan::Documents(state) => state.limit(n),
        }
        self
    }

    /// Runs the query and returns every matching record.
    pub fn all(self) -> Result<Vec<E>> {
        let metadata = self.repository.metadata();

        match (self.repository.db().backend(), self.plan) {
            (Backend::Sql { driver, .. }, Plan::Sql { dialect, state }) => {
                let limit = state.get_limit();
                let mut params = vec![];
                let sql = dialect.select(metadata, state.into_conditions(), limit, &mut params);

                debug!(%sql, params = params.len(), "query");
                let rows = driver.query(&sql, &params)?;
                load_rows(metadata, &dialect, rows)
            }
            (Backend::Documents(store), Plan::Documents(state)) => {
                let limit = state.get_limit().unwrap_or(usize::MAX);
                let documents = store.load_all(metadata.entity_name())?;

                scan(documents, &state.into_conditions())
                    .take(limit)
                    .map(|document| load_document(metadata, &document))
                    .collect()
            }
            _ => Err(mismatched_plan()),
        }
    }

    /// Runs the query with a limit of one. Zero matches is `Ok(None)`.
    pub fn one(self) -> Result<Option<E>> {
        Ok(self.limit(1).all()?.into_iter().next())
    }

    /// Deletes every matching record and returns how many were removed.
    /// Any limit is ignored.
    pub fn delete(self) -> Result<u64> {
        let metadata = self.repository.metadata();

        match (self.repository.db().backend(), self.plan) {
            (Backend::Sql { driver, .. }, Plan::Sql { dialect, state }) => {
                let mut params = vec![];
                let sql = dialect.delete(metadata, state.into_conditions(), &mut params);

                debug!(%sql, params = params.len(), "delete");
                driver.execute_update(&sql, &params)
            }
            (Backend::Documents(store), Plan::Documents(state)) => {
                let collection = metadata.entity_name();
                let documents = store.load_all(collection)?;
                let id = metadata.id();

                let mut removed = 0;
                for document in scan(documents, &state.into_conditions()) {
                    let key = document_key(id, &document)?;
                    if store.remove(collection, &key)? {
                        removed += 1;
                    }
                }

                debug!(collection, removed, "delete");
                Ok(removed)
            }
            _ => Err(mismatched_plan()),
        }
    }

    /// Counts matching records. Any limit is ignored.
    pub fn count(self) -> Result<u64> {
        let metadata = self.repository.metadata();

        match (self.repository.db().backend(), self.plan) {
            (Backend::Sql { driver, .. }, Plan::Sql { dialect, state }) => {
                let mut params = vec![];
                let sql = dialect.count(metadata, state.into_conditions(), &mut params);

                debug!(%sql, params = params.len(), "count");
                let rows = driver.query(&sql, &params)?;
                let count = rows
                    .rows
                    .into_iter()
                    .next()
                    .and_then(|row| row.into_iter().next())
                    .unwrap_or(Value::I64(0));

                match dialect.from_backend(count, &Type::I64)? {
                    Value::I64(n) => Ok(n.max(0) as u64),
                    value => Err(Error::type_conversion(value, &Type::I64)),
                }
            }
            (Backend::Documents(store), Plan::Documents(state)) => {
                let documents = store.load_all(metadata.entity_name())?;
                Ok(scan(documents, &state.into_conditions()).count() as u64)
            }
            _ => Err(mismatched_plan()),
        }
    }
}

fn scan<'a>(
    documents: Vec<Document>,
    conditions: &'a [keel_core::query::Condition<Filter>],
) -> impl Iterator<Item = Document> + 'a {
    documents.into_iter().filter(move |document| {
        conditions
            .iter()
            .all(|condition| condition.fragment.matches(document))
    })
}

fn load_rows<E>(metadata: &EntityMetadata<E>, dialect: &Dialect, rows: Rows) -> Result<Vec<E>> {
    rows.rows
        .into_iter()
        .map(|mut row| {
            metadata.materialize(|position, field| {
                let value = row.get_mut(position).map(std::mem::take).unwrap_or_default();
                dialect.from_backend(value, &field.ty)
            })
        })
        .collect()
}

pub(crate) fn load_document<E>(metadata: &EntityMetadata<E>, document: &Document) -> Result<E> {
    metadata.materialize(|_, field| {
        let value = lookup(document, &field.column_name);
        DefaultCoercion.from_backend(value, &field.ty)
    })
}

fn lookup(document: &Document, column: &str) -> Value {
    document
        .get(column)
        .or_else(|| {
            document
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(column))
                .map(|(_, value)| value)
        })
        .cloned()
        .unwrap_or_default()
}

/// Canonical key of a stored document, read from its id column.
pub(crate) fn document_key<E>(id: &FieldMetadata<E>, document: &Document) -> Result<String> {
    let value = DefaultCoercion.from_backend(lookup(document, &id.column_name), &id.ty)?;
    key_string(&value)
}

pub(crate) fn key_string(value: &Value) -> Result<String> {
    value
        .to_key_string()
        .ok_or_else(|| keel_core::err!("a {} value cannot identify a record", value.kind_name()))
}

fn mismatched_plan() -> Error {
    keel_core::err!("query was built for a different backend")
}
