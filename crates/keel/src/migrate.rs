use crate::Result;

use keel_core::{
    driver::{ColumnInfo, IndexInfo, SqlDriver},
    schema::{FieldMetadata, IndexMetadata},
    stmt::Value,
    EntityMetadata,
};
use keel_sql::Dialect;

use std::collections::HashSet;
use tracing::{debug, info, warn};

/// What one migration pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Columns added, in declaration order.
    pub added_columns: Vec<String>,

    /// Indexes created.
    pub created_indexes: Vec<String>,

    /// Live columns the entity no longer declares. Detected, never dropped.
    pub skipped_drops: Vec<String>,

    /// DDL executed, in order.
    pub statements: Vec<String>,
}

impl MigrationReport {
    /// True when the pass executed no DDL.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Introspecting,
    Diffing,
    Applying,
    Idle,
}

struct Plan<'a, E> {
    add_columns: Vec<&'a FieldMetadata<E>>,
    add_indexes: Vec<&'a IndexMetadata>,
    skipped_drops: Vec<String>,
}

/// Runs one additive migration pass for `metadata`.
///
/// Missing columns are added as nullable, since no backfill value exists.
/// Missing indexes are created; an index is matched by name only. The
/// first failing statement aborts the pass.
pub(crate) fn run<E>(
    driver: &dyn SqlDriver,
    dialect: &Dialect,
    metadata: &EntityMetadata<E>,
) -> Result<MigrationReport> {
    let table = metadata.entity_name();

    enter(table, Phase::Introspecting);
    let columns = live_columns(driver, dialect, table)?;
    let indexes = live_indexes(driver, dialect, table)?;

    let mut report = MigrationReport::default();

    // No live columns means no table: create it whole, then diff indexes.
    if columns.is_empty() {
        enter(table, Phase::Applying);
        let sql = dialect.create_table(metadata);
        apply(driver, &sql)?;
        report.added_columns = metadata
            .all_fields()
            .map(|field| field.column_name.clone())
            .collect();
        report.statements.push(sql);
    }

    enter(table, Phase::Diffing);
    let mut plan = diff(metadata, &columns, &index_names(&indexes));
    if !report.is_empty() {
        plan.add_columns.clear();
    }

    for column in &plan.skipped_drops {
        warn!(table, column, "column is not declared by the entity; skipping drop");
    }

    enter(table, Phase::Applying);
    report.skipped_drops = plan.skipped_drops;

    for field in plan.add_columns {
        let sql = dialect.add_column(metadata, field);
        apply(driver, &sql)?;
        report.added_columns.push(field.column_name.clone());
        report.statements.push(sql);
    }

    for index in plan.add_indexes {
        let sql = dialect.create_index(metadata, index);
        apply(driver, &sql)?;
        report.created_indexes.push(index.name.clone());
        report.statements.push(sql);
    }

    if report.is_empty() {
        info!(table, "no schema changes detected");
    }

    enter(table, Phase::Idle);
    Ok(report)
}

fn enter(table: &str, phase: Phase) {
    debug!(table, ?phase, "migration");
}

fn apply(driver: &dyn SqlDriver, sql: &str) -> Result<()> {
    info!(%sql, "applying migration");
    driver.execute(sql)?;
    Ok(())
}

fn diff<'a, E>(
    metadata: &'a EntityMetadata<E>,
    live_columns: &[ColumnInfo],
    live_indexes: &HashSet<String>,
) -> Plan<'a, E> {
    let live: HashSet<String> = live_columns
        .iter()
        .map(|column| column.name.to_lowercase())
        .collect();

    let add_columns = metadata
        .all_fields()
        .filter(|field| !live.contains(&field.column_name.to_lowercase()))
        .collect();

    let skipped_drops = live_columns
        .iter()
        .filter(|column| metadata.field(&column.name).is_none())
        .map(|column| column.name.clone())
        .collect();

    let add_indexes = metadata
        .indexes()
        .iter()
        .filter(|index| !live_indexes.contains(&index.name.to_lowercase()))
        .collect();

    Plan {
        add_columns,
        add_indexes,
        skipped_drops,
    }
}

/// Live columns of `table`, in catalog order.
pub(crate) fn live_columns(
    driver: &dyn SqlDriver,
    dialect: &Dialect,
    table: &str,
) -> Result<Vec<ColumnInfo>> {
    let (sql, params) = dialect.list_columns_query(table);
    Ok(names(driver, &sql, &params)?
        .into_iter()
        .map(|name| ColumnInfo { name })
        .collect())
}

/// Live indexes of `table`.
pub(crate) fn live_indexes(
    driver: &dyn SqlDriver,
    dialect: &Dialect,
    table: &str,
) -> Result<Vec<IndexInfo>> {
    let (sql, params) = dialect.list_indexes_query(table);
    Ok(names(driver, &sql, &params)?
        .into_iter()
        .map(|name| IndexInfo { name })
        .collect())
}

/// Index names, lowercased for lookup.
pub(crate) fn index_names(indexes: &[IndexInfo]) -> HashSet<String> {
    indexes
        .iter()
        .map(|index| index.name.to_lowercase())
        .collect()
}

fn names(driver: &dyn SqlDriver, sql: &str, params: &[Value]) -> Result<Vec<String>> {
    debug!(%sql, params = params.len(), "introspect");
    let rows = driver.query(sql, params)?;
    let position = rows.position("name").unwrap_or(0);

    Ok(rows
        .rows
        .into_iter()
        .filter_map(|row| match row.into_iter().nth(position) {
            Some(Value::String(name)) => Some(name),
            _ => None,
        })
        .collect())
}
