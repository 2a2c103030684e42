use super::{Comma, Formatter, Ident, Limit, ToSql, Where};

use crate::{
    stmt::{
        AddColumn, CreateIndex, CreateTable, Delete, DropIndex, DropTable, Projection, Select,
        Upsert,
    },
    Flavor, Statement,
};

impl ToSql for &Statement {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self {
            Statement::AddColumn(stmt) => stmt.to_sql(f),
            Statement::CreateIndex(stmt) => stmt.to_sql(f),
            Statement::CreateTable(stmt) => stmt.to_sql(f),
            Statement::Delete(stmt) => stmt.to_sql(f),
            Statement::DropIndex(stmt) => stmt.to_sql(f),
            Statement::DropTable(stmt) => stmt.to_sql(f),
            Statement::Select(stmt) => stmt.to_sql(f),
            Statement::Upsert(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &AddColumn {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let column = &self.column;

        fmt!(f, "ALTER TABLE " Ident(&self.table) " ADD COLUMN " column);
    }
}

impl ToSql for &CreateIndex {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let unique = self.unique.then_some("UNIQUE ");
        let columns = Comma(self.columns.iter().map(Ident));

        fmt!(f, "CREATE " unique "INDEX " Ident(&self.name) " ON " Ident(&self.table) " (" columns ")");
    }
}

impl ToSql for &CreateTable {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let columns = Comma(&self.columns);
        let options = match f.dialect.flavor() {
            Flavor::Mysql => Some(" ENGINE=InnoDB DEFAULT CHARSET=utf8mb4"),
            Flavor::Sqlite | Flavor::Postgresql => None,
        };

        fmt!(f, "CREATE TABLE IF NOT EXISTS " Ident(&self.table) " (" columns ")" options);
    }
}

impl ToSql for &Delete {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, "DELETE FROM " Ident(&self.table) Where(&self.filter));
    }
}

impl ToSql for &DropIndex {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match f.dialect.flavor() {
            Flavor::Mysql => fmt!(f, "DROP INDEX " Ident(&self.name) " ON " Ident(&self.table)),
            Flavor::Sqlite | Flavor::Postgresql => {
                fmt!(f, "DROP INDEX IF EXISTS " Ident(&self.name))
            }
        }
    }
}

impl ToSql for &DropTable {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, "DROP TABLE IF EXISTS " Ident(&self.table));
    }
}

impl ToSql for &Select {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let projection = &self.projection;

        fmt!(f, "SELECT " projection " FROM " Ident(&self.table) Where(&self.filter) Limit(self.limit));
    }
}

impl ToSql for &Projection {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self {
            Projection::Columns(columns) => fmt!(f, Comma(columns.iter().map(Ident))),
            Projection::Count => fmt!(f, "COUNT(*)"),
        }
    }
}

/// Parameters are not collected: an upsert is bound once per record by the
/// caller, in column order.
impl ToSql for &Upsert {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let columns = Comma(self.columns.iter().map(Ident));
        let placeholders = Comma(self.columns.iter().map(|_| "?"));

        match f.dialect.flavor() {
            Flavor::Sqlite => {
                fmt!(f, "INSERT OR REPLACE INTO " Ident(&self.table) " (" columns ") VALUES (" placeholders ")");
            }
            Flavor::Mysql => {
                fmt!(f, "INSERT INTO " Ident(&self.table) " (" columns ") VALUES (" placeholders ")");
                fmt!(f, " ON DUPLICATE KEY UPDATE ");

                if self.value_columns().is_empty() {
                    fmt!(f, Ident(self.id_column()) " = " Ident(self.id_column()));
                } else {
                    fmt!(f, Comma(self.value_columns().iter().map(Reassign)));
                }
            }
            Flavor::Postgresql => {
                fmt!(f, "INSERT INTO " Ident(&self.table) " (" columns ") VALUES (" placeholders ")");
                fmt!(f, " ON CONFLICT (" Ident(self.id_column()) ") DO ");

                if self.value_columns().is_empty() {
                    fmt!(f, "NOTHING");
                } else {
                    fmt!(f, "UPDATE SET " Comma(self.value_columns().iter().map(Reassign)));
                }
            }
        }
    }
}

/// `c = VALUES(c)` on MySQL, `c = EXCLUDED.c` on PostgreSQL.
struct Reassign<'a>(&'a String);

impl ToSql for Reassign<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match f.dialect.flavor() {
            Flavor::Mysql => fmt!(f, Ident(self.0) " = VALUES(" Ident(self.0) ")"),
            Flavor::Sqlite | Flavor::Postgresql => {
                fmt!(f, Ident(self.0) " = EXCLUDED." Ident(self.0))
            }
        }
    }
}
