mod add_column;
pub use add_column::AddColumn;

mod column_def;
pub use column_def::{ColumnDef, ColumnTy};

mod create_index;
pub use create_index::CreateIndex;

mod create_table;
pub use create_table::CreateTable;

mod delete;
pub use delete::Delete;

mod drop_index;
pub use drop_index::DropIndex;

mod drop_table;
pub use drop_table::DropTable;

mod select;
pub use select::{Projection, Select};

mod upsert;
pub use upsert::Upsert;

use crate::SqlFragment;
use keel_core::query::Condition;

/// Conditions of a WHERE clause, already OR-absorbed.
pub type Filter = Vec<Condition<SqlFragment>>;

#[derive(Debug, Clone)]
pub enum Statement {
    AddColumn(AddColumn),
    CreateIndex(CreateIndex),
    CreateTable(CreateTable),
    Delete(Delete),
    DropIndex(DropIndex),
    DropTable(DropTable),
    Select(Select),
    Upsert(Upsert),
}
