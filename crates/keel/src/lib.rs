extern crate self as keel;

mod async_repository;
pub use async_repository::{AsyncQuery, AsyncRepository};

pub mod db;
pub use db::Db;

mod migrate;
pub use migrate::MigrationReport;

mod query;
pub use query::Query;

mod repository;
pub use repository::Repository;

pub mod stmt;
pub use stmt::Primitive;

mod transaction;
pub use transaction::Transaction;

#[cfg(test)]
mod test_support;

pub use keel_core::{
    driver::{Capability, Support},
    schema::{Entity, EntityMetadata, Registry},
    stmt::{Operator, Type, Value},
    Error, Result,
};
pub use keel_macros::Entity;
pub use keel_sql::{Dialect, Flavor};

#[doc(hidden)]
pub mod codegen_support {
    pub use crate::{stmt::Primitive, Result};
    pub use keel_core::{
        schema::{
            ColumnDescriptor, Entity, EntityDescriptor, FieldAccessor, FieldDescriptor,
            IndexDescriptor,
        },
        stmt::{blob, Type, Value},
    };
    pub use std::default::Default;
}
