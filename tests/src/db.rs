pub mod json;
pub mod sqlite;
