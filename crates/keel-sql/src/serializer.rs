#[macro_use]
mod fmt;
use fmt::ToSql;

mod column_def;

mod delim;
use delim::Comma;

mod filter;
use filter::{Limit, Where};

mod ident;
use ident::Ident;

mod statement;

use crate::{Dialect, Flavor, Statement};

use keel_core::stmt::Value;

struct Formatter<'a> {
    /// Dialect the statement is rendered for
    dialect: &'a Dialect,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters, in placeholder order
    params: &'a mut Vec<Value>,
}

impl Dialect {
    /// Serializes a statement, appending its bound parameters to `params`.
    pub fn serialize(&self, stmt: &Statement, params: &mut Vec<Value>) -> String {
        let mut ret = String::new();

        let mut fmt = Formatter {
            dialect: self,
            dst: &mut ret,
            params,
        };

        stmt.to_sql(&mut fmt);

        match self.flavor() {
            Flavor::Postgresql => number_placeholders(&ret),
            Flavor::Sqlite | Flavor::Mysql => ret,
        }
    }
}

/// Rewrites `?` placeholders as `$1, $2, ...`, skipping quoted identifiers
/// and string literals.
pub(crate) fn number_placeholders(sql: &str) -> String {
    let mut ret = String::with_capacity(sql.len() + 8);
    let mut quote = None;
    let mut n = 0;

    for ch in sql.chars() {
        match (quote, ch) {
            (None, '"' | '\'' | '`') => {
                quote = Some(ch);
                ret.push(ch);
            }
            (Some(open), _) if open == ch => {
                quote = None;
                ret.push(ch);
            }
            (None, '?') => {
                n += 1;
                ret.push('$');
                ret.push_str(&n.to_string());
            }
            _ => ret.push(ch),
        }
    }

    ret
}
