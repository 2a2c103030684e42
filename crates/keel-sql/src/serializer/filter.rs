use super::{Formatter, ToSql};

use crate::SqlFragment;
use keel_core::query::Condition;

/// ` WHERE a AND (b OR c)`; nothing when there are no conditions.
pub(super) struct Where<'a>(pub(super) &'a [Condition<SqlFragment>]);

impl ToSql for Where<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        if self.0.is_empty() {
            return;
        }

        f.dst.push_str(" WHERE ");
        for condition in self.0 {
            if let Some(connector) = condition.connector {
                fmt!(f, " " connector.as_str() " ");
            }
            f.dst.push_str(&condition.fragment.text);
            f.params.extend(condition.fragment.params.iter().cloned());
        }
    }
}

/// ` LIMIT n`; nothing when unlimited.
pub(super) struct Limit(pub(super) Option<usize>);

impl ToSql for Limit {
    fn to_sql(self, f: &mut Formatter<'_>) {
        if let Some(n) = self.0 {
            f.dst.push_str(&f.dialect.limit_clause(n));
        }
    }
}
