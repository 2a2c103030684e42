use super::{Formatter, ToSql};

/// A quoted identifier: table, column or index name.
pub(super) struct Ident<S>(pub(super) S);

impl<S: AsRef<str>> ToSql for Ident<S> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        f.dst.push_str(&f.dialect.quote_identifier(self.0.as_ref()));
    }
}
